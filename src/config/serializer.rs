use crate::config::types::{ConfigEntry, ConfigModel, Section};

/// Render a [`ConfigModel`] back to text.
///
/// Untouched sections and entries are re-emitted from their retained raw
/// lines, so `serialize(parse(text)) == text` for any well-formed text with
/// no intervening edits. New or modified pieces are rendered canonically:
/// `[name]` / `[name "subsection"]` headers and `\tkey = value` entries.
pub fn serialize(model: &ConfigModel) -> String {
	let mut lines: Vec<String> = Vec::new();

	for section in &model.sections {
		lines.extend(section.leading.iter().cloned());
		match section.raw_header {
			Some(ref raw) => lines.push(raw.clone()),
			None => lines.push(render_header(section)),
		}
		for entry in &section.entries {
			lines.extend(entry.leading.iter().cloned());
			match entry.raw {
				Some(ref raw) => lines.push(raw.clone()),
				None => lines.push(render_entry(entry)),
			}
		}
	}
	lines.extend(model.trailing.iter().cloned());

	let mut out = lines.join("\n");
	if model.trailing_newline && !out.is_empty() {
		out.push('\n');
	}
	out
}

/// Canonical header: section name never quoted, subsection always quoted.
fn render_header(section: &Section) -> String {
	match section.subsection {
		Some(ref sub) => {
			let escaped = sub.replace('\\', "\\\\").replace('"', "\\\"");
			format!("[{} \"{}\"]", section.name, escaped)
		}
		None => format!("[{}]", section.name),
	}
}

fn render_entry(entry: &ConfigEntry) -> String {
	match entry.value {
		Some(ref value) => format!("\t{} = {}", entry.key, render_value(value)),
		None => format!("\t{}", entry.key),
	}
}

/// Render a value, quoting only when the unquoted form would not parse
/// back to the same string.
fn render_value(value: &str) -> String {
	let needs_quotes = value.starts_with([' ', '\t'])
		|| value.ends_with([' ', '\t'])
		|| value.contains(['#', ';', '\\', '"']);

	let mut out = String::with_capacity(value.len() + 2);
	if needs_quotes {
		out.push('"');
	}
	for c in value.chars() {
		match c {
			'\\' => out.push_str("\\\\"),
			'"' => out.push_str("\\\""),
			'\n' => out.push_str("\\n"),
			'\t' => out.push_str("\\t"),
			'\u{0008}' => out.push_str("\\b"),
			_ => out.push(c),
		}
	}
	if needs_quotes {
		out.push('"');
	}
	out
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::config::parser::parse_config_str;

	fn round_trip(text: &str) {
		let model = parse_config_str(text).unwrap();
		assert_eq!(serialize(&model), text);
	}

	#[test]
	fn test_round_trip_preserves_everything() {
		round_trip(
			"# top comment\n\
			 [core]\n\
			 \tbare = false   # trailing note\n\
			 \n\
			 ; another comment style\n\
			 [remote \"Origin\"]\n\
			 \turl = https://example.com/repo.git\n\
			 \tfetch = +refs/heads/*:refs/remotes/origin/*\n\
			 [alias]\n\
			 \tlg = log \\\n\
			 --oneline\n\
			 # tail comment\n",
		);
	}

	#[test]
	fn test_round_trip_odd_formatting() {
		// Unusual spacing, casing, and a missing final newline all survive.
		round_trip("[User]\nName=Ada\n   email   =   a@b   \n[core]");
	}

	#[test]
	fn test_round_trip_empty() {
		round_trip("");
	}

	#[test]
	fn test_edited_entry_rendered_canonically() {
		let mut model = parse_config_str("[core]\n  bare   =   false\n").unwrap();
		model.set("core.bare", "true").unwrap();
		assert_eq!(serialize(&model), "[core]\n\tbare = true\n");
	}

	#[test]
	fn test_unedited_neighbors_keep_formatting() {
		let mut model =
			parse_config_str("[core]\n  bare   =   false\n  ignorecase = true\n").unwrap();
		model.set("core.ignorecase", "false").unwrap();
		assert_eq!(
			serialize(&model),
			"[core]\n  bare   =   false\n\tignorecase = false\n"
		);
	}

	#[test]
	fn test_plain_value_unquoted() {
		let mut model = crate::config::types::ConfigModel::default();
		model.set("user.name", "Ada Lovelace").unwrap();
		assert_eq!(serialize(&model), "[user]\n\tname = Ada Lovelace\n");
	}

	#[test]
	fn test_value_with_surrounding_whitespace_quoted() {
		let mut model = crate::config::types::ConfigModel::default();
		model.set("user.name", "  Ada  ").unwrap();
		assert_eq!(serialize(&model), "[user]\n\tname = \"  Ada  \"\n");
	}

	#[test]
	fn test_value_with_comment_chars_quoted() {
		let mut model = crate::config::types::ConfigModel::default();
		model.set("alias.note", "see #42; ok").unwrap();
		assert_eq!(serialize(&model), "[alias]\n\tnote = \"see #42; ok\"\n");
	}

	#[test]
	fn test_value_with_quote_and_backslash_escaped() {
		let mut model = crate::config::types::ConfigModel::default();
		model.set("a.b", "say \"hi\" C:\\tmp").unwrap();
		assert_eq!(
			serialize(&model),
			"[a]\n\tb = \"say \\\"hi\\\" C:\\\\tmp\"\n"
		);
	}

	#[test]
	fn test_canonical_values_parse_back_identically() {
		let values = [
			"plain",
			"  padded  ",
			"tab\there",
			"new\nline",
			"quote\"back\\slash",
			"trailing#hash ; and ; semis",
			"",
		];
		let mut model = crate::config::types::ConfigModel::default();
		for (i, value) in values.iter().enumerate() {
			model.set(&format!("sec.key{i}"), value).unwrap();
		}
		let reparsed = parse_config_str(&serialize(&model)).unwrap();
		for (i, value) in values.iter().enumerate() {
			assert_eq!(
				reparsed.get(&format!("sec.key{i}")).unwrap().as_deref(),
				Some(*value),
				"value {i} did not survive the canonical round trip"
			);
		}
	}

	#[test]
	fn test_subsection_header_escaping() {
		let mut model = crate::config::types::ConfigModel::default();
		model.set("url.a\"b\\c.insteadof", "x").unwrap();
		assert_eq!(
			serialize(&model),
			"[url \"a\\\"b\\\\c\"]\n\tinsteadof = x\n"
		);
	}
}
