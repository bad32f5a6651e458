use crate::config::types::{ConfigEntry, ConfigModel, Section};
use crate::error::{GitConfigError, Result};

/// Parse git-config-format text into a [`ConfigModel`].
///
/// Pure function over the text: no I/O. Every physical line is retained
/// either as an entry/header `raw` or as leading/trailing formatting
/// metadata, so serializing an unedited model reproduces the input
/// byte-for-byte. Malformed input fails with a parse error naming the
/// offending line; no partial model is returned.
pub fn parse_config_str(text: &str) -> Result<ConfigModel> {
	let mut model = ConfigModel {
		sections: Vec::new(),
		trailing: Vec::new(),
		trailing_newline: text.is_empty() || text.ends_with('\n'),
	};

	let mut lines: Vec<&str> = if text.is_empty() {
		Vec::new()
	} else {
		text.split('\n').collect()
	};
	if text.ends_with('\n') {
		lines.pop();
	}

	// Blank/comment lines waiting to be attached to the next entry or
	// section header.
	let mut pending: Vec<String> = Vec::new();

	let mut i = 0;
	while i < lines.len() {
		let line = lines[i];
		let lineno = i + 1;
		let trimmed = line.trim();

		if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with(';') {
			pending.push(line.to_string());
			i += 1;
			continue;
		}

		if trimmed.starts_with('[') {
			let (name, subsection) = parse_section_header(trimmed, lineno)?;
			model.sections.push(Section {
				name,
				subsection,
				raw_header: Some(line.to_string()),
				leading: std::mem::take(&mut pending),
				entries: Vec::new(),
			});
			i += 1;
			continue;
		}

		let Some(section) = model.sections.last_mut() else {
			return Err(GitConfigError::parse(
				lineno,
				"key/value line before any section header",
			));
		};
		let (mut entry, consumed) = parse_entry(&lines, i)?;
		entry.leading = std::mem::take(&mut pending);
		section.entries.push(entry);
		i += consumed;
	}

	model.trailing = pending;
	Ok(model)
}

/// Parse a `[section]` or `[section "subsection"]` header line.
///
/// The input is already trimmed and starts with `[`. Section names may
/// contain alphanumerics, `-`, and `.`; subsection names are quoted and a
/// backslash quotes the next character, whatever it is.
fn parse_section_header(line: &str, lineno: usize) -> Result<(String, Option<String>)> {
	let mut chars = line[1..].chars().peekable();

	let mut name = String::new();
	while let Some(&c) = chars.peek() {
		if c.is_ascii_alphanumeric() || c == '-' || c == '.' {
			name.push(c);
			chars.next();
		} else {
			break;
		}
	}
	if name.is_empty() {
		return Err(GitConfigError::parse(lineno, "empty section name"));
	}

	while matches!(chars.peek(), Some(' ' | '\t')) {
		chars.next();
	}

	let mut subsection = None;
	if chars.peek() == Some(&'"') {
		chars.next();
		let mut sub = String::new();
		let mut closed = false;
		while let Some(c) = chars.next() {
			match c {
				'"' => {
					closed = true;
					break;
				}
				'\\' => match chars.next() {
					Some(next) => sub.push(next),
					None => break,
				},
				_ => sub.push(c),
			}
		}
		if !closed {
			return Err(GitConfigError::parse(
				lineno,
				"unterminated quote in subsection name",
			));
		}
		subsection = Some(sub);
		while matches!(chars.peek(), Some(' ' | '\t')) {
			chars.next();
		}
	}

	match chars.next() {
		Some(']') => {}
		Some(_) => {
			return Err(GitConfigError::parse(
				lineno,
				"invalid character in section name",
			));
		}
		None => {
			return Err(GitConfigError::parse(
				lineno,
				"section header missing closing ']'",
			));
		}
	}

	// Only whitespace or a comment may follow the header.
	let rest: String = chars.collect();
	let rest = rest.trim_start();
	if !rest.is_empty() && !rest.starts_with('#') && !rest.starts_with(';') {
		return Err(GitConfigError::parse(
			lineno,
			"unexpected text after section header",
		));
	}

	Ok((name, subsection))
}

/// Parse one key/value entry starting at `lines[start]`, following any
/// continuation lines. Returns the entry and the number of physical lines
/// consumed.
fn parse_entry(lines: &[&str], start: usize) -> Result<(ConfigEntry, usize)> {
	let line = lines[start];
	let lineno = start + 1;
	let s = line.trim_start();

	let key_end = s
		.find(|c: char| !(c.is_ascii_alphanumeric() || c == '-'))
		.unwrap_or(s.len());
	let key = &s[..key_end];
	if !key.starts_with(|c: char| c.is_ascii_alphabetic()) {
		return Err(GitConfigError::parse(lineno, "invalid key name"));
	}

	let rest = s[key_end..].trim_start();
	if rest.is_empty() || rest.starts_with('#') || rest.starts_with(';') {
		// Bare key: boolean-true shorthand.
		let entry = ConfigEntry {
			key: key.to_string(),
			value: None,
			raw: Some(line.to_string()),
			leading: Vec::new(),
		};
		return Ok((entry, 1));
	}
	if !rest.starts_with('=') {
		return Err(GitConfigError::parse(lineno, "expected '=' after key"));
	}

	let (value, consumed) = parse_value(&rest[1..], lines, start)?;
	let entry = ConfigEntry {
		key: key.to_string(),
		value: Some(value),
		raw: Some(lines[start..start + consumed].join("\n")),
		leading: Vec::new(),
	};
	Ok((entry, consumed))
}

/// Parse a value, handling quoting, escapes, trailing comments, and
/// trailing-backslash line continuation. `first` is the text after `=` on
/// the entry's first physical line.
fn parse_value(first: &str, lines: &[&str], start: usize) -> Result<(String, usize)> {
	let mut out = String::new();
	let mut consumed = 1;
	let mut in_quotes = false;
	// Watermark below which trailing-whitespace trimming must not reach,
	// because the content came from inside quotes.
	let mut protected = 0;

	let mut current: Vec<char> = first.trim_start().chars().collect();
	let mut pos = 0;
	loop {
		if pos >= current.len() {
			if in_quotes {
				return Err(GitConfigError::parse(
					start + consumed,
					"unterminated quote in value",
				));
			}
			break;
		}
		let c = current[pos];
		pos += 1;
		match c {
			'\\' => {
				if pos >= current.len() {
					// Trailing backslash: the value continues on the next
					// physical line, with the newline dropped.
					let next = start + consumed;
					if next >= lines.len() {
						return Err(GitConfigError::parse(
							start + consumed,
							"line continuation at end of file",
						));
					}
					current = lines[next].chars().collect();
					pos = 0;
					consumed += 1;
					continue;
				}
				let esc = current[pos];
				pos += 1;
				match esc {
					'"' => out.push('"'),
					'\\' => out.push('\\'),
					'n' => out.push('\n'),
					't' => out.push('\t'),
					'b' => out.push('\u{0008}'),
					_ => {
						return Err(GitConfigError::parse(
							start + consumed,
							format!("invalid escape sequence '\\{esc}'"),
						));
					}
				}
			}
			'"' => {
				in_quotes = !in_quotes;
				if !in_quotes {
					protected = out.len();
				}
			}
			'#' | ';' if !in_quotes => break,
			_ => out.push(c),
		}
	}

	while out.len() > protected && out.ends_with([' ', '\t', '\r']) {
		out.pop();
	}
	Ok((out, consumed))
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_parse_empty() {
		let model = parse_config_str("").unwrap();
		assert!(model.sections.is_empty());
		assert!(model.trailing.is_empty());
	}

	#[test]
	fn test_parse_basic_section() {
		let model = parse_config_str("[core]\n\tbare = false\n").unwrap();
		assert_eq!(model.sections.len(), 1);
		assert_eq!(model.sections[0].name, "core");
		assert_eq!(model.sections[0].subsection, None);
		let entry = &model.sections[0].entries[0];
		assert_eq!(entry.key, "bare");
		assert_eq!(entry.value.as_deref(), Some("false"));
		assert_eq!(entry.raw.as_deref(), Some("\tbare = false"));
	}

	#[test]
	fn test_parse_subsection_header() {
		let model = parse_config_str("[remote \"Origin\"]\n\turl = a\n").unwrap();
		assert_eq!(model.sections[0].name, "remote");
		assert_eq!(model.sections[0].subsection.as_deref(), Some("Origin"));
	}

	#[test]
	fn test_parse_subsection_escapes() {
		let model = parse_config_str("[a \"b\\\"c\\\\d\"]\n").unwrap();
		assert_eq!(model.sections[0].subsection.as_deref(), Some("b\"c\\d"));
	}

	#[test]
	fn test_parse_no_space_around_equals() {
		let model = parse_config_str("[user]\nname=Ada\n").unwrap();
		assert_eq!(
			model.sections[0].entries[0].value.as_deref(),
			Some("Ada")
		);
	}

	#[test]
	fn test_parse_bare_key() {
		let model = parse_config_str("[core]\n\tsparse\n").unwrap();
		let entry = &model.sections[0].entries[0];
		assert_eq!(entry.key, "sparse");
		assert_eq!(entry.value, None);
	}

	#[test]
	fn test_parse_bare_key_with_trailing_comment() {
		let model = parse_config_str("[core]\n\tsparse ; enabled\n").unwrap();
		assert_eq!(model.sections[0].entries[0].value, None);
	}

	#[test]
	fn test_parse_trailing_comment_stripped_from_value() {
		let model = parse_config_str("[core]\n\tbare = false # not bare\n").unwrap();
		assert_eq!(
			model.sections[0].entries[0].value.as_deref(),
			Some("false")
		);
	}

	#[test]
	fn test_parse_hash_inside_quotes_is_literal() {
		let model = parse_config_str("[alias]\n\tnote = \"see #42\"\n").unwrap();
		assert_eq!(
			model.sections[0].entries[0].value.as_deref(),
			Some("see #42")
		);
	}

	#[test]
	fn test_parse_quotes_preserve_surrounding_whitespace() {
		let model = parse_config_str("[user]\n\tname = \"  Ada  \"\n").unwrap();
		assert_eq!(
			model.sections[0].entries[0].value.as_deref(),
			Some("  Ada  ")
		);
	}

	#[test]
	fn test_parse_quoted_and_unquoted_segments_concatenate() {
		let model = parse_config_str("[user]\n\tname = Ada \"Lovelace\"\n").unwrap();
		assert_eq!(
			model.sections[0].entries[0].value.as_deref(),
			Some("Ada Lovelace")
		);
	}

	#[test]
	fn test_parse_escape_sequences() {
		let model = parse_config_str("[a]\n\tx = one\\ttwo\\nthree\\\\four\\\"five\n").unwrap();
		assert_eq!(
			model.sections[0].entries[0].value.as_deref(),
			Some("one\ttwo\nthree\\four\"five")
		);
	}

	#[test]
	fn test_parse_line_continuation() {
		let model = parse_config_str("[alias]\n\tlg = log \\\n--oneline\n").unwrap();
		let entry = &model.sections[0].entries[0];
		assert_eq!(entry.value.as_deref(), Some("log --oneline"));
		// The raw text keeps both physical lines.
		assert_eq!(entry.raw.as_deref(), Some("\tlg = log \\\n--oneline"));
	}

	#[test]
	fn test_parse_comments_attach_to_following_entry() {
		let model =
			parse_config_str("# top\n[user]\n\n; who\n\tname = Ada\n# tail\n").unwrap();
		assert_eq!(model.sections[0].leading, vec!["# top"]);
		assert_eq!(model.sections[0].entries[0].leading, vec!["", "; who"]);
		assert_eq!(model.trailing, vec!["# tail"]);
	}

	#[test]
	fn test_parse_unterminated_quote_fails() {
		let err = parse_config_str("[user]\n\tname = \"Ada\n").unwrap_err();
		match err {
			GitConfigError::Parse { line, reason } => {
				assert_eq!(line, 2);
				assert!(reason.contains("unterminated quote"));
			}
			other => panic!("expected parse error, got {other:?}"),
		}
	}

	#[test]
	fn test_parse_invalid_escape_fails() {
		let err = parse_config_str("[user]\n\tname = A\\qB\n").unwrap_err();
		match err {
			GitConfigError::Parse { line, reason } => {
				assert_eq!(line, 2);
				assert!(reason.contains("invalid escape"));
			}
			other => panic!("expected parse error, got {other:?}"),
		}
	}

	#[test]
	fn test_parse_missing_closing_bracket_fails() {
		let err = parse_config_str("[core\n").unwrap_err();
		match err {
			GitConfigError::Parse { line, reason } => {
				assert_eq!(line, 1);
				assert!(reason.contains("closing ']'"));
			}
			other => panic!("expected parse error, got {other:?}"),
		}
	}

	#[test]
	fn test_parse_entry_before_section_fails() {
		assert!(parse_config_str("name = Ada\n").is_err());
	}

	#[test]
	fn test_parse_junk_after_header_fails() {
		assert!(parse_config_str("[core] junk\n").is_err());
	}

	#[test]
	fn test_parse_header_trailing_comment_allowed() {
		let model = parse_config_str("[core] # settings\n\tbare = true\n").unwrap();
		assert_eq!(model.sections[0].name, "core");
	}

	#[test]
	fn test_parse_invalid_key_fails() {
		assert!(parse_config_str("[core]\n\t1bad = x\n").is_err());
		assert!(parse_config_str("[core]\n\tkey! = x\n").is_err());
	}

	#[test]
	fn test_parse_continuation_at_eof_fails() {
		assert!(parse_config_str("[a]\n\tx = y \\").is_err());
	}

	#[test]
	fn test_parse_empty_value() {
		let model = parse_config_str("[user]\n\tname =\n").unwrap();
		assert_eq!(model.sections[0].entries[0].value.as_deref(), Some(""));
	}
}
