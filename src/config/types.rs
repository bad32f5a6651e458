use crate::config::path::{ConfigPath, fold};
use crate::error::Result;

/// Value reported for bare boolean-style keys (`key` with no `=`).
const BARE_TRUE: &str = "true";

/// One key/value occurrence inside a section.
///
/// `raw` holds the original physical line(s) exactly as parsed, so the
/// serializer can reproduce untouched entries byte-for-byte. It is cleared
/// when the entry is modified, which switches the entry to canonical
/// rendering. Synthesized entries never have a `raw`.
#[derive(Debug, Clone)]
pub struct ConfigEntry {
	/// Key name, as written in the file.
	pub key: String,

	/// Parsed value. `None` for bare keys, which read back as `"true"`.
	pub value: Option<String>,

	/// Original source line(s), including any continuation lines.
	pub raw: Option<String>,

	/// Blank and comment lines immediately preceding this entry.
	pub leading: Vec<String>,
}

impl ConfigEntry {
	fn new(key: &str, value: &str) -> ConfigEntry {
		ConfigEntry {
			key: key.to_string(),
			value: Some(value.to_string()),
			raw: None,
			leading: Vec::new(),
		}
	}

	/// The value as reported to callers; bare keys are boolean-true.
	pub fn display_value(&self) -> String {
		match self.value {
			Some(ref value) => value.clone(),
			None => BARE_TRUE.to_string(),
		}
	}
}

/// A named grouping of entries, optionally qualified by a subsection.
///
/// Section names are case-insensitive (folded for lookup, original casing
/// preserved for output); subsection names are case-sensitive and kept
/// verbatim. The same `(name, subsection)` pair may appear more than once
/// in a file; reads treat the repeats as one logical group.
#[derive(Debug, Clone)]
pub struct Section {
	/// Section name, as written in the file.
	pub name: String,

	/// Subsection name, verbatim. Case-sensitive when matched.
	pub subsection: Option<String>,

	/// Original header line, `None` for sections created by an edit.
	pub raw_header: Option<String>,

	/// Blank and comment lines immediately preceding the header.
	pub leading: Vec<String>,

	/// Entries in file order. Duplicate keys are legal.
	pub entries: Vec<ConfigEntry>,
}

impl Section {
	fn for_path(path: &ConfigPath) -> Section {
		Section {
			name: path.section.clone(),
			subsection: path.subsection.clone(),
			raw_header: None,
			leading: Vec::new(),
			entries: Vec::new(),
		}
	}

	fn matches(&self, path: &ConfigPath) -> bool {
		fold(&self.name) == path.section && self.subsection == path.subsection
	}
}

/// In-memory model of one config file.
///
/// Sections and entries keep their file order across load/edit/save.
/// Ordered `Vec` storage (not a map) because both sections and keys may
/// legally repeat.
#[derive(Debug, Clone)]
pub struct ConfigModel {
	/// Sections in file order.
	pub sections: Vec<Section>,

	/// Blank and comment lines after the last entry in the file.
	pub trailing: Vec<String>,

	/// Whether the source text ended with a newline. New and empty models
	/// default to true so edits produce a trailing newline.
	pub trailing_newline: bool,
}

impl Default for ConfigModel {
	fn default() -> Self {
		ConfigModel {
			sections: Vec::new(),
			trailing: Vec::new(),
			trailing_newline: true,
		}
	}
}

impl ConfigModel {
	/// Return the value of the last entry matching `path`, or `None`.
	///
	/// "Last" spans repeated section headers: the entry closest to the end
	/// of the file wins, matching git's last-defined-wins rule.
	pub fn get(&self, path: &str) -> Result<Option<String>> {
		let path = ConfigPath::resolve(path)?;
		let mut found = None;
		for section in self.sections.iter().filter(|s| s.matches(&path)) {
			for entry in &section.entries {
				if fold(&entry.key) == path.key {
					found = Some(entry.display_value());
				}
			}
		}
		Ok(found)
	}

	/// Return every value matching `path`, in file order. Empty when none
	/// match.
	pub fn get_all(&self, path: &str) -> Result<Vec<String>> {
		let path = ConfigPath::resolve(path)?;
		let mut values = Vec::new();
		for section in self.sections.iter().filter(|s| s.matches(&path)) {
			for entry in &section.entries {
				if fold(&entry.key) == path.key {
					values.push(entry.display_value());
				}
			}
		}
		Ok(values)
	}

	/// Set `path` to `value`.
	///
	/// Overwrites the last matching entry in place (the entry is
	/// re-rendered canonically; comments attached to it are kept).
	/// Otherwise appends a new entry to the last section with a matching
	/// header, creating the section at end-of-file if there is none.
	pub fn set(&mut self, path: &str, value: &str) -> Result<()> {
		let path = ConfigPath::resolve(path)?;

		for section in self.sections.iter_mut().rev() {
			if !section.matches(&path) {
				continue;
			}
			if let Some(entry) = section
				.entries
				.iter_mut()
				.rev()
				.find(|e| fold(&e.key) == path.key)
			{
				entry.value = Some(value.to_string());
				entry.raw = None;
				return Ok(());
			}
		}

		self.push_entry(&path, value);
		Ok(())
	}

	/// Add a new entry for `path` at the end of the target section,
	/// regardless of existing entries with the same key. Used to build
	/// multi-valued keys.
	pub fn append(&mut self, path: &str, value: &str) -> Result<()> {
		let path = ConfigPath::resolve(path)?;
		self.push_entry(&path, value);
		Ok(())
	}

	/// Remove the last entry matching `path`. Returns whether an entry was
	/// removed. The section header stays even when its last entry goes;
	/// pruning it would take its comments along.
	pub fn unset(&mut self, path: &str) -> Result<bool> {
		let path = ConfigPath::resolve(path)?;
		match self.matching_positions(&path).pop() {
			Some((si, ei)) => {
				self.remove_entry(si, ei);
				Ok(true)
			}
			None => Ok(false),
		}
	}

	/// Remove every entry matching `path`. Returns how many were removed.
	pub fn unset_all(&mut self, path: &str) -> Result<usize> {
		let path = ConfigPath::resolve(path)?;
		let positions = self.matching_positions(&path);
		for &(si, ei) in positions.iter().rev() {
			self.remove_entry(si, ei);
		}
		Ok(positions.len())
	}

	/// Enumerate every entry in file order as `(dotted path, value)`.
	/// Section and key names are folded; subsections are verbatim.
	pub fn entries(&self) -> Vec<(String, String)> {
		let mut out = Vec::new();
		for section in &self.sections {
			for entry in &section.entries {
				let path = ConfigPath {
					section: fold(&section.name),
					subsection: section.subsection.clone(),
					key: fold(&entry.key),
				};
				out.push((path.to_string(), entry.display_value()));
			}
		}
		out
	}

	/// Append a fresh entry to the last section matching `path`, creating
	/// the section if it does not exist yet.
	fn push_entry(&mut self, path: &ConfigPath, value: &str) {
		let entry = ConfigEntry::new(&path.key, value);
		match self.sections.iter_mut().rev().find(|s| s.matches(path)) {
			Some(section) => section.entries.push(entry),
			None => {
				let mut section = Section::for_path(path);
				section.entries.push(entry);
				self.sections.push(section);
			}
		}
	}

	/// All `(section index, entry index)` positions matching `path`, in
	/// file order.
	fn matching_positions(&self, path: &ConfigPath) -> Vec<(usize, usize)> {
		let mut positions = Vec::new();
		for (si, section) in self.sections.iter().enumerate() {
			if !section.matches(path) {
				continue;
			}
			for (ei, entry) in section.entries.iter().enumerate() {
				if fold(&entry.key) == path.key {
					positions.push((si, ei));
				}
			}
		}
		positions
	}

	/// Remove one entry, reattaching its leading comment/blank lines to
	/// whatever now follows it so they survive the deletion.
	fn remove_entry(&mut self, si: usize, ei: usize) {
		let removed = self.sections[si].entries.remove(ei);
		if removed.leading.is_empty() {
			return;
		}
		let mut lines = removed.leading;
		let slot = if ei < self.sections[si].entries.len() {
			&mut self.sections[si].entries[ei].leading
		} else if si + 1 < self.sections.len() {
			&mut self.sections[si + 1].leading
		} else {
			&mut self.trailing
		};
		lines.append(slot);
		*slot = lines;
	}
}
