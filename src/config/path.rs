use crate::error::{GitConfigError, Result};
use std::fmt;

/// Case-fold a section or key name for lookup.
///
/// Section names and key names are case-insensitive in the git config
/// format; subsection names are not. Every lookup in the model goes
/// through this one function so the asymmetry stays in one place.
pub fn fold(name: &str) -> String {
	name.to_ascii_lowercase()
}

/// A resolved dotted config path.
///
/// `user.name` addresses key `name` in section `user`. With three or more
/// segments, everything between the first and last segment is the
/// subsection, joined back with literal dots: `remote.my.origin.url` is
/// section `remote`, subsection `my.origin`, key `url`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigPath {
	/// Section name, folded to lowercase.
	pub section: String,

	/// Subsection name, verbatim. Case-sensitive when matched.
	pub subsection: Option<String>,

	/// Key name, folded to lowercase.
	pub key: String,
}

impl ConfigPath {
	/// Resolve a dotted path string into its (section, subsection, key)
	/// parts, applying the format's case-folding rules.
	pub fn resolve(path: &str) -> Result<ConfigPath> {
		let segments: Vec<&str> = path.split('.').collect();

		if segments.len() < 2 {
			return Err(GitConfigError::invalid_path(
				path,
				"expected at least 'section.key'",
			));
		}
		if segments.iter().any(|s| s.is_empty()) {
			return Err(GitConfigError::invalid_path(path, "empty path segment"));
		}

		let section = fold(segments[0]);
		let key = fold(segments[segments.len() - 1]);
		let subsection = if segments.len() > 2 {
			Some(segments[1..segments.len() - 1].join("."))
		} else {
			None
		};

		Ok(ConfigPath {
			section,
			subsection,
			key,
		})
	}
}

impl fmt::Display for ConfigPath {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self.subsection {
			Some(ref sub) => write!(f, "{}.{}.{}", self.section, sub, self.key),
			None => write!(f, "{}.{}", self.section, self.key),
		}
	}
}
