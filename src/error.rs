/// Library-level structured errors for gitconf.
///
/// Use `thiserror` for structured errors that library consumers can match on.
/// The CLI binary wraps these with `anyhow` for rich context chains.
#[derive(Debug, thiserror::Error)]
pub enum GitConfigError {
	#[error("Parse error at line {line}: {reason}")]
	Parse { line: usize, reason: String },

	#[error("Invalid config path '{path}': {reason}")]
	InvalidPath { path: String, reason: String },

	#[error("Failed to read config file")]
	Read {
		#[source]
		source: std::io::Error,
	},

	#[error("Failed to write config file")]
	Write {
		#[source]
		source: std::io::Error,
	},

	#[error("Failed to resolve home directory")]
	HomeDirectoryNotFound,
}

impl GitConfigError {
	/// Build a parse error for the given 1-based line number.
	pub fn parse(line: usize, reason: impl Into<String>) -> Self {
		GitConfigError::Parse {
			line,
			reason: reason.into(),
		}
	}

	/// Build an invalid-path error for the given dotted path.
	pub fn invalid_path(path: impl Into<String>, reason: impl Into<String>) -> Self {
		GitConfigError::InvalidPath {
			path: path.into(),
			reason: reason.into(),
		}
	}
}

/// Result type alias using GitConfigError.
pub type Result<T> = std::result::Result<T, GitConfigError>;
