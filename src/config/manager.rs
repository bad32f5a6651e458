use crate::config::parser::parse_config_str;
use crate::config::serializer::serialize;
use crate::config::types::ConfigModel;
use crate::error::{GitConfigError, Result};
use std::io;

/// Facade tying the parser and serializer to caller-supplied I/O.
///
/// The engine never touches the filesystem itself: the caller decides which
/// file backs a given config request and hands in the read/write. One model
/// per file, no state held between calls; coordinating concurrent writers
/// is likewise the caller's job.
pub struct GitConfigManager;

impl GitConfigManager {
	/// Load a model through the caller's byte-read.
	///
	/// A missing file is an empty config, not an error. Other I/O failures
	/// and malformed content are surfaced to the caller.
	pub fn load<R>(read: R) -> Result<ConfigModel>
	where
		R: FnOnce() -> io::Result<Vec<u8>>,
	{
		let bytes = match read() {
			Ok(bytes) => bytes,
			Err(e) if e.kind() == io::ErrorKind::NotFound => {
				return Ok(ConfigModel::default());
			}
			Err(e) => return Err(GitConfigError::Read { source: e }),
		};
		let text = String::from_utf8(bytes)
			.map_err(|_| GitConfigError::parse(1, "config file is not valid UTF-8"))?;
		parse_config_str(&text)
	}

	/// Serialize a model and persist it through the caller's byte-write.
	pub fn save<W>(model: &ConfigModel, write: W) -> Result<()>
	where
		W: FnOnce(&[u8]) -> io::Result<()>,
	{
		let text = serialize(model);
		write(text.as_bytes()).map_err(|e| GitConfigError::Write { source: e })
	}
}
