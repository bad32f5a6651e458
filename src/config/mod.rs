//! git-config-format engine for gitconf.
//!
//! This module handles:
//! - Parsing config text into an ordered section/entry model
//! - Dotted-path resolution with the format's case-folding rules
//! - In-memory reads and edits (get/get-all/set/append/unset)
//! - Serializing back to text without disturbing untouched formatting

pub mod manager;
pub mod parser;
pub mod path;
pub mod serializer;
pub mod types;

pub use manager::GitConfigManager;
pub use parser::parse_config_str;
pub use path::{ConfigPath, fold};
pub use serializer::serialize;
pub use types::{ConfigEntry, ConfigModel, Section};
