//! Gitconf - engine and CLI for git-format configuration files.
//!
//! This library provides the core functionality for gitconf, including:
//! - A lossless parser and serializer for the git config grammar
//! - Dotted-path addressing (`user.name`, `remote.origin.url`)
//! - Multi-valued key reads and edits (set/append/unset)
//! - A manager facade over caller-supplied file reads and writes
//!
//! # Example
//!
//! ```
//! use gitconf_cli::config::{parse_config_str, serialize};
//!
//! let mut model = parse_config_str("[user]\n\tname = Ada\n").unwrap();
//! assert_eq!(model.get("user.name").unwrap().as_deref(), Some("Ada"));
//!
//! model.set("user.email", "ada@example.com").unwrap();
//! assert_eq!(
//!     serialize(&model),
//!     "[user]\n\tname = Ada\n\temail = ada@example.com\n"
//! );
//! ```

pub mod config;
pub mod error;

pub use error::{GitConfigError, Result};
