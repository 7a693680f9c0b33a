//! Project configuration
//!
//! Provides types and parsing for `dmmtool.toml`.

pub mod loader;
pub mod schema;

pub use loader::{load_config, merge_cli_overrides, CliOverrides, ConfigError};
pub use schema::*;
