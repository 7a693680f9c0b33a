//! Data models for map contents (atoms, tiles, property values)

mod atom;
mod tile;
mod value;

pub use atom::{is_same_or_subtype, Atom, AREA_ROOT, SPACE_PATH};
pub use tile::Tile;
pub use value::Value;

use std::fmt;

/// A recoverable diagnostic collected while reading, cleaning or rendering a map.
#[derive(Debug, Clone, PartialEq)]
pub struct Warning {
    pub message: String,
}

impl Warning {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}
