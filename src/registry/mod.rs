//! Registries for map contents.
//!
//! This module provides:
//! - A `Registry` trait for keyed lookup
//! - `TileRegistry`, which deduplicates tile definitions and hands out canonical IDs

mod tile;
mod traits;

pub use tile::{Interned, TileRegistry};
pub use traits::Registry;
