//! Map documents: tile definitions plus one grid per level.
//!
//! A map file has two sections. The first defines tiles, one per line:
//!
//! ```text
//! "aa" = (/turf/floor,/area/hall)
//! "ab" = (/obj/structure/grille{dir = 4},/turf/floor,/area/hall)
//! ```
//!
//! The second holds one block per level, each a grid of fixed-width tile IDs:
//!
//! ```text
//! (1,1,1) = {"
//! aaab
//! abaa
//! "}
//! ```
//!
//! [`MapDocument`] reads both sections into a [`TileRegistry`] and a set of
//! [`Layer`]s, and writes them back out.

mod reader;
mod writer;

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufRead, BufReader, Write};
use std::path::Path;

use serde::Serialize;
use thiserror::Error;

use crate::builder::AtomError;
use crate::layer::Layer;
use crate::models::{Tile, Warning};
use crate::registry::{Interned, TileRegistry};
use crate::resolver::TypeResolver;
use crate::splitter::SplitError;

/// Options for writing a map.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WriteOptions {
    /// Write each tile's original ID instead of its canonical one
    pub use_legacy_ids: bool,
}

/// Error reading or writing a map. Read errors name the 1-based source line.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum MapError {
    #[error("line {line}: {source}")]
    Atom {
        line: usize,
        #[source]
        source: AtomError,
    },
    #[error("line {line}: {source}")]
    Split {
        line: usize,
        #[source]
        source: SplitError,
    },
    #[error("line {line}: malformed tile definition '{text}'")]
    MalformedDefinition { line: usize, text: String },
    #[error("line {line}: malformed level header '{text}'")]
    MalformedHeader { line: usize, text: String },
    #[error("line {line}: unknown tile ID '{id}'")]
    UnknownLegacyId { line: usize, id: String },
    #[error("line {line}: grid row has length {length}, not a multiple of the ID width {width}")]
    RaggedRow { line: usize, length: usize, width: usize },
    #[error("line {line}: grid row found but no tiles are defined")]
    NoTiles { line: usize },
    #[error("line {line}: level terminator outside a level block")]
    StrayBlockEnd { line: usize },
    #[error("level {level} starting at line {line} is never closed")]
    UnterminatedLevel { level: i32, line: usize },
    #[error("line {line}: not valid UTF-8 text")]
    Encoding {
        line: usize,
        #[source]
        source: std::io::Error,
    },
    #[error("line {line}: unexpected content '{text}'")]
    UnexpectedLine { line: usize, text: String },
    /// A grid cell refers to a canonical ID the registry does not hold
    #[error("level {level} cell ({x}, {y}) refers to missing tile {id}")]
    DanglingTile { level: i32, x: usize, y: usize, id: usize },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Size of one level, as reported by [`MapDocument::stats`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LevelStats {
    pub level: i32,
    pub width: usize,
    pub height: usize,
}

/// Summary of a loaded map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MapStats {
    /// Distinct tiles after deduplication
    pub tiles: usize,
    /// Definitions merged into an earlier equal tile
    pub duplicates: usize,
    /// Width of canonical IDs
    pub id_width: usize,
    /// Width of the IDs in the source file
    pub legacy_width: usize,
    pub levels: Vec<LevelStats>,
}

/// An in-memory map: the tile registry and one layer per level.
#[derive(Debug, Clone, Default)]
pub struct MapDocument {
    registry: TileRegistry,
    levels: BTreeMap<i32, Layer>,
}

impl MapDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read a map file.
    #[tracing::instrument(skip(resolver))]
    pub fn read_path(path: &Path, resolver: &dyn TypeResolver) -> Result<Self, MapError> {
        let file = File::open(path)?;
        Self::read_from(BufReader::new(file), resolver)
    }

    /// Read a map from text.
    pub fn read_str(text: &str, resolver: &dyn TypeResolver) -> Result<Self, MapError> {
        Self::read_from(text.as_bytes(), resolver)
    }

    /// Read a map from any buffered reader.
    pub fn read_from<R: BufRead>(input: R, resolver: &dyn TypeResolver) -> Result<Self, MapError> {
        reader::read(input, resolver)
    }

    /// Write the map to `out`.
    pub fn write_to<W: Write>(&self, out: &mut W, options: WriteOptions) -> Result<(), MapError> {
        writer::write(self, out, options)
    }

    /// Write the map to a string.
    pub fn write_string(&self, options: WriteOptions) -> Result<String, MapError> {
        let mut buf = Vec::new();
        self.write_to(&mut buf, options)?;
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }

    /// Write the map to a file, creating parent directories as needed.
    pub fn write_path(&self, path: &Path, options: WriteOptions) -> Result<(), MapError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let mut out = std::io::BufWriter::new(File::create(path)?);
        self.write_to(&mut out, options)?;
        out.flush()?;
        Ok(())
    }

    pub fn registry(&self) -> &TileRegistry {
        &self.registry
    }

    /// Register a tile definition.
    pub fn intern(&mut self, tile: Tile) -> Interned {
        self.registry.intern(tile)
    }

    /// Levels in ascending order.
    pub fn levels(&self) -> impl Iterator<Item = (i32, &Layer)> {
        self.levels.iter().map(|(z, layer)| (*z, layer))
    }

    pub fn level(&self, z: i32) -> Option<&Layer> {
        self.levels.get(&z)
    }

    /// Layer for level `z`, created empty if missing.
    pub fn level_mut(&mut self, z: i32) -> &mut Layer {
        self.levels.entry(z).or_default()
    }

    /// Replace level `z`, returning the previous layer.
    pub fn insert_level(&mut self, z: i32, layer: Layer) -> Option<Layer> {
        self.levels.insert(z, layer)
    }

    /// Tile placed at `(x, y)` on level `z`.
    pub fn tile_at(&self, x: usize, y: usize, z: i32) -> Option<&Tile> {
        let id = self.levels.get(&z)?.get(x, y)?;
        self.registry.tile(id)
    }

    /// Strip transient `tag` properties from every atom.
    ///
    /// Tiles that become equal are not merged; canonical IDs stay as assigned.
    pub fn clean_tags(&mut self) -> Vec<Warning> {
        let mut warnings = Vec::new();
        self.registry.edit_tiles(|tile| {
            for atom in tile.atoms.iter_mut() {
                if let Some(tag) = atom.remove_property("tag") {
                    let warning = Warning::new(format!(
                        "Removed tag {} from {} in tile '{}'",
                        tag, atom.path, tile.legacy_id
                    ));
                    tracing::warn!("{}", warning);
                    warnings.push(warning);
                }
            }
        });
        warnings
    }

    pub fn stats(&self) -> MapStats {
        MapStats {
            tiles: self.registry.tiles().len(),
            duplicates: self.registry.duplicates(),
            id_width: self.registry.id_width(),
            legacy_width: self.registry.legacy_width(),
            levels: self
                .levels()
                .map(|(level, layer)| LevelStats { level, width: layer.width(), height: layer.height() })
                .collect(),
        }
    }
}
