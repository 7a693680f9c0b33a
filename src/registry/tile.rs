//! Tile registry: structural deduplication and canonical IDs.

use std::collections::HashMap;

use crate::id_codec;
use crate::models::Tile;

use super::traits::Registry;

/// Outcome of [`TileRegistry::intern`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interned {
    /// The tile was new and received this canonical ID
    New(usize),
    /// An equal tile was already registered under this canonical ID
    Duplicate(usize),
}

impl Interned {
    pub fn id(self) -> usize {
        match self {
            Interned::New(id) | Interned::Duplicate(id) => id,
        }
    }

    pub fn is_duplicate(self) -> bool {
        matches!(self, Interned::Duplicate(_))
    }
}

/// Interns tiles by structural equality.
///
/// Canonical IDs are dense and follow first-appearance order; once assigned
/// they never change. A tile equal to an earlier one is not stored; its legacy
/// ID becomes a redirect to the earlier tile's canonical ID.
///
/// Lookups go through a secondary index keyed on a canonical serialization of
/// the atom sequence, with full structural comparison on each candidate.
#[derive(Debug, Clone, Default)]
pub struct TileRegistry {
    tiles: Vec<Tile>,
    by_signature: HashMap<String, Vec<usize>>,
    legacy: HashMap<String, usize>,
    id_width: usize,
    legacy_width: usize,
    duplicates: usize,
}

impl TileRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `tile`, returning its canonical ID.
    ///
    /// The tile's `id` field is overwritten with the assigned ID. If the
    /// tile's legacy ID was already mapped, the new mapping replaces it.
    pub fn intern(&mut self, mut tile: Tile) -> Interned {
        self.legacy_width = self.legacy_width.max(tile.legacy_id.chars().count());

        let signature = tile.signature();
        let existing = self
            .by_signature
            .get(&signature)
            .and_then(|candidates| candidates.iter().copied().find(|&id| self.tiles[id] == tile));

        if let Some(id) = existing {
            self.duplicates += 1;
            self.legacy.insert(tile.legacy_id, id);
            return Interned::Duplicate(id);
        }

        let id = self.tiles.len();
        tile.id = id;
        self.id_width = self.id_width.max(id_codec::encoded_len(id));
        self.legacy.insert(tile.legacy_id.clone(), id);
        self.by_signature.entry(signature).or_default().push(id);
        self.tiles.push(tile);
        Interned::New(id)
    }

    /// Tile with canonical ID `id`.
    pub fn tile(&self, id: usize) -> Option<&Tile> {
        self.tiles.get(id)
    }

    /// Canonical ID for a legacy ID, following duplicate redirects.
    pub fn lookup(&self, legacy_id: &str) -> Option<usize> {
        self.legacy.get(legacy_id).copied()
    }

    /// Registered tiles in canonical order.
    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Tile> {
        self.tiles.iter()
    }

    /// Length of the longest encoded canonical ID.
    pub fn id_width(&self) -> usize {
        self.id_width
    }

    /// Length of the longest legacy ID seen, duplicates included.
    pub fn legacy_width(&self) -> usize {
        self.legacy_width
    }

    /// Number of tiles that were redirected instead of stored.
    pub fn duplicates(&self) -> usize {
        self.duplicates
    }

    /// Apply `edit` to every registered tile, then rebuild the equality index.
    ///
    /// Canonical IDs and redirects are left untouched even if edited tiles
    /// become equal to each other.
    pub fn edit_tiles<F: FnMut(&mut Tile)>(&mut self, mut edit: F) {
        for tile in &mut self.tiles {
            edit(tile);
        }
        self.by_signature.clear();
        for tile in &self.tiles {
            self.by_signature.entry(tile.signature()).or_default().push(tile.id);
        }
    }
}

impl Registry<Tile> for TileRegistry {
    fn contains(&self, key: &str) -> bool {
        self.legacy.contains_key(key)
    }

    fn get(&self, key: &str) -> Option<&Tile> {
        self.lookup(key).and_then(|id| self.tiles.get(id))
    }

    fn len(&self) -> usize {
        self.tiles.len()
    }

    fn clear(&mut self) {
        *self = Self::default();
    }

    fn names(&self) -> Box<dyn Iterator<Item = &String> + '_> {
        Box::new(self.legacy.keys())
    }
}
