//! Tiles: ordered atom stacks occupying one map cell type.

use super::Atom;
use crate::id_codec;

/// One tile type definition.
#[derive(Debug, Clone, Default)]
pub struct Tile {
    /// Identifier as it appeared in the source text
    pub legacy_id: String,
    /// Dense ID assigned by the registry
    pub id: usize,
    pub atoms: Vec<Atom>,
}

impl Tile {
    pub fn new(legacy_id: impl Into<String>, atoms: Vec<Atom>) -> Self {
        Self { legacy_id: legacy_id.into(), id: 0, atoms }
    }

    /// Canonical ID in its encoded form, padded to `pad` symbols.
    pub fn encoded_id(&self, pad: usize) -> String {
        id_codec::encode(self.id, pad)
    }

    /// Atoms that are written and drawn (non-empty path).
    pub fn visible_atoms(&self) -> impl Iterator<Item = &Atom> {
        self.atoms.iter().filter(|a| !a.is_empty())
    }

    /// Definition line: `"<id>" = (<atom>,<atom>,...)`.
    pub fn serialize(&self, id: &str) -> String {
        let atoms: Vec<String> = self.visible_atoms().map(Atom::serialize).collect();
        format!("\"{}\" = ({})", id, atoms.join(","))
    }

    /// Key that is equal for structurally equal tiles.
    pub(crate) fn signature(&self) -> String {
        let atoms: Vec<String> = self.atoms.iter().map(Atom::serialize_inherited).collect();
        atoms.join("\u{1f}")
    }
}

/// Tiles are equal when their atom sequences are equal position by position.
/// IDs do not take part.
impl PartialEq for Tile {
    fn eq(&self, other: &Self) -> bool {
        self.atoms == other.atoms
    }
}

impl Eq for Tile {}
