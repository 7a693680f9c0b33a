//! Lookup interface shared by keyed registries.

/// A registry whose entries can be looked up by a string key.
///
/// For [`TileRegistry`](super::TileRegistry) the key is a tile's legacy ID;
/// redirected duplicates resolve to the tile they were merged into.
///
/// # Example
///
/// ```
/// use dmmtool::models::{Atom, Tile};
/// use dmmtool::registry::{Registry, TileRegistry};
///
/// let mut registry = TileRegistry::new();
/// registry.intern(Tile::new("aa", vec![Atom::new("/turf/floor")]));
/// registry.intern(Tile::new("ab", vec![Atom::new("/turf/floor")]));
///
/// assert!(registry.contains("ab"));
/// assert_eq!(registry.get("ab").map(|t| t.legacy_id.as_str()), Some("aa"));
/// assert_eq!(registry.len(), 1);
/// assert_eq!(registry.names().count(), 2);
/// ```
pub trait Registry<V> {
    /// Whether `key` is known.
    fn contains(&self, key: &str) -> bool;

    /// The entry `key` refers to.
    fn get(&self, key: &str) -> Option<&V>;

    /// Number of distinct entries (not keys).
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Remove every entry and key.
    fn clear(&mut self);

    /// Every known key, in no particular order.
    fn names(&self) -> Box<dyn Iterator<Item = &String> + '_>;
}
