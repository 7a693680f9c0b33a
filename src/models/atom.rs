//! Atoms: typed instances placed on a tile.

use std::collections::BTreeMap;
use std::fmt;

use super::Value;

/// Area types start with this path segment.
pub const AREA_ROOT: &str = "/area";

/// The turf that renders as a starfield.
pub const SPACE_PATH: &str = "/turf/space";

/// One placed instance of a type path.
///
/// `properties` holds the full composed property set (map overrides plus
/// inherited defaults). `explicitly_set` lists, in first-write order, the keys
/// whose map value differs from the type default; only those are serialized.
#[derive(Debug, Clone, Default)]
pub struct Atom {
    pub path: String,
    pub properties: BTreeMap<String, Value>,
    pub explicitly_set: Vec<String>,
    layer: f64,
}

impl Atom {
    /// Create an atom with no properties.
    pub fn new(path: impl Into<String>) -> Self {
        let mut atom = Self { path: path.into(), ..Default::default() };
        atom.recompute_layer();
        atom
    }

    /// Builder-style inherited (not explicitly set) property, for templates.
    pub fn with_property(mut self, key: impl Into<String>, value: Value) -> Self {
        self.properties.insert(key.into(), value);
        self.recompute_layer();
        self
    }

    /// The empty path marks "no atom"; such atoms are never written or drawn.
    pub fn is_empty(&self) -> bool {
        self.path.is_empty()
    }

    pub fn is_area(&self) -> bool {
        is_same_or_subtype(&self.path, AREA_ROOT)
    }

    pub fn is_space(&self) -> bool {
        self.path == SPACE_PATH
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.properties.get(key)
    }

    /// Integer property, if present and numeric.
    pub fn int_property(&self, key: &str) -> Option<i64> {
        self.properties.get(key).and_then(Value::as_int)
    }

    /// Store a map-specified value and record the key as explicitly set.
    ///
    /// Last write wins; the key keeps its first-occurrence position.
    pub fn set_explicit(&mut self, key: impl Into<String>, value: Value) {
        let key = key.into();
        if !self.explicitly_set.contains(&key) {
            self.explicitly_set.push(key.clone());
        }
        self.properties.insert(key, value);
    }

    /// Store an inherited value without marking it explicit.
    pub fn set_inherited(&mut self, key: impl Into<String>, value: Value) {
        self.properties.insert(key.into(), value);
    }

    /// Remove a property entirely.
    pub fn remove_property(&mut self, key: &str) -> Option<Value> {
        self.explicitly_set.retain(|k| k != key);
        self.properties.remove(key)
    }

    /// Stacking order used when compositing; higher draws on top.
    pub fn layer(&self) -> f64 {
        self.layer
    }

    /// Recompute [`Atom::layer`] from the `layer` property, falling back to
    /// the conventional order of the path's root type.
    pub fn recompute_layer(&mut self) {
        self.layer = self
            .properties
            .get("layer")
            .and_then(Value::as_number)
            .unwrap_or_else(|| default_layer(&self.path));
    }

    /// Map-file form: `path` or `path{key = value; ...}` over explicitly set keys.
    pub fn serialize(&self) -> String {
        let assignments: Vec<String> = self
            .explicitly_set
            .iter()
            .filter_map(|key| self.properties.get(key).map(|v| format!("{} = {}", key, v)))
            .collect();
        format_atom(&self.path, &assignments)
    }

    /// Like [`Atom::serialize`] but including inherited properties, sorted by key.
    pub fn serialize_inherited(&self) -> String {
        let assignments: Vec<String> =
            self.properties.iter().map(|(key, v)| format!("{} = {}", key, v)).collect();
        format_atom(&self.path, &assignments)
    }
}

/// Structural equality: same path and same composed properties.
impl PartialEq for Atom {
    fn eq(&self, other: &Self) -> bool {
        self.path == other.path && self.properties == other.properties
    }
}

impl Eq for Atom {}

impl fmt::Display for Atom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.serialize())
    }
}

/// `path` equals `root` or is a descendant of it.
pub fn is_same_or_subtype(path: &str, root: &str) -> bool {
    path == root
        || (path.len() > root.len() && path.starts_with(root) && path[root.len()..].starts_with('/'))
}

fn default_layer(path: &str) -> f64 {
    let root = path.split('/').nth(1).unwrap_or("");
    match root {
        "area" => 1.0,
        "turf" => 2.0,
        "obj" => 3.0,
        "mob" => 4.0,
        _ => 0.0,
    }
}

fn format_atom(path: &str, assignments: &[String]) -> String {
    if assignments.is_empty() {
        path.to_string()
    } else {
        format!("{}{{{}}}", path, assignments.join("; "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serialize_bare_path() {
        let atom = Atom::new("/turf/floor").with_property("icon", Value::FileRef("f.dmi".into()));
        assert_eq!(atom.serialize(), "/turf/floor");
    }

    #[test]
    fn test_serialize_explicit_order() {
        let mut atom = Atom::new("/obj/cable");
        atom.set_explicit("icon_state", Value::Str("2-4".into()));
        atom.set_explicit("d1", Value::Raw("2".into()));
        atom.set_inherited("name", Value::Str("cable".into()));
        assert_eq!(atom.serialize(), r#"/obj/cable{icon_state = "2-4"; d1 = 2}"#);
    }

    #[test]
    fn test_set_explicit_last_write_wins_first_position() {
        let mut atom = Atom::new("/obj");
        atom.set_explicit("a", Value::Raw("1".into()));
        atom.set_explicit("b", Value::Raw("2".into()));
        atom.set_explicit("a", Value::Raw("3".into()));
        assert_eq!(atom.explicitly_set, vec!["a", "b"]);
        assert_eq!(atom.serialize(), "/obj{a = 3; b = 2}");
    }

    #[test]
    fn test_serialize_inherited_includes_defaults() {
        let mut atom = Atom::new("/obj").with_property("name", Value::Str("thing".into()));
        atom.set_explicit("dir", Value::Raw("4".into()));
        assert_eq!(atom.serialize_inherited(), r#"/obj{dir = 4; name = "thing"}"#);
    }

    #[test]
    fn test_layer_defaults_by_root_type() {
        assert_eq!(Atom::new("/area/hall").layer(), 1.0);
        assert_eq!(Atom::new("/turf/floor").layer(), 2.0);
        assert_eq!(Atom::new("/obj/item").layer(), 3.0);
        assert_eq!(Atom::new("/mob/living").layer(), 4.0);
        assert_eq!(Atom::new("/datum").layer(), 0.0);
    }

    #[test]
    fn test_layer_from_property() {
        let mut atom = Atom::new("/obj/structure");
        atom.set_explicit("layer", Value::Raw("2.5".into()));
        atom.recompute_layer();
        assert_eq!(atom.layer(), 2.5);
    }

    #[test]
    fn test_equality_ignores_explicit_order() {
        let mut a = Atom::new("/obj");
        a.set_explicit("x", Value::Raw("1".into()));
        a.set_explicit("y", Value::Raw("2".into()));
        let mut b = Atom::new("/obj");
        b.set_explicit("y", Value::Raw("2".into()));
        b.set_explicit("x", Value::Raw("1".into()));
        assert_eq!(a, b);
    }

    #[test]
    fn test_area_and_space_classification() {
        assert!(Atom::new("/area").is_area());
        assert!(Atom::new("/area/security/prison").is_area());
        assert!(!Atom::new("/areas/foo").is_area());
        assert!(Atom::new("/turf/space").is_space());
        assert!(!Atom::new("/turf/space/transit").is_space());
    }

    #[test]
    fn test_remove_property_clears_explicit() {
        let mut atom = Atom::new("/obj");
        atom.set_explicit("tag", Value::Str("t".into()));
        assert!(atom.remove_property("tag").is_some());
        assert!(atom.explicitly_set.is_empty());
        assert_eq!(atom.serialize(), "/obj");
    }
}
