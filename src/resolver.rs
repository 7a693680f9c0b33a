//! Type templates: default property sets for type paths.
//!
//! The map format only records properties that differ from a type's defaults,
//! so reading a map needs something that knows those defaults. This module
//! defines that seam ([`TypeResolver`]) and two implementations:
//!
//! - [`TypeTable`]: templates loaded from a TOML file (or built in code)
//! - [`BareResolver`]: every path resolves to an empty template

use std::collections::HashMap;
use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::models::{Atom, Value};

/// Supplies template atoms for type paths.
pub trait TypeResolver {
    /// Template for `path`, or `None` if the type is unknown.
    ///
    /// The returned atom is an independent copy; callers may mutate it.
    fn resolve(&self, path: &str) -> Option<Atom>;
}

/// Error loading a type table.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ResolveError {
    #[error("Failed to read type table: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse type table: {0}")]
    Parse(#[from] toml::de::Error),
    /// A top-level entry was not a table of properties
    #[error("Type '{0}' must be a table of properties")]
    NotATable(String),
    /// A property value had a TOML type with no map literal equivalent
    #[error("Unsupported value for '{key}' on type '{path}'")]
    UnsupportedValue { path: String, key: String },
    /// A top-level key was not an absolute type path
    #[error("Type path '{0}' must start with '/'")]
    InvalidPath(String),
}

/// Resolves every path to an atom with no default properties.
///
/// Lets a map be read and rewritten without any type information; every
/// property written in the map then counts as explicitly set.
#[derive(Debug, Clone, Copy, Default)]
pub struct BareResolver;

impl TypeResolver for BareResolver {
    fn resolve(&self, path: &str) -> Option<Atom> {
        Some(Atom::new(path))
    }
}

/// In-memory table of type templates.
#[derive(Debug, Clone, Default)]
pub struct TypeTable {
    types: HashMap<String, Atom>,
}

impl TypeTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a template, replacing any previous one for the same path.
    pub fn insert(&mut self, template: Atom) {
        self.types.insert(template.path.clone(), template);
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Load a type table from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ResolveError> {
        let contents = fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Parse a type table from TOML.
    ///
    /// Each top-level key is a type path whose value is a table of properties:
    ///
    /// ```toml
    /// ["/turf"]
    /// icon = "'icons/turf/floors.dmi'"
    ///
    /// ["/turf/floor"]
    /// icon_state = "floor"
    /// ```
    ///
    /// Strings wrapped in single quotes become file references, other strings
    /// become string literals, numbers and booleans become bare values.
    /// A type inherits the properties of every ancestor path that is also in
    /// the table, nearer ancestors taking precedence.
    pub fn from_toml_str(contents: &str) -> Result<Self, ResolveError> {
        let root: toml::Table = toml::from_str(contents)?;

        let mut own: HashMap<String, Vec<(String, Value)>> = HashMap::new();
        for (path, entry) in root {
            if !path.starts_with('/') {
                return Err(ResolveError::InvalidPath(path));
            }
            let toml::Value::Table(props) = entry else {
                return Err(ResolveError::NotATable(path));
            };
            let mut values = Vec::with_capacity(props.len());
            for (key, raw) in props {
                let value = convert_value(&raw).ok_or_else(|| ResolveError::UnsupportedValue {
                    path: path.clone(),
                    key: key.clone(),
                })?;
                values.push((key, value));
            }
            own.insert(path, values);
        }

        let mut table = Self::new();
        for path in own.keys() {
            let mut template = Atom::new(path.clone());
            for ancestor in ancestry(path) {
                if let Some(values) = own.get(ancestor) {
                    for (key, value) in values {
                        template.set_inherited(key.clone(), value.clone());
                    }
                }
            }
            template.recompute_layer();
            table.insert(template);
        }
        Ok(table)
    }
}

impl TypeResolver for TypeTable {
    fn resolve(&self, path: &str) -> Option<Atom> {
        self.types.get(path).cloned()
    }
}

/// `path` and its ancestors, root first: `/a/b` -> [`/a`, `/a/b`].
fn ancestry(path: &str) -> Vec<&str> {
    let mut chain: Vec<&str> = path
        .char_indices()
        .filter(|&(i, c)| c == '/' && i > 0)
        .map(|(i, _)| &path[..i])
        .collect();
    chain.push(path);
    chain
}

fn convert_value(raw: &toml::Value) -> Option<Value> {
    match raw {
        toml::Value::String(s) => {
            if s.len() >= 2 && s.starts_with('\'') && s.ends_with('\'') {
                Some(Value::FileRef(s[1..s.len() - 1].to_string()))
            } else {
                Some(Value::Str(s.clone()))
            }
        }
        toml::Value::Integer(i) => Some(Value::Raw(i.to_string())),
        toml::Value::Float(f) => Some(Value::Raw(f.to_string())),
        toml::Value::Boolean(b) => Some(Value::Raw(if *b { "1" } else { "0" }.to_string())),
        _ => None,
    }
}
