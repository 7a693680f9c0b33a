//! Building atoms from their map-file form
//!
//! An atom chunk is either a bare type path or `path{key = value; ...}`.
//! Overrides are applied onto a fresh atom and then reconciled against the
//! type's template: missing defaults are inherited, and overrides that merely
//! restate a default stop counting as explicitly set.

use thiserror::Error;

use crate::lexer::{lex_value, LexError};
use crate::models::Atom;
use crate::resolver::TypeResolver;
use crate::splitter::{split_properties, SplitError};

/// Error building an atom.
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum AtomError {
    /// The type path has no template
    #[error("unknown type path '{0}'")]
    UnresolvedType(String),
    /// The property block is not closed by `}`
    #[error("malformed atom '{0}'")]
    MalformedAtom(String),
    /// A property entry has no `=` or an empty key
    #[error("malformed property assignment '{0}'")]
    MalformedProperty(String),
    #[error("{0}")]
    Split(#[from] SplitError),
    #[error("property '{key}': {source}")]
    Value {
        key: String,
        #[source]
        source: LexError,
    },
}

/// Parse one atom chunk, resolving its defaults through `resolver`.
///
/// # Examples
///
/// ```
/// use dmmtool::builder::build_atom;
/// use dmmtool::models::{Atom, Value};
/// use dmmtool::resolver::TypeTable;
///
/// let mut types = TypeTable::new();
/// types.insert(Atom::new("/obj/cable").with_property("d1", Value::Raw("0".into())));
///
/// let atom = build_atom(r#"/obj/cable{d1 = 2; icon_state = "0-2"}"#, &types).unwrap();
/// assert_eq!(atom.explicitly_set, vec!["d1", "icon_state"]);
///
/// let same = build_atom("/obj/cable{d1 = 0}", &types).unwrap();
/// assert!(same.explicitly_set.is_empty());
/// ```
pub fn build_atom(chunk: &str, resolver: &dyn TypeResolver) -> Result<Atom, AtomError> {
    let chunk = chunk.trim();
    let (path, body) = match chunk.find('{') {
        Some(brace) => (chunk[..brace].trim(), Some(&chunk[brace + 1..])),
        None => (chunk, None),
    };

    if path.is_empty() && body.is_none() {
        return Ok(Atom::default());
    }

    let template =
        resolver.resolve(path).ok_or_else(|| AtomError::UnresolvedType(path.to_string()))?;

    let Some(body) = body else {
        return Ok(template);
    };
    let body = body.strip_suffix('}').ok_or_else(|| AtomError::MalformedAtom(chunk.to_string()))?;

    let mut atom = Atom::new(path);
    for assignment in split_properties(body)? {
        let assignment = assignment.trim();
        if assignment.is_empty() {
            continue;
        }
        let (key, raw) = assignment
            .split_once(" = ")
            .or_else(|| assignment.split_once('='))
            .ok_or_else(|| AtomError::MalformedProperty(assignment.to_string()))?;
        let key = key.trim();
        if key.is_empty() {
            return Err(AtomError::MalformedProperty(assignment.to_string()));
        }
        let value =
            lex_value(raw).map_err(|source| AtomError::Value { key: key.to_string(), source })?;
        atom.set_explicit(key, value);
    }
    atom.recompute_layer();

    reconcile(&mut atom, &template);
    Ok(atom)
}

/// Inherit template defaults the atom lacks, and drop explicit keys whose
/// value equals the default.
fn reconcile(atom: &mut Atom, template: &Atom) {
    for (key, value) in &template.properties {
        if !atom.properties.contains_key(key) {
            atom.set_inherited(key.clone(), value.clone());
        }
    }

    let properties = &atom.properties;
    atom.explicitly_set
        .retain(|key| template.properties.get(key).map_or(true, |default| properties.get(key) != Some(default)));
    atom.recompute_layer();
}
