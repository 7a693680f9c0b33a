//! Property literals.

use std::fmt;

/// A property value as written in a map file.
///
/// Values are opaque: the text between the delimiters is stored verbatim,
/// escape sequences included, so serialization reproduces the source.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Value {
    /// `"text"`
    Str(String),
    /// `'path/to/file.dmi'`
    FileRef(String),
    /// Bare numeric or symbolic literal, e.g. `4`, `null`, `list(1,2)`
    Raw(String),
}

impl Value {
    /// The literal's text without delimiters.
    pub fn text(&self) -> &str {
        match self {
            Value::Str(s) | Value::FileRef(s) | Value::Raw(s) => s,
        }
    }

    /// Numeric interpretation of a bare literal.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Raw(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        }
    }

    /// Integer interpretation of a bare literal; fractional values truncate.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Raw(s) => {
                let s = s.trim();
                s.parse::<i64>().ok().or_else(|| s.parse::<f64>().ok().map(|f| f as i64))
            }
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Str(s) => write!(f, "\"{}\"", s),
            Value::FileRef(s) => write!(f, "'{}'", s),
            Value::Raw(s) => write!(f, "{}", s),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_source_form() {
        assert_eq!(Value::Str("hi".into()).to_string(), "\"hi\"");
        assert_eq!(Value::FileRef("icons/a.dmi".into()).to_string(), "'icons/a.dmi'");
        assert_eq!(Value::Raw("null".into()).to_string(), "null");
    }

    #[test]
    fn test_numeric_views() {
        assert_eq!(Value::Raw("4".into()).as_int(), Some(4));
        assert_eq!(Value::Raw("-16".into()).as_int(), Some(-16));
        assert_eq!(Value::Raw("2.5".into()).as_number(), Some(2.5));
        assert_eq!(Value::Raw("2.5".into()).as_int(), Some(2));
        assert_eq!(Value::Raw("NORTH".into()).as_int(), None);
        assert_eq!(Value::Str("4".into()).as_int(), None);
    }

    #[test]
    fn test_equality_is_typed() {
        assert_ne!(Value::Str("1".into()), Value::Raw("1".into()));
        assert_eq!(Value::Raw("1".into()), Value::Raw("1".into()));
    }
}
