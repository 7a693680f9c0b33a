//! Classification of single property literals

use thiserror::Error;

use crate::models::Value;
use crate::splitter::ESCAPE;

/// Error lexing a property literal.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LexError {
    #[error("empty property value")]
    Empty,
    #[error("unterminated {quote}-quoted literal {text}")]
    Unterminated { quote: char, text: String },
}

/// Classify a literal as a string, a file reference or a bare value.
///
/// Surrounding whitespace is ignored. The delimiters are stripped; the text
/// between them is kept verbatim.
///
/// # Examples
///
/// ```
/// use dmmtool::lexer::lex_value;
/// use dmmtool::models::Value;
///
/// assert_eq!(lex_value(r#""2-4""#).unwrap(), Value::Str("2-4".to_string()));
/// assert_eq!(lex_value("'icons/obj/cable.dmi'").unwrap(), Value::FileRef("icons/obj/cable.dmi".to_string()));
/// assert_eq!(lex_value("4").unwrap(), Value::Raw("4".to_string()));
/// ```
pub fn lex_value(text: &str) -> Result<Value, LexError> {
    let text = text.trim();
    let Some(first) = text.chars().next() else {
        return Err(LexError::Empty);
    };

    match first {
        '"' | '\'' => {
            let inner = quoted_inner(text, first).ok_or_else(|| LexError::Unterminated {
                quote: first,
                text: text.to_string(),
            })?;
            if first == '"' {
                Ok(Value::Str(inner.to_string()))
            } else {
                Ok(Value::FileRef(inner.to_string()))
            }
        }
        _ => Ok(Value::Raw(text.to_string())),
    }
}

/// Text between a leading and a trailing unescaped `quote`.
fn quoted_inner(text: &str, quote: char) -> Option<&str> {
    if text.len() < 2 || !text.ends_with(quote) {
        return None;
    }
    let inner = &text[1..text.len() - 1];
    // An odd run of escapes before the final quote escapes it
    let trailing_escapes = inner.chars().rev().take_while(|&c| c == ESCAPE).count();
    if trailing_escapes % 2 == 1 {
        return None;
    }
    Some(inner)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lex_string() {
        assert_eq!(lex_value(r#""hello world""#), Ok(Value::Str("hello world".into())));
    }

    #[test]
    fn test_lex_empty_string() {
        assert_eq!(lex_value(r#""""#), Ok(Value::Str(String::new())));
    }

    #[test]
    fn test_lex_string_keeps_escapes() {
        assert_eq!(lex_value(r#""say \"hi\"""#), Ok(Value::Str(r#"say \"hi\""#.into())));
    }

    #[test]
    fn test_lex_file_ref() {
        assert_eq!(lex_value("'icons/turf/floors.dmi'"), Ok(Value::FileRef("icons/turf/floors.dmi".into())));
    }

    #[test]
    fn test_lex_bare_values() {
        assert_eq!(lex_value(" 32 "), Ok(Value::Raw("32".into())));
        assert_eq!(lex_value("-8"), Ok(Value::Raw("-8".into())));
        assert_eq!(lex_value("null"), Ok(Value::Raw("null".into())));
        assert_eq!(lex_value("list(\"a\",\"b\")"), Ok(Value::Raw("list(\"a\",\"b\")".into())));
    }

    #[test]
    fn test_lex_empty() {
        assert_eq!(lex_value("   "), Err(LexError::Empty));
    }

    #[test]
    fn test_lex_unterminated() {
        assert!(matches!(lex_value("\"open"), Err(LexError::Unterminated { quote: '"', .. })));
        assert!(matches!(lex_value("'"), Err(LexError::Unterminated { quote: '\'', .. })));
        assert!(matches!(lex_value(r#""ends escaped\""#), Err(LexError::Unterminated { .. })));
    }
}
