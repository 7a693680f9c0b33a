//! Delimiter-aware splitting of tile definitions
//!
//! Atom lists and property lists can contain separators inside quoted strings
//! and nested `{}`/`()` groups, so a plain `str::split` is not enough.

use thiserror::Error;

/// Escape prefix; the character after it is never treated as a delimiter.
pub const ESCAPE: char = '\\';

const QUOTE: char = '"';

/// Error raised when delimiters in a definition do not balance.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SplitError {
    /// A quote or bracket was still open at end of input
    #[error("unclosed '{open}' opened at byte {offset}")]
    Unclosed { open: char, offset: usize },
    /// A closing bracket appeared without a matching opener
    #[error("unexpected '{found}' at byte {offset}")]
    UnexpectedCloser { found: char, offset: usize },
    /// A string literal in a property list never closed
    #[error("unterminated string literal in property list")]
    UnterminatedString,
}

/// Split `text` on `separator`, treating quoted spans and `{}`/`()` groups as opaque.
///
/// Trailing whitespace is ignored. Escape sequences are kept verbatim in the
/// returned slices.
///
/// # Examples
///
/// ```
/// use dmmtool::splitter::split;
///
/// let parts = split(r#"a,"b,c",d"#, ',').unwrap();
/// assert_eq!(parts, vec!["a", "\"b,c\"", "d"]);
///
/// let parts = split("a{b=1;c=2},d", ',').unwrap();
/// assert_eq!(parts, vec!["a{b=1;c=2}", "d"]);
///
/// assert!(split("a{b,c", ',').is_err());
/// ```
pub fn split(text: &str, separator: char) -> Result<Vec<&str>, SplitError> {
    let text = text.trim_end();
    let mut parts = Vec::new();
    // (opener, expected closer, byte offset of opener)
    let mut open: Vec<(char, char, usize)> = Vec::new();
    let mut start = 0;
    let mut escaped = false;

    for (offset, ch) in text.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        if ch == ESCAPE {
            escaped = true;
            continue;
        }

        // Inside a string only the closing quote matters
        if let Some(&(QUOTE, _, _)) = open.last() {
            if ch == QUOTE {
                open.pop();
            }
            continue;
        }

        match ch {
            QUOTE => open.push((QUOTE, QUOTE, offset)),
            '{' => open.push(('{', '}', offset)),
            '(' => open.push(('(', ')', offset)),
            '}' | ')' => match open.last() {
                Some(&(_, close, _)) if close == ch => {
                    open.pop();
                }
                _ => return Err(SplitError::UnexpectedCloser { found: ch, offset }),
            },
            c if c == separator && open.is_empty() => {
                parts.push(&text[start..offset]);
                start = offset + c.len_utf8();
            }
            _ => {}
        }
    }

    if let Some(&(opener, _, offset)) = open.last() {
        return Err(SplitError::Unclosed { open: opener, offset });
    }

    parts.push(&text[start..]);
    Ok(parts)
}

/// Split a `;`-joined property list.
///
/// A chunk with an odd number of unescaped quotes opens a string literal that
/// continues into the following chunks; those chunks are rejoined (with their
/// `;`) until quote parity is restored.
///
/// # Examples
///
/// ```
/// use dmmtool::splitter::split_properties;
///
/// let parts = split_properties(r#"dir = 4; name = "a;b"; layer = 3"#).unwrap();
/// assert_eq!(parts, vec!["dir = 4", r#" name = "a;b""#, " layer = 3"]);
/// ```
pub fn split_properties(text: &str) -> Result<Vec<&str>, SplitError> {
    let mut parts = Vec::new();
    let mut group_start = 0;
    let mut offset = 0;
    let mut in_string = false;

    for chunk in text.split(';') {
        if count_unescaped_quotes(chunk) % 2 == 1 {
            in_string = !in_string;
        }
        let end = offset + chunk.len();
        if !in_string {
            parts.push(&text[group_start..end]);
            group_start = end + 1;
        }
        offset = end + 1;
    }

    if in_string {
        return Err(SplitError::UnterminatedString);
    }
    Ok(parts)
}

fn count_unescaped_quotes(chunk: &str) -> usize {
    let mut count = 0;
    let mut escaped = false;
    for ch in chunk.chars() {
        if escaped {
            escaped = false;
        } else if ch == ESCAPE {
            escaped = true;
        } else if ch == QUOTE {
            count += 1;
        }
    }
    count
}
