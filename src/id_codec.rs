//! Compact tile identifiers
//!
//! Tile IDs are written as base-52 strings over `a-z` followed by `A-Z`,
//! most significant symbol first. Zero encodes as `"a"`, and padding adds
//! leading `a` symbols, so padded and unpadded forms decode to the same value.

use thiserror::Error;

/// The ordered symbol table used for tile IDs.
pub const ALPHABET: &[u8; 52] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";

const BASE: usize = ALPHABET.len();

/// Error decoding a tile ID string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdError {
    /// The ID string was empty
    #[error("empty tile id")]
    Empty,
    /// A character outside `a-zA-Z` was found
    #[error("invalid character '{ch}' in tile id '{id}'")]
    InvalidChar { id: String, ch: char },
    /// The decoded value does not fit in `usize`
    #[error("tile id '{0}' is too large")]
    Overflow(String),
}

/// Encode `n` as a tile ID, left-padded with `a` to at least `pad` symbols.
///
/// # Examples
///
/// ```
/// use dmmtool::id_codec::encode;
///
/// assert_eq!(encode(0, 0), "a");
/// assert_eq!(encode(52, 0), "ba");
/// assert_eq!(encode(1, 3), "aab");
/// ```
pub fn encode(n: usize, pad: usize) -> String {
    let mut digits = Vec::new();
    let mut rest = n;
    loop {
        digits.push(ALPHABET[rest % BASE]);
        rest /= BASE;
        if rest == 0 {
            break;
        }
    }
    while digits.len() < pad {
        digits.push(ALPHABET[0]);
    }
    digits.iter().rev().map(|&b| b as char).collect()
}

/// Decode a tile ID produced by [`encode`].
pub fn decode(id: &str) -> Result<usize, IdError> {
    if id.is_empty() {
        return Err(IdError::Empty);
    }

    let mut value: usize = 0;
    for ch in id.chars() {
        let digit =
            symbol_value(ch).ok_or_else(|| IdError::InvalidChar { id: id.to_string(), ch })?;
        value = value
            .checked_mul(BASE)
            .and_then(|v| v.checked_add(digit))
            .ok_or_else(|| IdError::Overflow(id.to_string()))?;
    }
    Ok(value)
}

/// Number of symbols in the unpadded encoding of `n`.
pub fn encoded_len(n: usize) -> usize {
    let mut len = 1;
    let mut rest = n / BASE;
    while rest > 0 {
        len += 1;
        rest /= BASE;
    }
    len
}

fn symbol_value(ch: char) -> Option<usize> {
    match ch {
        'a'..='z' => Some(ch as usize - 'a' as usize),
        'A'..='Z' => Some(26 + ch as usize - 'A' as usize),
        _ => None,
    }
}
