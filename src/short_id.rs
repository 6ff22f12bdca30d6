//! Reversible short tokens for game and player identifiers.
//!
//! Identifiers are canonical RFC-4122 UUIDs everywhere except in URLs, where
//! a 22-character base-58 token is used instead. The two forms are
//! interchangeable:
//!
//! ```
//! use sequence_client::short_id::{to_canonical_uuid, to_short_uuid};
//!
//! let canonical = "8f14e45f-ceea-467f-a0e6-3b4ea4b2e1d9";
//! let short = to_short_uuid(canonical).unwrap();
//! assert_eq!(short.len(), 22);
//! assert_eq!(to_canonical_uuid(&short).as_deref(), Some(canonical));
//! ```
//!
//! Conversion never fails: anything that cannot be converted is passed
//! through trimmed, and blank input maps to `None`. Tokens are only used for
//! routing, never for authorization.

use uuid::Uuid;

/// Flickr-style base-58 alphabet (no `0`, `O`, `I`, `l`).
pub const SHORT_ID_ALPHABET: &str = "123456789abcdefghijkmnopqrstuvwxyzABCDEFGHJKLMNPQRSTUVWXYZ";

/// Length of every encoded token; shorter encodings are left-padded.
pub const SHORT_ID_LEN: usize = 22;

const BASE: u128 = 58;

/// Returns `true` if `value` is in canonical RFC-4122 textual form
/// (version 1–5, RFC variant), ignoring case.
pub fn is_canonical_uuid(value: &str) -> bool {
    let bytes = value.as_bytes();
    if bytes.len() != 36 {
        return false;
    }
    for (idx, byte) in bytes.iter().enumerate() {
        let ok = match idx {
            8 | 13 | 18 | 23 => *byte == b'-',
            14 => matches!(byte, b'1'..=b'5'),
            19 => matches!(byte, b'8' | b'9' | b'a' | b'b' | b'A' | b'B'),
            _ => byte.is_ascii_hexdigit(),
        };
        if !ok {
            return false;
        }
    }
    true
}

/// Resolve a route parameter to a canonical UUID.
///
/// - blank input → `None`
/// - canonical input → returned trimmed, unchanged
/// - short token → decoded to lowercase canonical form
/// - anything undecodable → returned trimmed, unchanged
pub fn to_canonical_uuid(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    if is_canonical_uuid(trimmed) {
        return Some(trimmed.to_string());
    }
    match decode(trimmed) {
        Some(uuid) => Some(uuid.hyphenated().to_string()),
        None => {
            tracing::debug!(value = %trimmed, "identifier is not a short token, passing through");
            Some(trimmed.to_string())
        }
    }
}

/// Shorten a canonical UUID for use in a URL.
///
/// - blank input → `None`
/// - non-canonical input → returned trimmed, unchanged
/// - canonical input → encoded short token (or the canonical string if it
///   cannot be parsed)
pub fn to_short_uuid(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    if !is_canonical_uuid(trimmed) {
        return Some(trimmed.to_string());
    }
    match Uuid::parse_str(trimmed) {
        Ok(uuid) => Some(encode(uuid)),
        Err(_) => Some(trimmed.to_string()),
    }
}

/// Short form of an optional identifier for display, `-` when absent.
pub fn format_identifier(value: Option<&str>) -> String {
    value
        .and_then(|value| to_short_uuid(value).or_else(|| Some(value.to_string())))
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| "-".to_string())
}

fn encode(uuid: Uuid) -> String {
    let alphabet = SHORT_ID_ALPHABET.as_bytes();
    let mut remaining = uuid.as_u128();
    let mut digits = Vec::with_capacity(SHORT_ID_LEN);
    while remaining > 0 {
        let digit = (remaining % BASE) as usize;
        if let Some(ch) = alphabet.get(digit) {
            digits.push(*ch);
        }
        remaining /= BASE;
    }
    let zero = alphabet.first().copied().unwrap_or(b'1');
    while digits.len() < SHORT_ID_LEN {
        digits.push(zero);
    }
    digits.reverse();
    digits.into_iter().map(char::from).collect()
}

fn decode(token: &str) -> Option<Uuid> {
    let mut value: u128 = 0;
    for ch in token.chars() {
        let digit = SHORT_ID_ALPHABET.find(ch)? as u128;
        value = value.checked_mul(BASE)?.checked_add(digit)?;
    }
    Some(Uuid::from_u128(value))
}
