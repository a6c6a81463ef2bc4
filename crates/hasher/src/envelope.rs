//! Outer storage envelope: `base64(tag || utf8(inner))`.
//!
//! The tag byte lets callers version the stored value independently of the
//! inner scrypt layout. It is never consulted when verifying.

use base64::Engine;
use base64::engine::general_purpose::STANDARD as B64;

/// A decoded storage envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope {
    /// Outer tag byte.
    pub tag: u8,
    /// Inner hash string.
    pub inner: String,
}

/// Wrap an inner hash string behind `tag` and transport-encode the result.
pub fn seal(tag: u8, inner: &str) -> String {
    let mut raw = Vec::with_capacity(inner.len() + 1);
    raw.push(tag);
    raw.extend_from_slice(inner.as_bytes());
    B64.encode(raw)
}

/// Decode a stored blob.
///
/// Returns `None` when the blob is not valid base64, is empty after decoding,
/// or the bytes after the tag are not UTF-8.
pub fn open(blob: &str) -> Option<Envelope> {
    let raw = B64.decode(blob.trim()).ok()?;
    let (&tag, rest) = raw.split_first()?;
    let inner = String::from_utf8(rest.to_vec()).ok()?;
    Some(Envelope { tag, inner })
}
