//! Identity assignment for externally produced records.
//!
//! Stores never trust incoming records to carry an identifier. A supplied
//! non-empty identifier is kept byte-for-byte so re-ingesting a feed that
//! carries its own ids (CVE numbers, vendor advisory ids) is idempotent;
//! anything else gets a freshly generated one.
//!
//! Generation is client-local random (UUID v4, 122 random bits) with no
//! counter state, so it is safe to call from anywhere without
//! coordination. A multi-writer deployment would need a collision-checked
//! allocator instead.

use uuid::Uuid;

/// Generate a fresh identifier.
#[inline]
#[must_use]
pub fn fresh() -> String {
    Uuid::new_v4().to_string()
}

/// Return the supplied identifier, or a fresh one if it is absent or empty.
///
/// A non-empty identifier is preserved byte-for-byte, whitespace included.
#[must_use]
pub fn ensure(id: Option<String>) -> String {
    match id {
        Some(id) if !id.is_empty() => id,
        _ => fresh(),
    }
}
