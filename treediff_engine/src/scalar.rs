//! Scalar value comparison.
//!
//! Called only once the walker has already established that both sides share
//! the same tag (a tag mismatch is itself a modification, handled upstream).

use treediff_model::Tag;

/// Compare two scalar values of the same `tag`.
///
/// `!!null` scalars are always equal regardless of textual form (`null`, `~`,
/// or an empty scalar all mean the same thing). Every other tag compares by
/// exact value-string equality.
pub fn scalars_equal(tag: &Tag, from: &str, to: &str) -> bool {
    if tag.is_null() {
        return true;
    }
    from == to
}
