//! UUID v7 utilities for time-ordered identifiers.
//!
//! Every entity id is a UUIDv7, so ids minted later compare greater. The
//! store relies on this to order records created in the same instant.

use uuid::Uuid;

/// Generate a new UUIDv7 identifier.
///
/// # Example
///
/// ```
/// use vidcat_core::uuid_utils::new_v7;
///
/// let a = new_v7();
/// let b = new_v7();
/// assert!(b > a);
/// ```
#[inline]
pub fn new_v7() -> Uuid {
    Uuid::now_v7()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_v7_is_version_7() {
        assert_eq!(new_v7().get_version_num(), 7);
    }

    #[test]
    fn test_v7_monotonic() {
        let ids: Vec<Uuid> = (0..100).map(|_| new_v7()).collect();
        for pair in ids.windows(2) {
            assert!(pair[1] > pair[0]);
        }
    }
}
