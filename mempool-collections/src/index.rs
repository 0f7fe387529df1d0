//! Sentinel-based index trait for heap slots and arena ids.
//!
//! A reserved sentinel value (`MAX`) stands in for "not in a heap" or
//! "no twin" so entries don't pay for an `Option` per field.

/// A copyable index type with a sentinel "none" value.
///
/// # Example
///
/// ```
/// use mempool_collections::Index;
///
/// let slot: usize = 5;
/// let removed: usize = usize::NONE;
///
/// assert!(slot.is_some());
/// assert!(removed.is_none());
/// ```
pub trait Index: Copy + Eq {
    /// Sentinel value representing "no index".
    const NONE: Self;

    /// Returns `true` if this is the sentinel value.
    #[inline]
    fn is_none(self) -> bool {
        self == Self::NONE
    }

    /// Returns `true` if this is not the sentinel value.
    #[inline]
    fn is_some(self) -> bool {
        !self.is_none()
    }

    /// Widens the index for array access.
    fn as_usize(self) -> usize;

    /// Narrows an array position back into the index type.
    fn from_usize(val: usize) -> Self;
}

impl Index for usize {
    const NONE: Self = usize::MAX;

    #[inline]
    fn as_usize(self) -> usize {
        self
    }

    #[inline]
    fn from_usize(val: usize) -> Self {
        val
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn max_is_reserved_for_removed_entries() {
        assert!(usize::NONE.is_none());
        assert!(!usize::NONE.is_some());
        assert!(0usize.is_some());
        assert!((usize::MAX - 1).is_some());
    }

    #[test]
    fn heap_positions_are_kept_as_is() {
        for pos in [0usize, 1, 4_999, 5_000] {
            assert_eq!(usize::from_usize(pos).as_usize(), pos);
        }
    }
}
