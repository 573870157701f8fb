//! Key ordering used by `TreeMap` and `TreeSet`.
//!
//! The tree never looks at keys directly: every descent goes through a
//! [`Comparator`]. The comparator must be a strict total order and must not
//! change its answers while any map built with it is alive.

use std::cmp::Ordering;

/// A three-way comparison over keys of type `K`.
pub trait Comparator<K: ?Sized> {
    /// Returns how `lhs` orders relative to `rhs`.
    fn compare(&self, lhs: &K, rhs: &K) -> Ordering;
}

/// Orders keys by their `Ord` implementation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct OrdComparator;

impl<K: Ord + ?Sized> Comparator<K> for OrdComparator {
    #[inline]
    fn compare(&self, lhs: &K, rhs: &K) -> Ordering {
        lhs.cmp(rhs)
    }
}

/// Flips the order of the wrapped comparator.
///
/// # Example
/// ```rust
/// use rb_tree_map::{OrdComparator, ReverseComparator, TreeMap};
///
/// let mut map = TreeMap::with_comparator(ReverseComparator(OrdComparator));
/// map.insert(1, "a");
/// map.insert(3, "c");
/// map.insert(2, "b");
/// assert_eq!(map.keys().copied().collect::<Vec<_>>(), vec![3, 2, 1]);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct ReverseComparator<C>(pub C);

impl<K: ?Sized, C: Comparator<K>> Comparator<K> for ReverseComparator<C> {
    #[inline]
    fn compare(&self, lhs: &K, rhs: &K) -> Ordering {
        self.0.compare(rhs, lhs)
    }
}

impl<K: ?Sized, F> Comparator<K> for F
where
    F: Fn(&K, &K) -> Ordering,
{
    #[inline]
    fn compare(&self, lhs: &K, rhs: &K) -> Ordering {
        self(lhs, rhs)
    }
}
