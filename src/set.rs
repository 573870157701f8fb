//! An ordered set built on `TreeMap` with unit values.

use std::fmt;
use std::iter::FusedIterator;

use crate::compare::{Comparator, OrdComparator};
use crate::error::AllocError;
use crate::index::{DefaultIx, IndexType};
use crate::iter;
use crate::treemap::TreeMap;

/// An ordered set of keys, backed by a red-black tree.
///
/// # Example
/// ```rust
/// use rb_tree_map::TreeSet;
///
/// let mut set = TreeSet::new();
/// assert!(set.insert(3));
/// assert!(set.insert(1));
/// assert!(!set.insert(3));
/// assert_eq!(set.lower_bound(&2), Some(&3));
/// assert_eq!(set.iter().copied().collect::<Vec<_>>(), vec![1, 3]);
/// ```
#[derive(Clone)]
pub struct TreeSet<K, C = OrdComparator, Ix = DefaultIx> {
    map: TreeMap<K, (), C, Ix>,
}

impl<K, C, Ix> TreeSet<K, C, Ix>
where
    C: Comparator<K>,
    Ix: IndexType,
{
    /// Creates a new `TreeSet` with estimated capacity and the given key ordering.
    #[inline]
    #[must_use]
    pub fn with_capacity_and_comparator(capacity: usize, cmp: C) -> Self {
        TreeSet {
            map: TreeMap::with_capacity_and_comparator(capacity, cmp),
        }
    }

    /// Adds a key, returning `false` if it was already present.
    ///
    /// # Panics
    ///
    /// This method panics when a node for a new key cannot be allocated.
    #[inline]
    pub fn insert(&mut self, key: K) -> bool {
        self.map.insert(key, ()).is_none()
    }

    /// Adds a key, returning `Ok(false)` if it was already present.
    #[inline]
    pub fn try_insert(&mut self, key: K) -> Result<bool, AllocError> {
        self.map.try_insert(key, ()).map(|old| old.is_none())
    }

    /// Removes a key, returning whether it was present.
    #[inline]
    pub fn remove(&mut self, key: &K) -> bool {
        self.map.remove(key).is_some()
    }

    /// Removes and returns the stored key equal to the given one.
    #[inline]
    pub fn take(&mut self, key: &K) -> Option<K> {
        self.map.remove_entry(key).map(|(k, _)| k)
    }

    /// Returns `true` if the set contains the key.
    #[inline]
    pub fn contains(&self, key: &K) -> bool {
        self.map.contains_key(key)
    }

    /// Returns the stored key equal to the given one.
    #[inline]
    pub fn get(&self, key: &K) -> Option<&K> {
        self.map.get_key_value(key).map(|(k, _)| k)
    }

    /// Returns the smallest key that is not less than the given key.
    #[inline]
    pub fn lower_bound(&self, key: &K) -> Option<&K> {
        self.map.lower_bound_entry(key).map(|(k, _)| k)
    }

    /// Iterates the keys starting at the lower bound of the given key.
    #[inline]
    pub fn range_from(&self, key: &K) -> Iter<'_, K, C, Ix> {
        Iter {
            inner: self.map.range_from(key),
        }
    }
}

impl<K, C, Ix> TreeSet<K, C, Ix>
where
    Ix: IndexType,
{
    /// Returns the smallest key.
    #[inline]
    pub fn first(&self) -> Option<&K> {
        self.map.first_key_value().map(|(k, _)| k)
    }

    /// Returns the largest key.
    #[inline]
    pub fn last(&self) -> Option<&K> {
        self.map.last_key_value().map(|(k, _)| k)
    }

    /// Removes and returns the smallest key.
    #[inline]
    pub fn pop_first(&mut self) -> Option<K> {
        self.map.pop_first().map(|(k, _)| k)
    }

    /// Removes and returns the largest key.
    #[inline]
    pub fn pop_last(&mut self) -> Option<K> {
        self.map.pop_last().map(|(k, _)| k)
    }

    /// Gets an iterator over the keys, in sorted order.
    #[inline]
    #[must_use]
    pub fn iter(&self) -> Iter<'_, K, C, Ix> {
        Iter {
            inner: self.map.iter(),
        }
    }

    /// Removes all keys.
    #[inline]
    pub fn clear(&mut self) {
        self.map.clear();
    }

    /// Returns the number of keys in the set.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Returns `true` if the set contains no keys.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

impl<K> TreeSet<K>
where
    K: Ord,
{
    /// Creates an empty `TreeSet` ordered by `Ord`.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        TreeSet {
            map: TreeMap::new(),
        }
    }
}

impl<K, C> TreeSet<K, C>
where
    C: Comparator<K>,
{
    /// Creates an empty `TreeSet` ordered by the given comparator.
    #[inline]
    #[must_use]
    pub fn with_comparator(cmp: C) -> Self {
        TreeSet {
            map: TreeMap::with_comparator(cmp),
        }
    }
}

impl<K, C, Ix> Default for TreeSet<K, C, Ix>
where
    C: Comparator<K> + Default,
    Ix: IndexType,
{
    #[inline]
    fn default() -> Self {
        TreeSet {
            map: TreeMap::default(),
        }
    }
}

impl<K, C, Ix> fmt::Debug for TreeSet<K, C, Ix>
where
    K: fmt::Debug,
    Ix: IndexType,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<K, C, Ix> PartialEq for TreeSet<K, C, Ix>
where
    K: PartialEq,
    Ix: IndexType,
{
    fn eq(&self, other: &Self) -> bool {
        self.map == other.map
    }
}

impl<K, C, Ix> Eq for TreeSet<K, C, Ix>
where
    K: Eq,
    Ix: IndexType,
{
}

impl<K> FromIterator<K> for TreeSet<K>
where
    K: Ord,
{
    fn from_iter<T: IntoIterator<Item = K>>(iter: T) -> Self {
        let mut set = TreeSet::new();
        set.extend(iter);
        set
    }
}

impl<K, C, Ix> Extend<K> for TreeSet<K, C, Ix>
where
    C: Comparator<K>,
    Ix: IndexType,
{
    #[inline]
    fn extend<T: IntoIterator<Item = K>>(&mut self, iter: T) {
        self.map.extend(iter.into_iter().map(|k| (k, ())));
    }
}

/// An iterator over the keys of a `TreeSet`.
pub struct Iter<'a, K, C, Ix> {
    inner: iter::Iter<'a, K, (), C, Ix>,
}

impl<'a, K, C, Ix> Iterator for Iter<'a, K, C, Ix>
where
    Ix: IndexType,
{
    type Item = &'a K;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(k, _)| k)
    }
}

impl<K, C, Ix> DoubleEndedIterator for Iter<'_, K, C, Ix>
where
    Ix: IndexType,
{
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|(k, _)| k)
    }
}

impl<K, C, Ix> FusedIterator for Iter<'_, K, C, Ix> where Ix: IndexType {}

impl<K, C, Ix> fmt::Debug for Iter<'_, K, C, Ix>
where
    K: fmt::Debug,
    Ix: IndexType,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.inner.clone().map(|(k, _)| k))
            .finish()
    }
}

/// An owning iterator over the keys of a `TreeSet`.
pub struct IntoIter<K, C, Ix> {
    inner: iter::IntoIter<K, (), C, Ix>,
}

impl<K, C, Ix> Iterator for IntoIter<K, C, Ix>
where
    Ix: IndexType,
{
    type Item = K;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(k, _)| k)
    }
}

impl<K, C, Ix> DoubleEndedIterator for IntoIter<K, C, Ix>
where
    Ix: IndexType,
{
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|(k, _)| k)
    }
}

impl<K, C, Ix> FusedIterator for IntoIter<K, C, Ix> where Ix: IndexType {}

impl<K, C, Ix> IntoIterator for TreeSet<K, C, Ix>
where
    Ix: IndexType,
{
    type Item = K;
    type IntoIter = IntoIter<K, C, Ix>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        IntoIter {
            inner: self.map.into_iter(),
        }
    }
}

impl<'a, K, C, Ix> IntoIterator for &'a TreeSet<K, C, Ix>
where
    Ix: IndexType,
{
    type Item = &'a K;
    type IntoIter = Iter<'a, K, C, Ix>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod test {
    use crate::compare::ReverseComparator;

    use super::*;

    #[test]
    fn set_insert_remove_contains() {
        let mut set: TreeSet<i32> = [20, 10, 30, 5, 15, 25, 35].into_iter().collect();
        assert_eq!(set.len(), 7);
        assert!(!set.insert(15));
        assert_eq!(set.len(), 7);
        assert!(set.remove(&15));
        assert!(!set.remove(&15));
        assert!(!set.contains(&15));
        assert_eq!(set.lower_bound(&12), Some(&20));
        assert_eq!(set.first(), Some(&5));
        assert_eq!(set.last(), Some(&35));
        assert_eq!(set.take(&30), Some(30));
        assert_eq!(set.get(&25), Some(&25));
    }

    #[test]
    fn set_iterates_both_ways() {
        let set: TreeSet<i32> = (1..=5).rev().collect();
        assert_eq!(set.iter().copied().collect::<Vec<_>>(), vec![1, 2, 3, 4, 5]);
        assert_eq!(set.iter().rev().copied().collect::<Vec<_>>(), vec![5, 4, 3, 2, 1]);
        assert_eq!(set.range_from(&3).copied().collect::<Vec<_>>(), vec![3, 4, 5]);
        assert_eq!(set.into_iter().rev().collect::<Vec<_>>(), vec![5, 4, 3, 2, 1]);
    }

    #[test]
    fn set_pop_drains_in_order() {
        let mut set = TreeSet::with_comparator(ReverseComparator(OrdComparator));
        set.extend([1, 4, 2, 3]);
        assert_eq!(set.pop_first(), Some(4));
        assert_eq!(set.pop_last(), Some(1));
        assert_eq!(format!("{set:?}"), "{3, 2}");
        set.clear();
        assert!(set.is_empty());
        assert_eq!(set.pop_first(), None);
    }
}
