use std::cmp::Ordering;
use std::fmt;

use crate::compare::Comparator;
use crate::error::AllocError;
use crate::index::{IndexType, NodeIndex};
use crate::node::Node;
use crate::treemap::TreeMap;

/// A view into a single entry in a map, which may either be vacant or occupied.
pub enum Entry<'a, K, V, C, Ix> {
    /// An occupied entry.
    Occupied(OccupiedEntry<'a, K, V, C, Ix>),
    /// A vacant entry.
    Vacant(VacantEntry<'a, K, V, C, Ix>),
}

/// A view into an occupied entry in a `TreeMap`.
/// It is part of the [`Entry`] enum.
pub struct OccupiedEntry<'a, K, V, C, Ix> {
    /// Mutable reference to the map
    pub(crate) map_ref: &'a mut TreeMap<K, V, C, Ix>,
    /// The entry node
    pub(crate) node: NodeIndex<Ix>,
}

/// A view into a vacant entry in a `TreeMap`.
/// It is part of the [`Entry`] enum.
pub struct VacantEntry<'a, K, V, C, Ix> {
    /// Mutable reference to the map
    pub(crate) map_ref: &'a mut TreeMap<K, V, C, Ix>,
    /// The key of this entry
    pub(crate) key: K,
    /// Node the new entry hangs from, the sentinel for an empty map
    pub(crate) parent: NodeIndex<Ix>,
    /// Side of `parent` the new entry goes to
    pub(crate) ord: Ordering,
}

impl<'a, K, V, C, Ix> Entry<'a, K, V, C, Ix>
where
    C: Comparator<K>,
    Ix: IndexType,
{
    /// Ensures a value is in the entry by inserting the default if empty, and returns
    /// a mutable reference to the value in the entry.
    ///
    /// # Panics
    ///
    /// This method panics when a node for the new entry cannot be allocated.
    ///
    /// # Example
    /// ```rust
    /// use rb_tree_map::{Entry, TreeMap};
    ///
    /// let mut map = TreeMap::new();
    /// assert!(matches!(map.entry(1), Entry::Vacant(_)));
    /// map.entry(1).or_insert(3);
    /// assert!(matches!(map.entry(1), Entry::Occupied(_)));
    /// assert_eq!(map.get(&1), Some(&3));
    /// ```
    #[inline]
    pub fn or_insert(self, default: V) -> &'a mut V {
        match self {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => entry.insert(default),
        }
    }

    /// Like [`Entry::or_insert`], computing the value only when the entry is vacant.
    #[inline]
    pub fn or_insert_with<F>(self, default: F) -> &'a mut V
    where
        F: FnOnce() -> V,
    {
        match self {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => entry.insert(default()),
        }
    }

    /// Provides in-place mutable access to an occupied entry before any
    /// potential inserts into the map.
    ///
    /// # Example
    /// ```rust
    /// use rb_tree_map::{Entry, TreeMap};
    ///
    /// let mut map = TreeMap::new();
    ///
    /// map.insert(6, 3);
    /// assert!(matches!(map.entry(6), Entry::Occupied(_)));
    /// map.entry(6).and_modify(|v| *v += 1);
    /// assert_eq!(map.get(&6), Some(&4));
    /// ```
    #[inline]
    #[must_use]
    pub fn and_modify<F>(self, f: F) -> Self
    where
        F: FnOnce(&mut V),
    {
        match self {
            Entry::Occupied(mut entry) => {
                f(entry.get_mut());
                Self::Occupied(entry)
            }
            Entry::Vacant(entry) => Self::Vacant(entry),
        }
    }

    /// Returns a reference to this entry's key.
    #[inline]
    pub fn key(&self) -> &K {
        match self {
            Entry::Occupied(entry) => entry.key(),
            Entry::Vacant(entry) => entry.key(),
        }
    }
}

impl<'a, K, V, C, Ix> Entry<'a, K, V, C, Ix>
where
    C: Comparator<K>,
    Ix: IndexType,
    V: Default,
{
    /// Ensures a value is in the entry by inserting `V::default()` if empty.
    #[inline]
    pub fn or_default(self) -> &'a mut V {
        self.or_insert_with(V::default)
    }
}

impl<'a, K, V, C, Ix> OccupiedEntry<'a, K, V, C, Ix>
where
    C: Comparator<K>,
    Ix: IndexType,
{
    /// Gets a reference to the key in the entry.
    #[inline]
    pub fn key(&self) -> &K {
        self.map_ref.node_ref(self.node, Node::key)
    }

    /// Handle of the node holding the entry.
    #[inline]
    pub fn handle(&self) -> NodeIndex<Ix> {
        self.node
    }

    /// Gets a reference to the value in the entry.
    #[inline]
    pub fn get(&self) -> &V {
        self.map_ref.node_ref(self.node, Node::value)
    }

    /// Gets a mutable reference to the value in the entry.
    #[inline]
    pub fn get_mut(&mut self) -> &mut V {
        self.map_ref.node_mut(self.node, Node::value_mut)
    }

    /// Converts the entry into a mutable reference to its value.
    #[inline]
    pub fn into_mut(self) -> &'a mut V {
        self.map_ref.node_mut(self.node, Node::value_mut)
    }

    /// Sets the value of the entry, returning the old value.
    #[inline]
    pub fn insert(&mut self, value: V) -> V {
        self.map_ref.node_mut(self.node, Node::set_value(value))
    }

    /// Takes the key and value out of the map.
    ///
    /// # Example
    /// ```rust
    /// use rb_tree_map::{Entry, TreeMap};
    ///
    /// let mut map = TreeMap::new();
    /// map.insert("a", 1);
    /// if let Entry::Occupied(entry) = map.entry("a") {
    ///     assert_eq!(entry.remove_entry(), ("a", 1));
    /// }
    /// assert!(map.is_empty());
    /// ```
    #[inline]
    pub fn remove_entry(self) -> (K, V) {
        self.map_ref
            .remove_at(self.node)
            .expect("occupied entry points at a removed node")
    }

    /// Takes the value out of the map.
    #[inline]
    pub fn remove(self) -> V {
        self.remove_entry().1
    }
}

impl<'a, K, V, C, Ix> VacantEntry<'a, K, V, C, Ix>
where
    C: Comparator<K>,
    Ix: IndexType,
{
    /// Gets a reference to the key that would be used when inserting.
    #[inline]
    pub fn key(&self) -> &K {
        &self.key
    }

    /// Takes ownership of the key.
    #[inline]
    pub fn into_key(self) -> K {
        self.key
    }

    /// Sets the value of the entry and returns a mutable reference to it.
    ///
    /// # Panics
    ///
    /// This method panics when a node for the entry cannot be allocated.
    #[inline]
    pub fn insert(self, value: V) -> &'a mut V {
        match self.try_insert(value) {
            Ok(v) => v,
            Err(err) => panic!("{err}"),
        }
    }

    /// Sets the value of the entry, failing if no node can be allocated for it.
    #[inline]
    pub fn try_insert(self, value: V) -> Result<&'a mut V, AllocError> {
        let VacantEntry {
            map_ref,
            key,
            parent,
            ord,
        } = self;
        let node = map_ref.link_new(parent, ord, key, value)?;
        Ok(map_ref.node_mut(node, Node::value_mut))
    }
}

impl<K, V, C, Ix> fmt::Debug for Entry<'_, K, V, C, Ix>
where
    K: fmt::Debug,
    V: fmt::Debug,
    C: Comparator<K>,
    Ix: IndexType,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Entry::Occupied(entry) => f.debug_tuple("Entry").field(entry).finish(),
            Entry::Vacant(entry) => f.debug_tuple("Entry").field(entry).finish(),
        }
    }
}

impl<K, V, C, Ix> fmt::Debug for OccupiedEntry<'_, K, V, C, Ix>
where
    K: fmt::Debug,
    V: fmt::Debug,
    C: Comparator<K>,
    Ix: IndexType,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OccupiedEntry")
            .field("key", self.key())
            .field("value", self.get())
            .finish()
    }
}

impl<K, V, C, Ix> fmt::Debug for VacantEntry<'_, K, V, C, Ix>
where
    K: fmt::Debug,
    C: Comparator<K>,
    Ix: IndexType,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("VacantEntry").field(self.key()).finish()
    }
}
