use std::cmp::Ordering;
use std::fmt;
use std::ops::Index;

use log::{trace, warn};

use crate::compare::{Comparator, OrdComparator};
use crate::entry::{Entry, OccupiedEntry, VacantEntry};
use crate::error::AllocError;
use crate::index::{DefaultIx, IndexType, NodeIndex};
use crate::iter::{IntoIter, Iter, Keys, Values};
use crate::node::{Color, Node};

/// An ordered key-value map, which supports O(log n) insert, remove, lookup and lower bound.
#[derive(Clone)]
pub struct TreeMap<K, V, C = OrdComparator, Ix = DefaultIx> {
    /// Vector that stores nodes, slot 0 is the sentinel
    pub(crate) nodes: Vec<Node<K, V, Ix>>,
    /// Root of the red-black tree
    pub(crate) root: NodeIndex<Ix>,
    /// Head of the vacant slot list, chained through `left`
    pub(crate) free: NodeIndex<Ix>,
    /// Number of elements in the map
    pub(crate) len: usize,
    /// Key ordering
    pub(crate) cmp: C,
}

/// Where a key lives, or where it would be linked.
pub(crate) enum Slot<Ix> {
    Occupied(NodeIndex<Ix>),
    Vacant { parent: NodeIndex<Ix>, ord: Ordering },
}

impl<K, V, C, Ix> TreeMap<K, V, C, Ix>
where
    C: Comparator<K>,
    Ix: IndexType,
{
    /// Creates a new `TreeMap` with estimated capacity and the given key ordering.
    #[inline]
    #[must_use]
    pub fn with_capacity_and_comparator(capacity: usize, cmp: C) -> Self {
        let mut nodes = vec![Self::new_sentinel()];
        nodes.reserve(capacity);
        TreeMap {
            nodes,
            root: NodeIndex::sentinel(),
            free: NodeIndex::sentinel(),
            len: 0,
            cmp,
        }
    }

    /// Insert a key-value pair into the map.
    /// If the key exists, overwrite and return the previous value.
    ///
    /// Fails when no node can be created for a new key. The map is unchanged then,
    /// and the key and value are dropped.
    ///
    /// # Example
    /// ```rust
    /// use rb_tree_map::TreeMap;
    ///
    /// let mut map = TreeMap::new();
    /// assert_eq!(map.try_insert(1, "a"), Ok(None));
    /// assert_eq!(map.try_insert(1, "b"), Ok(Some("a")));
    /// assert_eq!(map.len(), 1);
    /// ```
    #[inline]
    pub fn try_insert(&mut self, key: K, value: V) -> Result<Option<V>, AllocError> {
        match self.search_slot(&key) {
            Slot::Occupied(x) => Ok(Some(self.node_mut(x, Node::set_value(value)))),
            Slot::Vacant { parent, ord } => {
                let _ignore = self.link_new(parent, ord, key, value)?;
                Ok(None)
            }
        }
    }

    /// Insert a key-value pair into the map.
    /// If the key exists, overwrite and return the previous value.
    ///
    /// # Panics
    ///
    /// This method panics when a node for a new key cannot be allocated,
    /// see [`TreeMap::try_insert`] for the fallible version.
    ///
    /// # Example
    /// ```rust
    /// use rb_tree_map::TreeMap;
    ///
    /// let mut map = TreeMap::new();
    /// assert_eq!(map.insert(10, 1), None);
    /// assert_eq!(map.insert(10, 2), Some(1));
    /// assert_eq!(map.insert(10, 3), Some(2));
    /// ```
    #[inline]
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        match self.try_insert(key, value) {
            Ok(old) => old,
            Err(err) => panic!("{err}"),
        }
    }

    /// Remove a key from the map, returning the value at the key if the key exists
    ///
    /// # Example
    /// ```rust
    /// use rb_tree_map::TreeMap;
    ///
    /// let mut map = TreeMap::new();
    /// map.insert(1, 10);
    /// map.insert(2, 20);
    /// assert_eq!(map.remove(&3), None);
    /// assert_eq!(map.len(), 2);
    /// assert_eq!(map.remove(&2), Some(20));
    /// assert_eq!(map.len(), 1);
    /// ```
    #[inline]
    pub fn remove(&mut self, key: &K) -> Option<V> {
        self.remove_entry(key).map(|(_, v)| v)
    }

    /// Remove a key from the map, returning the stored key and value if the key exists
    #[inline]
    pub fn remove_entry(&mut self, key: &K) -> Option<(K, V)> {
        let z = self.find(key)?;
        self.remove_at(z)
    }

    /// Remove the entry a handle points at.
    ///
    /// Handles of all other entries stay valid, so a walk can capture the
    /// successor before removing the current entry.
    ///
    /// # Example
    /// ```rust
    /// use rb_tree_map::TreeMap;
    ///
    /// let mut map: TreeMap<i32, i32> = (1..=6).map(|k| (k, k)).collect();
    /// let mut cur = map.min();
    /// while let Some(x) = cur {
    ///     cur = map.next(x);
    ///     if map.key_at(x).is_some_and(|k| k % 2 == 0) {
    ///         map.remove_at(x);
    ///     }
    /// }
    /// assert_eq!(map.keys().copied().collect::<Vec<_>>(), vec![1, 3, 5]);
    /// ```
    #[inline]
    pub fn remove_at(&mut self, node: NodeIndex<Ix>) -> Option<(K, V)> {
        if self.live_node(node).is_none() {
            return None;
        }
        self.remove_inner(node);
        Some(self.free_node(node))
    }

    /// Find the handle of the node holding exactly the given key.
    #[inline]
    pub fn find(&self, key: &K) -> Option<NodeIndex<Ix>> {
        match self.search_slot(key) {
            Slot::Occupied(x) => Some(x),
            Slot::Vacant { .. } => None,
        }
    }

    /// Find the handle of the node with the smallest key that is not less than the given key.
    ///
    /// # Example
    /// ```rust
    /// use rb_tree_map::TreeMap;
    ///
    /// let map: TreeMap<i32, ()> = [20, 10, 30].into_iter().map(|k| (k, ())).collect();
    /// assert_eq!(map.lower_bound(&12).and_then(|x| map.key_at(x)), Some(&20));
    /// assert_eq!(map.lower_bound(&10).and_then(|x| map.key_at(x)), Some(&10));
    /// assert_eq!(map.lower_bound(&31), None);
    /// ```
    #[inline]
    pub fn lower_bound(&self, key: &K) -> Option<NodeIndex<Ix>> {
        let mut candidate = None;
        let mut x = self.root;
        while !x.is_sentinel() {
            match self.cmp.compare(key, self.node_ref(x, Node::key)) {
                Ordering::Equal => return Some(x),
                Ordering::Less => {
                    candidate = Some(x);
                    x = self.node_ref(x, Node::left);
                }
                Ordering::Greater => x = self.node_ref(x, Node::right),
            }
        }
        candidate
    }

    /// Return the entry with the smallest key that is not less than the given key.
    #[inline]
    pub fn lower_bound_entry(&self, key: &K) -> Option<(&K, &V)> {
        self.lower_bound(key).and_then(|x| self.entry_at(x))
    }

    /// Return reference to the value corresponding to the key.
    ///
    /// # Example
    /// ```rust
    /// use rb_tree_map::TreeMap;
    ///
    /// let mut map = TreeMap::new();
    /// map.insert(1, "one");
    /// assert_eq!(map.get(&1), Some(&"one"));
    /// assert_eq!(map.get(&2), None);
    /// ```
    #[inline]
    pub fn get(&self, key: &K) -> Option<&V> {
        self.find(key).map(|x| self.node_ref(x, Node::value))
    }

    /// Return a mutable reference to the value corresponding to the key.
    #[inline]
    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        let x = self.find(key)?;
        Some(self.node_mut(x, Node::value_mut))
    }

    /// Return the stored key and the value corresponding to the key.
    #[inline]
    pub fn get_key_value(&self, key: &K) -> Option<(&K, &V)> {
        self.find(key).map(|x| self.node_ref(x, Node::entry))
    }

    /// Return `true` if the map contains the key.
    #[inline]
    pub fn contains_key(&self, key: &K) -> bool {
        self.find(key).is_some()
    }

    /// Get an iterator over the entries starting at the lower bound of the key.
    ///
    /// # Example
    /// ```rust
    /// use rb_tree_map::TreeMap;
    ///
    /// let map: TreeMap<i32, ()> = [5, 10, 15, 20].into_iter().map(|k| (k, ())).collect();
    /// let keys: Vec<_> = map.range_from(&11).map(|(k, _)| *k).collect();
    /// assert_eq!(keys, vec![15, 20]);
    /// ```
    #[inline]
    pub fn range_from(&self, key: &K) -> Iter<'_, K, V, C, Ix> {
        Iter::between(self, self.lower_bound(key), self.max())
    }

    /// Get the given key's corresponding entry in the map for in-place manipulation.
    ///
    /// # Example
    /// ```rust
    /// use rb_tree_map::{Entry, TreeMap};
    ///
    /// let mut map = TreeMap::new();
    /// assert!(matches!(map.entry("a"), Entry::Vacant(_)));
    /// *map.entry("a").or_default() += 1;
    /// *map.entry("a").or_default() += 1;
    /// assert_eq!(map.get(&"a"), Some(&2));
    /// ```
    #[inline]
    pub fn entry(&mut self, key: K) -> Entry<'_, K, V, C, Ix> {
        match self.search_slot(&key) {
            Slot::Occupied(node) => Entry::Occupied(OccupiedEntry {
                map_ref: self,
                node,
            }),
            Slot::Vacant { parent, ord } => Entry::Vacant(VacantEntry {
                map_ref: self,
                key,
                parent,
                ord,
            }),
        }
    }

    /// Return the comparator ordering the keys.
    #[inline]
    pub fn comparator(&self) -> &C {
        &self.cmp
    }
}

impl<K, V, C, Ix> TreeMap<K, V, C, Ix>
where
    Ix: IndexType,
{
    /// Handle of the node with the smallest key.
    #[inline]
    #[must_use]
    pub fn min(&self) -> Option<NodeIndex<Ix>> {
        (!self.root.is_sentinel()).then(|| self.tree_minimum(self.root))
    }

    /// Handle of the node with the largest key.
    #[inline]
    #[must_use]
    pub fn max(&self) -> Option<NodeIndex<Ix>> {
        (!self.root.is_sentinel()).then(|| self.tree_maximum(self.root))
    }

    /// Handle of the in-order successor, `None` after the largest key or for a stale handle.
    ///
    /// # Example
    /// ```rust
    /// use rb_tree_map::TreeMap;
    ///
    /// let map: TreeMap<i32, ()> = [3, 1, 2].into_iter().map(|k| (k, ())).collect();
    /// let second = map.min().and_then(|x| map.next(x));
    /// assert_eq!(second.and_then(|x| map.key_at(x)), Some(&2));
    /// assert_eq!(map.max().and_then(|x| map.next(x)), None);
    /// ```
    #[inline]
    pub fn next(&self, node: NodeIndex<Ix>) -> Option<NodeIndex<Ix>> {
        self.live_node(node)?;
        self.successor(node)
    }

    /// Handle of the in-order predecessor, `None` before the smallest key or for a stale handle.
    #[inline]
    pub fn prev(&self, node: NodeIndex<Ix>) -> Option<NodeIndex<Ix>> {
        self.live_node(node)?;
        self.predecessor(node)
    }

    /// Key stored at a handle.
    #[inline]
    pub fn key_at(&self, node: NodeIndex<Ix>) -> Option<&K> {
        self.live_node(node).map(Node::key)
    }

    /// Value stored at a handle.
    #[inline]
    pub fn value_at(&self, node: NodeIndex<Ix>) -> Option<&V> {
        self.live_node(node).map(Node::value)
    }

    /// Mutable value stored at a handle.
    #[inline]
    pub fn value_at_mut(&mut self, node: NodeIndex<Ix>) -> Option<&mut V> {
        self.live_node(node)?;
        Some(self.node_mut(node, Node::value_mut))
    }

    /// Key and value stored at a handle.
    #[inline]
    pub fn entry_at(&self, node: NodeIndex<Ix>) -> Option<(&K, &V)> {
        self.live_node(node).map(Node::entry)
    }

    /// Return the entry with the smallest key.
    #[inline]
    pub fn first_key_value(&self) -> Option<(&K, &V)> {
        self.min().map(|x| self.node_ref(x, Node::entry))
    }

    /// Return the entry with the largest key.
    #[inline]
    pub fn last_key_value(&self) -> Option<(&K, &V)> {
        self.max().map(|x| self.node_ref(x, Node::entry))
    }

    /// Remove and return the entry with the smallest key.
    #[inline]
    pub fn pop_first(&mut self) -> Option<(K, V)> {
        let x = self.min()?;
        self.remove_inner(x);
        Some(self.free_node(x))
    }

    /// Remove and return the entry with the largest key.
    #[inline]
    pub fn pop_last(&mut self) -> Option<(K, V)> {
        let x = self.max()?;
        self.remove_inner(x);
        Some(self.free_node(x))
    }

    /// Get an iterator over the entries of the map, sorted by key.
    #[inline]
    #[must_use]
    pub fn iter(&self) -> Iter<'_, K, V, C, Ix> {
        Iter::new(self)
    }

    /// Get an iterator over the keys of the map, in sorted order.
    #[inline]
    #[must_use]
    pub fn keys(&self) -> Keys<'_, K, V, C, Ix> {
        Keys { inner: self.iter() }
    }

    /// Get an iterator over the values of the map, in order by key.
    #[inline]
    #[must_use]
    pub fn values(&self) -> Values<'_, K, V, C, Ix> {
        Values { inner: self.iter() }
    }

    /// Remove all elements from the map
    ///
    /// # Example
    /// ```rust
    /// use rb_tree_map::TreeMap;
    ///
    /// let mut map = TreeMap::new();
    /// map.insert(1, ());
    /// map.clear();
    /// map.clear();
    /// assert!(map.is_empty());
    /// assert_eq!(map.get(&1), None);
    /// ```
    #[inline]
    pub fn clear(&mut self) {
        trace!("clearing tree map with {} entries", self.len);
        self.nodes.clear();
        self.nodes.push(Self::new_sentinel());
        self.root = NodeIndex::sentinel();
        self.free = NodeIndex::sentinel();
        self.len = 0;
    }

    /// Return the number of elements in the map.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Return `true` if the map contains no elements.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<K, V> TreeMap<K, V>
where
    K: Ord,
{
    /// Create an empty `TreeMap` ordered by `Ord`
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity_and_comparator(0, OrdComparator)
    }

    /// Creates a new `TreeMap` with estimated capacity.
    #[inline]
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_and_comparator(capacity, OrdComparator)
    }
}

impl<K, V, C> TreeMap<K, V, C>
where
    C: Comparator<K>,
{
    /// Create an empty `TreeMap` ordered by the given comparator
    ///
    /// # Example
    /// ```rust
    /// use rb_tree_map::TreeMap;
    ///
    /// let mut map = TreeMap::with_comparator(|a: &i32, b: &i32| b.cmp(a));
    /// map.insert(1, ());
    /// map.insert(2, ());
    /// assert_eq!(map.first_key_value(), Some((&2, &())));
    /// ```
    #[inline]
    #[must_use]
    pub fn with_comparator(cmp: C) -> Self {
        Self::with_capacity_and_comparator(0, cmp)
    }
}

impl<K, V, C, Ix> Default for TreeMap<K, V, C, Ix>
where
    C: Comparator<K> + Default,
    Ix: IndexType,
{
    #[inline]
    fn default() -> Self {
        Self::with_capacity_and_comparator(0, C::default())
    }
}

impl<K, V, C, Ix> TreeMap<K, V, C, Ix>
where
    Ix: IndexType,
{
    /// Create a new sentinel node
    fn new_sentinel() -> Node<K, V, Ix> {
        Node {
            key: None,
            value: None,
            left: NodeIndex::sentinel(),
            right: NodeIndex::sentinel(),
            parent: NodeIndex::sentinel(),
            color: Color::Black,
        }
    }

    /// Create a new tree node
    fn new_node(key: K, value: V) -> Node<K, V, Ix> {
        Node {
            key: Some(key),
            value: Some(value),
            left: NodeIndex::sentinel(),
            right: NodeIndex::sentinel(),
            parent: NodeIndex::sentinel(),
            color: Color::Red,
        }
    }

    /// Take a slot for a new node, reusing a vacant one first.
    fn alloc_node(&mut self, key: K, value: V) -> Result<NodeIndex<Ix>, AllocError> {
        if !self.free.is_sentinel() {
            let idx = self.free;
            self.free = self.node_ref(idx, Node::left);
            trace!("reusing vacant slot {idx:?}");
            self.nodes[idx.index()] = Self::new_node(key, value);
            return Ok(idx);
        }
        // the largest index stays reserved for `NodeIndex::end`
        if self.nodes.len() >= <Ix as IndexType>::max().index() {
            warn!("node index space exhausted with {} entries", self.len);
            return Err(AllocError::IndexOverflow);
        }
        if let Err(err) = self.nodes.try_reserve(1) {
            warn!("failed to grow node storage past {} slots: {err}", self.nodes.len());
            return Err(err.into());
        }
        let idx = NodeIndex::new(self.nodes.len());
        self.nodes.push(Self::new_node(key, value));
        Ok(idx)
    }

    /// Move the entry out of an unlinked node and put its slot on the vacant list.
    fn free_node(&mut self, z: NodeIndex<Ix>) -> (K, V) {
        let next_free = self.free;
        let node = &mut self.nodes[z.index()];
        let entry = node.take_entry();
        node.left = next_free;
        node.right = NodeIndex::sentinel();
        node.parent = NodeIndex::sentinel();
        node.color = Color::Black;
        self.free = z;
        entry
    }

    /// Return the node behind a handle if it holds an entry.
    fn live_node(&self, node: NodeIndex<Ix>) -> Option<&Node<K, V, Ix>> {
        if node.is_sentinel() {
            return None;
        }
        self.nodes.get(node.index()).filter(|n| !n.is_vacant())
    }
}

impl<K, V, C, Ix> TreeMap<K, V, C, Ix>
where
    C: Comparator<K>,
    Ix: IndexType,
{
    /// Descend from the root to the node holding the key, or to the parent a new node would hang from.
    pub(crate) fn search_slot(&self, key: &K) -> Slot<Ix> {
        let mut parent = NodeIndex::sentinel();
        let mut ord = Ordering::Equal;
        let mut x = self.root;
        while !x.is_sentinel() {
            parent = x;
            ord = self.cmp.compare(key, self.node_ref(x, Node::key));
            x = match ord {
                Ordering::Equal => return Slot::Occupied(x),
                Ordering::Less => self.node_ref(x, Node::left),
                Ordering::Greater => self.node_ref(x, Node::right),
            };
        }
        Slot::Vacant { parent, ord }
    }

    /// Link a new node below `parent` on the side given by `ord` and rebalance.
    pub(crate) fn link_new(
        &mut self,
        parent: NodeIndex<Ix>,
        ord: Ordering,
        key: K,
        value: V,
    ) -> Result<NodeIndex<Ix>, AllocError> {
        let z = self.alloc_node(key, value)?;
        self.node_mut(z, Node::set_parent(parent));
        if parent.is_sentinel() {
            self.root = z;
        } else if ord == Ordering::Less {
            self.node_mut(parent, Node::set_left(z));
        } else {
            self.node_mut(parent, Node::set_right(z));
        }

        self.insert_fixup(z);

        self.len += 1;
        Ok(z)
    }
}

impl<K, V, C, Ix> TreeMap<K, V, C, Ix>
where
    Ix: IndexType,
{
    /// Unlink a node from the tree.
    ///
    /// With two children the successor `y` takes over `z`'s position and color;
    /// `y` keeps its own slot, so handles to it stay valid.
    fn remove_inner(&mut self, z: NodeIndex<Ix>) {
        let mut y_orig_color = self.node_ref(z, Node::color);
        let x;
        if self.node_ref(z, Node::left).is_sentinel() {
            x = self.node_ref(z, Node::right);
            self.transplant(z, x);
        } else if self.node_ref(z, Node::right).is_sentinel() {
            x = self.node_ref(z, Node::left);
            self.transplant(z, x);
        } else {
            let y = self.tree_minimum(self.node_ref(z, Node::right));
            y_orig_color = self.node_ref(y, Node::color);
            x = self.node_ref(y, Node::right);
            if self.node_ref(y, Node::parent) == z {
                self.node_mut(x, Node::set_parent(y));
            } else {
                self.transplant(y, x);
                self.node_mut(y, Node::set_right(self.node_ref(z, Node::right)));
                self.right_mut(y, Node::set_parent(y));
            }
            self.transplant(z, y);
            self.node_mut(y, Node::set_left(self.node_ref(z, Node::left)));
            self.left_mut(y, Node::set_parent(y));
            self.node_mut(y, Node::set_color(self.node_ref(z, Node::color)));
        }

        if y_orig_color == Color::Black {
            self.remove_fixup(x);
        }
        // the sentinel's parent only matters during the fixup
        self.node_mut(NodeIndex::sentinel(), Node::set_parent(NodeIndex::sentinel()));

        self.len -= 1;
    }

    /// Restore red-black tree properties after an insert.
    fn insert_fixup(&mut self, mut z: NodeIndex<Ix>) {
        while self.parent_ref(z, Node::is_red) {
            if self.grand_parent(z).is_sentinel() {
                break;
            }
            if self.is_left_child(self.node_ref(z, Node::parent)) {
                let y = self.grand_parent_ref(z, Node::right);
                if self.node_ref(y, Node::is_red) {
                    self.parent_mut(z, Node::set_color(Color::Black));
                    self.node_mut(y, Node::set_color(Color::Black));
                    self.grand_parent_mut(z, Node::set_color(Color::Red));
                    z = self.grand_parent(z);
                } else {
                    if self.is_right_child(z) {
                        z = self.node_ref(z, Node::parent);
                        self.left_rotate(z);
                    }
                    self.parent_mut(z, Node::set_color(Color::Black));
                    self.grand_parent_mut(z, Node::set_color(Color::Red));
                    self.right_rotate(self.grand_parent(z));
                }
            } else {
                let y = self.grand_parent_ref(z, Node::left);
                if self.node_ref(y, Node::is_red) {
                    self.parent_mut(z, Node::set_color(Color::Black));
                    self.node_mut(y, Node::set_color(Color::Black));
                    self.grand_parent_mut(z, Node::set_color(Color::Red));
                    z = self.grand_parent(z);
                } else {
                    if self.is_left_child(z) {
                        z = self.node_ref(z, Node::parent);
                        self.right_rotate(z);
                    }
                    self.parent_mut(z, Node::set_color(Color::Black));
                    self.grand_parent_mut(z, Node::set_color(Color::Red));
                    self.left_rotate(self.grand_parent(z));
                }
            }
        }
        self.node_mut(self.root, Node::set_color(Color::Black));
    }

    /// Restore red-black tree properties after a remove.
    ///
    /// `x` may be the sentinel, whose parent was pointed at the vacated position.
    fn remove_fixup(&mut self, mut x: NodeIndex<Ix>) {
        while x != self.root && self.node_ref(x, Node::is_black) {
            let mut w;
            if self.is_left_child(x) {
                w = self.parent_ref(x, Node::right);
                if self.node_ref(w, Node::is_red) {
                    self.node_mut(w, Node::set_color(Color::Black));
                    self.parent_mut(x, Node::set_color(Color::Red));
                    self.left_rotate(self.node_ref(x, Node::parent));
                    w = self.parent_ref(x, Node::right);
                }
                if w.is_sentinel() {
                    break;
                }
                if self.left_ref(w, Node::is_black) && self.right_ref(w, Node::is_black) {
                    self.node_mut(w, Node::set_color(Color::Red));
                    x = self.node_ref(x, Node::parent);
                } else {
                    if self.right_ref(w, Node::is_black) {
                        self.left_mut(w, Node::set_color(Color::Black));
                        self.node_mut(w, Node::set_color(Color::Red));
                        self.right_rotate(w);
                        w = self.parent_ref(x, Node::right);
                    }
                    self.node_mut(w, Node::set_color(self.parent_ref(x, Node::color)));
                    self.parent_mut(x, Node::set_color(Color::Black));
                    self.right_mut(w, Node::set_color(Color::Black));
                    self.left_rotate(self.node_ref(x, Node::parent));
                    x = self.root;
                }
            } else {
                w = self.parent_ref(x, Node::left);
                if self.node_ref(w, Node::is_red) {
                    self.node_mut(w, Node::set_color(Color::Black));
                    self.parent_mut(x, Node::set_color(Color::Red));
                    self.right_rotate(self.node_ref(x, Node::parent));
                    w = self.parent_ref(x, Node::left);
                }
                if w.is_sentinel() {
                    break;
                }
                if self.right_ref(w, Node::is_black) && self.left_ref(w, Node::is_black) {
                    self.node_mut(w, Node::set_color(Color::Red));
                    x = self.node_ref(x, Node::parent);
                } else {
                    if self.left_ref(w, Node::is_black) {
                        self.right_mut(w, Node::set_color(Color::Black));
                        self.node_mut(w, Node::set_color(Color::Red));
                        self.left_rotate(w);
                        w = self.parent_ref(x, Node::left);
                    }
                    self.node_mut(w, Node::set_color(self.parent_ref(x, Node::color)));
                    self.parent_mut(x, Node::set_color(Color::Black));
                    self.left_mut(w, Node::set_color(Color::Black));
                    self.right_rotate(self.node_ref(x, Node::parent));
                    x = self.root;
                }
            }
        }
        self.node_mut(x, Node::set_color(Color::Black));
    }

    /// Binary tree left rotate.
    fn left_rotate(&mut self, x: NodeIndex<Ix>) {
        if self.node_ref(x, Node::right).is_sentinel() {
            return;
        }
        let y = self.node_ref(x, Node::right);
        self.node_mut(x, Node::set_right(self.node_ref(y, Node::left)));
        if !self.node_ref(y, Node::left).is_sentinel() {
            self.left_mut(y, Node::set_parent(x));
        }

        self.replace_parent(x, y);
        self.node_mut(y, Node::set_left(x));
    }

    /// Binary tree right rotate.
    fn right_rotate(&mut self, x: NodeIndex<Ix>) {
        if self.node_ref(x, Node::left).is_sentinel() {
            return;
        }
        let y = self.node_ref(x, Node::left);
        self.node_mut(x, Node::set_left(self.node_ref(y, Node::right)));
        if !self.node_ref(y, Node::right).is_sentinel() {
            self.right_mut(y, Node::set_parent(x));
        }

        self.replace_parent(x, y);
        self.node_mut(y, Node::set_right(x));
    }

    /// Replace parent during a rotation.
    fn replace_parent(&mut self, x: NodeIndex<Ix>, y: NodeIndex<Ix>) {
        self.node_mut(y, Node::set_parent(self.node_ref(x, Node::parent)));
        if self.node_ref(x, Node::parent).is_sentinel() {
            self.root = y;
        } else if self.is_left_child(x) {
            self.parent_mut(x, Node::set_left(y));
        } else {
            self.parent_mut(x, Node::set_right(y));
        }
        self.node_mut(x, Node::set_parent(y));
    }

    /// Find the node with the minimum key.
    fn tree_minimum(&self, mut x: NodeIndex<Ix>) -> NodeIndex<Ix> {
        while !self.node_ref(x, Node::left).is_sentinel() {
            x = self.node_ref(x, Node::left);
        }
        x
    }

    /// Find the node with the maximum key.
    fn tree_maximum(&self, mut x: NodeIndex<Ix>) -> NodeIndex<Ix> {
        while !self.node_ref(x, Node::right).is_sentinel() {
            x = self.node_ref(x, Node::right);
        }
        x
    }

    /// In-order successor of a linked node.
    pub(crate) fn successor(&self, mut x: NodeIndex<Ix>) -> Option<NodeIndex<Ix>> {
        let right = self.node_ref(x, Node::right);
        if !right.is_sentinel() {
            return Some(self.tree_minimum(right));
        }
        let mut p = self.node_ref(x, Node::parent);
        while !p.is_sentinel() && self.node_ref(p, Node::right) == x {
            x = p;
            p = self.node_ref(p, Node::parent);
        }
        (!p.is_sentinel()).then_some(p)
    }

    /// In-order predecessor of a linked node.
    pub(crate) fn predecessor(&self, mut x: NodeIndex<Ix>) -> Option<NodeIndex<Ix>> {
        let left = self.node_ref(x, Node::left);
        if !left.is_sentinel() {
            return Some(self.tree_maximum(left));
        }
        let mut p = self.node_ref(x, Node::parent);
        while !p.is_sentinel() && self.node_ref(p, Node::left) == x {
            x = p;
            p = self.node_ref(p, Node::parent);
        }
        (!p.is_sentinel()).then_some(p)
    }

    /// Replace one subtree as a child of its parent with another subtree.
    fn transplant(&mut self, u: NodeIndex<Ix>, v: NodeIndex<Ix>) {
        if self.node_ref(u, Node::parent).is_sentinel() {
            self.root = v;
        } else if self.is_left_child(u) {
            self.parent_mut(u, Node::set_left(v));
        } else {
            self.parent_mut(u, Node::set_right(v));
        }
        self.node_mut(v, Node::set_parent(self.node_ref(u, Node::parent)));
    }

    /// Check if a node is a left child of its parent.
    fn is_left_child(&self, node: NodeIndex<Ix>) -> bool {
        self.parent_ref(node, Node::left) == node
    }

    /// Check if a node is a right child of its parent.
    fn is_right_child(&self, node: NodeIndex<Ix>) -> bool {
        self.parent_ref(node, Node::right) == node
    }

    fn grand_parent(&self, node: NodeIndex<Ix>) -> NodeIndex<Ix> {
        self.parent_ref(node, Node::parent)
    }
}

// Convenient methods for reference or mutate current/parent/left/right node
impl<'a, K, V, C, Ix> TreeMap<K, V, C, Ix>
where
    Ix: IndexType,
{
    pub(crate) fn node_ref<F, R>(&'a self, node: NodeIndex<Ix>, op: F) -> R
    where
        R: 'a,
        F: FnOnce(&'a Node<K, V, Ix>) -> R,
    {
        op(&self.nodes[node.index()])
    }

    pub(crate) fn node_mut<F, R>(&'a mut self, node: NodeIndex<Ix>, op: F) -> R
    where
        R: 'a,
        F: FnOnce(&'a mut Node<K, V, Ix>) -> R,
    {
        op(&mut self.nodes[node.index()])
    }

    pub(crate) fn left_ref<F, R>(&'a self, node: NodeIndex<Ix>, op: F) -> R
    where
        R: 'a,
        F: FnOnce(&'a Node<K, V, Ix>) -> R,
    {
        let idx = self.nodes[node.index()].left().index();
        op(&self.nodes[idx])
    }

    pub(crate) fn right_ref<F, R>(&'a self, node: NodeIndex<Ix>, op: F) -> R
    where
        R: 'a,
        F: FnOnce(&'a Node<K, V, Ix>) -> R,
    {
        let idx = self.nodes[node.index()].right().index();
        op(&self.nodes[idx])
    }

    fn parent_ref<F, R>(&'a self, node: NodeIndex<Ix>, op: F) -> R
    where
        R: 'a,
        F: FnOnce(&'a Node<K, V, Ix>) -> R,
    {
        let idx = self.nodes[node.index()].parent().index();
        op(&self.nodes[idx])
    }

    fn grand_parent_ref<F, R>(&'a self, node: NodeIndex<Ix>, op: F) -> R
    where
        R: 'a,
        F: FnOnce(&'a Node<K, V, Ix>) -> R,
    {
        let parent_idx = self.nodes[node.index()].parent().index();
        let grand_parent_idx = self.nodes[parent_idx].parent().index();
        op(&self.nodes[grand_parent_idx])
    }

    fn left_mut<F, R>(&'a mut self, node: NodeIndex<Ix>, op: F) -> R
    where
        R: 'a,
        F: FnOnce(&'a mut Node<K, V, Ix>) -> R,
    {
        let idx = self.nodes[node.index()].left().index();
        op(&mut self.nodes[idx])
    }

    fn right_mut<F, R>(&'a mut self, node: NodeIndex<Ix>, op: F) -> R
    where
        R: 'a,
        F: FnOnce(&'a mut Node<K, V, Ix>) -> R,
    {
        let idx = self.nodes[node.index()].right().index();
        op(&mut self.nodes[idx])
    }

    fn parent_mut<F, R>(&'a mut self, node: NodeIndex<Ix>, op: F) -> R
    where
        R: 'a,
        F: FnOnce(&'a mut Node<K, V, Ix>) -> R,
    {
        let idx = self.nodes[node.index()].parent().index();
        op(&mut self.nodes[idx])
    }

    fn grand_parent_mut<F, R>(&'a mut self, node: NodeIndex<Ix>, op: F) -> R
    where
        R: 'a,
        F: FnOnce(&'a mut Node<K, V, Ix>) -> R,
    {
        let parent_idx = self.nodes[node.index()].parent().index();
        let grand_parent_idx = self.nodes[parent_idx].parent().index();
        op(&mut self.nodes[grand_parent_idx])
    }
}

impl<K, V, C, Ix> fmt::Debug for TreeMap<K, V, C, Ix>
where
    K: fmt::Debug,
    V: fmt::Debug,
    Ix: IndexType,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K, V, C, Ix> PartialEq for TreeMap<K, V, C, Ix>
where
    K: PartialEq,
    V: PartialEq,
    Ix: IndexType,
{
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<K, V, C, Ix> Eq for TreeMap<K, V, C, Ix>
where
    K: Eq,
    V: Eq,
    Ix: IndexType,
{
}

impl<K, V, C, Ix> Index<&K> for TreeMap<K, V, C, Ix>
where
    C: Comparator<K>,
    Ix: IndexType,
{
    type Output = V;

    /// # Panics
    ///
    /// Panics if the key is not present in the map.
    #[inline]
    fn index(&self, key: &K) -> &V {
        self.get(key).expect("no entry found for key")
    }
}

impl<K, V> FromIterator<(K, V)> for TreeMap<K, V>
where
    K: Ord,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut map = TreeMap::new();
        map.extend(iter);
        map
    }
}

impl<K, V, C, Ix> Extend<(K, V)> for TreeMap<K, V, C, Ix>
where
    C: Comparator<K>,
    Ix: IndexType,
{
    #[inline]
    fn extend<T: IntoIterator<Item = (K, V)>>(&mut self, iter: T) {
        for (k, v) in iter {
            let _ignore = self.insert(k, v);
        }
    }
}

impl<K, V, C, Ix> IntoIterator for TreeMap<K, V, C, Ix>
where
    Ix: IndexType,
{
    type Item = (K, V);
    type IntoIter = IntoIter<K, V, C, Ix>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        IntoIter::new(self)
    }
}

impl<'a, K, V, C, Ix> IntoIterator for &'a TreeMap<K, V, C, Ix>
where
    Ix: IndexType,
{
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V, C, Ix>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
