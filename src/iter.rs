use std::fmt;
use std::iter::FusedIterator;

use crate::index::{IndexType, NodeIndex};
use crate::node::Node;
use crate::treemap::TreeMap;

/// An iterator over the entries of a `TreeMap`.
///
/// Walks the parent links from both ends, so it holds no stack.
pub struct Iter<'a, K, V, C, Ix> {
    /// Reference to the map
    pub(crate) map_ref: &'a TreeMap<K, V, C, Ix>,
    /// Next node from the front
    pub(crate) front: Option<NodeIndex<Ix>>,
    /// Next node from the back
    pub(crate) back: Option<NodeIndex<Ix>>,
}

impl<'a, K, V, C, Ix> Iter<'a, K, V, C, Ix>
where
    Ix: IndexType,
{
    pub(crate) fn new(map_ref: &'a TreeMap<K, V, C, Ix>) -> Self {
        Self::between(map_ref, map_ref.min(), map_ref.max())
    }

    /// Iterate the nodes from `front` to `back`, both inclusive.
    pub(crate) fn between(
        map_ref: &'a TreeMap<K, V, C, Ix>,
        front: Option<NodeIndex<Ix>>,
        back: Option<NodeIndex<Ix>>,
    ) -> Self {
        Iter {
            map_ref,
            front,
            back: front.and(back),
        }
    }

    fn finish(&mut self) {
        self.front = None;
        self.back = None;
    }
}

impl<K, V, C, Ix> Clone for Iter<'_, K, V, C, Ix>
where
    Ix: IndexType,
{
    fn clone(&self) -> Self {
        Iter {
            map_ref: self.map_ref,
            front: self.front,
            back: self.back,
        }
    }
}

impl<'a, K, V, C, Ix> Iterator for Iter<'a, K, V, C, Ix>
where
    Ix: IndexType,
{
    type Item = (&'a K, &'a V);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let x = self.front?;
        if self.front == self.back {
            self.finish();
        } else {
            self.front = self.map_ref.successor(x);
        }
        Some(self.map_ref.node_ref(x, |xn| (xn.key(), xn.value())))
    }
}

impl<K, V, C, Ix> DoubleEndedIterator for Iter<'_, K, V, C, Ix>
where
    Ix: IndexType,
{
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        let x = self.back?;
        if self.front == self.back {
            self.finish();
        } else {
            self.back = self.map_ref.predecessor(x);
        }
        Some(self.map_ref.node_ref(x, |xn| (xn.key(), xn.value())))
    }
}

impl<K, V, C, Ix> FusedIterator for Iter<'_, K, V, C, Ix> where Ix: IndexType {}

impl<K, V, C, Ix> fmt::Debug for Iter<'_, K, V, C, Ix>
where
    K: fmt::Debug,
    V: fmt::Debug,
    Ix: IndexType,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}

/// An iterator over the keys of a `TreeMap`.
pub struct Keys<'a, K, V, C, Ix> {
    pub(crate) inner: Iter<'a, K, V, C, Ix>,
}

impl<'a, K, V, C, Ix> Iterator for Keys<'a, K, V, C, Ix>
where
    Ix: IndexType,
{
    type Item = &'a K;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(k, _)| k)
    }
}

impl<K, V, C, Ix> fmt::Debug for Keys<'_, K, V, C, Ix>
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

impl<K, V, C, Ix> DoubleEndedIterator for Keys<'_, K, V, C, Ix>
where
    Ix: IndexType,
{
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|(k, _)| k)
    }
}

/// An iterator over the values of a `TreeMap`.
pub struct Values<'a, K, V, C, Ix> {
    pub(crate) inner: Iter<'a, K, V, C, Ix>,
}

impl<'a, K, V, C, Ix> Iterator for Values<'a, K, V, C, Ix>
where
    Ix: IndexType,
{
    type Item = &'a V;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(_, v)| v)
    }
}

impl<K, V, C, Ix> fmt::Debug for Values<'_, K, V, C, Ix>
where
    V: fmt::Debug,
    Ix: IndexType,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.inner.clone().map(|(_, v)| v))
            .finish()
    }
}

impl<K, V, C, Ix> DoubleEndedIterator for Values<'_, K, V, C, Ix>
where
    Ix: IndexType,
{
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|(_, v)| v)
    }
}

/// An into iterator over the entries of a `TreeMap`.
pub struct IntoIter<K, V, C, Ix> {
    tree_map: TreeMap<K, V, C, Ix>,
    front: Option<NodeIndex<Ix>>,
    back: Option<NodeIndex<Ix>>,
}

impl<K, V, C, Ix> IntoIter<K, V, C, Ix>
where
    Ix: IndexType,
{
    pub(crate) fn new(tree_map: TreeMap<K, V, C, Ix>) -> Self {
        let front = tree_map.min();
        let back = tree_map.max();
        IntoIter {
            tree_map,
            front,
            back,
        }
    }

    /// Moves the entry out. Links are left in place so the walk can go on.
    fn take(&mut self, x: NodeIndex<Ix>) -> (K, V) {
        self.tree_map.node_mut(x, Node::take_entry)
    }
}

impl<K, V, C, Ix> Iterator for IntoIter<K, V, C, Ix>
where
    Ix: IndexType,
{
    type Item = (K, V);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let x = self.front?;
        if self.front == self.back {
            self.front = None;
            self.back = None;
        } else {
            self.front = self.tree_map.successor(x);
        }
        Some(self.take(x))
    }
}

impl<K, V, C, Ix> DoubleEndedIterator for IntoIter<K, V, C, Ix>
where
    Ix: IndexType,
{
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        let x = self.back?;
        if self.front == self.back {
            self.front = None;
            self.back = None;
        } else {
            self.back = self.tree_map.predecessor(x);
        }
        Some(self.take(x))
    }
}

impl<K, V, C, Ix> FusedIterator for IntoIter<K, V, C, Ix> where Ix: IndexType {}

impl<K, V, C, Ix> fmt::Debug for IntoIter<K, V, C, Ix>
where
    K: fmt::Debug,
    V: fmt::Debug,
    Ix: IndexType,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let remaining = Iter::between(&self.tree_map, self.front, self.back);
        f.debug_list().entries(remaining).finish()
    }
}
