use crate::index::{IndexType, NodeIndex};

/// Node of the red-black tree
#[derive(Debug, Clone)]
pub struct Node<K, V, Ix> {
    /// Left children
    pub left: NodeIndex<Ix>,
    /// Right children
    pub right: NodeIndex<Ix>,
    /// Parent, never followed to drop anything
    pub parent: NodeIndex<Ix>,
    /// Color of the node
    pub color: Color,

    /// Key of the node, `None` for the sentinel and vacant slots
    pub key: Option<K>,
    /// Value of the node
    pub value: Option<V>,
}

// Convenient getter/setter methods
impl<K, V, Ix> Node<K, V, Ix>
where
    Ix: IndexType,
{
    pub fn color(&self) -> Color {
        self.color
    }

    pub fn left(&self) -> NodeIndex<Ix> {
        self.left
    }

    pub fn right(&self) -> NodeIndex<Ix> {
        self.right
    }

    pub fn parent(&self) -> NodeIndex<Ix> {
        self.parent
    }

    /// Panics on the sentinel; only called on linked nodes.
    pub fn key(&self) -> &K {
        self.key.as_ref().unwrap()
    }

    pub fn value(&self) -> &V {
        self.value.as_ref().unwrap()
    }

    pub fn value_mut(&mut self) -> &mut V {
        self.value.as_mut().unwrap()
    }

    pub fn entry(&self) -> (&K, &V) {
        (self.key(), self.value())
    }

    /// Whether the slot holds no entry.
    pub fn is_vacant(&self) -> bool {
        self.key.is_none()
    }

    pub fn is_black(&self) -> bool {
        matches!(self.color, Color::Black)
    }

    pub fn is_red(&self) -> bool {
        matches!(self.color, Color::Red)
    }

    pub fn set_value(value: V) -> impl FnOnce(&mut Node<K, V, Ix>) -> V {
        move |node: &mut Node<K, V, Ix>| node.value.replace(value).unwrap()
    }

    pub fn set_color(color: Color) -> impl FnOnce(&mut Node<K, V, Ix>) {
        move |node: &mut Node<K, V, Ix>| {
            node.color = color;
        }
    }

    pub fn set_left(left: NodeIndex<Ix>) -> impl FnOnce(&mut Node<K, V, Ix>) {
        move |node: &mut Node<K, V, Ix>| {
            node.left = left;
        }
    }

    pub fn set_right(right: NodeIndex<Ix>) -> impl FnOnce(&mut Node<K, V, Ix>) {
        move |node: &mut Node<K, V, Ix>| {
            node.right = right;
        }
    }

    pub fn set_parent(parent: NodeIndex<Ix>) -> impl FnOnce(&mut Node<K, V, Ix>) {
        move |node: &mut Node<K, V, Ix>| {
            node.parent = parent;
        }
    }

    /// Moves the entry out, leaving a vacant slot behind.
    pub fn take_entry(&mut self) -> (K, V) {
        (self.key.take().unwrap(), self.value.take().unwrap())
    }
}

/// The color of the node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    /// Red node
    Red,
    /// Black node
    Black,
}
