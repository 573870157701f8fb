//! `rb_tree_map` is an ordered map and set based on red-black tree.
//!
//! It fully implements the insertion and deletion functionality of a red-black tree,
//! ensuring that each modification operation requires at most O(logN) time complexity.
//! Besides exact lookups it answers lower-bound queries and walks the keys in
//! order in both directions.
//!
//! Nodes live in an arena and refer to each other through array indices, parent links
//! included. A [`NodeIndex`] returned by [`TreeMap::find`], [`TreeMap::lower_bound`],
//! [`TreeMap::min`] or [`TreeMap::max`] keeps pointing at the same entry while other
//! keys come and go, so a caller can step with [`TreeMap::next`] and [`TreeMap::prev`]
//! and remove the entry it is standing on once the neighbour has been captured.
//!
//! Keys are ordered by a [`Comparator`], which is `Ord` unless one is supplied.
//!
//! # Example
//!
//! ```rust
//! use rb_tree_map::TreeMap;
//!
//! let mut map = TreeMap::new();
//! for k in [20, 10, 30, 5, 15, 25, 35] {
//!     map.insert(k, k * 10);
//! }
//! assert_eq!(map.get(&15), Some(&150));
//! assert_eq!(map.lower_bound_entry(&12), Some((&15, &150)));
//! assert_eq!(map.first_key_value(), Some((&5, &50)));
//! ```
//!

mod compare;
mod entry;
mod error;
mod index;
mod iter;
mod node;
mod set;
mod treemap;

#[cfg(test)]
mod proptests;
#[cfg(test)]
mod tests;

pub use compare::{Comparator, OrdComparator, ReverseComparator};
pub use entry::{Entry, OccupiedEntry, VacantEntry};
pub use error::AllocError;
pub use index::{DefaultIx, IndexType, NodeIndex};
pub use iter::{IntoIter, Iter, Keys, Values};
pub use set::{IntoIter as SetIntoIter, Iter as SetIter, TreeSet};
pub use treemap::TreeMap;
