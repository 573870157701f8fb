use std::fmt;
use std::hash::Hash;

pub type DefaultIx = u32;

/// Integer types usable as node indices.
///
/// # Safety
///
/// `new` and `index` must round-trip every value below `max()`.
pub unsafe trait IndexType: Copy + Default + Hash + Ord + fmt::Debug + 'static {
    fn new(x: usize) -> Self;
    fn index(&self) -> usize;
    fn max() -> Self;
}

unsafe impl IndexType for u16 {
    #[inline(always)]
    fn new(x: usize) -> Self {
        x as u16
    }
    #[inline(always)]
    fn index(&self) -> usize {
        *self as usize
    }
    #[inline(always)]
    fn max() -> Self {
        u16::MAX
    }
}

unsafe impl IndexType for u32 {
    #[inline(always)]
    fn new(x: usize) -> Self {
        x as u32
    }
    #[inline(always)]
    fn index(&self) -> usize {
        *self as usize
    }
    #[inline(always)]
    fn max() -> Self {
        u32::MAX
    }
}

unsafe impl IndexType for usize {
    #[inline(always)]
    fn new(x: usize) -> Self {
        x
    }
    #[inline(always)]
    fn index(&self) -> usize {
        *self
    }
    #[inline(always)]
    fn max() -> Self {
        usize::MAX
    }
}

/// Handle to a node slot of a `TreeMap`.
///
/// A handle keeps pointing at the same entry while other keys are inserted
/// or removed. Once its own entry is removed the handle is stale, and the
/// slot may later be reused by another key.
#[derive(Copy, Clone, Default, PartialEq, PartialOrd, Eq, Ord, Hash)]
pub struct NodeIndex<Ix = DefaultIx>(Ix);

impl<Ix: IndexType> NodeIndex<Ix> {
    #[inline]
    pub fn new(x: usize) -> Self {
        NodeIndex(IndexType::new(x))
    }

    #[inline]
    pub fn index(self) -> usize {
        self.0.index()
    }

    #[inline]
    pub fn end() -> Self {
        NodeIndex(IndexType::max())
    }

    /// The sentinel stands in for every absent child and for the root's parent.
    #[inline]
    pub(crate) fn sentinel() -> Self {
        NodeIndex::new(0)
    }

    #[inline]
    pub(crate) fn is_sentinel(self) -> bool {
        self.index() == 0
    }
}

impl<Ix: fmt::Debug> fmt::Debug for NodeIndex<Ix> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "NodeIndex({:?})", self.0)
    }
}
