use std::collections::TryReserveError;
use std::error::Error;
use std::fmt;

/// Creating a node for a new key failed. The map is left unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum AllocError {
    /// The index type cannot address another node.
    IndexOverflow,
    /// Node storage could not grow.
    OutOfMemory(TryReserveError),
}

impl fmt::Display for AllocError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AllocError::IndexOverflow => write!(f, "tree is at the maximum number of nodes for its index"),
            AllocError::OutOfMemory(_) => write!(f, "failed to allocate a tree node"),
        }
    }
}

impl Error for AllocError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            AllocError::IndexOverflow => None,
            AllocError::OutOfMemory(err) => Some(err),
        }
    }
}

impl From<TryReserveError> for AllocError {
    #[inline]
    fn from(err: TryReserveError) -> Self {
        AllocError::OutOfMemory(err)
    }
}
