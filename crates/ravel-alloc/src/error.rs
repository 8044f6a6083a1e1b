//! Allocation and configuration error types.

use std::error::Error;
use std::fmt;

/// Errors an [`Allocator`](crate::Allocator) can report for a request.
///
/// Allocation failure is never recovered from inside a container: the
/// fallible `try_*` operations hand it back to the caller, and the
/// infallible ones panic with its message.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AllocError {
    /// The element count does not fit in a valid `Layout`
    /// (`count * size_of::<T>()` overflows `isize::MAX`).
    CapacityOverflow {
        /// Number of elements requested.
        count: usize,
        /// Size of one element in bytes.
        elem_size: usize,
    },
    /// The process allocator returned null.
    OutOfMemory {
        /// Number of bytes requested.
        requested: usize,
        /// Requested alignment in bytes.
        align: usize,
    },
    /// A bump arena has no room left for the request.
    ArenaExhausted {
        /// Number of bytes requested.
        requested: usize,
        /// Bytes still free in the arena (before alignment padding).
        remaining: usize,
    },
    /// A budgeted allocator would exceed its byte limit.
    BudgetExceeded {
        /// Number of bytes requested.
        requested: usize,
        /// Bytes left in the budget.
        remaining: usize,
    },
}

impl AllocError {
    /// Number of bytes (or elements, for overflow) the failing request asked for.
    pub fn requested(&self) -> usize {
        match self {
            Self::CapacityOverflow { count, .. } => *count,
            Self::OutOfMemory { requested, .. }
            | Self::ArenaExhausted { requested, .. }
            | Self::BudgetExceeded { requested, .. } => *requested,
        }
    }
}

impl fmt::Display for AllocError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CapacityOverflow { count, elem_size } => {
                write!(
                    f,
                    "capacity overflow: {count} elements of {elem_size} bytes exceed the address space"
                )
            }
            Self::OutOfMemory { requested, align } => {
                write!(
                    f,
                    "out of memory: failed to allocate {requested} bytes (align {align})"
                )
            }
            Self::ArenaExhausted {
                requested,
                remaining,
            } => {
                write!(
                    f,
                    "arena exhausted: requested {requested} bytes, {remaining} bytes remaining"
                )
            }
            Self::BudgetExceeded {
                requested,
                remaining,
            } => {
                write!(
                    f,
                    "allocation budget exceeded: requested {requested} bytes, {remaining} bytes remaining"
                )
            }
        }
    }
}

impl Error for AllocError {}

/// Errors from building a [`BumpArena`](crate::BumpArena).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ArenaError {
    /// Backing block alignment is zero or not a power of two.
    InvalidAlignment {
        /// The rejected alignment.
        align: usize,
    },
    /// Capacity rounded up to the alignment does not fit in `isize`.
    CapacityTooLarge {
        /// The rejected capacity in bytes.
        capacity_bytes: usize,
    },
    /// The process allocator could not supply the backing block.
    BackingAllocation(AllocError),
}

impl fmt::Display for ArenaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidAlignment { align } => {
                write!(f, "arena alignment {align} is not a power of two")
            }
            Self::CapacityTooLarge { capacity_bytes } => {
                write!(f, "arena capacity {capacity_bytes} bytes is too large")
            }
            Self::BackingAllocation(err) => {
                write!(f, "failed to allocate arena block: {err}")
            }
        }
    }
}

impl Error for ArenaError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::BackingAllocation(err) => Some(err),
            _ => None,
        }
    }
}

impl From<AllocError> for ArenaError {
    fn from(err: AllocError) -> Self {
        Self::BackingAllocation(err)
    }
}
