//! Ravel: growable arrays over injectable allocators.
//!
//! This is the top-level facade crate that re-exports the public API from
//! the Ravel sub-crates. For most users, adding `ravel` as a single
//! dependency is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use ravel::prelude::*;
//!
//! // Process allocator, geometric growth on append.
//! let mut array = DynamicArray::new();
//! for i in 0..5 {
//!     array.push_back(i);
//! }
//! assert_eq!(array.capacity(), 8);
//! array.shrink_to_fit();
//! assert_eq!(array.capacity(), 5);
//!
//! // The same container over a bounded arena.
//! let arena = BumpArena::new(ArenaConfig::new(1024)).unwrap();
//! let mut scratch: DynamicArray<u64, _> = DynamicArray::new_in(&arena);
//! scratch.resize(16);
//! assert!(arena.used() >= 16 * 8);
//!
//! // Exhaustion is an error on the `try_*` path.
//! let budget = BudgetAllocator::new(8);
//! let mut small: DynamicArray<u64, _> = DynamicArray::new_in(&budget);
//! assert!(small.try_push_back(1).is_ok());
//! assert!(matches!(
//!     small.try_push_back(2),
//!     Err(AllocError::BudgetExceeded { .. })
//! ));
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`alloc`] | `ravel-alloc` | `Allocator` trait, stock allocators, errors, arena config |
//! | [`array`] | `ravel-array` | `DynamicArray`, its iterator, growth policy |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Allocator contract and stock allocators (`ravel-alloc`).
///
/// Implement [`alloc::Allocator`] to plug a custom memory policy into any
/// Ravel container. Shipped allocators: [`alloc::Global`],
/// [`alloc::BumpArena`], [`alloc::CountingAllocator`] and
/// [`alloc::BudgetAllocator`].
pub use ravel_alloc as alloc;

/// The growable array (`ravel-array`).
///
/// [`array::DynamicArray`] and its owning iterator [`array::IntoIter`];
/// [`array::next_capacity`] exposes the append growth policy.
pub use ravel_array as array;

/// Common imports for typical Ravel usage.
///
/// ```rust
/// use ravel::prelude::*;
/// ```
pub mod prelude {
    // Container
    pub use ravel_array::DynamicArray;

    // Allocators
    pub use ravel_alloc::{
        AllocStats, Allocator, ArenaConfig, BudgetAllocator, BumpArena, CountingAllocator, Global,
    };

    // Errors
    pub use ravel_alloc::{AllocError, ArenaError};
}
