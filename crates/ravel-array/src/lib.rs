//! Growable contiguous array over an injected allocator.
//!
//! [`DynamicArray<T, A>`](DynamicArray) is an owning sequence of `T` whose
//! storage, element construction and element destruction are all
//! delegated to an [`Allocator`](ravel_alloc::Allocator). Swapping the
//! allocator (process heap, bump arena, budgeted or instrumented) changes
//! memory policy without touching container logic.
//!
//! # Capacity policy
//!
//! - **Appends** (`push_back`, `push_within`, `extend`) grow geometrically
//!   through [`next_capacity`]: 0 → 1 → 2 → 4 → …
//! - **Explicit operations** (`resize`, `reserve`, `shrink_to_fit`)
//!   reallocate to exactly the requested number of slots.
//! - Nothing shrinks implicitly: `pop_back` and `truncate` keep the buffer.
//!
//! # Example
//!
//! ```
//! use ravel_array::DynamicArray;
//!
//! let mut array = DynamicArray::new();
//! array.push_back(1);
//! array.push_back(2);
//! array.push_back(3);
//! assert_eq!(array.len(), 3);
//! assert_eq!(array.capacity(), 4);
//!
//! assert_eq!(array.pop_back(), Some(3));
//! assert_eq!(array, [1, 2]);
//! assert_eq!(array.capacity(), 4);
//! ```
//!
//! # Unsafe code
//!
//! Raw slot handling lives in the private `raw` module; the container
//! and its iterator use it under the invariant that exactly the slots
//! `[0, len)` are initialized.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(unsafe_op_in_unsafe_fn)]

pub mod array;
pub mod growth;
mod impls;
pub mod iter;
mod raw;

// Public re-exports for the primary API surface.
pub use array::DynamicArray;
pub use growth::next_capacity;
pub use iter::IntoIter;
pub use ravel_alloc::{AllocError, Allocator, Global};
