//! Allocator capability contract and stock allocators for Ravel containers.
//!
//! A container never allocates on its own: it asks an injected
//! [`Allocator`] for raw storage and for in-place construction and
//! destruction of elements. This crate defines that contract and the
//! allocators shipped with it.
//!
//! # Allocators
//!
//! ```text
//! Allocator (trait)
//! ├── Global               process allocator, the default
//! ├── BumpArena            one fixed block, cursor bump, bulk reset
//! ├── CountingAllocator<A> records AllocStats, forwards to A
//! ├── BudgetAllocator<A>   caps live bytes, forwards to A
//! └── &A                   any allocator, shared by reference
//! ```
//!
//! # Failure
//!
//! Every allocator reports exhaustion as an [`AllocError`] instead of
//! aborting. Whether that error is propagated or turned into a panic is
//! the container's caller's decision.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(unsafe_op_in_unsafe_fn)]

pub mod allocator;
pub mod arena;
pub mod budget;
pub mod config;
pub mod counting;
pub mod error;

// Public re-exports for the primary API surface.
pub use allocator::{array_layout, Allocator, Global};
pub use arena::BumpArena;
pub use budget::BudgetAllocator;
pub use config::ArenaConfig;
pub use counting::{AllocStats, CountingAllocator};
pub use error::{AllocError, ArenaError};
