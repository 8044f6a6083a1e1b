//! Test utilities and fixtures for Ravel development.
//!
//! - [`Tracked`] / [`DropLedger`]: an element type that records every
//!   construction and destruction, for leak and double-drop checks.
//! - [`FailAfter`]: an allocator that refuses requests after a set
//!   number of successes.

#![deny(unsafe_op_in_unsafe_fn)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;
pub mod tracked;

pub use fixtures::FailAfter;
pub use tracked::{DropLedger, LedgerCounts, Tracked};
