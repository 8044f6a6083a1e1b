//! Allocator fixtures for driving failure paths.

use std::alloc::Layout;
use std::cell::Cell;
use std::ptr::NonNull;

use ravel_alloc::{AllocError, Allocator, Global};

/// Allocator that serves the first `successes` non-empty requests from the
/// process allocator and refuses every one after that.
///
/// Lets a test pick exactly which reallocation fails without depending on
/// byte counts.
#[derive(Debug)]
pub struct FailAfter {
    remaining: Cell<usize>,
    refused: Cell<usize>,
}

impl FailAfter {
    pub fn new(successes: usize) -> Self {
        Self {
            remaining: Cell::new(successes),
            refused: Cell::new(0),
        }
    }

    /// Allow `more` further allocations.
    pub fn grant(&self, more: usize) {
        self.remaining.set(self.remaining.get() + more);
    }

    /// Number of requests refused so far.
    pub fn refused(&self) -> usize {
        self.refused.get()
    }
}

impl Allocator for FailAfter {
    fn allocate_bytes(&self, layout: Layout) -> Result<NonNull<u8>, AllocError> {
        if layout.size() != 0 {
            if self.remaining.get() == 0 {
                self.refused.set(self.refused.get() + 1);
                return Err(AllocError::OutOfMemory {
                    requested: layout.size(),
                    align: layout.align(),
                });
            }
            self.remaining.set(self.remaining.get() - 1);
        }
        Global.allocate_bytes(layout)
    }

    unsafe fn deallocate_bytes(&self, ptr: NonNull<u8>, layout: Layout) {
        // SAFETY: every block was obtained from `Global`.
        unsafe { Global.deallocate_bytes(ptr, layout) }
    }
}
