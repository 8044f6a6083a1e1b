//! Instrumented allocator wrapper.
//!
//! [`CountingAllocator`] forwards every request to an inner allocator and
//! records [`AllocStats`], which tests and profiling use to verify that
//! containers pair every allocation with a deallocation and every
//! construction with a destruction.

use std::alloc::Layout;
use std::cell::Cell;
use std::ptr::NonNull;

use crate::allocator::{Allocator, Global};
use crate::error::AllocError;

/// Counters collected by a [`CountingAllocator`].
///
/// Zero-byte requests never reach backing storage and are not counted.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AllocStats {
    /// Successful allocations.
    pub allocations: u64,
    /// Deallocations.
    pub deallocations: u64,
    /// Allocation requests the inner allocator refused.
    pub failed_allocations: u64,
    /// Total bytes handed out over the allocator's lifetime.
    pub bytes_allocated: usize,
    /// Bytes currently allocated and not yet returned.
    pub live_bytes: usize,
    /// High-water mark of `live_bytes`.
    pub peak_live_bytes: usize,
    /// In-place default constructions.
    pub constructs: u64,
    /// In-place destructions.
    pub destroys: u64,
}

impl AllocStats {
    /// Allocations not yet matched by a deallocation.
    pub fn outstanding_allocations(&self) -> u64 {
        self.allocations.saturating_sub(self.deallocations)
    }
}

/// Allocator wrapper that records [`AllocStats`].
///
/// Not `Clone`: share it between containers by reference so all of them
/// report into the same counters.
#[derive(Debug, Default)]
pub struct CountingAllocator<A = Global> {
    inner: A,
    stats: Cell<AllocStats>,
}

impl CountingAllocator<Global> {
    /// Count requests served by the process allocator.
    pub fn new() -> Self {
        Self::wrap(Global)
    }
}

impl<A: Allocator> CountingAllocator<A> {
    /// Count requests served by `inner`.
    pub fn wrap(inner: A) -> Self {
        Self {
            inner,
            stats: Cell::new(AllocStats::default()),
        }
    }

    /// Snapshot of the counters.
    pub fn stats(&self) -> AllocStats {
        self.stats.get()
    }

    /// Zero every counter.
    pub fn reset_stats(&self) {
        self.stats.set(AllocStats::default());
    }

    /// The wrapped allocator.
    pub fn inner(&self) -> &A {
        &self.inner
    }

    fn update(&self, f: impl FnOnce(&mut AllocStats)) {
        let mut stats = self.stats.get();
        f(&mut stats);
        self.stats.set(stats);
    }
}

impl<A: Allocator> Allocator for CountingAllocator<A> {
    fn allocate_bytes(&self, layout: Layout) -> Result<NonNull<u8>, AllocError> {
        if layout.size() == 0 {
            return self.inner.allocate_bytes(layout);
        }
        let result = self.inner.allocate_bytes(layout);
        let succeeded = result.is_ok();
        self.update(|s| {
            if succeeded {
                s.allocations += 1;
                s.bytes_allocated += layout.size();
                s.live_bytes += layout.size();
                s.peak_live_bytes = s.peak_live_bytes.max(s.live_bytes);
            } else {
                s.failed_allocations += 1;
            }
        });
        result
    }

    unsafe fn deallocate_bytes(&self, ptr: NonNull<u8>, layout: Layout) {
        // SAFETY: forwarded from the caller.
        unsafe { self.inner.deallocate_bytes(ptr, layout) };
        if layout.size() != 0 {
            self.update(|s| {
                s.deallocations += 1;
                s.live_bytes = s.live_bytes.saturating_sub(layout.size());
            });
        }
    }

    unsafe fn construct<T: Default>(&self, slot: NonNull<T>) {
        // SAFETY: forwarded from the caller.
        unsafe { self.inner.construct(slot) };
        self.update(|s| s.constructs += 1);
    }

    unsafe fn destroy<T>(&self, slot: NonNull<T>) {
        // SAFETY: forwarded from the caller.
        unsafe { self.inner.destroy(slot) };
        self.update(|s| s.destroys += 1);
    }
}
