//! Byte-budgeted allocator wrapper.

use std::alloc::Layout;
use std::cell::Cell;
use std::ptr::NonNull;

use crate::allocator::{Allocator, Global};
use crate::error::AllocError;

/// Allocator wrapper that refuses requests beyond a byte budget.
///
/// Useful to cap the memory a group of containers may hold, and to drive
/// allocation-failure paths deterministically. Deallocation returns bytes
/// to the budget.
#[derive(Debug)]
pub struct BudgetAllocator<A = Global> {
    inner: A,
    limit: usize,
    used: Cell<usize>,
}

impl BudgetAllocator<Global> {
    /// Budget of `limit` bytes over the process allocator.
    pub fn new(limit: usize) -> Self {
        Self::wrap(Global, limit)
    }
}

impl<A: Allocator> BudgetAllocator<A> {
    /// Budget of `limit` bytes over `inner`.
    pub fn wrap(inner: A, limit: usize) -> Self {
        Self {
            inner,
            limit,
            used: Cell::new(0),
        }
    }

    /// The byte limit.
    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Bytes currently charged against the budget.
    pub fn used(&self) -> usize {
        self.used.get()
    }

    /// Bytes still available.
    pub fn remaining(&self) -> usize {
        self.limit - self.used.get()
    }
}

impl<A: Allocator> Allocator for BudgetAllocator<A> {
    fn allocate_bytes(&self, layout: Layout) -> Result<NonNull<u8>, AllocError> {
        if layout.size() > self.remaining() {
            log::debug!(
                "allocation budget exceeded: requested {} bytes, {} of {} used",
                layout.size(),
                self.used(),
                self.limit
            );
            return Err(AllocError::BudgetExceeded {
                requested: layout.size(),
                remaining: self.remaining(),
            });
        }
        let ptr = self.inner.allocate_bytes(layout)?;
        self.used.set(self.used.get() + layout.size());
        Ok(ptr)
    }

    unsafe fn deallocate_bytes(&self, ptr: NonNull<u8>, layout: Layout) {
        // SAFETY: forwarded from the caller.
        unsafe { self.inner.deallocate_bytes(ptr, layout) };
        self.used.set(self.used.get().saturating_sub(layout.size()));
    }

    unsafe fn construct<T: Default>(&self, slot: NonNull<T>) {
        // SAFETY: forwarded from the caller.
        unsafe { self.inner.construct(slot) }
    }

    unsafe fn destroy<T>(&self, slot: NonNull<T>) {
        // SAFETY: forwarded from the caller.
        unsafe { self.inner.destroy(slot) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allows_requests_within_budget() {
        let budget = BudgetAllocator::new(64);
        let ptr = budget.allocate::<u64>(8).unwrap();
        assert_eq!(budget.used(), 64);
        assert_eq!(budget.remaining(), 0);
        unsafe { budget.deallocate(ptr, 8) };
        assert_eq!(budget.used(), 0);
    }

    #[test]
    fn refuses_requests_over_budget() {
        let budget = BudgetAllocator::new(32);
        let held = budget.allocate::<u8>(24).unwrap();
        let err = budget.allocate::<u8>(16).unwrap_err();
        assert_eq!(
            err,
            AllocError::BudgetExceeded {
                requested: 16,
                remaining: 8,
            }
        );
        assert_eq!(budget.used(), 24);
        unsafe { budget.deallocate(held, 24) };
    }

    #[test]
    fn zero_budget_still_serves_empty_requests() {
        let budget = BudgetAllocator::new(0);
        assert!(budget.allocate::<u32>(0).is_ok());
        assert!(budget.allocate::<u32>(1).is_err());
    }
}
