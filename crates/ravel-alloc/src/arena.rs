//! Fixed-block bump allocation.
//!
//! A [`BumpArena`] owns one contiguous block obtained from the process
//! allocator at construction. Allocations advance a cursor through the
//! block; memory is reclaimed all at once by [`BumpArena::reset`].

use std::alloc::{self, Layout};
use std::cell::Cell;
use std::ptr::NonNull;

use crate::allocator::{dangling_for, Allocator};
use crate::config::ArenaConfig;
use crate::error::{AllocError, ArenaError};

/// Bump allocator over a single pre-allocated block.
///
/// Deallocating the most recent allocation rolls the cursor back, so a
/// container that grows by reallocating its only buffer reuses the tail
/// of the block. Any other deallocation is a no-op until the arena is
/// reset.
///
/// Containers borrow the arena (`&BumpArena` is an [`Allocator`]), which
/// statically prevents [`reset`](Self::reset) while storage is in use.
#[derive(Debug)]
pub struct BumpArena {
    /// Start of the backing block (dangling when `capacity == 0`).
    base: NonNull<u8>,
    /// Layout of the backing block.
    layout: Layout,
    /// Bump pointer: offset of the next free byte.
    cursor: Cell<usize>,
}

// SAFETY: the arena exclusively owns its block; `Cell` keeps it `!Sync`.
unsafe impl Send for BumpArena {}

impl BumpArena {
    /// Allocate the backing block described by `config`.
    pub fn new(config: ArenaConfig) -> Result<Self, ArenaError> {
        config.validate()?;
        let layout = Layout::from_size_align(config.capacity_bytes, config.align).map_err(|_| {
            ArenaError::CapacityTooLarge {
                capacity_bytes: config.capacity_bytes,
            }
        })?;
        let base = if layout.size() == 0 {
            dangling_for(layout)
        } else {
            // SAFETY: the layout has non-zero size.
            let raw = unsafe { alloc::alloc(layout) };
            NonNull::new(raw).ok_or(AllocError::OutOfMemory {
                requested: layout.size(),
                align: layout.align(),
            })?
        };
        log::trace!(
            "bump arena created: {} bytes, align {}",
            layout.size(),
            layout.align()
        );
        Ok(Self {
            base,
            layout,
            cursor: Cell::new(0),
        })
    }

    /// Create an arena with a block of `capacity_bytes` and default alignment.
    pub fn with_capacity(capacity_bytes: usize) -> Result<Self, ArenaError> {
        Self::new(ArenaConfig::new(capacity_bytes))
    }

    /// Reset the bump pointer to the start of the block without freeing it.
    ///
    /// Requires `&mut self`, so no container can still be borrowing the arena.
    pub fn reset(&mut self) {
        self.cursor.set(0);
    }

    /// Bytes handed out so far, including alignment padding.
    pub fn used(&self) -> usize {
        self.cursor.get()
    }

    /// Total size of the backing block in bytes.
    pub fn capacity(&self) -> usize {
        self.layout.size()
    }

    /// Bytes not yet handed out.
    pub fn remaining(&self) -> usize {
        self.layout.size() - self.cursor.get()
    }

    fn offset_of(&self, ptr: NonNull<u8>) -> usize {
        ptr.as_ptr().addr().wrapping_sub(self.base.as_ptr().addr())
    }
}

impl Allocator for BumpArena {
    fn allocate_bytes(&self, layout: Layout) -> Result<NonNull<u8>, AllocError> {
        if layout.size() == 0 {
            return Ok(dangling_for(layout));
        }
        let exhausted = || {
            log::debug!(
                "bump arena exhausted: requested {} bytes, {} remaining",
                layout.size(),
                self.remaining()
            );
            AllocError::ArenaExhausted {
                requested: layout.size(),
                remaining: self.remaining(),
            }
        };

        // Align the absolute address so requests stricter than the block
        // alignment are still honoured.
        let base = self.base.as_ptr().addr();
        let start = base
            .checked_add(self.cursor.get())
            .and_then(|addr| addr.checked_next_multiple_of(layout.align()))
            .map(|addr| addr - base)
            .ok_or_else(exhausted)?;
        let end = start.checked_add(layout.size()).ok_or_else(exhausted)?;
        if end > self.layout.size() {
            return Err(exhausted());
        }
        self.cursor.set(end);
        // SAFETY: `start < end <= capacity`, so the offset stays inside the block.
        Ok(unsafe { NonNull::new_unchecked(self.base.as_ptr().add(start)) })
    }

    unsafe fn deallocate_bytes(&self, ptr: NonNull<u8>, layout: Layout) {
        if layout.size() == 0 {
            return;
        }
        let start = self.offset_of(ptr);
        if start.checked_add(layout.size()) == Some(self.cursor.get()) {
            self.cursor.set(start);
        }
    }
}

impl Drop for BumpArena {
    fn drop(&mut self) {
        if self.layout.size() != 0 {
            // SAFETY: `base` was obtained from `alloc::alloc` with `layout`.
            unsafe { alloc::dealloc(self.base.as_ptr(), self.layout) };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequential_allocs_advance_cursor() {
        let arena = BumpArena::with_capacity(1024).unwrap();
        let a = arena.allocate::<u32>(4).unwrap();
        let b = arena.allocate::<u32>(4).unwrap();
        assert_eq!(arena.used(), 32);
        assert_eq!(b.as_ptr() as usize - a.as_ptr() as usize, 16);
    }

    #[test]
    fn exhaustion_is_reported_not_panicked() {
        let arena = BumpArena::with_capacity(16).unwrap();
        arena.allocate::<u64>(2).unwrap();
        let err = arena.allocate::<u64>(1).unwrap_err();
        assert_eq!(
            err,
            AllocError::ArenaExhausted {
                requested: 8,
                remaining: 0,
            }
        );
    }

    #[test]
    fn last_allocation_rolls_back() {
        let arena = BumpArena::with_capacity(64).unwrap();
        let _a = arena.allocate::<u8>(8).unwrap();
        let b = arena.allocate::<u8>(8).unwrap();
        unsafe { arena.deallocate(b, 8) };
        assert_eq!(arena.used(), 8);
    }

    #[test]
    fn non_tail_deallocation_is_noop() {
        let arena = BumpArena::with_capacity(64).unwrap();
        let a = arena.allocate::<u8>(8).unwrap();
        let _b = arena.allocate::<u8>(8).unwrap();
        unsafe { arena.deallocate(a, 8) };
        assert_eq!(arena.used(), 16);
    }

    #[test]
    fn alignment_is_honoured_beyond_block_alignment() {
        let arena = BumpArena::new(ArenaConfig::new(512).with_align(8)).unwrap();
        arena.allocate::<u8>(1).unwrap();
        let layout = Layout::from_size_align(32, 64).unwrap();
        let ptr = arena.allocate_bytes(layout).unwrap();
        assert_eq!(ptr.as_ptr() as usize % 64, 0);
    }

    #[test]
    fn reset_reclaims_everything() {
        let mut arena = BumpArena::with_capacity(64).unwrap();
        arena.allocate::<u8>(64).unwrap();
        assert_eq!(arena.remaining(), 0);
        arena.reset();
        assert_eq!(arena.used(), 0);
        assert!(arena.allocate::<u8>(64).is_ok());
    }

    #[test]
    fn zero_capacity_arena_serves_only_empty_requests() {
        let arena = BumpArena::with_capacity(0).unwrap();
        assert!(arena.allocate::<u8>(0).is_ok());
        assert!(arena.allocate::<u8>(1).is_err());
    }

    #[test]
    fn invalid_config_rejected() {
        let err = BumpArena::new(ArenaConfig::new(64).with_align(3)).unwrap_err();
        assert_eq!(err, ArenaError::InvalidAlignment { align: 3 });
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn allocations_never_overlap_and_stay_aligned(
                reqs in proptest::collection::vec((1usize..64, 0u32..4), 1..40),
            ) {
                let arena = BumpArena::with_capacity(4096).unwrap();
                let mut ranges: Vec<(usize, usize)> = Vec::new();
                for (size, align_pow) in reqs {
                    let layout = Layout::from_size_align(size, 1 << align_pow).unwrap();
                    if let Ok(ptr) = arena.allocate_bytes(layout) {
                        let start = ptr.as_ptr() as usize;
                        prop_assert_eq!(start % layout.align(), 0);
                        for &(s, e) in &ranges {
                            prop_assert!(start >= e || start + size <= s);
                        }
                        ranges.push((start, start + size));
                    }
                }
                prop_assert!(arena.used() <= arena.capacity());
            }
        }
    }
}
