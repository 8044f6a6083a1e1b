//! The allocator capability contract and the process-wide allocator.
//!
//! An [`Allocator`] supplies raw storage and performs in-place element
//! construction and destruction. Containers only ever talk to this trait,
//! so arena, pool, budgeted or instrumented allocators can be swapped in
//! without touching container logic.

use std::alloc::{self, Layout};
use std::mem;
use std::ptr::{self, NonNull};

use crate::error::AllocError;

/// Capability object that provides element storage to a container.
///
/// Implementors supply the two byte-level primitives. The typed
/// operations a container consumes (`allocate`, `deallocate`,
/// `construct`, `destroy`) have default implementations in terms of
/// them and may be overridden, e.g. to record statistics.
///
/// All methods take `&self`. Stateful allocators use interior mutability,
/// and `&A` is itself an allocator, so one allocator can back many
/// containers at once.
///
/// # Zero-sized requests
///
/// A layout of size zero never reaches backing storage: `allocate_bytes`
/// returns a dangling pointer aligned to the layout, and
/// `deallocate_bytes` ignores it.
pub trait Allocator {
    /// Obtain a block of memory fitting `layout`.
    fn allocate_bytes(&self, layout: Layout) -> Result<NonNull<u8>, AllocError>;

    /// Return a block obtained from [`allocate_bytes`](Self::allocate_bytes).
    ///
    /// # Safety
    ///
    /// `ptr` must have been returned by `allocate_bytes` on this allocator
    /// with the same `layout`, and must not have been deallocated already.
    unsafe fn deallocate_bytes(&self, ptr: NonNull<u8>, layout: Layout);

    /// Obtain uninitialized storage for `count` values of `T`.
    ///
    /// Returns a dangling pointer without touching backing storage when the
    /// request occupies zero bytes.
    fn allocate<T>(&self, count: usize) -> Result<NonNull<T>, AllocError> {
        let layout = array_layout::<T>(count)?;
        if layout.size() == 0 {
            return Ok(NonNull::dangling());
        }
        self.allocate_bytes(layout).map(NonNull::cast)
    }

    /// Release storage obtained from [`allocate`](Self::allocate).
    ///
    /// Does not destroy any element still living in the storage.
    ///
    /// # Safety
    ///
    /// `ptr` must have been returned by `allocate::<T>(count)` on this
    /// allocator and must not have been deallocated already.
    unsafe fn deallocate<T>(&self, ptr: NonNull<T>, count: usize) {
        // The layout was valid when the storage was allocated.
        let Ok(layout) = Layout::array::<T>(count) else {
            return;
        };
        if layout.size() != 0 {
            // SAFETY: forwarded from the caller; the layout matches allocation.
            unsafe { self.deallocate_bytes(ptr.cast(), layout) };
        }
    }

    /// Default-construct a value in place.
    ///
    /// # Safety
    ///
    /// `slot` must be valid for writes and properly aligned. Any value
    /// previously in the slot is overwritten without being dropped.
    unsafe fn construct<T: Default>(&self, slot: NonNull<T>) {
        // SAFETY: forwarded from the caller.
        unsafe { slot.as_ptr().write(T::default()) };
    }

    /// Destroy the value in `slot` without releasing its memory.
    ///
    /// # Safety
    ///
    /// `slot` must hold a live, properly aligned value that is not used
    /// again until it is re-initialized.
    unsafe fn destroy<T>(&self, slot: NonNull<T>) {
        // SAFETY: forwarded from the caller.
        unsafe { ptr::drop_in_place(slot.as_ptr()) };
    }
}

impl<A: Allocator> Allocator for &A {
    fn allocate_bytes(&self, layout: Layout) -> Result<NonNull<u8>, AllocError> {
        (**self).allocate_bytes(layout)
    }

    unsafe fn deallocate_bytes(&self, ptr: NonNull<u8>, layout: Layout) {
        // SAFETY: forwarded from the caller.
        unsafe { (**self).deallocate_bytes(ptr, layout) }
    }

    fn allocate<T>(&self, count: usize) -> Result<NonNull<T>, AllocError> {
        (**self).allocate(count)
    }

    unsafe fn deallocate<T>(&self, ptr: NonNull<T>, count: usize) {
        // SAFETY: forwarded from the caller.
        unsafe { (**self).deallocate(ptr, count) }
    }

    unsafe fn construct<T: Default>(&self, slot: NonNull<T>) {
        // SAFETY: forwarded from the caller.
        unsafe { (**self).construct(slot) }
    }

    unsafe fn destroy<T>(&self, slot: NonNull<T>) {
        // SAFETY: forwarded from the caller.
        unsafe { (**self).destroy(slot) }
    }
}

/// Layout for `count` contiguous values of `T`.
///
/// Reports [`AllocError::CapacityOverflow`] when the total size does not
/// fit in `isize::MAX` bytes.
pub fn array_layout<T>(count: usize) -> Result<Layout, AllocError> {
    Layout::array::<T>(count).map_err(|_| AllocError::CapacityOverflow {
        count,
        elem_size: mem::size_of::<T>(),
    })
}

/// Well-aligned dangling pointer for a zero-sized layout.
pub(crate) fn dangling_for(layout: Layout) -> NonNull<u8> {
    NonNull::new(ptr::without_provenance_mut(layout.align())).unwrap_or(NonNull::dangling())
}

/// The process-wide allocator (`std::alloc`).
///
/// Zero-sized and stateless; the default allocator of every container.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Global;

impl Allocator for Global {
    fn allocate_bytes(&self, layout: Layout) -> Result<NonNull<u8>, AllocError> {
        if layout.size() == 0 {
            return Ok(dangling_for(layout));
        }
        // SAFETY: the layout has non-zero size.
        let raw = unsafe { alloc::alloc(layout) };
        NonNull::new(raw).ok_or_else(|| {
            log::debug!(
                "global allocation of {} bytes (align {}) failed",
                layout.size(),
                layout.align()
            );
            AllocError::OutOfMemory {
                requested: layout.size(),
                align: layout.align(),
            }
        })
    }

    unsafe fn deallocate_bytes(&self, ptr: NonNull<u8>, layout: Layout) {
        if layout.size() != 0 {
            // SAFETY: the caller guarantees `ptr` came from `alloc::alloc`
            // with this layout.
            unsafe { alloc::dealloc(ptr.as_ptr(), layout) };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn global_round_trip_writes_and_reads() {
        let ptr = Global.allocate::<u64>(4).unwrap();
        unsafe {
            for i in 0..4 {
                ptr.as_ptr().add(i).write(i as u64 * 10);
            }
            assert_eq!(*ptr.as_ptr().add(3), 30);
            Global.deallocate(ptr, 4);
        }
    }

    #[test]
    fn zero_count_is_dangling() {
        let ptr = Global.allocate::<u32>(0).unwrap();
        assert_eq!(ptr, NonNull::dangling());
        unsafe { Global.deallocate(ptr, 0) };
    }

    #[test]
    fn zero_sized_type_is_dangling() {
        let ptr = Global.allocate::<()>(1000).unwrap();
        assert_eq!(ptr, NonNull::dangling());
        unsafe { Global.deallocate(ptr, 1000) };
    }

    #[test]
    fn zero_sized_layout_is_aligned() {
        let layout = Layout::from_size_align(0, 64).unwrap();
        let ptr = Global.allocate_bytes(layout).unwrap();
        assert_eq!(ptr.as_ptr() as usize % 64, 0);
        unsafe { Global.deallocate_bytes(ptr, layout) };
    }

    #[test]
    fn overflowing_count_is_capacity_overflow() {
        let err = Global.allocate::<u64>(usize::MAX).unwrap_err();
        assert_eq!(
            err,
            AllocError::CapacityOverflow {
                count: usize::MAX,
                elem_size: 8,
            }
        );
    }

    #[test]
    fn construct_and_destroy_in_place() {
        let ptr = Global.allocate::<String>(1).unwrap();
        unsafe {
            Global.construct(ptr);
            assert!((&(*ptr.as_ptr())).is_empty());
            (*ptr.as_ptr()).push_str("hello");
            Global.destroy(ptr);
            Global.deallocate(ptr, 1);
        }
    }

    #[test]
    fn reference_forwards_to_allocator() {
        let global = Global;
        let by_ref = &global;
        let ptr = by_ref.allocate::<u8>(16).unwrap();
        unsafe { by_ref.deallocate(ptr, 16) };
    }
}
