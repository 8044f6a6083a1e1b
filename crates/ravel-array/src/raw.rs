//! Low-level primitives over an allocator-owned element buffer.
//!
//! [`RawBuffer`] knows where its slots are and how many there are, but
//! not which of them hold live values; the owning container tracks that.
//! Every function that touches slot contents is `unsafe` and states the
//! initialization state it expects.

use std::marker::PhantomData;
use std::ptr::{self, NonNull};
use std::slice;

use ravel_alloc::{AllocError, Allocator};

/// Storage for `capacity` slots of `T`, obtained from an [`Allocator`].
///
/// Does not release itself on drop: the owner must call
/// [`release`](Self::release) with the allocator that produced it.
pub(crate) struct RawBuffer<T> {
    /// Start of the buffer; dangling when `capacity == 0`.
    ptr: NonNull<T>,
    /// Number of slots backed by the allocation.
    capacity: usize,
    _owns: PhantomData<T>,
}

impl<T> RawBuffer<T> {
    /// A buffer with no slots and no allocation.
    pub(crate) fn empty() -> Self {
        Self {
            ptr: NonNull::dangling(),
            capacity: 0,
            _owns: PhantomData,
        }
    }

    /// Allocate exactly `capacity` uninitialized slots from `alloc`.
    pub(crate) fn allocate_in<A: Allocator>(alloc: &A, capacity: usize) -> Result<Self, AllocError> {
        if capacity == 0 {
            return Ok(Self::empty());
        }
        let ptr = alloc.allocate::<T>(capacity)?;
        Ok(Self {
            ptr,
            capacity,
            _owns: PhantomData,
        })
    }

    /// Return the storage to `alloc` and become empty.
    ///
    /// # Safety
    ///
    /// `alloc` must be the allocator this buffer was obtained from. Live
    /// values left in the slots are leaked, not dropped.
    pub(crate) unsafe fn release<A: Allocator>(&mut self, alloc: &A) {
        if self.capacity != 0 {
            // SAFETY: `ptr` came from `alloc.allocate::<T>(capacity)`.
            unsafe { alloc.deallocate(self.ptr, self.capacity) };
        }
        *self = Self::empty();
    }

    pub(crate) fn capacity(&self) -> usize {
        self.capacity
    }

    pub(crate) fn is_allocated(&self) -> bool {
        self.capacity != 0
    }

    pub(crate) fn as_ptr(&self) -> *const T {
        self.ptr.as_ptr()
    }

    pub(crate) fn as_mut_ptr(&mut self) -> *mut T {
        self.ptr.as_ptr()
    }

    /// Pointer to slot `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= capacity`.
    pub(crate) fn slot(&self, index: usize) -> NonNull<T> {
        assert!(
            index < self.capacity,
            "slot {index} out of range for buffer of {} slots",
            self.capacity
        );
        // SAFETY: `index < capacity`, so the offset stays inside the allocation.
        unsafe { self.ptr.add(index) }
    }

    /// Shared view of the first `len` slots.
    ///
    /// # Safety
    ///
    /// `len <= capacity` and slots `[0, len)` are initialized.
    pub(crate) unsafe fn slice(&self, len: usize) -> &[T] {
        debug_assert!(len <= self.capacity);
        // SAFETY: forwarded from the caller; a dangling pointer is valid
        // for an empty slice.
        unsafe { slice::from_raw_parts(self.ptr.as_ptr(), len) }
    }

    /// Mutable view of the first `len` slots.
    ///
    /// # Safety
    ///
    /// `len <= capacity` and slots `[0, len)` are initialized.
    pub(crate) unsafe fn slice_mut(&mut self, len: usize) -> &mut [T] {
        debug_assert!(len <= self.capacity);
        // SAFETY: forwarded from the caller.
        unsafe { slice::from_raw_parts_mut(self.ptr.as_ptr(), len) }
    }

    /// Move `value` into slot `index`.
    ///
    /// # Safety
    ///
    /// Slot `index` must be uninitialized; whatever it held is overwritten.
    pub(crate) unsafe fn write(&mut self, index: usize, value: T) {
        let slot = self.slot(index);
        // SAFETY: the slot is in bounds and, per the caller, holds no live value.
        unsafe { slot.as_ptr().write(value) };
    }

    /// Move the value out of slot `index`, leaving it logically uninitialized.
    ///
    /// # Safety
    ///
    /// Slot `index` must be initialized and must not be read again until
    /// it is re-initialized.
    pub(crate) unsafe fn read(&self, index: usize) -> T {
        let slot = self.slot(index);
        // SAFETY: the slot is in bounds and initialized.
        unsafe { slot.as_ptr().read() }
    }

    /// Move the first `count` values of `src` into the first `count` slots
    /// of `self`.
    ///
    /// # Safety
    ///
    /// `count` must not exceed either capacity, slots `[0, count)` of `src`
    /// must be initialized and are logically uninitialized afterwards, and
    /// slots `[0, count)` of `self` must hold no live values.
    pub(crate) unsafe fn move_prefix_from(&mut self, src: &RawBuffer<T>, count: usize) {
        debug_assert!(count <= self.capacity && count <= src.capacity);
        // SAFETY: distinct allocations never overlap; both ranges are in
        // bounds per the caller.
        unsafe { ptr::copy_nonoverlapping(src.ptr.as_ptr(), self.ptr.as_ptr(), count) };
    }
}
