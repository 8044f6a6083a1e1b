//! The growable contiguous container.
//!
//! [`DynamicArray`] owns a buffer obtained from an injected [`Allocator`]
//! and tracks how many leading slots hold live elements:
//!
//! ```text
//! [ live | live | live | uninit | uninit ]
//!   0 ........... len ............ capacity
//! ```
//!
//! Appends grow the buffer geometrically (see [`next_capacity`]); the
//! explicit capacity operations (`resize`, `reserve`, `shrink_to_fit`)
//! reallocate to exactly the requested size.

use std::any;
use std::mem::{self, ManuallyDrop};
use std::ptr;

use ravel_alloc::{AllocError, Allocator, Global};

use crate::growth::next_capacity;
use crate::raw::RawBuffer;

/// An owning, contiguous, growable sequence of `T` whose memory comes from
/// an injected allocator `A`.
///
/// Slots `[0, len)` hold live elements; slots `[len, capacity)` are
/// allocated but uninitialized. No memory is held exactly when
/// `capacity() == 0`.
///
/// Every operation that can allocate comes in two forms: `try_*` returns
/// the allocator's [`AllocError`], the plain form panics with it.
pub struct DynamicArray<T, A: Allocator = Global> {
    buf: RawBuffer<T>,
    len: usize,
    alloc: A,
}

// SAFETY: the array exclusively owns its elements and its buffer, so it is
// as thread-safe as `T` and the allocator it carries.
unsafe impl<T: Send, A: Allocator + Send> Send for DynamicArray<T, A> {}
// SAFETY: shared access only hands out `&T` and `&A`.
unsafe impl<T: Sync, A: Allocator + Sync> Sync for DynamicArray<T, A> {}

impl<T> DynamicArray<T, Global> {
    /// An empty array backed by the process allocator. Does not allocate.
    pub fn new() -> Self {
        Self::new_in(Global)
    }

    /// An array of `len` default values, with capacity exactly `len`.
    pub fn with_len(len: usize) -> Self
    where
        T: Default,
    {
        Self::with_len_in(Global, len)
    }
}

impl<T, A: Allocator> DynamicArray<T, A> {
    /// An empty array using `alloc`. Does not allocate.
    pub fn new_in(alloc: A) -> Self {
        Self {
            buf: RawBuffer::empty(),
            len: 0,
            alloc,
        }
    }

    /// An array of `len` default values using `alloc`, with capacity exactly `len`.
    pub fn with_len_in(alloc: A, len: usize) -> Self
    where
        T: Default,
    {
        Self::try_with_len_in(alloc, len).unwrap_or_else(|err| alloc_failure(err))
    }

    /// Fallible form of [`with_len_in`](Self::with_len_in).
    pub fn try_with_len_in(alloc: A, len: usize) -> Result<Self, AllocError>
    where
        T: Default,
    {
        let mut array = Self::new_in(alloc);
        array.try_resize(len)?;
        Ok(array)
    }

    /// An empty array using `alloc` with exactly `capacity` slots reserved.
    pub fn with_capacity_in(alloc: A, capacity: usize) -> Self {
        Self::try_with_capacity_in(alloc, capacity).unwrap_or_else(|err| alloc_failure(err))
    }

    /// Fallible form of [`with_capacity_in`](Self::with_capacity_in).
    pub fn try_with_capacity_in(alloc: A, capacity: usize) -> Result<Self, AllocError> {
        let buf = RawBuffer::allocate_in(&alloc, capacity)?;
        Ok(Self { buf, len: 0, alloc })
    }

    // ── Capacity ────────────────────────────────────────────────

    /// Number of live elements.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Number of slots backed by memory.
    pub fn capacity(&self) -> usize {
        self.buf.capacity()
    }

    /// Whether there are no live elements.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Whether the array currently holds an allocation.
    pub fn is_allocated(&self) -> bool {
        self.buf.is_allocated()
    }

    /// The injected allocator.
    pub fn allocator(&self) -> &A {
        &self.alloc
    }

    /// Set the number of live elements to `new_len`.
    ///
    /// Shrinking destroys the trailing elements and never reallocates.
    /// Growing beyond the capacity reallocates to exactly `new_len` slots.
    /// Newly active slots are always default-constructed, including slots
    /// that held elements before an earlier shrink.
    pub fn resize(&mut self, new_len: usize)
    where
        T: Default,
    {
        self.try_resize(new_len).unwrap_or_else(|err| alloc_failure(err));
    }

    /// Fallible form of [`resize`](Self::resize). On error the array is
    /// unchanged.
    pub fn try_resize(&mut self, new_len: usize) -> Result<(), AllocError>
    where
        T: Default,
    {
        if new_len <= self.len {
            self.truncate(new_len);
            return Ok(());
        }
        if new_len > self.capacity() {
            self.relocate(new_len)?;
        }
        self.construct_to(new_len);
        Ok(())
    }

    /// Ensure at least `new_capacity` slots, reallocating to exactly that
    /// many if the current capacity is smaller. Never changes `len`.
    pub fn reserve(&mut self, new_capacity: usize) {
        self.try_reserve(new_capacity).unwrap_or_else(|err| alloc_failure(err));
    }

    /// Fallible form of [`reserve`](Self::reserve).
    pub fn try_reserve(&mut self, new_capacity: usize) -> Result<(), AllocError> {
        if new_capacity <= self.capacity() {
            return Ok(());
        }
        self.relocate(new_capacity)
    }

    /// Reallocate to exactly `len` slots, releasing the buffer entirely
    /// when the array is empty.
    pub fn shrink_to_fit(&mut self) {
        self.try_shrink_to_fit().unwrap_or_else(|err| alloc_failure(err));
    }

    /// Fallible form of [`shrink_to_fit`](Self::shrink_to_fit).
    pub fn try_shrink_to_fit(&mut self) -> Result<(), AllocError> {
        self.relocate(self.len)
    }

    /// Destroy every element past `new_len`. Does nothing if `new_len >= len`.
    /// Never reallocates.
    pub fn truncate(&mut self, new_len: usize) {
        if new_len >= self.len {
            return;
        }
        let old_len = self.len;
        // Lower the count first: a panicking destructor leaks the rest
        // instead of dropping them twice.
        self.len = new_len;
        for index in new_len..old_len {
            // SAFETY: the slot was live and is now outside the active range.
            unsafe { self.alloc.destroy(self.buf.slot(index)) };
        }
    }

    /// Destroy every element and return the buffer to the allocator.
    pub fn clear(&mut self) {
        self.truncate(0);
        // SAFETY: the buffer came from `self.alloc` and holds no live values.
        unsafe { self.buf.release(&self.alloc) };
    }

    // ── Element access ──────────────────────────────────────────

    /// The live elements as a slice.
    pub fn as_slice(&self) -> &[T] {
        // SAFETY: slots `[0, len)` are initialized.
        unsafe { self.buf.slice(self.len) }
    }

    /// The live elements as a mutable slice.
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        // SAFETY: slots `[0, len)` are initialized.
        unsafe { self.buf.slice_mut(self.len) }
    }

    /// Raw pointer to the buffer. Dangling when nothing is allocated.
    pub fn as_ptr(&self) -> *const T {
        self.buf.as_ptr()
    }

    /// Mutable raw pointer to the buffer. Dangling when nothing is allocated.
    pub fn as_mut_ptr(&mut self) -> *mut T {
        self.buf.as_mut_ptr()
    }

    /// Element at `index`.
    ///
    /// `index < len()` is a precondition, asserted in debug builds. Release
    /// builds still panic through the slice bounds check.
    pub fn at(&self, index: usize) -> &T {
        debug_assert!(
            index < self.len,
            "index {index} out of range for DynamicArray of length {}",
            self.len
        );
        &self.as_slice()[index]
    }

    /// Mutable element at `index`. Same precondition as [`at`](Self::at).
    pub fn at_mut(&mut self, index: usize) -> &mut T {
        debug_assert!(
            index < self.len,
            "index {index} out of range for DynamicArray of length {}",
            self.len
        );
        &mut self.as_mut_slice()[index]
    }

    /// First element. The array must not be empty.
    pub fn front(&self) -> &T {
        debug_assert!(!self.is_empty(), "front() on an empty DynamicArray");
        &self.as_slice()[0]
    }

    /// Mutable first element. The array must not be empty.
    pub fn front_mut(&mut self) -> &mut T {
        debug_assert!(!self.is_empty(), "front_mut() on an empty DynamicArray");
        &mut self.as_mut_slice()[0]
    }

    /// Last element. The array must not be empty.
    pub fn back(&self) -> &T {
        debug_assert!(!self.is_empty(), "back() on an empty DynamicArray");
        let last = self.len.wrapping_sub(1);
        &self.as_slice()[last]
    }

    /// Mutable last element. The array must not be empty.
    pub fn back_mut(&mut self) -> &mut T {
        debug_assert!(!self.is_empty(), "back_mut() on an empty DynamicArray");
        let last = self.len.wrapping_sub(1);
        &mut self.as_mut_slice()[last]
    }

    /// Iterator over the live elements.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.as_slice().iter()
    }

    /// Mutable iterator over the live elements.
    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, T> {
        self.as_mut_slice().iter_mut()
    }

    // ── Modifiers ───────────────────────────────────────────────

    /// Append `value`, growing the capacity geometrically when full.
    pub fn push_back(&mut self, value: T) {
        self.try_push_back(value).unwrap_or_else(|err| alloc_failure(err));
    }

    /// Fallible form of [`push_back`](Self::push_back). On error the array
    /// is unchanged and `value` is dropped.
    pub fn try_push_back(&mut self, value: T) -> Result<(), AllocError> {
        let required = self.len.checked_add(1).ok_or(AllocError::CapacityOverflow {
            count: self.len,
            elem_size: mem::size_of::<T>(),
        })?;
        self.grow_for(required)?;
        // SAFETY: `len < capacity` after growth and slot `len` is uninitialized.
        unsafe { self.buf.write(self.len, value) };
        self.len += 1;
        Ok(())
    }

    /// Append a clone of the element at `index`.
    ///
    /// The clone is taken before the capacity check, so the appended value
    /// is intact even when growth moves the buffer it was read from.
    pub fn push_within(&mut self, index: usize)
    where
        T: Clone,
    {
        self.try_push_within(index).unwrap_or_else(|err| alloc_failure(err));
    }

    /// Fallible form of [`push_within`](Self::push_within).
    pub fn try_push_within(&mut self, index: usize) -> Result<(), AllocError>
    where
        T: Clone,
    {
        let value = self.at(index).clone();
        self.try_push_back(value)
    }

    /// Remove the last element and return it. Never reallocates.
    ///
    /// Popping an empty array is a contract violation: debug builds
    /// panic, release builds return `None`.
    pub fn pop_back(&mut self) -> Option<T> {
        debug_assert!(!self.is_empty(), "pop_back() on an empty DynamicArray");
        if self.len == 0 {
            return None;
        }
        self.len -= 1;
        // SAFETY: the slot was live and is now outside the active range.
        Some(unsafe { self.buf.read(self.len) })
    }

    /// Move the contents out, leaving `self` empty with no allocation.
    ///
    /// The returned array keeps the original allocator (it owns the
    /// buffer); `self` keeps a clone of it and stays usable.
    pub fn take(&mut self) -> Self
    where
        A: Clone,
    {
        let alloc = self.alloc.clone();
        mem::replace(self, Self::new_in(alloc))
    }

    // ── Internals ───────────────────────────────────────────────

    /// Grow geometrically so that `required` slots fit.
    pub(crate) fn grow_for(&mut self, required: usize) -> Result<(), AllocError> {
        let capacity = self.capacity();
        if required <= capacity {
            return Ok(());
        }
        self.relocate(next_capacity(capacity, required))
    }

    /// Move the live elements into a fresh buffer of exactly `new_capacity`
    /// slots. The new buffer is obtained before anything is touched, so a
    /// failed allocation leaves the array as it was.
    fn relocate(&mut self, new_capacity: usize) -> Result<(), AllocError> {
        debug_assert!(new_capacity >= self.len);
        let old_capacity = self.capacity();
        if new_capacity == old_capacity {
            return Ok(());
        }
        let mut fresh = RawBuffer::allocate_in(&self.alloc, new_capacity)?;
        log::trace!(
            "DynamicArray<{}>: reallocating {} -> {} slots ({} live)",
            any::type_name::<T>(),
            old_capacity,
            new_capacity,
            self.len
        );
        // SAFETY: slots `[0, len)` of the old buffer are live and fit in the
        // new one; after the move the old buffer holds no live values and
        // goes back to the allocator it came from.
        unsafe {
            fresh.move_prefix_from(&self.buf, self.len);
            let mut old = mem::replace(&mut self.buf, fresh);
            old.release(&self.alloc);
        }
        Ok(())
    }

    /// Default-construct slots `[len, new_len)`.
    fn construct_to(&mut self, new_len: usize)
    where
        T: Default,
    {
        debug_assert!(new_len <= self.capacity());
        while self.len < new_len {
            // SAFETY: the slot is within capacity and uninitialized. `len`
            // only advances once it is live.
            unsafe { self.alloc.construct(self.buf.slot(self.len)) };
            self.len += 1;
        }
    }

    /// Split into buffer, length and allocator without running `Drop`.
    pub(crate) fn into_raw_parts(self) -> (RawBuffer<T>, usize, A) {
        let this = ManuallyDrop::new(self);
        // SAFETY: `this` is never used or dropped again, so each field is
        // moved out exactly once.
        unsafe {
            (
                ptr::read(&this.buf),
                this.len,
                ptr::read(&this.alloc),
            )
        }
    }
}

impl<T, A: Allocator> Drop for DynamicArray<T, A> {
    fn drop(&mut self) {
        self.clear();
    }
}

#[cold]
#[track_caller]
pub(crate) fn alloc_failure(err: AllocError) -> ! {
    panic!("DynamicArray allocation failed: {err}")
}
