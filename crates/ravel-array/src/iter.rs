//! By-value iteration.

use std::fmt;
use std::iter::FusedIterator;

use ravel_alloc::{Allocator, Global};

use crate::array::DynamicArray;
use crate::raw::RawBuffer;

/// Owning iterator returned by `DynamicArray::into_iter`.
///
/// Yields the elements by value from either end. Elements not yielded
/// are destroyed, and the buffer returned to the allocator, when the
/// iterator is dropped.
pub struct IntoIter<T, A: Allocator = Global> {
    buf: RawBuffer<T>,
    alloc: A,
    /// Live range still to be yielded: `[start, end)`.
    start: usize,
    end: usize,
}

// SAFETY: same ownership story as `DynamicArray`.
unsafe impl<T: Send, A: Allocator + Send> Send for IntoIter<T, A> {}
// SAFETY: shared access only hands out `&T`.
unsafe impl<T: Sync, A: Allocator + Sync> Sync for IntoIter<T, A> {}

impl<T, A: Allocator> IntoIter<T, A> {
    pub(crate) fn new(array: DynamicArray<T, A>) -> Self {
        let (buf, len, alloc) = array.into_raw_parts();
        Self {
            buf,
            alloc,
            start: 0,
            end: len,
        }
    }

    /// The elements not yet yielded.
    pub fn as_slice(&self) -> &[T] {
        // SAFETY: slots `[start, end)` are live; `start <= end <= capacity`.
        unsafe { &self.buf.slice(self.end)[self.start..] }
    }

    /// The injected allocator.
    pub fn allocator(&self) -> &A {
        &self.alloc
    }
}

impl<T, A: Allocator> Iterator for IntoIter<T, A> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        if self.start == self.end {
            return None;
        }
        let index = self.start;
        self.start += 1;
        // SAFETY: the slot was live and has left the live range.
        Some(unsafe { self.buf.read(index) })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.end - self.start;
        (remaining, Some(remaining))
    }
}

impl<T, A: Allocator> DoubleEndedIterator for IntoIter<T, A> {
    fn next_back(&mut self) -> Option<T> {
        if self.start == self.end {
            return None;
        }
        self.end -= 1;
        // SAFETY: the slot was live and has left the live range.
        Some(unsafe { self.buf.read(self.end) })
    }
}

impl<T, A: Allocator> ExactSizeIterator for IntoIter<T, A> {}

impl<T, A: Allocator> FusedIterator for IntoIter<T, A> {}

impl<T: fmt::Debug, A: Allocator> fmt::Debug for IntoIter<T, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("IntoIter").field(&self.as_slice()).finish()
    }
}

impl<T, A: Allocator> Drop for IntoIter<T, A> {
    fn drop(&mut self) {
        while self.start < self.end {
            let index = self.start;
            self.start += 1;
            // SAFETY: the slot was live and has left the live range.
            unsafe { self.alloc.destroy(self.buf.slot(index)) };
        }
        // SAFETY: the buffer came from `self.alloc` and holds no live values.
        unsafe { self.buf.release(&self.alloc) };
    }
}

#[cfg(test)]
mod tests {
    use ravel_alloc::CountingAllocator;

    use crate::DynamicArray;

    #[test]
    fn yields_in_order_from_both_ends() {
        let array: DynamicArray<i32> = (1..=5).collect();
        let mut iter = array.into_iter();
        assert_eq!(iter.len(), 5);
        assert_eq!(iter.next(), Some(1));
        assert_eq!(iter.next_back(), Some(5));
        assert_eq!(iter.as_slice(), [2, 3, 4]);
        assert_eq!(iter.collect::<Vec<_>>(), [2, 3, 4]);
    }

    #[test]
    fn partial_consumption_destroys_the_rest() {
        let counting = CountingAllocator::new();
        let mut array = DynamicArray::new_in(&counting);
        for word in ["a", "b", "c", "d"] {
            array.push_back(word.to_string());
        }
        let mut iter = array.into_iter();
        assert_eq!(iter.next().as_deref(), Some("a"));
        drop(iter);
        let stats = counting.stats();
        assert_eq!(stats.destroys, 3);
        assert_eq!(stats.live_bytes, 0);
        assert_eq!(stats.outstanding_allocations(), 0);
    }

    #[test]
    fn empty_array_iterates_nothing() {
        let array: DynamicArray<String> = DynamicArray::new();
        assert_eq!(array.into_iter().next(), None);
    }
}
