use core::fmt;
use core::iter::FusedIterator;
use core::ptr;
use core::slice;

use crate::core::DynamicArray;
use crate::raw_buffer::RawBuffer;

/// Owning iterator over the elements of a `DynamicArray`
///
/// Elements that are not consumed are dropped together with the iterator,
/// and the buffer is released afterwards.
pub struct IntoIter<T> {
    buffer: RawBuffer<T>,
    start: usize,
    end: usize,
}

impl<T> IntoIter<T> {
    /// Remaining elements as a slice
    #[must_use]
    pub fn as_slice(&self) -> &[T] {
        // SAFETY: slots [start, end) are still live.
        unsafe { slice::from_raw_parts(self.buffer.slot(self.start), self.end - self.start) }
    }
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        if self.start == self.end {
            return None;
        }
        // SAFETY: the slot is live and leaves the live range right away.
        let value = unsafe { ptr::read(self.buffer.slot(self.start)) };
        self.start += 1;
        Some(value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.end - self.start;
        (remaining, Some(remaining))
    }
}

impl<T> DoubleEndedIterator for IntoIter<T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.start == self.end {
            return None;
        }
        self.end -= 1;
        // SAFETY: as in `next`.
        Some(unsafe { ptr::read(self.buffer.slot(self.end)) })
    }
}

impl<T> ExactSizeIterator for IntoIter<T> {}

impl<T> FusedIterator for IntoIter<T> {}

impl<T: fmt::Debug> fmt::Debug for IntoIter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("IntoIter").field(&self.as_slice()).finish()
    }
}

impl<T> Drop for IntoIter<T> {
    fn drop(&mut self) {
        let remaining = self.end - self.start;
        self.end = self.start;
        // SAFETY: drops the unconsumed live slots exactly once.
        unsafe {
            let first = self.buffer.slot_mut(self.start);
            ptr::drop_in_place(ptr::slice_from_raw_parts_mut(first, remaining));
        }
    }
}

impl<T> IntoIterator for DynamicArray<T> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        let (buffer, size) = self.into_raw_parts();
        IntoIter {
            buffer,
            start: 0,
            end: size,
        }
    }
}

impl<'a, T> IntoIterator for &'a DynamicArray<T> {
    type Item = &'a T;
    type IntoIter = slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.as_slice().iter()
    }
}

impl<'a, T> IntoIterator for &'a mut DynamicArray<T> {
    type Item = &'a mut T;
    type IntoIter = slice::IterMut<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.as_mut_slice().iter_mut()
    }
}
