use alloc::alloc::{handle_alloc_error, Layout};
use core::cmp::Ordering;
use core::fmt;
use core::hash::{Hash, Hasher};
use core::iter;
use core::mem;
use core::ops::{Deref, DerefMut, Index, IndexMut};
use core::ptr;
use core::slice::{self, SliceIndex};

use crate::error::DynArrayError;
use crate::raw_buffer::{FillGuard, RawBuffer};

/// A request to pre-allocate capacity without creating any element.
///
/// Build one with [`reserve`] and turn it into an empty [`DynamicArray`]
/// with `DynamicArray::from`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CapacityRequest {
    capacity: usize,
}

impl CapacityRequest {
    #[must_use]
    pub const fn new(capacity: usize) -> Self {
        Self { capacity }
    }

    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }
}

/// Shorthand for [`CapacityRequest::new`].
///
/// ```
/// # use dynarray::{reserve, DynamicArray};
/// let array: DynamicArray<u32> = DynamicArray::from(reserve(10));
/// assert_eq!(array.len(), 0);
/// assert_eq!(array.capacity(), 10);
/// ```
#[must_use]
pub const fn reserve(capacity: usize) -> CapacityRequest {
    CapacityRequest::new(capacity)
}

/// A resizable array that stores its elements in one contiguous buffer.
///
/// The first `len()` slots of the buffer hold live values, the remaining
/// `capacity() - len()` slots are uninitialized. When an append or insert
/// finds the buffer full, the capacity doubles (starting from 1): a fresh
/// buffer is allocated, the live elements are moved over, and the old
/// buffer is released. Capacity never shrinks on its own; only
/// [`DynamicArray::shrink_to_fit`] gives memory back.
///
/// Positions are plain indices. Operations that take or return a position
/// ([`insert`](DynamicArray::insert), [`erase`](DynamicArray::erase)) use
/// `usize`; an index obtained before a mutation must be re-checked by the
/// caller, for example with [`at`](DynamicArray::at).
///
/// Every allocating operation comes in two forms: the plain one treats
/// allocation failure like `Vec` does, and the `try_` one reports
/// `DynArrayError::OutOfMemory` and leaves the array untouched.
pub struct DynamicArray<T> {
    buffer: RawBuffer<T>,
    size: usize,
}

impl<T> DynamicArray<T> {
    /// Creates an empty array. Does not allocate.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            buffer: RawBuffer::new(),
            size: 0,
        }
    }

    /// Creates an empty array with exactly `request.capacity()` slots.
    ///
    /// # Errors
    ///
    /// Returns `DynArrayError::OutOfMemory` if the buffer cannot be allocated.
    pub fn try_with_capacity_request(request: CapacityRequest) -> Result<Self, DynArrayError> {
        Ok(Self {
            buffer: RawBuffer::allocate(request.capacity())?,
            size: 0,
        })
    }

    /// Creates an empty array with exactly `request.capacity()` slots.
    #[must_use]
    pub fn with_capacity_request(request: CapacityRequest) -> Self {
        Self::try_with_capacity_request(request).unwrap_or_else(|e| alloc_failure::<T>(e))
    }

    /// Creates an array of `count` default values. Capacity is exactly `count`.
    #[must_use]
    pub fn with_default(count: usize) -> Self
    where
        T: Default,
    {
        let mut array = Self::with_capacity_request(reserve(count));
        array.write_tail(iter::repeat_with(T::default).take(count));
        array
    }

    /// Creates an array of `count` copies of `value`. Capacity is exactly `count`.
    ///
    /// Each slot gets its own value: the first `count - 1` slots receive
    /// clones and `value` itself is moved into the last one. With `count == 0`
    /// the value is dropped.
    #[must_use]
    pub fn from_elem(count: usize, value: T) -> Self
    where
        T: Clone,
    {
        let mut array = Self::with_capacity_request(reserve(count));
        if count > 0 {
            array.write_tail(iter::repeat_with(|| value.clone()).take(count - 1));
            // SAFETY: count - 1 slots are live and the last one is free.
            unsafe { array.buffer.slot_mut(count - 1).write(value) };
            array.size = count;
        }
        array
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.size
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.buffer.capacity()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    #[must_use]
    pub fn as_slice(&self) -> &[T] {
        // SAFETY: the first `size` slots are initialized; the pointer is
        // non-null and aligned even when nothing is allocated.
        unsafe { slice::from_raw_parts(self.buffer.as_ptr(), self.size) }
    }

    #[must_use]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        // SAFETY: as in `as_slice`, and `&mut self` guarantees uniqueness.
        unsafe { slice::from_raw_parts_mut(self.buffer.as_mut_ptr(), self.size) }
    }

    /// Bounds-checked access.
    ///
    /// # Errors
    ///
    /// Returns `DynArrayError::IndexOutOfRange` if `index >= len()`.
    pub fn at(&self, index: usize) -> Result<&T, DynArrayError> {
        let length = self.size;
        self.as_slice()
            .get(index)
            .ok_or(DynArrayError::IndexOutOfRange { index, length })
    }

    /// Bounds-checked mutable access.
    ///
    /// # Errors
    ///
    /// Returns `DynArrayError::IndexOutOfRange` if `index >= len()`.
    pub fn at_mut(&mut self, index: usize) -> Result<&mut T, DynArrayError> {
        let length = self.size;
        self.as_mut_slice()
            .get_mut(index)
            .ok_or(DynArrayError::IndexOutOfRange { index, length })
    }

    /// Appends `value`, doubling the capacity if the array is full.
    ///
    /// # Errors
    ///
    /// Returns `DynArrayError::OutOfMemory` if growing fails. The array is
    /// unchanged and `value` is dropped.
    pub fn try_push_back(&mut self, value: T) -> Result<(), DynArrayError> {
        if self.size == self.capacity() {
            let new_capacity = self.grown_capacity(self.size + 1)?;
            self.reallocate(new_capacity, self.size, 0)?;
        }
        // SAFETY: size < capacity here.
        unsafe { self.buffer.slot_mut(self.size).write(value) };
        self.size += 1;
        Ok(())
    }

    /// Appends `value`, doubling the capacity if the array is full.
    pub fn push_back(&mut self, value: T) {
        if let Err(e) = self.try_push_back(value) {
            alloc_failure::<T>(e);
        }
    }

    /// Removes and returns the last element.
    ///
    /// # Panics
    ///
    /// Panics if the array is empty.
    pub fn pop_back(&mut self) -> T {
        assert!(self.size > 0, "Cannot pop from empty array");
        self.size -= 1;
        // SAFETY: the slot was live and is now outside the live range.
        unsafe { ptr::read(self.buffer.slot(self.size)) }
    }

    /// Inserts `value` at `index`, shifting the tail one slot to the right.
    ///
    /// Returns the position of the inserted element, which is `index`.
    ///
    /// # Errors
    ///
    /// Returns `DynArrayError::OutOfMemory` if growing fails. The array is
    /// unchanged and `value` is dropped.
    ///
    /// # Panics
    ///
    /// Panics if `index > len()`.
    pub fn try_insert(&mut self, index: usize, value: T) -> Result<usize, DynArrayError> {
        assert!(
            index <= self.size,
            "Insertion index {} out of bounds for array of length {}",
            index,
            self.size
        );

        if self.size == self.capacity() {
            let new_capacity = self.grown_capacity(self.size + 1)?;
            self.reallocate(new_capacity, index, 1)?;
        } else {
            // SAFETY: size < capacity, so the shifted tail still fits.
            unsafe {
                let at = self.buffer.slot_mut(index);
                ptr::copy(at, at.add(1), self.size - index);
            }
        }

        // SAFETY: slot `index` was vacated above.
        unsafe { self.buffer.slot_mut(index).write(value) };
        self.size += 1;
        Ok(index)
    }

    /// Inserts `value` at `index`, shifting the tail one slot to the right.
    ///
    /// # Panics
    ///
    /// Panics if `index > len()`.
    pub fn insert(&mut self, index: usize, value: T) -> usize {
        self.try_insert(index, value)
            .unwrap_or_else(|e| alloc_failure::<T>(e))
    }

    /// Removes and returns the element at `index`, shifting the tail left.
    ///
    /// # Panics
    ///
    /// Panics if `index >= len()`.
    pub fn remove(&mut self, index: usize) -> T {
        assert!(
            index < self.size,
            "Index {} out of bounds for array of length {}",
            index,
            self.size
        );
        // SAFETY: index is live; the tail [index + 1, size) moves down by one
        // and the vacated last slot leaves the live range.
        unsafe {
            let at = self.buffer.slot_mut(index);
            let value = ptr::read(at);
            ptr::copy(at.add(1), at, self.size - index - 1);
            self.size -= 1;
            value
        }
    }

    /// Drops the element at `index` and shifts the tail left.
    ///
    /// Returns the position that now holds the element which followed the
    /// erased one (equal to `index`; equal to `len()` if the last element
    /// was erased).
    ///
    /// # Panics
    ///
    /// Panics if `index >= len()`.
    pub fn erase(&mut self, index: usize) -> usize {
        drop(self.remove(index));
        index
    }

    /// Makes the capacity exactly `new_capacity` if it is currently smaller.
    ///
    /// Unlike `Vec::reserve`, the argument is the total capacity, not the
    /// additional one. A request that does not exceed the current capacity
    /// never reallocates.
    ///
    /// # Errors
    ///
    /// Returns `DynArrayError::OutOfMemory` if the new buffer cannot be
    /// allocated. The array is unchanged.
    pub fn try_reserve(&mut self, new_capacity: usize) -> Result<(), DynArrayError> {
        if new_capacity > self.capacity() {
            self.reallocate(new_capacity, self.size, 0)?;
        }
        Ok(())
    }

    /// Makes the capacity exactly `new_capacity` if it is currently smaller.
    pub fn reserve(&mut self, new_capacity: usize) {
        if let Err(e) = self.try_reserve(new_capacity) {
            alloc_failure::<T>(e);
        }
    }

    /// Changes the length to `new_size`.
    ///
    /// Shrinking drops the tail and keeps the capacity. Growing fills the new
    /// slots with `T::default()`; if the capacity is too small it becomes the
    /// larger of twice the current capacity and `new_size`.
    ///
    /// # Errors
    ///
    /// Returns `DynArrayError::OutOfMemory` if growing fails. The array is
    /// unchanged.
    pub fn try_resize(&mut self, new_size: usize) -> Result<(), DynArrayError>
    where
        T: Default,
    {
        if new_size <= self.size {
            self.truncate(new_size);
            return Ok(());
        }
        if new_size > self.capacity() {
            let new_capacity = self.grown_capacity(new_size)?;
            self.reallocate(new_capacity, self.size, 0)?;
        }
        let missing = new_size - self.size;
        self.write_tail(iter::repeat_with(T::default).take(missing));
        Ok(())
    }

    /// Changes the length to `new_size`, default-filling new slots.
    pub fn resize(&mut self, new_size: usize)
    where
        T: Default,
    {
        if let Err(e) = self.try_resize(new_size) {
            alloc_failure::<T>(e);
        }
    }

    /// Shortens the array to `len` elements, dropping the rest.
    ///
    /// Has no effect if `len >= self.len()`. Capacity is unchanged.
    pub fn truncate(&mut self, len: usize) {
        if len >= self.size {
            return;
        }
        let tail = self.size - len;
        // Shrink first so a panicking destructor cannot cause a double drop.
        self.size = len;
        // SAFETY: [len, len + tail) were live and are no longer reachable.
        unsafe {
            let first = self.buffer.slot_mut(len);
            ptr::drop_in_place(ptr::slice_from_raw_parts_mut(first, tail));
        }
    }

    /// Drops every element. Capacity and buffer are kept.
    pub fn clear(&mut self) {
        self.truncate(0);
    }

    /// Reallocates so that the capacity equals the length.
    ///
    /// An empty array releases its buffer entirely.
    ///
    /// # Errors
    ///
    /// Returns `DynArrayError::OutOfMemory` if the smaller buffer cannot be
    /// allocated. The array is unchanged.
    pub fn try_shrink_to_fit(&mut self) -> Result<(), DynArrayError> {
        if self.size == self.capacity() {
            return Ok(());
        }
        if self.size == 0 {
            log::trace!("releasing buffer of {} slots", self.capacity());
            self.buffer.release();
            return Ok(());
        }
        self.reallocate(self.size, self.size, 0)
    }

    /// Reallocates so that the capacity equals the length.
    pub fn shrink_to_fit(&mut self) {
        if let Err(e) = self.try_shrink_to_fit() {
            alloc_failure::<T>(e);
        }
    }

    /// Exchanges contents, length and capacity with `other` in O(1).
    pub fn swap(&mut self, other: &mut Self) {
        self.buffer.exchange(&mut other.buffer);
        mem::swap(&mut self.size, &mut other.size);
    }

    /// Moves everything out of `self`, leaving it empty with no allocation.
    #[must_use]
    pub fn take(&mut self) -> Self {
        mem::take(self)
    }

    /// Replaces the contents of `self` with those of `other`, which is left
    /// empty with no allocation. The previous contents of `self` are dropped.
    pub fn assign_take(&mut self, other: &mut Self) {
        let mut incoming = other.take();
        self.swap(&mut incoming);
    }

    pub(crate) fn into_raw_parts(mut self) -> (RawBuffer<T>, usize) {
        let buffer = mem::replace(&mut self.buffer, RawBuffer::new());
        let size = mem::replace(&mut self.size, 0);
        (buffer, size)
    }

    /// Capacity for a growth step that must fit `required` live slots.
    fn grown_capacity(&self, required: usize) -> Result<usize, DynArrayError> {
        let doubled = match self.capacity() {
            0 => 1,
            capacity => capacity
                .checked_mul(2)
                .ok_or(DynArrayError::OutOfMemory { slots: usize::MAX })?,
        };
        Ok(doubled.max(required))
    }

    /// Moves the live elements into a fresh buffer of `new_capacity` slots,
    /// leaving `gap` uninitialized slots at position `at`, then releases the
    /// old buffer.
    ///
    /// Elements from `at` onwards end up `gap` slots further right; the caller
    /// must fill the gap and update `size` before anything can panic. On
    /// error nothing has been touched.
    fn reallocate(&mut self, new_capacity: usize, at: usize, gap: usize) -> Result<(), DynArrayError> {
        debug_assert!(at <= self.size);
        debug_assert!(self.size + gap <= new_capacity);

        let mut fresh = RawBuffer::allocate(new_capacity)?;
        log::trace!(
            "reallocating {} live elements: {} -> {} slots",
            self.size,
            self.capacity(),
            new_capacity
        );

        // SAFETY: both ranges are in bounds of their buffers and the two
        // allocations are distinct. The moved-from slots are never read again.
        unsafe {
            ptr::copy_nonoverlapping(self.buffer.slot(0), fresh.slot_mut(0), at);
            ptr::copy_nonoverlapping(
                self.buffer.slot(at),
                fresh.slot_mut(at + gap),
                self.size - at,
            );
        }
        // The old allocation now lives in `fresh` and is freed when it drops.
        self.buffer.exchange(&mut fresh);
        Ok(())
    }

    /// Writes `items` into the free slots after the live range, at most as
    /// many as the capacity allows. A panicking iterator drops whatever was
    /// already written and leaves the length unchanged.
    fn write_tail<I: Iterator<Item = T>>(&mut self, items: I) {
        let start = self.size;
        let room = self.capacity() - start;
        let mut guard = FillGuard::new(&mut self.buffer, start);
        for value in items.take(room) {
            // SAFETY: `take(room)` keeps every write below the capacity.
            unsafe { guard.write(value) };
        }
        let written = guard.finish();
        self.size += written;
    }
}

/// Reports an allocation failure from an infallible operation.
#[cold]
fn alloc_failure<T>(error: DynArrayError) -> ! {
    match error {
        DynArrayError::OutOfMemory { slots } => match Layout::array::<T>(slots) {
            Ok(layout) => handle_alloc_error(layout),
            Err(_) => panic!("capacity overflow"),
        },
        other => panic!("{}", other),
    }
}

impl<T> Drop for DynamicArray<T> {
    fn drop(&mut self) {
        // SAFETY: drops exactly the live prefix; RawBuffer frees the memory.
        unsafe { ptr::drop_in_place(self.as_mut_slice()) }
    }
}

impl<T> Default for DynamicArray<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> Clone for DynamicArray<T> {
    /// Copies the live elements into a buffer of exactly `len()` slots.
    fn clone(&self) -> Self {
        let mut copy = Self::with_capacity_request(reserve(self.size));
        copy.write_tail(self.iter().cloned());
        copy
    }

    /// Copy-and-swap: `self` is left untouched if cloning `source` panics.
    fn clone_from(&mut self, source: &Self) {
        let mut copy = source.clone();
        self.swap(&mut copy);
    }
}

impl<T> From<CapacityRequest> for DynamicArray<T> {
    fn from(request: CapacityRequest) -> Self {
        Self::with_capacity_request(request)
    }
}

impl<T, const N: usize> From<[T; N]> for DynamicArray<T> {
    fn from(values: [T; N]) -> Self {
        let mut array = Self::with_capacity_request(reserve(N));
        array.write_tail(values.into_iter());
        array
    }
}

impl<T: Clone> From<&[T]> for DynamicArray<T> {
    fn from(values: &[T]) -> Self {
        let mut array = Self::with_capacity_request(reserve(values.len()));
        array.write_tail(values.iter().cloned());
        array
    }
}

impl<T> FromIterator<T> for DynamicArray<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let iter = iter.into_iter();
        let mut array = Self::with_capacity_request(reserve(iter.size_hint().0));
        array.extend(iter);
        array
    }
}

impl<T> Extend<T> for DynamicArray<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.push_back(value);
        }
    }
}

impl<T> Deref for DynamicArray<T> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        self.as_slice()
    }
}

impl<T> DerefMut for DynamicArray<T> {
    fn deref_mut(&mut self) -> &mut [T] {
        self.as_mut_slice()
    }
}

impl<T> AsRef<[T]> for DynamicArray<T> {
    fn as_ref(&self) -> &[T] {
        self.as_slice()
    }
}

impl<T> AsMut<[T]> for DynamicArray<T> {
    fn as_mut(&mut self) -> &mut [T] {
        self.as_mut_slice()
    }
}

impl<T, I: SliceIndex<[T]>> Index<I> for DynamicArray<T> {
    type Output = I::Output;

    fn index(&self, index: I) -> &Self::Output {
        Index::index(self.as_slice(), index)
    }
}

impl<T, I: SliceIndex<[T]>> IndexMut<I> for DynamicArray<T> {
    fn index_mut(&mut self, index: I) -> &mut Self::Output {
        IndexMut::index_mut(self.as_mut_slice(), index)
    }
}

impl<T: fmt::Debug> fmt::Debug for DynamicArray<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self.as_slice(), f)
    }
}

impl<T: PartialEq<U>, U> PartialEq<DynamicArray<U>> for DynamicArray<T> {
    fn eq(&self, other: &DynamicArray<U>) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<T: PartialEq<U>, U, const N: usize> PartialEq<[U; N]> for DynamicArray<T> {
    fn eq(&self, other: &[U; N]) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<T: PartialEq<U>, U> PartialEq<&[U]> for DynamicArray<T> {
    fn eq(&self, other: &&[U]) -> bool {
        self.as_slice() == *other
    }
}

impl<T: Eq> Eq for DynamicArray<T> {}

impl<T: PartialOrd> PartialOrd for DynamicArray<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.as_slice().partial_cmp(other.as_slice())
    }
}

impl<T: Ord> Ord for DynamicArray<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.as_slice().cmp(other.as_slice())
    }
}

impl<T: Hash> Hash for DynamicArray<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.as_slice().hash(state);
    }
}
