use alloc::alloc::{alloc, dealloc, Layout};
use core::marker::PhantomData;
use core::mem;
use core::ptr::NonNull;

use crate::error::DynArrayError;

/// Owner of one fixed-size allocation of uninitialized `T` slots.
///
/// The buffer knows nothing about which slots hold live values: it never
/// drops elements, only the allocation itself. A buffer with capacity 0
/// (or any buffer of a zero-sized `T`) holds no allocation.
pub(crate) struct RawBuffer<T> {
    ptr: NonNull<T>,
    capacity: usize,
    _marker: PhantomData<T>,
}

// SAFETY: the buffer uniquely owns its allocation, like `Box<[T]>`.
unsafe impl<T: Send> Send for RawBuffer<T> {}
// SAFETY: shared access only hands out `*const T`.
unsafe impl<T: Sync> Sync for RawBuffer<T> {}

impl<T> RawBuffer<T> {
    pub(crate) const fn new() -> Self {
        Self {
            ptr: NonNull::dangling(),
            capacity: 0,
            _marker: PhantomData,
        }
    }

    /// Allocates a buffer of `slots` uninitialized slots.
    ///
    /// # Errors
    ///
    /// Returns `DynArrayError::OutOfMemory` if the byte size of the buffer
    /// overflows or the allocator cannot satisfy the request.
    pub(crate) fn allocate(slots: usize) -> Result<Self, DynArrayError> {
        if slots == 0 {
            return Ok(Self::new());
        }
        let layout =
            Layout::array::<T>(slots).map_err(|_| DynArrayError::OutOfMemory { slots })?;
        if layout.size() == 0 {
            return Ok(Self {
                ptr: NonNull::dangling(),
                capacity: slots,
                _marker: PhantomData,
            });
        }

        // SAFETY: layout has non-zero size.
        let raw = unsafe { alloc(layout) };
        let Some(ptr) = NonNull::new(raw.cast::<T>()) else {
            log::debug!("allocation of {} slots ({} bytes) failed", slots, layout.size());
            return Err(DynArrayError::OutOfMemory { slots });
        };
        Ok(Self {
            ptr,
            capacity: slots,
            _marker: PhantomData,
        })
    }

    #[inline]
    pub(crate) fn capacity(&self) -> usize {
        self.capacity
    }

    #[inline]
    pub(crate) fn as_ptr(&self) -> *const T {
        self.ptr.as_ptr()
    }

    #[inline]
    pub(crate) fn as_mut_ptr(&mut self) -> *mut T {
        self.ptr.as_ptr()
    }

    /// Raw pointer to slot `index`.
    ///
    /// # Safety
    ///
    /// `index` must not exceed the capacity. Pointing one past the last slot
    /// is allowed, dereferencing it is not.
    #[inline]
    pub(crate) unsafe fn slot(&self, index: usize) -> *const T {
        debug_assert!(index <= self.capacity);
        unsafe { self.as_ptr().add(index) }
    }

    /// Mutable raw pointer to slot `index`.
    ///
    /// # Safety
    ///
    /// Same contract as [`RawBuffer::slot`].
    #[inline]
    pub(crate) unsafe fn slot_mut(&mut self, index: usize) -> *mut T {
        debug_assert!(index <= self.capacity);
        unsafe { self.as_mut_ptr().add(index) }
    }

    /// Swaps the identities of two buffers. No element is touched.
    #[inline]
    pub(crate) fn exchange(&mut self, other: &mut Self) {
        mem::swap(self, other);
    }

    /// Frees the allocation and leaves the buffer empty.
    ///
    /// Live values still in the slots are leaked, not dropped; callers drop
    /// them first.
    pub(crate) fn release(&mut self) {
        if self.capacity != 0 && mem::size_of::<T>() != 0 {
            // The layout was validated when this buffer was allocated.
            if let Ok(layout) = Layout::array::<T>(self.capacity) {
                // SAFETY: ptr came from `alloc` with this exact layout.
                unsafe { dealloc(self.ptr.as_ptr().cast(), layout) };
            }
        }
        self.ptr = NonNull::dangling();
        self.capacity = 0;
    }
}

impl<T> Drop for RawBuffer<T> {
    fn drop(&mut self) {
        self.release();
    }
}

/// Drops the initialized prefix of a buffer being filled if filling unwinds.
///
/// On the success path the caller disarms it with [`FillGuard::finish`].
pub(crate) struct FillGuard<'a, T> {
    buffer: &'a mut RawBuffer<T>,
    start: usize,
    written: usize,
}

impl<'a, T> FillGuard<'a, T> {
    pub(crate) fn new(buffer: &'a mut RawBuffer<T>, start: usize) -> Self {
        Self {
            buffer,
            start,
            written: 0,
        }
    }

    /// Writes `value` into the next slot.
    ///
    /// # Safety
    ///
    /// `start + written` must be less than the buffer capacity.
    #[inline]
    pub(crate) unsafe fn write(&mut self, value: T) {
        unsafe { self.buffer.slot_mut(self.start + self.written).write(value) };
        self.written += 1;
    }

    /// Disarms the guard, returning how many slots were written.
    pub(crate) fn finish(self) -> usize {
        let written = self.written;
        mem::forget(self);
        written
    }
}

impl<T> Drop for FillGuard<'_, T> {
    fn drop(&mut self) {
        // SAFETY: exactly `written` slots from `start` were initialized.
        unsafe {
            let first = self.buffer.slot_mut(self.start);
            core::ptr::drop_in_place(core::ptr::slice_from_raw_parts_mut(first, self.written));
        }
    }
}
