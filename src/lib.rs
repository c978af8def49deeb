#![no_std]

//! `DynamicArray`: a resizable, contiguously stored sequence container.
//!
//! The array owns a single heap buffer and tracks how many of its slots hold
//! live values (`len`) versus how many are allocated (`capacity`). Appends are
//! amortized O(1): when the buffer is full its capacity doubles, starting
//! from 1.
//!
//! This crate is `no_std` compatible; it needs only `alloc`.
//!
//! # Growth protocol
//!
//! Every operation that needs one more slot than the buffer has follows the
//! same sequence:
//!
//! 1. allocate a fresh buffer of `max(1, 2 * capacity)` slots (a bulk
//!    [`resize`](DynamicArray::resize) asks for `max(2 * capacity, new_len)`),
//! 2. move the live elements into it in order, leaving room for new ones,
//! 3. place the new element(s),
//! 4. swap the buffers and release the old one.
//!
//! If step 1 fails nothing has changed, so the `try_` variants can report
//! `DynArrayError::OutOfMemory` with the array still intact.
//!
//! ```
//! # use dynarray::DynamicArray;
//! let mut array = DynamicArray::new();
//! for i in 0..5 {
//!     array.push_back(i);
//! }
//! assert_eq!(array.len(), 5);
//! assert_eq!(array.capacity(), 8);
//! ```
//!
//! # Construction
//!
//! ```
//! # use dynarray::{dynarray, reserve, DynamicArray};
//! let zeros: DynamicArray<u8> = DynamicArray::with_default(3);
//! assert_eq!(zeros, [0, 0, 0]);
//!
//! let words = DynamicArray::from_elem(2, String::from("hi"));
//! assert_eq!(words, ["hi", "hi"]);
//!
//! let literal = dynarray![1, 2, 3];
//! assert_eq!(literal.capacity(), 3);
//!
//! let reserved: DynamicArray<u64> = DynamicArray::from(reserve(16));
//! assert!(reserved.is_empty());
//! assert_eq!(reserved.capacity(), 16);
//! ```
//!
//! # Positions
//!
//! Positions are indices. [`insert`](DynamicArray::insert) returns the index of
//! the new element and [`erase`](DynamicArray::erase) returns the index of the
//! element that followed the erased one, so insert-then-erase at the same
//! position is a no-op:
//!
//! ```
//! # use dynarray::dynarray;
//! let mut array = dynarray![10, 30];
//! let at = array.insert(1, 20);
//! assert_eq!(array, [10, 20, 30]);
//! assert_eq!(array.erase(at), 1);
//! assert_eq!(array, [10, 30]);
//! ```
//!
//! # Checked access
//!
//! ```
//! # use dynarray::{dynarray, DynArrayError};
//! let array = dynarray!['a', 'b'];
//! assert_eq!(array.at(1), Ok(&'b'));
//! assert_eq!(
//!     array.at(2),
//!     Err(DynArrayError::IndexOutOfRange { index: 2, length: 2 })
//! );
//! ```

extern crate alloc;

mod core;
mod error;
mod iter;
mod raw_buffer;

// Re-export public types
pub use crate::core::{reserve, CapacityRequest, DynamicArray};
pub use crate::error::DynArrayError;
pub use crate::iter::IntoIter;

/// Creates a [`DynamicArray`] from a list of elements or from `value; count`.
///
/// The list form gives an array whose capacity equals its length. The
/// repeat form calls [`DynamicArray::from_elem`], so the value must be `Clone`.
///
/// ```
/// # use dynarray::dynarray;
/// let array = dynarray![1, 2, 3];
/// assert_eq!(array, [1, 2, 3]);
///
/// let filled = dynarray![7u8; 4];
/// assert_eq!(filled, [7, 7, 7, 7]);
/// ```
#[macro_export]
macro_rules! dynarray {
    () => {
        $crate::DynamicArray::new()
    };
    ($value:expr; $count:expr) => {
        $crate::DynamicArray::from_elem($count, $value)
    };
    ($($value:expr),+ $(,)?) => {
        $crate::DynamicArray::from([$($value),+])
    };
}
