use thiserror::Error;

/// Error types for `DynamicArray` operations
#[derive(Error, Debug, PartialEq, Eq, Clone)]
pub enum DynArrayError {
    /// The backing allocation could not be satisfied
    #[error("Out of memory: cannot allocate a buffer of {slots} slots")]
    OutOfMemory {
        /// Number of slots that were requested
        slots: usize,
    },
    /// Checked access beyond the live elements
    #[error("Index out of range: index {index} is beyond array length {length}")]
    IndexOutOfRange {
        /// Index that was accessed
        index: usize,
        /// Current length of the array
        length: usize,
    },
}
