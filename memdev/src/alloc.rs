//! Fallible buffer allocation
//!
//! The allocation seam for endpoint buffers. The store and the write data
//! path obtain every backing buffer through a `BufferAlloc` implementation,
//! so a collaborator (or a test) can substitute the allocation policy.

use std::fmt;

/// Error returned when a buffer of the requested length cannot be obtained
///
/// The operation that hit the error leaves its endpoint unchanged, so a
/// later retry is safe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllocationError {
    requested: usize,
}

impl AllocationError {
    #[must_use]
    pub fn new(requested: usize) -> Self {
        Self { requested }
    }

    /// Length of the buffer that could not be allocated
    #[must_use]
    pub fn requested(&self) -> usize {
        self.requested
    }
}

impl fmt::Display for AllocationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "failed to allocate buffer of {} bytes", self.requested)
    }
}

impl std::error::Error for AllocationError {}

/// Source of zero-filled endpoint buffers
///
/// Allocation is a single fallible operation: it either returns a buffer of
/// exactly `len` bytes or reports an error and changes nothing.
pub trait BufferAlloc: Send + Sync {
    /// Allocate a zero-filled buffer of exactly `len` bytes.
    ///
    /// # Errors
    /// Returns `AllocationError` if the backing storage cannot be obtained.
    fn alloc(&self, len: usize) -> Result<Vec<u8>, AllocationError>;
}

/// Default allocator backed by the process heap
///
/// Uses `try_reserve_exact` so an out-of-memory condition surfaces as an
/// `AllocationError` instead of aborting the process.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemAlloc;

impl BufferAlloc for SystemAlloc {
    fn alloc(&self, len: usize) -> Result<Vec<u8>, AllocationError> {
        let mut buffer = Vec::new();
        buffer
            .try_reserve_exact(len)
            .map_err(|_| AllocationError::new(len))?;
        buffer.resize(len, 0);
        Ok(buffer)
    }
}
