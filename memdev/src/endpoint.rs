//! Per-endpoint data path
//!
//! Each endpoint owns one resizable byte buffer behind a mutex. The buffer
//! and its size are one value: the vector's length is the endpoint's size,
//! and both change together in a single swap under the lock, so no reader
//! can observe a torn pair.
//!
//! # Thread Safety
//!
//! All reads and writes against the same endpoint are serialized by the
//! endpoint's `parking_lot::Mutex`, held for the whole resize + bounds +
//! copy sequence and released on every exit path when the guard drops.
//! Endpoints are independent of each other and share no state.

use parking_lot::Mutex;
use std::fmt;

use log::trace;

use crate::alloc::{AllocationError, BufferAlloc};
use crate::transfer::{TransferFault, TransferSink, TransferSource};

/// Content every endpoint holds right after store initialization:
/// four printable bytes, a newline, and a zero terminator.
pub const INITIAL_CONTENT: [u8; 6] = *b"0123\n\0";

/// Error from the write data path
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteError {
    /// The replacement buffer for a resize could not be allocated.
    /// The endpoint keeps its previous buffer unchanged.
    Allocation(AllocationError),
    /// The copy from the caller failed. A resize that already happened
    /// in the same call stands.
    Fault(TransferFault),
}

impl fmt::Display for WriteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Allocation(e) => write!(f, "write failed: {e}"),
            Self::Fault(e) => write!(f, "write failed: {e}"),
        }
    }
}

impl std::error::Error for WriteError {}

impl From<AllocationError> for WriteError {
    fn from(e: AllocationError) -> Self {
        Self::Allocation(e)
    }
}

impl From<TransferFault> for WriteError {
    fn from(e: TransferFault) -> Self {
        Self::Fault(e)
    }
}

/// One independently addressable unit of byte storage
///
/// Created and owned by the store; sessions reach it through an `Arc` and
/// never outlive the buffer they read.
pub struct Endpoint {
    data: Mutex<Vec<u8>>,
}

impl Endpoint {
    pub(crate) fn new(buffer: Vec<u8>) -> Self {
        Self {
            data: Mutex::new(buffer),
        }
    }

    /// Current size of the backing buffer
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.lock().len()
    }

    /// Check if the buffer is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.lock().is_empty()
    }

    /// Copy of the current contents
    #[must_use]
    pub fn snapshot(&self) -> Vec<u8> {
        self.data.lock().clone()
    }

    /// Copy up to `len` bytes starting at `offset` into `sink`.
    ///
    /// The effective length is `len` clamped to what remains between
    /// `offset` and the buffer's size. Returns the number of bytes
    /// transferred; `Ok(0)` means the offset is at or past the end of the
    /// data, which is not an error. The buffer is never mutated.
    ///
    /// # Errors
    /// `TransferFault` if the sink rejects the copy. The caller must not
    /// advance its offset on this path.
    pub fn read_at(
        &self,
        offset: usize,
        len: usize,
        sink: &mut dyn TransferSink,
    ) -> Result<usize, TransferFault> {
        let data = self.data.lock();
        let effective = data.len().saturating_sub(offset).min(len);
        trace!("read_at offset={offset} len={len} effective={effective}");
        if effective == 0 {
            return Ok(0);
        }
        sink.put(&data[offset..offset + effective])?;
        Ok(effective)
    }

    /// Copy up to `len` bytes from `source` into the buffer at `offset`,
    /// replacing the buffer first when `len` differs from the current size.
    ///
    /// The resize allocates a fresh buffer of exactly `len` bytes, keeps
    /// the old content prefix (realloc semantics), and swaps the whole
    /// buffer in one step under the endpoint lock. The effective length is
    /// then recomputed against the new size; `Ok(0)` means nothing was
    /// left to copy.
    ///
    /// # Errors
    /// - `WriteError::Allocation` if the replacement buffer cannot be
    ///   obtained; the endpoint is left byte-for-byte as it was.
    /// - `WriteError::Fault` if the source fails mid-copy; a resize that
    ///   already committed is kept, since it is an independent state change
    ///   the caller asked for. The caller must not advance its offset.
    pub fn write_at<A: BufferAlloc>(
        &self,
        offset: usize,
        len: usize,
        source: &mut dyn TransferSource,
        alloc: &A,
    ) -> Result<usize, WriteError> {
        let mut data = self.data.lock();

        if len != data.len() {
            let mut replacement = alloc.alloc(len)?;
            let keep = data.len().min(len);
            replacement[..keep].copy_from_slice(&data[..keep]);
            *data = replacement;
        }

        let effective = data.len().saturating_sub(offset).min(len);
        trace!("write_at offset={offset} len={len} effective={effective}");
        if effective == 0 {
            return Ok(0);
        }
        source.take(&mut data[offset..offset + effective])?;
        Ok(effective)
    }
}

impl fmt::Debug for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Endpoint(size={})", self.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alloc::SystemAlloc;

    fn endpoint(content: &[u8]) -> Endpoint {
        Endpoint::new(content.to_vec())
    }

    #[test]
    fn test_read_at_clamps_to_size() {
        let ep = endpoint(b"0123\n\0");
        let mut out = Vec::new();
        let n = ep.read_at(0, 100, &mut out).unwrap();
        assert_eq!(n, 6);
        assert_eq!(out, b"0123\n\0");
    }

    #[test]
    fn test_read_at_end_of_data() {
        let ep = endpoint(b"0123\n\0");
        let mut out = Vec::new();
        assert_eq!(ep.read_at(6, 10, &mut out).unwrap(), 0);
        assert_eq!(ep.read_at(100, 10, &mut out).unwrap(), 0);
        assert!(out.is_empty());
    }

    #[test]
    fn test_write_at_same_size_overwrites_in_place() {
        let ep = endpoint(b"abcdef");
        let mut source: &[u8] = b"xyzxyz";
        let n = ep.write_at(0, 6, &mut source, &SystemAlloc).unwrap();
        assert_eq!(n, 6);
        assert_eq!(ep.snapshot(), b"xyzxyz");
    }

    #[test]
    fn test_write_at_grows_and_keeps_prefix() {
        let ep = endpoint(b"ab");
        // Declared length 4, but copy only past the old content
        let mut source: &[u8] = b"cd";
        let n = ep.write_at(2, 4, &mut source, &SystemAlloc).unwrap();
        assert_eq!(n, 2);
        assert_eq!(ep.snapshot(), b"abcd");
    }

    #[test]
    fn test_write_at_shrinks() {
        let ep = endpoint(b"abcdef");
        let mut source: &[u8] = b"xy";
        let n = ep.write_at(0, 2, &mut source, &SystemAlloc).unwrap();
        assert_eq!(n, 2);
        assert_eq!(ep.len(), 2);
        assert_eq!(ep.snapshot(), b"xy");
    }

    #[test]
    fn test_write_at_zero_length_empties_endpoint() {
        let ep = endpoint(b"abcdef");
        let mut source: &[u8] = b"";
        let n = ep.write_at(0, 0, &mut source, &SystemAlloc).unwrap();
        assert_eq!(n, 0);
        assert!(ep.is_empty());
        assert_eq!(ep.len(), 0);
    }

    #[test]
    fn test_write_at_offset_past_new_size_copies_nothing() {
        let ep = endpoint(b"abcdef");
        // Resize to 2 happens, then the offset is past the new end
        let mut source: &[u8] = b"zz";
        let n = ep.write_at(4, 2, &mut source, &SystemAlloc).unwrap();
        assert_eq!(n, 0);
        assert_eq!(ep.snapshot(), b"ab");
    }
}
