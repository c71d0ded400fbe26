//! Transfer seam between the core and its transport
//!
//! Models the boundary where bytes cross into or out of the caller's space.
//! An in-process caller uses plain slices; a transport whose copies can fail
//! implements the traits and reports `TransferFault`.

use std::fmt;

/// Error for a copy to or from the caller that could not complete
///
/// A fault is reported to the caller as-is; the core never retries and
/// never advances the session offset on this path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferFault {
    reason: String,
}

impl TransferFault {
    #[must_use]
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl fmt::Display for TransferFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "transfer fault: {}", self.reason)
    }
}

impl std::error::Error for TransferFault {}

/// Destination of one read
///
/// Receives the effective bytes of a read in a single call. Either all
/// bytes land or a fault is reported.
pub trait TransferSink {
    /// Accept `bytes`.
    ///
    /// # Errors
    /// Returns `TransferFault` if the destination cannot take the bytes.
    fn put(&mut self, bytes: &[u8]) -> Result<(), TransferFault>;
}

/// Source of one write
///
/// Fills the destination slice with the effective bytes of a write in a
/// single call.
pub trait TransferSource {
    /// Fill `dst` completely.
    ///
    /// # Errors
    /// Returns `TransferFault` if the source cannot provide the bytes. The
    /// destination contents are unspecified on the fault path.
    fn take(&mut self, dst: &mut [u8]) -> Result<(), TransferFault>;
}

/// Sink writing into a caller-provided slice
///
/// Tracks how much of the slice has been filled, so one sink can receive
/// several consecutive transfers.
pub struct SliceSink<'a> {
    dst: &'a mut [u8],
    filled: usize,
}

impl<'a> SliceSink<'a> {
    #[must_use]
    pub fn new(dst: &'a mut [u8]) -> Self {
        Self { dst, filled: 0 }
    }

    /// Number of bytes received so far
    #[must_use]
    pub fn filled(&self) -> usize {
        self.filled
    }
}

impl TransferSink for SliceSink<'_> {
    fn put(&mut self, bytes: &[u8]) -> Result<(), TransferFault> {
        let end = self.filled + bytes.len();
        let Some(slot) = self.dst.get_mut(self.filled..end) else {
            return Err(TransferFault::new("destination slice too small"));
        };
        slot.copy_from_slice(bytes);
        self.filled = end;
        Ok(())
    }
}

impl TransferSink for Vec<u8> {
    fn put(&mut self, bytes: &[u8]) -> Result<(), TransferFault> {
        self.extend_from_slice(bytes);
        Ok(())
    }
}

impl TransferSource for &[u8] {
    fn take(&mut self, dst: &mut [u8]) -> Result<(), TransferFault> {
        if dst.len() > self.len() {
            return Err(TransferFault::new("source exhausted"));
        }
        let (head, tail) = self.split_at(dst.len());
        dst.copy_from_slice(head);
        *self = tail;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slice_sink_tracks_fill() {
        let mut buf = [0u8; 8];
        let mut sink = SliceSink::new(&mut buf);
        sink.put(b"ab").unwrap();
        sink.put(b"cd").unwrap();
        assert_eq!(sink.filled(), 4);
        assert_eq!(&buf[..4], b"abcd");
    }

    #[test]
    fn test_slice_sink_rejects_overflow() {
        let mut buf = [0u8; 2];
        let mut sink = SliceSink::new(&mut buf);
        assert!(sink.put(b"abc").is_err());
    }

    #[test]
    fn test_slice_source_advances() {
        let mut source: &[u8] = b"hello";
        let mut dst = [0u8; 3];
        source.take(&mut dst).unwrap();
        assert_eq!(&dst, b"hel");
        let mut rest = [0u8; 2];
        source.take(&mut rest).unwrap();
        assert_eq!(&rest, b"lo");
    }

    #[test]
    fn test_slice_source_exhausted() {
        let mut source: &[u8] = b"ab";
        let mut dst = [0u8; 3];
        assert!(source.take(&mut dst).is_err());
    }
}
