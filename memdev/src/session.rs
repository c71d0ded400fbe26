//! Session - a caller's open handle onto one endpoint
//!
//! A session binds to exactly one endpoint for its lifetime and carries the
//! offset cursor for a sequence of reads and writes. All state lives in the
//! endpoint; detaching a session releases nothing but its reference.

use std::fmt;
use std::sync::Arc;

use log::debug;

use crate::alloc::BufferAlloc;
use crate::endpoint::{Endpoint, WriteError};
use crate::transfer::{SliceSink, TransferFault, TransferSink, TransferSource};

/// Identifier for one attached session, used for log correlation
///
/// Carries no capability; the session itself is the handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionId(u64);

impl SessionId {
    pub(crate) fn new(id: u64) -> Self {
        Self(id)
    }

    #[must_use]
    pub fn value(&self) -> u64 {
        self.0
    }
}

/// Per-open handle bound to one endpoint
///
/// Many sessions may be attached to the same endpoint at the same time;
/// the endpoint lock serializes their transfers. The offset cursor is
/// advanced only by the bytes actually transferred, never on a fault.
pub struct Session<A: BufferAlloc> {
    id: SessionId,
    endpoint: Arc<Endpoint>,
    alloc: Arc<A>,
    offset: usize,
}

impl<A: BufferAlloc> Session<A> {
    pub(crate) fn new(id: SessionId, endpoint: Arc<Endpoint>, alloc: Arc<A>) -> Self {
        Self {
            id,
            endpoint,
            alloc,
            offset: 0,
        }
    }

    /// Identifier of this session
    #[must_use]
    pub fn id(&self) -> SessionId {
        self.id
    }

    /// Current offset cursor
    #[must_use]
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// The endpoint this session is attached to
    #[must_use]
    pub fn endpoint(&self) -> &Arc<Endpoint> {
        &self.endpoint
    }

    /// Read from the current offset into `buf` and advance the offset.
    ///
    /// Returns the number of bytes read; `Ok(0)` signals end of data.
    ///
    /// # Errors
    /// `TransferFault` if the copy to the destination fails; the offset is
    /// not advanced.
    pub fn read(&mut self, buf: &mut [u8]) -> Result<usize, TransferFault> {
        let len = buf.len();
        let mut sink = SliceSink::new(buf);
        self.read_into(&mut sink, len)
    }

    /// Read up to `len` bytes from the current offset into `sink`.
    ///
    /// # Errors
    /// `TransferFault` if the sink rejects the copy; the offset is not
    /// advanced.
    pub fn read_into(
        &mut self,
        sink: &mut dyn TransferSink,
        len: usize,
    ) -> Result<usize, TransferFault> {
        let n = self.endpoint.read_at(self.offset, len, sink)?;
        debug!("{:?} read {n} bytes at offset {}", self.id, self.offset);
        self.offset += n;
        Ok(n)
    }

    /// Write `data` at the current offset and advance the offset.
    ///
    /// The declared length is `data.len()`; if it differs from the
    /// endpoint's current size, the endpoint buffer is replaced first.
    ///
    /// # Errors
    /// See [`Endpoint::write_at`]. The offset is not advanced on any
    /// error path.
    pub fn write(&mut self, data: &[u8]) -> Result<usize, WriteError> {
        let mut source: &[u8] = data;
        self.write_from(&mut source, data.len())
    }

    /// Write `len` bytes pulled from `source` at the current offset.
    ///
    /// # Errors
    /// See [`Endpoint::write_at`]. The offset is not advanced on any
    /// error path, even when the resize already committed.
    pub fn write_from(
        &mut self,
        source: &mut dyn TransferSource,
        len: usize,
    ) -> Result<usize, WriteError> {
        let n = self
            .endpoint
            .write_at(self.offset, len, source, self.alloc.as_ref())?;
        debug!("{:?} wrote {n} bytes at offset {}", self.id, self.offset);
        self.offset += n;
        Ok(n)
    }

    /// Close the session.
    ///
    /// Mutations already landed in the endpoint; there is nothing to flush.
    pub fn detach(self) {
        debug!("{:?} detached", self.id);
    }
}

impl<A: BufferAlloc> fmt::Debug for Session<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Session(id={}, offset={}, endpoint_size={})",
            self.id.0,
            self.offset,
            self.endpoint.len()
        )
    }
}
