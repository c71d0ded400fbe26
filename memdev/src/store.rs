//! Endpoint store - owns the endpoint table and its lifecycle
//!
//! The store is the only owner of the endpoint records. There is no ambient
//! global table; every access goes through `lookup` or `attach`. Dropping
//! the store releases every buffer exactly once, while live sessions keep
//! their own endpoint alive through the `Arc`, so no session can ever
//! observe a dangling buffer.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use log::debug;

use crate::alloc::{AllocationError, BufferAlloc, SystemAlloc};
use crate::endpoint::{Endpoint, INITIAL_CONTENT};
use crate::session::{Session, SessionId};

/// Error for an endpoint index outside the table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundsError {
    index: usize,
    count: usize,
}

impl BoundsError {
    /// The out-of-range index that was requested
    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    /// Number of endpoints in the table
    #[must_use]
    pub fn count(&self) -> usize {
        self.count
    }
}

impl std::fmt::Display for BoundsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "endpoint index {} out of range (0..{})",
            self.index, self.count
        )
    }
}

impl std::error::Error for BoundsError {}

/// Table of endpoints, one per minor index
///
/// Created once at start with a fixed endpoint count, torn down by drop.
pub struct EndpointStore<A: BufferAlloc = SystemAlloc> {
    endpoints: Vec<Arc<Endpoint>>,
    alloc: Arc<A>,
    next_session_id: AtomicU64,
}

impl EndpointStore<SystemAlloc> {
    /// Create a store of `count` endpoints with the default allocator.
    ///
    /// Every endpoint starts with the 6-byte default payload `0123\n\0`.
    ///
    /// # Errors
    /// `AllocationError` if any initial buffer cannot be obtained. Buffers
    /// already allocated are released before the error returns.
    pub fn initialize(count: usize) -> Result<Self, AllocationError> {
        Self::initialize_with(count, SystemAlloc)
    }
}

impl<A: BufferAlloc> EndpointStore<A> {
    /// Create a store of `count` endpoints drawing buffers from `alloc`.
    ///
    /// # Errors
    /// `AllocationError` if any initial buffer cannot be obtained. Buffers
    /// already allocated are released before the error returns.
    pub fn initialize_with(count: usize, alloc: A) -> Result<Self, AllocationError> {
        let alloc = Arc::new(alloc);
        let mut endpoints = Vec::with_capacity(count);
        for index in 0..count {
            let mut buffer = alloc.alloc(INITIAL_CONTENT.len())?;
            buffer.copy_from_slice(&INITIAL_CONTENT);
            endpoints.push(Arc::new(Endpoint::new(buffer)));
            debug!("endpoint {index} initialized, size {}", INITIAL_CONTENT.len());
        }
        Ok(Self {
            endpoints,
            alloc,
            next_session_id: AtomicU64::new(1),
        })
    }

    /// Number of endpoints in the table
    #[must_use]
    pub fn endpoint_count(&self) -> usize {
        self.endpoints.len()
    }

    /// Get the endpoint at `index`.
    ///
    /// # Errors
    /// `BoundsError` if `index` is outside the table.
    pub fn lookup(&self, index: usize) -> Result<&Arc<Endpoint>, BoundsError> {
        self.endpoints.get(index).ok_or(BoundsError {
            index,
            count: self.endpoints.len(),
        })
    }

    /// Open a session on the endpoint at `index`, cursor at zero.
    ///
    /// Any number of sessions may be attached to the same endpoint at the
    /// same time; the endpoint lock serializes their transfers.
    ///
    /// # Errors
    /// `BoundsError` if `index` is outside the table.
    pub fn attach(&self, index: usize) -> Result<Session<A>, BoundsError> {
        let endpoint = Arc::clone(self.lookup(index)?);
        let id = SessionId::new(self.next_session_id.fetch_add(1, Ordering::Relaxed));
        debug!("{id:?} attached to endpoint {index}");
        Ok(Session::new(id, endpoint, Arc::clone(&self.alloc)))
    }
}

impl<A: BufferAlloc> std::fmt::Debug for EndpointStore<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "EndpointStore(endpoints={})", self.endpoints.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initialize_seeds_default_payload() {
        let store = EndpointStore::initialize(3).unwrap();
        assert_eq!(store.endpoint_count(), 3);
        for index in 0..3 {
            let ep = store.lookup(index).unwrap();
            assert_eq!(ep.len(), 6);
            assert_eq!(ep.snapshot(), b"0123\n\0");
        }
    }

    #[test]
    fn test_lookup_out_of_range() {
        let store = EndpointStore::initialize(2).unwrap();
        let err = store.lookup(2).unwrap_err();
        assert_eq!(err.index(), 2);
        assert_eq!(err.count(), 2);
    }

    #[test]
    fn test_attach_out_of_range() {
        let store = EndpointStore::initialize(1).unwrap();
        assert!(store.attach(5).is_err());
    }

    #[test]
    fn test_store_debug_format() {
        let store = EndpointStore::initialize(2).unwrap();
        assert_eq!(format!("{store:?}"), "EndpointStore(endpoints=2)");
    }
}
