//! In-memory multi-endpoint byte storage
//!
//! A fixed table of independently addressable endpoints, each backed by one
//! resizable in-memory buffer, driven through a uniform attach/read/write/
//! detach contract. A write whose declared length differs from the current
//! buffer size replaces the whole buffer first, without ever exposing a
//! torn `(buffer, size)` pair to a concurrent reader.
//!
//! The core is synchronous and introduces no threads of its own; a
//! transport layer (virtual filesystem, socket server, RPC frontend) drives
//! it and owns any blocking, retries, and seek semantics.

pub mod alloc;
pub mod endpoint;
pub mod session;
pub mod store;
pub mod transfer;

// Re-export the allocation seam for convenience
pub use alloc::{AllocationError, BufferAlloc, SystemAlloc};

// Re-export the endpoint data path types for convenience
pub use endpoint::{Endpoint, WriteError, INITIAL_CONTENT};

// Re-export session and store types for convenience
pub use session::{Session, SessionId};
pub use store::{BoundsError, EndpointStore};

// Re-export the transfer seam for convenience
pub use transfer::{SliceSink, TransferFault, TransferSink, TransferSource};
