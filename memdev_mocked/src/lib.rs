//! Test doubles for the memdev fallible seams
//!
//! Allocator and transfer implementations that fail on demand, so tests can
//! drive the data path's failure branches:
//!
//! - `FailingAlloc` refuses every allocation.
//! - `CountingAlloc` grants a fixed budget of allocations, then fails, and
//!   counts every call.
//! - `FaultSink` / `FaultSource` fail every transfer.

pub mod alloc;
pub mod transfer;

pub use alloc::{CountingAlloc, FailingAlloc};
pub use transfer::{FaultSink, FaultSource};
