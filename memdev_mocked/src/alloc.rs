//! Allocators with injectable failure

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use memdev::{AllocationError, BufferAlloc, SystemAlloc};

/// Allocator that refuses every request
#[derive(Debug, Default, Clone, Copy)]
pub struct FailingAlloc;

impl BufferAlloc for FailingAlloc {
    fn alloc(&self, len: usize) -> Result<Vec<u8>, AllocationError> {
        Err(AllocationError::new(len))
    }
}

/// Allocator that grants a fixed number of requests, then fails
///
/// Counts every call. Clones share the same budget and counter, so a test
/// can keep one handle while the store owns the other.
#[derive(Debug, Clone)]
pub struct CountingAlloc {
    budget: Arc<AtomicUsize>,
    calls: Arc<AtomicUsize>,
}

impl CountingAlloc {
    #[must_use]
    pub fn with_budget(budget: usize) -> Self {
        Self {
            budget: Arc::new(AtomicUsize::new(budget)),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Total number of allocation calls seen so far
    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::Relaxed)
    }
}

impl BufferAlloc for CountingAlloc {
    fn alloc(&self, len: usize) -> Result<Vec<u8>, AllocationError> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        let granted = self
            .budget
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |n| n.checked_sub(1))
            .is_ok();
        if granted {
            SystemAlloc.alloc(len)
        } else {
            Err(AllocationError::new(len))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failing_alloc_always_fails() {
        assert!(FailingAlloc.alloc(1).is_err());
        assert!(FailingAlloc.alloc(0).is_err());
    }

    #[test]
    fn test_counting_alloc_exhausts_budget() {
        let alloc = CountingAlloc::with_budget(2);
        assert!(alloc.alloc(4).is_ok());
        assert!(alloc.alloc(4).is_ok());
        assert!(alloc.alloc(4).is_err());
        assert_eq!(alloc.calls(), 3);
    }

    #[test]
    fn test_counting_alloc_clones_share_state() {
        let alloc = CountingAlloc::with_budget(1);
        let clone = alloc.clone();
        assert!(clone.alloc(4).is_ok());
        assert!(alloc.alloc(4).is_err());
        assert_eq!(alloc.calls(), 2);
    }
}
