//! Transfer endpoints that fail every copy

use memdev::{TransferFault, TransferSink, TransferSource};

/// Sink that rejects every transfer
#[derive(Debug, Default, Clone, Copy)]
pub struct FaultSink;

impl TransferSink for FaultSink {
    fn put(&mut self, _bytes: &[u8]) -> Result<(), TransferFault> {
        Err(TransferFault::new("sink rejected transfer"))
    }
}

/// Source that fails every transfer
#[derive(Debug, Default, Clone, Copy)]
pub struct FaultSource;

impl TransferSource for FaultSource {
    fn take(&mut self, _dst: &mut [u8]) -> Result<(), TransferFault> {
        Err(TransferFault::new("source unavailable"))
    }
}
