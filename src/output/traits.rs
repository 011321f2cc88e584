//! Record sink trait and output errors
//!
//! The crawl engine streams records into a [`RecordSink`] as they are
//! discovered; the caller decides whether to buffer, print or persist them.

use crate::output::Record;
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to write output: {0}")]
    Write(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Consumer of emitted records
///
/// Records arrive in discovery order. A sink error aborts the crawl; every
/// record emitted before it stays with the sink.
pub trait RecordSink {
    /// Accepts one record
    ///
    /// # Arguments
    ///
    /// * `record` - The record to accept
    fn emit(&mut self, record: Record) -> OutputResult<()>;

    /// Flushes buffered records, if any
    fn flush(&mut self) -> OutputResult<()> {
        Ok(())
    }
}

impl RecordSink for Vec<Record> {
    fn emit(&mut self, record: Record) -> OutputResult<()> {
        self.push(record);
        Ok(())
    }
}
