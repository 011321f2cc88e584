//! Output module for records and run reports
//!
//! This module handles:
//! - The record model and its deduplication key
//! - Streaming records into a sink
//! - Writing findings as CSV
//! - Reporting crawl counters

mod csv;
mod record;
pub mod stats;
mod traits;

pub use csv::{escape_field, sort_records, write_csv, write_csv_file, CSV_HEADER};
pub use record::{
    Record, RecordType, ResultKey, SourceType, NO_HITS_HINT, NO_HITS_VALUE,
};
pub use stats::{print_report, CrawlReport};
pub use traits::{OutputError, OutputResult, RecordSink};
