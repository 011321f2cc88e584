//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `CrawlState`: lifecycle of one run (idle, running, draining, done)
//! - `SkipReason`: why a dequeued URL was dropped without records

mod crawl_state;
mod skip_reason;

pub use crawl_state::CrawlState;
pub use skip_reason::SkipReason;
