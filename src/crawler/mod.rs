//! Crawler module for web page fetching and processing
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching with a bounded retry state machine
//! - The breadth-first frontier and visited set
//! - Process-wide request pacing
//! - Overall crawl coordination

mod coordinator;
mod fetcher;
mod frontier;
mod rate_limiter;
mod retry;

pub use coordinator::Coordinator;
pub use fetcher::{
    build_http_client, FetchError, FetchOutcome, FetchedResource, Fetcher, MAX_REDIRECTS,
};
pub use frontier::{EnqueueOutcome, Frontier, FrontierItem, VisitedSet};
pub use rate_limiter::RateLimiter;
pub use retry::{FailureClass, RetryDecision, RetryPolicy, RetryState};

use crate::config::CrawlConfig;
use crate::output::{CrawlReport, Record};
use crate::Result;

/// Runs a complete crawl and collects every record in memory
///
/// This is the simplest entry point: it validates the configuration,
/// crawls until the frontier or page budget is exhausted, and returns the
/// records in discovery order together with the run report.
///
/// # Arguments
///
/// * `config` - The crawl configuration
///
/// # Returns
///
/// * `Ok((records, report))` - Crawl completed
/// * `Err(HunterError)` - Invalid configuration or fatal runtime failure
pub async fn crawl(config: CrawlConfig) -> Result<(Vec<Record>, CrawlReport)> {
    let mut coordinator = Coordinator::new(config)?;
    let mut records: Vec<Record> = Vec::new();
    let report = coordinator.run(&mut records).await?;
    Ok((records, report))
}
