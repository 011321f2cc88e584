//! End-of-run report
//!
//! This module collects per-run counters from the coordinator and prints
//! them once the crawl is done.

use crate::state::{CrawlState, SkipReason};
use std::collections::BTreeMap;

/// Counters describing one crawl run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlReport {
    /// Successful fetches (counted against the page budget)
    pub pages_fetched: u32,

    /// Records handed to the sink
    pub records_emitted: u64,

    /// Skipped frontier items, by reason
    pub skipped: BTreeMap<SkipReason, u64>,

    /// Items still queued when the run ended
    pub frontier_remaining: usize,

    /// State the coordinator finished in
    pub final_state: CrawlState,
}

impl Default for CrawlReport {
    fn default() -> Self {
        Self {
            pages_fetched: 0,
            records_emitted: 0,
            skipped: BTreeMap::new(),
            frontier_remaining: 0,
            final_state: CrawlState::Idle,
        }
    }
}

impl CrawlReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Counts one skipped item
    pub fn record_skip(&mut self, reason: SkipReason) {
        *self.skipped.entry(reason).or_insert(0) += 1;
    }

    /// Number of items skipped for one reason
    pub fn skipped_for(&self, reason: SkipReason) -> u64 {
        self.skipped.get(&reason).copied().unwrap_or(0)
    }

    pub fn total_skipped(&self) -> u64 {
        self.skipped.values().sum()
    }

    /// Skips caused by policy rather than failure
    pub fn policy_skips(&self) -> u64 {
        self.skipped
            .iter()
            .filter(|(reason, _)| reason.is_policy())
            .map(|(_, count)| count)
            .sum()
    }
}

/// Prints the report to stdout in a formatted manner
///
/// # Arguments
///
/// * `report` - The report to display
pub fn print_report(report: &CrawlReport) {
    println!("=== Crawl Report ===\n");

    println!("Overview:");
    println!("  Final state: {}", report.final_state);
    println!("  Pages fetched: {}", report.pages_fetched);
    println!("  Records emitted: {}", report.records_emitted);
    println!("  Frontier remaining: {}", report.frontier_remaining);
    println!();

    if !report.skipped.is_empty() {
        println!("Skipped ({} total):", report.total_skipped());
        let mut counts: Vec<_> = report.skipped.iter().collect();
        counts.sort_by(|a, b| b.1.cmp(a.1));

        for (reason, count) in counts {
            println!("  {}: {}", reason, count);
        }
        println!();
    }
}
