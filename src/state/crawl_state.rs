//! Crawl lifecycle states

use std::fmt;

/// Lifecycle state of a crawl run
///
/// A run moves strictly forward: `Idle -> Running -> Draining -> Done`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CrawlState {
    /// Coordinator built, seeds enqueued, nothing fetched yet
    Idle,

    /// Main loop is dequeuing and fetching
    Running,

    /// A termination condition was met; the sink is being flushed
    Draining,

    /// Frontier empty or page budget exhausted
    Done,
}

impl CrawlState {
    /// Returns true if moving from `self` to `next` is a legal transition
    pub fn can_transition_to(&self, next: CrawlState) -> bool {
        matches!(
            (self, next),
            (Self::Idle, Self::Running)
                | (Self::Running, Self::Draining)
                | (Self::Draining, Self::Done)
        )
    }

    /// Returns true once the run has finished
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Running => "running",
            Self::Draining => "draining",
            Self::Done => "done",
        }
    }
}

impl fmt::Display for CrawlState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
