//! Bounded retry state machine for the fetcher
//!
//! Each failed attempt is classified and fed to a [`RetryState`], which
//! answers either "retry after this delay" or "give up". The delay schedule
//! is exponential and capped.

use crate::config::RetryConfig;
use std::time::Duration;

/// How a failed attempt should be treated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureClass {
    /// Timeout, connection error, HTTP 429 or 5xx
    Transient,
    /// HTTP 403: bot blocking rarely clears on retry
    Forbidden,
    /// Any other 4xx or an unusable response
    Permanent,
}

impl FailureClass {
    /// Classifies a non-success HTTP status
    pub fn from_status(status: u16) -> Self {
        match status {
            403 => Self::Forbidden,
            429 | 500..=599 => Self::Transient,
            _ => Self::Permanent,
        }
    }
}

/// Outcome of a retry decision
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    /// Sleep for the delay, then attempt again
    RetryAfter(Duration),
    /// Stop and surface the failure
    GiveUp,
}

/// Attempt limits and delay schedule
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Total attempts allowed for transient failures
    pub max_attempts: u32,
    /// Extra attempts allowed after a 403
    pub forbidden_retries: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
}

impl RetryPolicy {
    pub fn from_config(config: &RetryConfig) -> Self {
        Self {
            max_attempts: config.max_attempts.max(1),
            forbidden_retries: config.forbidden_retries,
            base_delay: Duration::from_millis(config.base_delay_ms),
            max_delay: Duration::from_millis(config.max_delay_ms),
        }
    }

    /// Delay before retry number `retry` (1-based): base * 2^(retry-1), capped
    pub fn delay_for(&self, retry: u32) -> Duration {
        let factor = 2u32.saturating_pow(retry.saturating_sub(1));
        self.base_delay
            .checked_mul(factor)
            .unwrap_or(self.max_delay)
            .min(self.max_delay)
    }

    /// Attempt ceiling for a failure class
    fn attempt_limit(&self, class: FailureClass) -> u32 {
        match class {
            FailureClass::Transient => self.max_attempts,
            FailureClass::Forbidden => self.forbidden_retries.saturating_add(1),
            FailureClass::Permanent => 1,
        }
    }

    /// Starts tracking a new fetch
    pub fn start(&self) -> RetryState<'_> {
        RetryState {
            policy: self,
            attempts: 0,
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from_config(&RetryConfig::default())
    }
}

/// State tracking for one fetch's attempts
#[derive(Debug)]
pub struct RetryState<'a> {
    policy: &'a RetryPolicy,
    attempts: u32,
}

impl RetryState<'_> {
    /// Records a failed attempt and decides what happens next
    pub fn record_failure(&mut self, class: FailureClass) -> RetryDecision {
        self.attempts = self.attempts.saturating_add(1);

        if self.attempts >= self.policy.attempt_limit(class) {
            RetryDecision::GiveUp
        } else {
            RetryDecision::RetryAfter(self.policy.delay_for(self.attempts))
        }
    }

    /// Number of attempts made so far
    pub fn attempts(&self) -> u32 {
        self.attempts
    }
}
