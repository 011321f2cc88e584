//! Skip reasons recorded by the coordinator

use crate::crawler::FetchError;
use std::fmt;

/// Why a dequeued URL produced no records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SkipReason {
    // ===== Policy =====
    /// robots.txt disallows the path for our user-agent
    RobotsDisallowed,

    /// Redirect target lies outside the seed origins
    OffScope,

    /// Redirect target was already queued or fetched
    AlreadyVisited,

    // ===== Transient, retries exhausted =====
    /// Request timed out on every attempt
    Timeout,

    /// Connection could not be established or was dropped
    Unreachable,

    /// HTTP 429 on every attempt
    RateLimited,

    /// HTTP 5xx on every attempt
    ServerError,

    // ===== Permanent per page =====
    /// HTTP 403 after the single permitted retry
    Forbidden,

    /// Any other non-success HTTP status
    HttpError,

    /// Redirect chain longer than the hop limit
    TooManyRedirects,

    /// Content type is neither HTML nor (enabled) PDF
    UnsupportedContent,

    /// HTML or PDF extraction failed
    ExtractionFailed,
}

impl SkipReason {
    /// Returns true for reasons that come from policy rather than failure
    pub fn is_policy(&self) -> bool {
        matches!(
            self,
            Self::RobotsDisallowed | Self::OffScope | Self::AlreadyVisited
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::RobotsDisallowed => "robots_disallowed",
            Self::OffScope => "off_scope",
            Self::AlreadyVisited => "already_visited",
            Self::Timeout => "timeout",
            Self::Unreachable => "unreachable",
            Self::RateLimited => "rate_limited",
            Self::ServerError => "server_error",
            Self::Forbidden => "forbidden",
            Self::HttpError => "http_error",
            Self::TooManyRedirects => "too_many_redirects",
            Self::UnsupportedContent => "unsupported_content",
            Self::ExtractionFailed => "extraction_failed",
        }
    }
}

impl From<&FetchError> for SkipReason {
    fn from(error: &FetchError) -> Self {
        match error {
            FetchError::Timeout { .. } => Self::Timeout,
            FetchError::Network { .. } => Self::Unreachable,
            FetchError::Status { status, .. } => match *status {
                403 => Self::Forbidden,
                429 => Self::RateLimited,
                500..=599 => Self::ServerError,
                _ => Self::HttpError,
            },
        }
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
