//! HTTP fetcher implementation
//!
//! This module handles all page requests for the crawler, including:
//! - Building the HTTP client with the configured user agent and timeout
//! - GET requests returning raw bytes and the Content-Type
//! - Retry with backoff for transient failures
//! - Surfacing redirects one hop at a time so the caller can vet each target
//! - Error classification into typed fetch failures

use crate::config::CrawlConfig;
use crate::crawler::retry::{FailureClass, RetryDecision, RetryPolicy};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, CONTENT_TYPE, LOCATION};
use reqwest::{redirect::Policy, Client};
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Maximum redirect hops followed for one frontier item
pub const MAX_REDIRECTS: usize = 10;

/// A successfully fetched resource
#[derive(Debug, Clone)]
pub struct FetchedResource {
    /// URL the body was served from
    pub final_url: Url,
    /// HTTP status code (always 2xx)
    pub status: u16,
    /// Content-Type header value, empty if absent
    pub content_type: String,
    /// Raw response body
    pub body: Vec<u8>,
    /// Attempts it took, including the successful one
    pub attempts: u32,
}

/// Result of one successful request
#[derive(Debug, Clone)]
pub enum FetchOutcome {
    /// 2xx response with its body
    Page(FetchedResource),

    /// 3xx response; the target has not been requested
    Redirect {
        /// HTTP status code
        status: u16,
        /// Absolute target resolved from the Location header
        location: Url,
    },
}

/// Typed failure of a fetch after the retry policy gave up
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Request timeout for {url} after {attempts} attempt(s)")]
    Timeout { url: String, attempts: u32 },

    #[error("Network error for {url} after {attempts} attempt(s): {message}")]
    Network {
        url: String,
        message: String,
        attempts: u32,
    },

    #[error("HTTP {status} for {url} after {attempts} attempt(s)")]
    Status {
        url: String,
        status: u16,
        attempts: u32,
    },
}

impl FetchError {
    /// Number of attempts made before giving up
    pub fn attempts(&self) -> u32 {
        match self {
            Self::Timeout { attempts, .. }
            | Self::Network { attempts, .. }
            | Self::Status { attempts, .. } => *attempts,
        }
    }

    /// HTTP status of the last attempt, if one was received
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Failure of a single attempt
#[derive(Debug)]
enum AttemptError {
    Timeout,
    Network { message: String, transient: bool },
    Status(u16),
}

impl AttemptError {
    fn class(&self) -> FailureClass {
        match self {
            Self::Timeout => FailureClass::Transient,
            Self::Network { transient: true, .. } => FailureClass::Transient,
            Self::Network { .. } => FailureClass::Permanent,
            Self::Status(status) => FailureClass::from_status(*status),
        }
    }

    fn into_fetch_error(self, url: &Url, attempts: u32) -> FetchError {
        let url = url.to_string();
        match self {
            Self::Timeout => FetchError::Timeout { url, attempts },
            Self::Network { message, .. } => FetchError::Network {
                url,
                message,
                attempts,
            },
            Self::Status(status) => FetchError::Status {
                url,
                status,
                attempts,
            },
        }
    }
}

impl From<reqwest::Error> for AttemptError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Self::Timeout
        } else if e.is_builder() {
            Self::Network {
                message: e.to_string(),
                transient: false,
            }
        } else {
            // Connection refused/reset, TLS and body read errors
            Self::Network {
                message: e.to_string(),
                transient: true,
            }
        }
    }
}

/// Builds an HTTP client with the crawler's headers
///
/// Page fetches use `Policy::none()` and walk redirects through the
/// coordinator; robots.txt lookups use a bounded policy.
///
/// # Example
///
/// ```no_run
/// use email_hunter::crawler::build_http_client;
/// use reqwest::redirect::Policy;
/// use std::time::Duration;
///
/// let client = build_http_client("HunterBot/1.0", Duration::from_secs(15), Policy::none()).unwrap();
/// ```
pub fn build_http_client(
    user_agent: &str,
    timeout: Duration,
    redirect: Policy,
) -> Result<Client, reqwest::Error> {
    let mut headers = HeaderMap::new();
    headers.insert(
        ACCEPT,
        HeaderValue::from_static("text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8"),
    );
    headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9"));

    Client::builder()
        .user_agent(user_agent)
        .default_headers(headers)
        .timeout(timeout)
        .connect_timeout(timeout.min(Duration::from_secs(10)))
        .redirect(redirect)
        .gzip(true)
        .brotli(true)
        .build()
}

/// Retrieves pages with the configured retry policy
pub struct Fetcher {
    client: Client,
    policy: RetryPolicy,
}

impl Fetcher {
    /// Builds a fetcher from the crawl configuration
    pub fn new(config: &CrawlConfig) -> Result<Self, reqwest::Error> {
        let client = build_http_client(
            &config.user_agent,
            Duration::from_secs(config.request_timeout_secs),
            Policy::none(),
        )?;
        Ok(Self::with_client(client, RetryPolicy::from_config(&config.retry)))
    }

    /// Wraps an existing client; it must not follow redirects itself
    pub fn with_client(client: Client, policy: RetryPolicy) -> Self {
        Self { client, policy }
    }

    /// Fetches a URL, retrying per the policy
    ///
    /// # Retry Logic
    ///
    /// | Condition | Action |
    /// |-----------|--------|
    /// | 2xx | Return body |
    /// | 3xx with Location | Return the target, unrequested |
    /// | Timeout, connection error | Retry up to `max_attempts`, backoff |
    /// | HTTP 429, 5xx | Retry up to `max_attempts`, backoff |
    /// | HTTP 403 | Retry `forbidden_retries` times, then fail |
    /// | Other 4xx, 3xx without Location | Fail immediately |
    pub async fn fetch(&self, url: &Url) -> Result<FetchOutcome, FetchError> {
        let mut retry = self.policy.start();

        loop {
            let error = match self.attempt(url).await {
                Ok(FetchOutcome::Page(mut resource)) => {
                    resource.attempts = retry.attempts() + 1;
                    return Ok(FetchOutcome::Page(resource));
                }
                Ok(redirect) => return Ok(redirect),
                Err(e) => e,
            };

            match retry.record_failure(error.class()) {
                RetryDecision::RetryAfter(delay) => {
                    tracing::debug!(
                        "Attempt {} for {} failed ({:?}), retrying in {:?}",
                        retry.attempts(),
                        url,
                        error,
                        delay
                    );
                    tokio::time::sleep(delay).await;
                }
                RetryDecision::GiveUp => {
                    return Err(error.into_fetch_error(url, retry.attempts()));
                }
            }
        }
    }

    async fn attempt(&self, url: &Url) -> Result<FetchOutcome, AttemptError> {
        let response = self.client.get(url.clone()).send().await?;

        let status = response.status();
        if status.is_redirection() {
            return match redirect_target(url, response.headers().get(LOCATION)) {
                Some(location) => Ok(FetchOutcome::Redirect {
                    status: status.as_u16(),
                    location,
                }),
                None => Err(AttemptError::Status(status.as_u16())),
            };
        }
        if !status.is_success() {
            return Err(AttemptError::Status(status.as_u16()));
        }

        let final_url = response.url().clone();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();

        let body = response.bytes().await?.to_vec();

        Ok(FetchOutcome::Page(FetchedResource {
            final_url,
            status: status.as_u16(),
            content_type,
            body,
            attempts: 1,
        }))
    }
}

/// Resolves a Location header against the requesting URL
fn redirect_target(base: &Url, location: Option<&HeaderValue>) -> Option<Url> {
    let location = location?.to_str().ok()?.trim();
    let mut target = base.join(location).ok()?;
    if !matches!(target.scheme(), "http" | "https") {
        return None;
    }
    target.set_fragment(None);
    Some(target)
}
