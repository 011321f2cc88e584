//! Run-scoped robots.txt cache
//!
//! Each origin's robots.txt is fetched at most once per run. Entries are
//! never invalidated; the cache is dropped with the coordinator that owns it.

use crate::robots::ParsedRobots;
use crate::url::origin_key;
use chrono::{DateTime, Utc};
use reqwest::{Client, StatusCode};
use std::collections::HashMap;
use std::time::Duration;
use url::Url;

/// Cached robots.txt policy for one origin
#[derive(Debug, Clone)]
pub struct CachedRobots {
    /// The parsed robots.txt content
    pub content: ParsedRobots,

    /// When the robots.txt was fetched
    pub fetched_at: DateTime<Utc>,
}

impl CachedRobots {
    pub fn new(content: ParsedRobots) -> Self {
        Self {
            content,
            fetched_at: Utc::now(),
        }
    }
}

/// Lazily populated per-origin robots policies
pub struct RobotsCache {
    client: Client,
    user_agent: String,
    enabled: bool,
    entries: HashMap<String, CachedRobots>,
}

impl RobotsCache {
    /// Creates an empty cache
    ///
    /// # Arguments
    ///
    /// * `client` - HTTP client used to fetch robots.txt
    /// * `user_agent` - The configured user-agent, used for rule selection
    /// * `enabled` - When false every URL is allowed and nothing is fetched
    pub fn new(client: Client, user_agent: impl Into<String>, enabled: bool) -> Self {
        Self {
            client,
            user_agent: user_agent.into(),
            enabled,
            entries: HashMap::new(),
        }
    }

    /// Checks whether `url` may be fetched
    ///
    /// The first query for an origin fetches its robots.txt. A failed fetch
    /// or a non-200 answer is cached as allow-all for the rest of the run.
    pub async fn is_allowed(&mut self, url: &Url) -> bool {
        if !self.enabled {
            return true;
        }

        let Some(key) = origin_key(url) else {
            return true;
        };

        if !self.entries.contains_key(&key) {
            let policy = self.fetch_policy(url).await;
            self.entries.insert(key.clone(), CachedRobots::new(policy));
        }

        let allowed = self
            .entries
            .get(&key)
            .map(|cached| cached.content.is_allowed(url.as_str(), &self.user_agent))
            .unwrap_or(true);

        if !allowed {
            tracing::info!("robots.txt disallows {}", url);
        }
        allowed
    }

    /// Returns the cached crawl delay for `url`'s origin, if any
    pub fn crawl_delay(&self, url: &Url) -> Option<Duration> {
        if !self.enabled {
            return None;
        }

        let key = origin_key(url)?;
        self.entries
            .get(&key)
            .and_then(|cached| cached.content.crawl_delay(&self.user_agent))
            .map(Duration::from_secs_f64)
    }

    /// Number of origins with a cached policy
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    async fn fetch_policy(&self, url: &Url) -> ParsedRobots {
        let robots_url = match url.join("/robots.txt") {
            Ok(u) => u,
            Err(e) => {
                tracing::info!("Cannot build robots.txt URL for {}: {} (allow all)", url, e);
                return ParsedRobots::allow_all();
            }
        };

        tracing::debug!("Fetching {}", robots_url);

        match self.client.get(robots_url.clone()).send().await {
            Ok(response) if response.status() == StatusCode::OK => match response.text().await {
                Ok(body) => {
                    tracing::info!("Loaded {}", robots_url);
                    ParsedRobots::from_content(&body)
                }
                Err(e) => {
                    tracing::info!("Failed to read {}: {} (allow all)", robots_url, e);
                    ParsedRobots::allow_all()
                }
            },
            Ok(response) => {
                tracing::info!(
                    "{} answered HTTP {} (allow all)",
                    robots_url,
                    response.status().as_u16()
                );
                ParsedRobots::allow_all()
            }
            Err(e) => {
                tracing::info!("Failed to fetch {}: {} (allow all)", robots_url, e);
                ParsedRobots::allow_all()
            }
        }
    }
}
