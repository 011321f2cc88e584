//! Breadth-first crawl frontier
//!
//! The frontier owns the FIFO queue of pending items and the visited set.
//! A URL is marked visited as soon as it is enqueued, so it can never be
//! queued or fetched twice in one run.

use crate::config::CrawlConfig;
use crate::url::{normalize_parsed, normalize_url, origin_key};
use std::collections::{HashSet, VecDeque};
use url::Url;

/// A URL waiting to be fetched
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrontierItem {
    /// Normalized absolute URL
    pub url: Url,
    /// Link distance from the nearest seed
    pub depth: u32,
    /// True when the URL's origin is not one of the seed origins
    pub is_external: bool,
}

/// Why an enqueue did or did not add an item
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnqueueOutcome {
    Added,
    TooDeep,
    AlreadyVisited,
    External,
    Invalid,
}

/// Set of normalized URLs already queued or fetched
#[derive(Debug, Default)]
pub struct VisitedSet {
    urls: HashSet<String>,
}

impl VisitedSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks a URL visited; returns false if it already was
    pub fn insert(&mut self, url: &Url) -> bool {
        self.urls.insert(url.as_str().to_string())
    }

    pub fn contains(&self, url: &Url) -> bool {
        self.urls.contains(url.as_str())
    }

    pub fn len(&self) -> usize {
        self.urls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }
}

/// Depth-bounded FIFO frontier with origin scoping
#[derive(Debug)]
pub struct Frontier {
    queue: VecDeque<FrontierItem>,
    visited: VisitedSet,
    max_depth: u32,
    follow_external: bool,
    seed_origins: HashSet<String>,
}

impl Frontier {
    /// Creates a frontier seeded from the configuration
    ///
    /// Seeds are normalized, deduplicated against each other and enqueued at
    /// depth 0 in configuration order. Seeds that fail to normalize are
    /// dropped with a warning; validation has already rejected them in
    /// practice.
    pub fn new(config: &CrawlConfig) -> Self {
        let seeds: Vec<Url> = config
            .seed_urls
            .iter()
            .filter_map(|seed| match normalize_url(seed) {
                Ok(url) => Some(url),
                Err(e) => {
                    tracing::warn!("Dropping seed {}: {}", seed, e);
                    None
                }
            })
            .collect();

        let mut frontier = Self {
            queue: VecDeque::new(),
            visited: VisitedSet::new(),
            max_depth: config.max_depth,
            follow_external: config.external_follow,
            seed_origins: seeds.iter().filter_map(origin_key).collect(),
        };

        for seed in seeds {
            frontier.enqueue(seed, 0);
        }

        frontier
    }

    /// Offers a URL to the frontier
    ///
    /// The item is added only if its depth is within bounds, it has not been
    /// seen before, and its origin is a seed origin or external following is
    /// enabled.
    pub fn enqueue(&mut self, url: Url, depth: u32) -> EnqueueOutcome {
        if depth > self.max_depth {
            return EnqueueOutcome::TooDeep;
        }

        let Ok(url) = normalize_parsed(url) else {
            return EnqueueOutcome::Invalid;
        };

        let is_external = !self.is_seed_origin(&url);
        if is_external && !self.follow_external {
            return EnqueueOutcome::External;
        }

        if !self.visited.insert(&url) {
            return EnqueueOutcome::AlreadyVisited;
        }

        self.queue.push_back(FrontierItem {
            url,
            depth,
            is_external,
        });
        EnqueueOutcome::Added
    }

    /// Pops the next item in enqueue order
    pub fn dequeue(&mut self) -> Option<FrontierItem> {
        let item = self.queue.pop_front()?;
        self.visited.insert(&item.url);
        Some(item)
    }

    /// Claims a redirect target for immediate fetching
    ///
    /// The target is held to the same scope as links and marked visited.
    /// A target that normalizes to the URL being redirected from (e.g. a
    /// trailing-slash redirect) is the same page and passes without a claim.
    pub fn claim_redirect(&mut self, from: &Url, to: &Url) -> EnqueueOutcome {
        let Ok(target) = normalize_parsed(to.clone()) else {
            return EnqueueOutcome::Invalid;
        };

        if normalize_parsed(from.clone()).is_ok_and(|from| from == target) {
            return EnqueueOutcome::Added;
        }

        if !self.is_seed_origin(&target) && !self.follow_external {
            return EnqueueOutcome::External;
        }

        if !self.visited.insert(&target) {
            return EnqueueOutcome::AlreadyVisited;
        }

        EnqueueOutcome::Added
    }

    /// Returns true if the URL was already queued or fetched
    pub fn contains(&self, url: &Url) -> bool {
        normalize_parsed(url.clone()).is_ok_and(|url| self.visited.contains(&url))
    }

    fn is_seed_origin(&self, url: &Url) -> bool {
        origin_key(url).is_some_and(|key| self.seed_origins.contains(&key))
    }

    /// Number of items still queued
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn visited_count(&self) -> usize {
        self.visited.len()
    }
}
