//! Crawler coordinator - main crawl orchestration logic
//!
//! This module contains the main crawl loop that coordinates all aspects of
//! the crawling process, including:
//! - Validating the configuration and seeding the frontier
//! - Gating requests on robots.txt and the rate limiter
//! - Fetching, extracting and following links breadth-first
//! - Recognizing entities and emitting deduplicated records

use crate::config::{validate, CrawlConfig};
use crate::crawler::{
    build_http_client, EnqueueOutcome, FetchOutcome, FetchedResource, Fetcher, Frontier,
    FrontierItem, RateLimiter, MAX_REDIRECTS,
};
use crate::extract::{
    email_domain, extract_blocking, find_emails, find_phones, snippet, EntityMatch,
    ExtractedPage,
};
use crate::output::{CrawlReport, Record, RecordSink, RecordType, ResultKey, SourceType};
use crate::robots::RobotsCache;
use crate::state::{CrawlState, SkipReason};
use crate::url::domain_allowed;
use crate::{HunterError, Result};
use chrono::Utc;
use reqwest::redirect::Policy;
use std::collections::HashSet;
use std::time::Duration;
use url::Url;

/// Main crawler coordinator structure
///
/// Owns every run-scoped structure (frontier, robots cache, dedup keys), so
/// independent coordinators can run side by side in one process.
pub struct Coordinator {
    config: CrawlConfig,
    state: CrawlState,
    frontier: Frontier,
    robots: RobotsCache,
    limiter: RateLimiter,
    fetcher: Fetcher,
    emitted: HashSet<ResultKey>,
    report: CrawlReport,
}

impl Coordinator {
    /// Creates a new coordinator instance
    ///
    /// # Arguments
    ///
    /// * `config` - The crawl configuration
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Ready to run, in the `Idle` state
    /// * `Err(HunterError)` - Invalid configuration or HTTP client setup failed
    pub fn new(mut config: CrawlConfig) -> Result<Self> {
        config.normalize_domains();
        validate(&config)?;

        let fetcher = Fetcher::new(&config)?;
        let robots_client = build_http_client(
            &config.user_agent,
            Duration::from_secs(config.request_timeout_secs),
            Policy::limited(MAX_REDIRECTS),
        )?;
        let robots = RobotsCache::new(robots_client, config.user_agent.clone(), config.honor_robots);
        let limiter = RateLimiter::from_secs_f64(config.rate_interval);
        let frontier = Frontier::new(&config);

        tracing::info!(
            "Seeded frontier with {} URL(s) for {} allowed domain(s)",
            frontier.len(),
            config.allowed_domains.len()
        );

        Ok(Self {
            config,
            state: CrawlState::Idle,
            frontier,
            robots,
            limiter,
            fetcher,
            emitted: HashSet::new(),
            report: CrawlReport::new(),
        })
    }

    /// Runs the crawl to completion, streaming records into `sink`
    ///
    /// The run ends in `Done` when the frontier empties or the page budget
    /// is spent. Page-level failures are counted as skips; only a sink
    /// failure aborts the run, after everything emitted so far has reached
    /// the sink.
    pub async fn run(&mut self, sink: &mut dyn RecordSink) -> Result<CrawlReport> {
        self.transition(CrawlState::Running)?;
        tracing::info!(
            "Starting crawl: max {} page(s), depth {}, {:.2}s between requests",
            self.config.max_pages,
            self.config.max_depth,
            self.limiter.interval().as_secs_f64()
        );

        let outcome = self.crawl_loop(sink).await;

        self.transition(CrawlState::Draining)?;
        let flushed = sink.flush();
        self.transition(CrawlState::Done)?;

        outcome?;
        flushed?;

        let report = self.report();
        tracing::info!(
            "Crawl done: {} page(s) fetched, {} record(s), {} skipped, {} left in frontier",
            report.pages_fetched,
            report.records_emitted,
            report.total_skipped(),
            report.frontier_remaining
        );
        Ok(report)
    }

    async fn crawl_loop(&mut self, sink: &mut dyn RecordSink) -> Result<()> {
        loop {
            if self.report.pages_fetched >= self.config.max_pages {
                tracing::info!(
                    "Page budget of {} reached, {} URL(s) left in frontier",
                    self.config.max_pages,
                    self.frontier.len()
                );
                return Ok(());
            }

            let Some(item) = self.frontier.dequeue() else {
                tracing::info!("Frontier is empty, crawl complete");
                return Ok(());
            };

            self.process_item(item, sink).await?;
        }
    }

    /// Processes a single frontier item
    ///
    /// Only sink errors are returned; everything else becomes a skip.
    async fn process_item(&mut self, item: FrontierItem, sink: &mut dyn RecordSink) -> Result<()> {
        tracing::debug!("Processing {} (depth {})", item.url, item.depth);

        let resource = match self.fetch_following_redirects(&item.url).await {
            Ok(resource) => resource,
            Err(reason) => {
                self.report.record_skip(reason);
                return Ok(());
            }
        };

        self.report.pages_fetched += 1;
        tracing::info!(
            "[{:>4}] {} {}",
            self.report.pages_fetched,
            resource.status,
            resource.final_url
        );

        let final_url = resource.final_url;
        let extracted = extract_blocking(
            resource.body,
            resource.content_type.clone(),
            final_url.clone(),
            self.config.include_pdfs,
        )
        .await;

        let page = match extracted {
            Ok(Some(page)) => page,
            Ok(None) => {
                tracing::debug!(
                    "No extractable content at {} (content-type '{}')",
                    final_url,
                    resource.content_type
                );
                self.report.record_skip(SkipReason::UnsupportedContent);
                return Ok(());
            }
            Err(e) => {
                tracing::warn!("Skipping {} ({}): {}", final_url, SkipReason::ExtractionFailed, e);
                self.report.record_skip(SkipReason::ExtractionFailed);
                return Ok(());
            }
        };

        if page.source_type == SourceType::Html && item.depth < self.config.max_depth {
            self.enqueue_links(&page, item.depth + 1);
        }

        self.emit_entities(&page, &final_url, sink)
    }

    /// Fetches a URL, walking redirects one vetted hop at a time
    ///
    /// Every hop passes robots.txt and the rate limiter, and every target
    /// must be claimable in the frontier: in scope and not yet visited.
    async fn fetch_following_redirects(
        &mut self,
        start: &Url,
    ) -> std::result::Result<FetchedResource, SkipReason> {
        let mut url = start.clone();
        let mut hops = 0;

        loop {
            if !self.robots.is_allowed(&url).await {
                tracing::debug!("Skipping {} (robots.txt)", url);
                return Err(SkipReason::RobotsDisallowed);
            }

            let crawl_delay = self.robots.crawl_delay(&url);
            self.limiter.wait_turn_at_least(crawl_delay).await;

            let (status, location) = match self.fetcher.fetch(&url).await {
                Ok(FetchOutcome::Page(resource)) => return Ok(resource),
                Ok(FetchOutcome::Redirect { status, location }) => (status, location),
                Err(e) => {
                    let reason = SkipReason::from(&e);
                    tracing::warn!("Skipping {} ({}): {}", url, reason, e);
                    return Err(reason);
                }
            };

            hops += 1;
            if hops > MAX_REDIRECTS {
                tracing::warn!("Skipping {}: more than {} redirects", start, MAX_REDIRECTS);
                return Err(SkipReason::TooManyRedirects);
            }

            let reason = match self.frontier.claim_redirect(&url, &location) {
                EnqueueOutcome::Added => {
                    tracing::debug!("{} redirected ({}) to {}", url, status, location);
                    url = location;
                    continue;
                }
                EnqueueOutcome::External => SkipReason::OffScope,
                EnqueueOutcome::AlreadyVisited => SkipReason::AlreadyVisited,
                EnqueueOutcome::TooDeep | EnqueueOutcome::Invalid => SkipReason::HttpError,
            };
            tracing::info!("Not following redirect {} -> {} ({})", url, location, reason);
            return Err(reason);
        }
    }

    fn enqueue_links(&mut self, page: &ExtractedPage, depth: u32) {
        let before = self.frontier.len();
        for link in &page.links {
            self.frontier.enqueue(link.clone(), depth);
        }
        tracing::debug!(
            "Queued {} of {} link(s) at depth {}",
            self.frontier.len() - before,
            page.links.len(),
            depth
        );
    }

    /// Recognizes entities in the page text and emits new records
    fn emit_entities(
        &mut self,
        page: &ExtractedPage,
        source_url: &Url,
        sink: &mut dyn RecordSink,
    ) -> Result<()> {
        for found in find_emails(&page.text) {
            let Some(domain) = email_domain(&found.value) else {
                continue;
            };
            if !domain_allowed(domain, &self.config.allowed_domains) {
                tracing::trace!("Ignoring {} (domain not allowed)", found.value);
                continue;
            }
            let domain = domain.to_string();
            self.emit(
                build_record(RecordType::Email, found, Some(domain), source_url, page),
                sink,
            )?;
        }

        if self.config.include_phones {
            for found in find_phones(&page.text) {
                self.emit(
                    build_record(RecordType::Phone, found, None, source_url, page),
                    sink,
                )?;
            }
        }

        Ok(())
    }

    /// Hands a record to the sink unless its key was already emitted
    fn emit(&mut self, record: Record, sink: &mut dyn RecordSink) -> Result<()> {
        if !self.emitted.insert(record.key()) {
            return Ok(());
        }

        tracing::debug!("Found {} {} on {}", record.record_type, record.value, record.source_url);
        sink.emit(record)?;
        self.report.records_emitted += 1;
        Ok(())
    }

    fn transition(&mut self, next: CrawlState) -> Result<()> {
        if !self.state.can_transition_to(next) {
            return Err(HunterError::InvalidTransition {
                from: self.state,
                to: next,
            });
        }
        tracing::debug!("Coordinator {} -> {}", self.state, next);
        self.state = next;
        Ok(())
    }

    /// Snapshot of the run counters
    pub fn report(&self) -> CrawlReport {
        CrawlReport {
            frontier_remaining: self.frontier.len(),
            final_state: self.state,
            ..self.report.clone()
        }
    }

    pub fn state(&self) -> CrawlState {
        self.state
    }

    pub fn frontier_len(&self) -> usize {
        self.frontier.len()
    }

    pub fn pages_fetched(&self) -> u32 {
        self.report.pages_fetched
    }

    pub fn config(&self) -> &CrawlConfig {
        &self.config
    }
}

fn build_record(
    record_type: RecordType,
    found: EntityMatch,
    domain: Option<String>,
    source_url: &Url,
    page: &ExtractedPage,
) -> Record {
    Record {
        record_type,
        snippet: snippet(&page.text, found.span),
        value: found.value,
        domain,
        source_url: source_url.to_string(),
        source_type: Some(page.source_type),
        page_title: page.title.clone(),
        first_seen: Utc::now(),
    }
}
