use serde::Deserialize;

/// Real browser user-agent strings used when no user-agent is configured
pub const USER_AGENT_POOL: &[&str] = &[
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/127.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 13_6) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.4 Safari/605.1.15",
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/127.0.0.0 Safari/537.36",
];

/// Picks a user-agent from the built-in pool
pub fn pooled_user_agent() -> String {
    USER_AGENT_POOL[fastrand::usize(..USER_AGENT_POOL.len())].to_string()
}

/// Immutable input of a crawl run
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct CrawlConfig {
    /// Base domains an email must belong to (subdomains included)
    pub allowed_domains: Vec<String>,

    /// URLs enqueued at depth 0
    pub seed_urls: Vec<String>,

    /// Maximum number of successful fetches
    #[serde(default = "default_max_pages")]
    pub max_pages: u32,

    /// Maximum link-follow depth from the seeds
    #[serde(default = "default_max_depth")]
    pub max_depth: u32,

    /// Minimum seconds between two outbound requests, process-wide
    #[serde(default = "default_rate_interval")]
    pub rate_interval: f64,

    /// Whether robots.txt is consulted before every fetch
    #[serde(default = "default_true")]
    pub honor_robots: bool,

    /// Whether links leaving the seed origins are followed
    #[serde(default)]
    pub external_follow: bool,

    /// User-agent header sent with every request
    #[serde(default = "pooled_user_agent")]
    pub user_agent: String,

    /// Whether PDF responses are parsed
    #[serde(default)]
    pub include_pdfs: bool,

    /// Whether phone numbers are reported
    #[serde(default)]
    pub include_phones: bool,

    /// Per-request timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    #[serde(default)]
    pub retry: RetryConfig,
}

/// Retry and backoff tunables for the fetcher
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct RetryConfig {
    /// Total attempts for transient failures (timeouts, 429, 5xx)
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Extra attempts granted after a 403
    #[serde(default = "default_forbidden_retries")]
    pub forbidden_retries: u32,

    /// Delay before the first retry (milliseconds)
    #[serde(default = "default_base_delay_ms")]
    pub base_delay_ms: u64,

    /// Upper bound for any backoff delay (milliseconds)
    #[serde(default = "default_max_delay_ms")]
    pub max_delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            forbidden_retries: default_forbidden_retries(),
            base_delay_ms: default_base_delay_ms(),
            max_delay_ms: default_max_delay_ms(),
        }
    }
}

impl CrawlConfig {
    /// Creates a configuration with default limits for the given domains and seeds
    pub fn new(allowed_domains: Vec<String>, seed_urls: Vec<String>) -> Self {
        Self {
            allowed_domains,
            seed_urls,
            max_pages: default_max_pages(),
            max_depth: default_max_depth(),
            rate_interval: default_rate_interval(),
            honor_robots: true,
            external_follow: false,
            user_agent: pooled_user_agent(),
            include_pdfs: false,
            include_phones: false,
            request_timeout_secs: default_request_timeout(),
            retry: RetryConfig::default(),
        }
    }

    /// Lowercases and trims allowed domains, dropping blanks
    pub fn normalize_domains(&mut self) {
        self.allowed_domains = self
            .allowed_domains
            .iter()
            .map(|d| d.trim().trim_start_matches("*.").to_lowercase())
            .filter(|d| !d.is_empty())
            .collect();
    }
}

fn default_max_pages() -> u32 {
    80
}

fn default_max_depth() -> u32 {
    1
}

fn default_rate_interval() -> f64 {
    1.0
}

fn default_true() -> bool {
    true
}

fn default_request_timeout() -> u64 {
    15
}

fn default_max_attempts() -> u32 {
    3
}

fn default_forbidden_retries() -> u32 {
    1
}

fn default_base_delay_ms() -> u64 {
    600
}

fn default_max_delay_ms() -> u64 {
    10_000
}
