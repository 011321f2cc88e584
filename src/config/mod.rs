//! Configuration module for Email-Hunter
//!
//! A crawl is driven by one immutable [`CrawlConfig`]. It can be built in
//! code, by the command line, or loaded from a TOML file.
//!
//! # Example
//!
//! ```no_run
//! use email_hunter::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("hunter.toml")).unwrap();
//! println!("Crawler will use max depth: {}", config.max_depth);
//! ```

mod parser;
mod types;
mod validation;

pub use types::{pooled_user_agent, CrawlConfig, RetryConfig, USER_AGENT_POOL};

pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
pub use validation::validate;
