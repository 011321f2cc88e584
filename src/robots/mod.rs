//! Robots.txt handling module
//!
//! This module provides fetching, parsing, and run-scoped caching of
//! robots.txt policies.

mod cache;
mod parser;

pub use cache::{CachedRobots, RobotsCache};
pub use parser::{agent_token, ParsedRobots};
