//! URL handling module for Email-Hunter
//!
//! This module provides URL normalization, origin keys for frontier scope
//! and robots caching, and label-wise domain matching for the allow-list.

mod domain;
mod matcher;
mod normalize;

pub use domain::{extract_host, origin_key};
pub use matcher::{domain_allowed, matches_domain};
pub use normalize::{normalize_parsed, normalize_url};
