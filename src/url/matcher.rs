/// Checks if a domain is equal to, or a subdomain of, a base domain
///
/// Matching works on whole dot-separated labels, so `mail.example.com`
/// matches `example.com` but `notexample.com` does not. Both arguments are
/// expected in lowercase.
///
/// # Examples
///
/// ```
/// use email_hunter::url::matches_domain;
///
/// assert!(matches_domain("example.com", "example.com"));
/// assert!(matches_domain("example.com", "mail.example.com"));
/// assert!(!matches_domain("example.com", "notexample.com"));
/// ```
pub fn matches_domain(base: &str, candidate: &str) -> bool {
    if base.is_empty() {
        return false;
    }

    match candidate.strip_suffix(base) {
        Some("") => true,
        Some(prefix) => prefix.ends_with('.') && prefix.len() > 1,
        None => false,
    }
}

/// Checks a domain against every allowed base domain
pub fn domain_allowed(domain: &str, allowed: &[String]) -> bool {
    let domain = domain.trim_end_matches('.').to_lowercase();
    allowed.iter().any(|base| matches_domain(base, &domain))
}
