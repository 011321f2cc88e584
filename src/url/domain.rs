use url::Url;

/// Extracts the lowercase host from a URL
///
/// # Examples
///
/// ```
/// use url::Url;
/// use email_hunter::url::extract_host;
///
/// let url = Url::parse("https://EXAMPLE.COM/path").unwrap();
/// assert_eq!(extract_host(&url), Some("example.com".to_string()));
/// ```
pub fn extract_host(url: &Url) -> Option<String> {
    url.host_str().map(|h| h.to_lowercase())
}

/// Returns the `host:port` key that identifies a URL's origin
///
/// The port is the explicit one or the scheme default, so
/// `https://example.com/` and `https://example.com:443/` share a key.
/// Both the frontier scope and the robots cache are keyed by it.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use email_hunter::url::origin_key;
///
/// let url = Url::parse("https://example.com/a").unwrap();
/// assert_eq!(origin_key(&url), Some("example.com:443".to_string()));
/// ```
pub fn origin_key(url: &Url) -> Option<String> {
    let host = extract_host(url)?;
    let port = url.port_or_known_default()?;
    Some(format!("{}:{}", host, port))
}
