use crate::UrlError;
use url::Url;

/// Tracking query parameters dropped during normalization
const TRACKING_PARAMS: &[&str] = &["fbclid", "gclid", "mc_eid"];

/// Normalizes a URL for frontier bookkeeping
///
/// # Normalization Steps
///
/// 1. Parse the URL; reject if malformed
/// 2. Reject anything but `http` and `https`
/// 3. Lowercase the host
/// 4. Remove the fragment (everything after `#`)
/// 5. Remove the trailing slash (except for the root `/`)
/// 6. Remove tracking query parameters, keeping the order of the rest
///
/// # Examples
///
/// ```
/// use email_hunter::url::normalize_url;
///
/// let url = normalize_url("https://WWW.Example.COM/contact/#team").unwrap();
/// assert_eq!(url.as_str(), "https://www.example.com/contact");
/// ```
pub fn normalize_url(url_str: &str) -> Result<Url, UrlError> {
    let url = Url::parse(url_str.trim()).map_err(|e| UrlError::Parse(e.to_string()))?;
    normalize_parsed(url)
}

/// Normalizes an already parsed URL
pub fn normalize_parsed(mut url: Url) -> Result<Url, UrlError> {
    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(url.scheme().to_string()));
    }

    let host = url.host_str().ok_or(UrlError::MissingHost)?.to_lowercase();
    url.set_host(Some(&host))
        .map_err(|e| UrlError::Parse(format!("Failed to set host: {}", e)))?;

    url.set_fragment(None);

    let path = url.path();
    if path.len() > 1 && path.ends_with('/') {
        let trimmed = path.trim_end_matches('/');
        let trimmed = if trimmed.is_empty() { "/" } else { trimmed }.to_string();
        url.set_path(&trimmed);
    }

    if let Some(query) = strip_tracking_params(&url) {
        url.set_query(query.as_deref());
    }

    Ok(url)
}

/// Returns the rewritten query if any tracking parameter was present
///
/// Kept segments are copied byte for byte so their encoding is unchanged.
fn strip_tracking_params(url: &Url) -> Option<Option<String>> {
    let query = url.query()?;
    let segments: Vec<&str> = query.split('&').collect();
    let kept: Vec<&str> = segments
        .iter()
        .copied()
        .filter(|segment| {
            let key = segment.split_once('=').map_or(*segment, |(key, _)| key);
            !is_tracking_param(key)
        })
        .collect();

    if kept.len() == segments.len() {
        return None;
    }
    Some((!kept.is_empty()).then(|| kept.join("&")))
}

fn is_tracking_param(key: &str) -> bool {
    TRACKING_PARAMS.contains(&key) || key.starts_with("utm_")
}
