//! HTML extraction
//!
//! This module turns an HTML document into:
//! - A display title (clamped, whitespace-collapsed)
//! - Visible text, with `mailto:` addresses appended
//! - Outbound links resolved against the page (or its `<base href>`)

use crate::extract::snippet::collapse_whitespace;
use crate::extract::ExtractedPage;
use crate::output::SourceType;
use scraper::{Html, Node, Selector};
use url::Url;

/// Longest title kept, in characters
pub const MAX_TITLE_CHARS: usize = 140;

/// Title used when a page has none
pub const UNTITLED: &str = "(untitled)";

/// Elements whose text is never visible
const HIDDEN_ELEMENTS: &[&str] = &["script", "style", "noscript", "template"];

/// Parses HTML content into an [`ExtractedPage`]
///
/// # Link Extraction Rules
///
/// **Include:**
/// - `<a href="...">` targets, resolved to absolute `http`/`https` URLs
///
/// **Exclude:**
/// - `<a href="..." download>`
/// - `javascript:`, `mailto:`, `tel:` links
/// - Data URIs
/// - Fragment-only links
///
/// # Arguments
///
/// * `html` - The HTML content to parse
/// * `page_url` - The URL the page was served from (after redirects)
///
/// # Example
///
/// ```
/// use email_hunter::extract::parse_html;
/// use url::Url;
///
/// let html = r#"<html><head><title>Contact</title></head>
///     <body><a href="/team">Team</a> <a href="mailto:hi@example.com">Mail</a></body></html>"#;
/// let page = parse_html(html, &Url::parse("https://example.com/contact").unwrap());
///
/// assert_eq!(page.title, "Contact");
/// assert_eq!(page.links[0].as_str(), "https://example.com/team");
/// assert!(page.text.contains("hi@example.com"));
/// ```
pub fn parse_html(html: &str, page_url: &Url) -> ExtractedPage {
    let document = Html::parse_document(html);
    let base_url = base_href(&document, page_url).unwrap_or_else(|| page_url.clone());

    let mut text = visible_text(&document);
    for address in mailto_addresses(&document) {
        text.push(' ');
        text.push_str(&address);
    }

    ExtractedPage {
        title: extract_title(&document),
        text,
        links: extract_links(&document, &base_url),
        source_type: SourceType::Html,
    }
}

/// Extracts the page title, or the untitled placeholder
fn extract_title(document: &Html) -> String {
    let Ok(selector) = Selector::parse("title") else {
        return UNTITLED.to_string();
    };

    document
        .select(&selector)
        .next()
        .map(|element| clamp_title(&element.text().collect::<String>()))
        .filter(|title| !title.is_empty())
        .unwrap_or_else(|| UNTITLED.to_string())
}

/// Collapses whitespace and clamps a title to [`MAX_TITLE_CHARS`]
pub fn clamp_title(raw: &str) -> String {
    collapse_whitespace(raw)
        .chars()
        .take(MAX_TITLE_CHARS)
        .collect::<String>()
        .trim_end()
        .to_string()
}

/// Collects text nodes outside hidden elements, space-separated
fn visible_text(document: &Html) -> String {
    let mut parts: Vec<&str> = Vec::new();

    for node in document.tree.root().descendants() {
        let Node::Text(text) = node.value() else {
            continue;
        };
        let hidden = node.ancestors().any(|ancestor| {
            ancestor
                .value()
                .as_element()
                .is_some_and(|element| HIDDEN_ELEMENTS.contains(&element.name()))
        });
        if hidden {
            continue;
        }

        let trimmed = text.trim();
        if !trimmed.is_empty() {
            parts.push(trimmed);
        }
    }

    parts.join(" ")
}

/// Addresses from `mailto:` links, query stripped
fn mailto_addresses(document: &Html) -> Vec<String> {
    let Ok(selector) = Selector::parse("a[href]") else {
        return Vec::new();
    };

    document
        .select(&selector)
        .filter_map(|element| element.value().attr("href"))
        .filter_map(|href| {
            let href = href.trim();
            let prefix = href.get(..7)?;
            if !prefix.eq_ignore_ascii_case("mailto:") {
                return None;
            }
            let address = href[7..].split('?').next().unwrap_or("").trim();
            (!address.is_empty()).then(|| address.to_string())
        })
        .collect()
}

/// The document's `<base href>`, resolved against the page URL
fn base_href(document: &Html, page_url: &Url) -> Option<Url> {
    let selector = Selector::parse("base[href]").ok()?;
    let href = document.select(&selector).next()?.value().attr("href")?;
    let base = page_url.join(href.trim()).ok()?;
    matches!(base.scheme(), "http" | "https").then_some(base)
}

/// Extracts all followable links from the HTML document, in document order
fn extract_links(document: &Html, base_url: &Url) -> Vec<Url> {
    let Ok(selector) = Selector::parse("a[href]") else {
        return Vec::new();
    };

    document
        .select(&selector)
        .filter(|element| element.value().attr("download").is_none())
        .filter_map(|element| element.value().attr("href"))
        .filter_map(|href| resolve_link(href, base_url))
        .collect()
}

/// Resolves a link href to an absolute URL and validates it
///
/// Returns None if the link should be excluded:
/// - javascript:, mailto:, tel: schemes
/// - data: URIs
/// - Invalid URLs
/// - Non-HTTP(S) URLs after resolution
fn resolve_link(href: &str, base_url: &Url) -> Option<Url> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    let lower = href.to_ascii_lowercase();
    if ["javascript:", "mailto:", "tel:", "data:"]
        .iter()
        .any(|scheme| lower.starts_with(scheme))
    {
        return None;
    }

    let absolute = base_url.join(href).ok()?;
    matches!(absolute.scheme(), "http" | "https").then_some(absolute)
}
