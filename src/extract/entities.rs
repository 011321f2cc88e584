//! Email and phone recognition
//!
//! Both recognizers are pure functions from text to a lazy iterator of
//! matches. Duplicates are preserved; deduplication happens when records
//! are emitted.

use regex::Regex;
use std::ops::Range;
use std::sync::LazyLock;

/// local-part@domain with at least one dot and an alphabetic TLD
static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b[A-Z0-9._%+\-]+@[A-Z0-9.\-]+\.[A-Z]{2,}\b")
        .expect("hardcoded regex pattern is valid")
});

/// Optional +country code, optional (area), then digit groups with in-line separators
static PHONE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:\+\d{1,3}[ \t.\-]?)?(?:\(\d{1,4}\)[ \t.\-]?)?\d{2,4}(?:[ \t.\-]?\d{2,4}){1,4}")
        .expect("hardcoded regex pattern is valid")
});

/// Punctuation trimmed from both ends of an email match
const EMAIL_TRIM: &[char] = &[
    '.', ',', ';', ':', '!', '?', '"', '\'', '(', ')', '[', ']', '{', '}', '<', '>',
];

pub const MIN_PHONE_DIGITS: usize = 7;
pub const MAX_PHONE_DIGITS: usize = 15;

/// One recognized entity and where it sits in the scanned text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityMatch {
    /// Normalized value
    pub value: String,
    /// Byte range of the raw match in the scanned text
    pub span: Range<usize>,
}

/// Finds email addresses in text
///
/// Values are trimmed of surrounding punctuation and lowercased. No domain
/// filtering happens here.
///
/// # Examples
///
/// ```
/// use email_hunter::extract::find_emails;
///
/// let found: Vec<_> = find_emails("Mail Sales@Example.com or (info@example.org).")
///     .map(|m| m.value)
///     .collect();
/// assert_eq!(found, vec!["sales@example.com", "info@example.org"]);
/// ```
pub fn find_emails(text: &str) -> impl Iterator<Item = EntityMatch> + '_ {
    EMAIL_RE.find_iter(text).filter_map(|m| {
        let value = normalize_email(m.as_str());
        email_domain(&value)?;
        Some(EntityMatch {
            value,
            span: m.range(),
        })
    })
}

/// Trims surrounding punctuation and lowercases an email address
pub fn normalize_email(raw: &str) -> String {
    raw.trim().trim_matches(EMAIL_TRIM).to_lowercase()
}

/// Returns the part of an email address after the last `@`
///
/// # Examples
///
/// ```
/// use email_hunter::extract::email_domain;
///
/// assert_eq!(email_domain("team@mail.example.com"), Some("mail.example.com"));
/// assert_eq!(email_domain("not-an-email"), None);
/// ```
pub fn email_domain(email: &str) -> Option<&str> {
    email
        .rsplit_once('@')
        .map(|(_, domain)| domain)
        .filter(|domain| !domain.is_empty())
}

/// Finds plausible phone numbers in text
///
/// A match is kept when it carries 7 to 15 digits and is not glued to a
/// letter or digit on either side. The value is the match as written.
///
/// # Examples
///
/// ```
/// use email_hunter::extract::find_phones;
///
/// let found: Vec<_> = find_phones("call +8801234567890 today").map(|m| m.value).collect();
/// assert_eq!(found, vec!["+8801234567890"]);
/// ```
pub fn find_phones(text: &str) -> impl Iterator<Item = EntityMatch> + '_ {
    PHONE_RE.find_iter(text).filter_map(move |m| {
        let digits = m.as_str().chars().filter(char::is_ascii_digit).count();
        if !(MIN_PHONE_DIGITS..=MAX_PHONE_DIGITS).contains(&digits) {
            return None;
        }

        let before = text[..m.start()].chars().next_back();
        let after = text[m.end()..].chars().next();
        if before.is_some_and(char::is_alphanumeric) || after.is_some_and(char::is_alphanumeric) {
            return None;
        }

        Some(EntityMatch {
            value: m.as_str().trim().to_string(),
            span: m.range(),
        })
    })
}
