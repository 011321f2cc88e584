use chrono::{DateTime, Utc};
use std::fmt;

/// Snippet of the placeholder record written when a run finds nothing
pub const NO_HITS_HINT: &str = "No emails/phones matched. Try --external-follow, --include-pdfs, \
     --include-phones, a real browser UA, smaller depth, different seeds.";

/// Value of the placeholder record written when a run finds nothing
pub const NO_HITS_VALUE: &str = "no_hits";

/// Kind of finding a record carries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RecordType {
    Email,
    Phone,
    Info,
}

impl RecordType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Email => "email",
            Self::Phone => "phone",
            Self::Info => "info",
        }
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of document a finding came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceType {
    Html,
    Pdf,
}

impl SourceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Html => "html",
            Self::Pdf => "pdf",
        }
    }
}

impl fmt::Display for SourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Deduplication key: at most one record per (type, value, source URL)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResultKey {
    pub record_type: RecordType,
    pub value: String,
    pub source_url: String,
}

/// One finding, immutable once emitted
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub record_type: RecordType,
    pub value: String,
    /// Email domain; `None` for phones and info records
    pub domain: Option<String>,
    pub source_url: String,
    pub source_type: Option<SourceType>,
    pub page_title: String,
    /// Single-line context around the match
    pub snippet: String,
    pub first_seen: DateTime<Utc>,
}

impl Record {
    /// The placeholder record for a run without findings
    pub fn no_hits() -> Self {
        Self {
            record_type: RecordType::Info,
            value: NO_HITS_VALUE.to_string(),
            domain: None,
            source_url: String::new(),
            source_type: None,
            page_title: String::new(),
            snippet: NO_HITS_HINT.to_string(),
            first_seen: Utc::now(),
        }
    }

    pub fn key(&self) -> ResultKey {
        ResultKey {
            record_type: self.record_type,
            value: self.value.clone(),
            source_url: self.source_url.clone(),
        }
    }

    /// UTC timestamp in ISO-8601 with second precision
    pub fn first_seen_iso(&self) -> String {
        self.first_seen.format("%Y-%m-%dT%H:%M:%SZ").to_string()
    }

    /// Field values in CSV column order
    pub fn fields(&self) -> [String; 8] {
        [
            self.record_type.as_str().to_string(),
            self.value.clone(),
            self.domain.clone().unwrap_or_default(),
            self.source_url.clone(),
            self.source_type
                .map(|s| s.as_str().to_string())
                .unwrap_or_default(),
            self.page_title.clone(),
            self.snippet.clone(),
            self.first_seen_iso(),
        ]
    }
}
