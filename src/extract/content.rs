use url::Url;

/// MIME types treated as PDF
const PDF_MIME_TYPES: &[&str] = &["application/pdf", "application/x-pdf", "text/pdf"];

/// MIME types treated as HTML
const HTML_MIME_TYPES: &[&str] = &["text/html", "application/xhtml+xml"];

/// How a fetched body is going to be read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentKind {
    Html,
    Pdf,
    Unsupported,
}

impl ContentKind {
    /// Classifies a response by its Content-Type, falling back to the URL
    ///
    /// The extension is consulted only when the server sent no usable type
    /// (missing, or a generic `application/octet-stream`).
    ///
    /// # Examples
    ///
    /// ```
    /// use email_hunter::extract::ContentKind;
    /// use url::Url;
    ///
    /// let url = Url::parse("https://example.com/brochure.pdf").unwrap();
    /// assert_eq!(ContentKind::classify("application/pdf", &url), ContentKind::Pdf);
    /// assert_eq!(ContentKind::classify("", &url), ContentKind::Pdf);
    /// assert_eq!(ContentKind::classify("image/png", &url), ContentKind::Unsupported);
    /// ```
    pub fn classify(content_type: &str, url: &Url) -> Self {
        let mime = content_type
            .split(';')
            .next()
            .unwrap_or("")
            .trim()
            .to_lowercase();

        if HTML_MIME_TYPES.contains(&mime.as_str()) {
            return Self::Html;
        }
        if PDF_MIME_TYPES.contains(&mime.as_str()) {
            return Self::Pdf;
        }
        if !mime.is_empty() && mime != "application/octet-stream" {
            return Self::Unsupported;
        }

        Self::from_extension(url)
    }

    fn from_extension(url: &Url) -> Self {
        let path = url.path().to_lowercase();
        if path.ends_with(".pdf") {
            Self::Pdf
        } else if path.ends_with(".html") || path.ends_with(".htm") {
            Self::Html
        } else {
            Self::Unsupported
        }
    }
}
