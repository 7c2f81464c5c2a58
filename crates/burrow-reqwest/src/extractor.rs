//! Anchor link extraction with scraper.

use std::fmt;
use std::sync::LazyLock;

use scraper::{Html, Selector};
use tokio_util::sync::CancellationToken;
use url::Url;

use burrow_core::BoxError;
use burrow_core::body::Body;
use burrow_core::extract::{Extracted, Extractor};

static ANCHOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a[href]").expect("anchor selector is valid"));

/// [`Extractor`] that scans `a[href]` anchors out of HTML documents.
///
/// Every href is resolved against the page URL and normalized: fragments
/// and trailing slashes are stripped, and only `http`/`https` links on the
/// crawlable host survive. Filtered links are dropped silently; malformed
/// ones are returned as parse errors without aborting the scan.
///
/// By default the crawlable host is the host of the page being parsed,
/// which pins a crawl to the seed's origin. [`HtmlExtractor::with_allowed_host`]
/// overrides it.
#[must_use]
#[derive(Debug, Default, Clone)]
pub struct HtmlExtractor {
    host: Option<String>,
}

impl HtmlExtractor {
    /// Creates a new [`HtmlExtractor`] restricted to each page's own host.
    pub fn new() -> Self {
        Self::default()
    }

    /// Restricts extracted links to the given host instead of the page's.
    pub fn with_allowed_host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    /// Scans the document and returns normalized links in document order.
    fn scan(&self, base: &Url, html: &str) -> (Vec<String>, Vec<BoxError>) {
        let mut links = Vec::new();
        let mut errors: Vec<BoxError> = Vec::new();

        let document = Html::parse_document(html);
        for element in document.select(&ANCHOR) {
            let Some(href) = element.value().attr("href") else {
                continue;
            };

            match self.normalize(base, href) {
                Ok(Some(link)) => links.push(link),
                Ok(None) => {}
                Err(error) => errors.push(Box::new(error)),
            }
        }

        (links, errors)
    }

    /// Resolves one href against `base` and applies the scheme, host,
    /// fragment, and trailing-slash rules.
    ///
    /// Returns `Ok(None)` for links that are valid but out of scope.
    fn normalize(&self, base: &Url, href: &str) -> Result<Option<String>, url::ParseError> {
        // Empty and fragment-only hrefs are references to the page itself.
        if href.is_empty() || href.starts_with('#') {
            return Ok(None);
        }

        let url = match Url::parse(href) {
            Ok(url) => url,
            Err(url::ParseError::RelativeUrlWithoutBase) => base.join(href)?,
            Err(error) => return Err(error),
        };

        if url.scheme() != "http" && url.scheme() != "https" {
            return Ok(None);
        }

        let allowed = self.host.as_deref().or_else(|| base.host_str());
        if url.host_str() != allowed {
            return Ok(None);
        }

        Ok(Some(canonical(&url)))
    }
}

/// Normalizes a URL to its canonical crawl form: fragment stripped,
/// trailing slash stripped.
///
/// The same form is applied to the seed by the CLI, so dedup string
/// equality lines up between the seed and the links extracted later.
#[must_use]
pub fn canonical(url: &Url) -> String {
    let mut url = url.clone();
    url.set_fragment(None);

    let mut text = url.to_string();
    if text.ends_with('/') {
        let _ = text.pop();
    }

    text
}

#[async_trait::async_trait]
impl Extractor for HtmlExtractor {
    async fn extract(&self, scope: &CancellationToken, base_url: &str, mut body: Body) -> Extracted {
        let base = match Url::parse(base_url) {
            Ok(base) => base,
            Err(error) => {
                return Extracted {
                    links: Vec::new(),
                    errors: vec![Box::new(error)],
                };
            }
        };

        // Stream the body in, observing cancellation between chunks. On
        // cancel or a broken transfer the scan runs over what arrived; the
        // orchestrator re-checks the scope afterwards.
        let mut errors: Vec<BoxError> = Vec::new();
        let mut buffer = Vec::new();
        loop {
            let chunk = tokio::select! {
                () = scope.cancelled() => break,
                chunk = body.chunk() => chunk,
            };

            match chunk {
                Some(Ok(bytes)) => buffer.extend_from_slice(&bytes),
                Some(Err(error)) => {
                    errors.push(error);
                    break;
                }
                None => break,
            }
        }

        let html = String::from_utf8_lossy(&buffer);
        let (links, scan_errors) = self.scan(&base, &html);
        errors.extend(scan_errors);

        Extracted { links, errors }
    }
}

impl fmt::Display for HtmlExtractor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.host {
            Some(host) => write!(f, "HtmlExtractor({host})"),
            None => f.write_str("HtmlExtractor(page host)"),
        }
    }
}
