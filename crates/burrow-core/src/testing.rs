//! Mock collaborators for exercising the engine without the network.
//!
//! [`MockFetcher`] serves canned pages keyed by URL, [`MockExtractor`]
//! maps body text to canned link lists, and [`RecordingReporter`] captures
//! the event stream as canonical strings. Together they make crawl runs
//! fully deterministic; with a single worker the recorded event order is
//! reproducible and can be asserted verbatim.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use http::StatusCode;
use tokio_util::sync::CancellationToken;

use crate::body::Body;
use crate::extract::{Extracted, Extractor};
use crate::fetch::{Fetched, Fetcher};
use crate::report::Reporter;
use crate::{Error, ErrorKind, Result};

/// A canned response served by [`MockFetcher`].
#[derive(Debug, Clone)]
pub struct MockPage {
    body: String,
    status: StatusCode,
    html: bool,
    latency: Duration,
    error: Option<String>,
}

impl MockPage {
    /// An HTML page with a `200 OK` status and no latency.
    pub fn html(body: impl Into<String>) -> Self {
        Self {
            body: body.into(),
            status: StatusCode::OK,
            html: true,
            latency: Duration::ZERO,
            error: None,
        }
    }

    /// Replaces the status code.
    pub fn with_status(mut self, status: u16) -> Self {
        self.status = StatusCode::from_u16(status).expect("invalid mock status code");
        self
    }

    /// Marks the response as non-HTML.
    pub fn with_content_type_other(mut self) -> Self {
        self.html = false;
        self
    }

    /// Delays the response; the wait races the cancellation scope.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Fails the fetch with a transport error instead of responding.
    pub fn with_transport_error(mut self, message: impl Into<String>) -> Self {
        self.error = Some(message.into());
        self
    }
}

/// [`Fetcher`] that serves [`MockPage`]s keyed by URL.
///
/// URLs without a configured page yield a `404` with the body
/// `"404 error body"`, so link graphs can dangle without special casing.
#[must_use]
#[derive(Debug, Default)]
pub struct MockFetcher {
    pages: HashMap<String, MockPage>,
}

impl MockFetcher {
    /// Creates an empty [`MockFetcher`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a page for `url`.
    pub fn page(mut self, url: impl Into<String>, page: MockPage) -> Self {
        let _ = self.pages.insert(url.into(), page);
        self
    }
}

#[async_trait::async_trait]
impl Fetcher for MockFetcher {
    async fn fetch(&self, scope: &CancellationToken, url: &str) -> Result<Fetched> {
        let Some(page) = self.pages.get(url) else {
            return Ok(Fetched::html("404 error body").with_status(StatusCode::NOT_FOUND));
        };

        if !page.latency.is_zero() {
            tokio::select! {
                () = scope.cancelled() => return Err(Error::canceled()),
                () = tokio::time::sleep(page.latency) => {}
            }
        }

        if let Some(message) = &page.error {
            return Err(Error::new(ErrorKind::Transport, message.clone()));
        }

        Ok(Fetched {
            status: page.status,
            html: page.html,
            body: Body::from_bytes(page.body.clone()),
        })
    }
}

/// Canned extraction result served by [`MockExtractor`].
#[derive(Debug, Default, Clone)]
pub struct MockLinks {
    links: Vec<String>,
    errors: Vec<String>,
}

impl MockLinks {
    /// Links only, no parse errors.
    pub fn to<I, S>(links: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            links: links.into_iter().map(Into::into).collect(),
            errors: Vec::new(),
        }
    }

    /// Adds a parse error message.
    pub fn with_error(mut self, message: impl Into<String>) -> Self {
        self.errors.push(message.into());
        self
    }
}

/// [`Extractor`] that maps body text to canned [`MockLinks`].
///
/// Bodies without a configured entry extract to nothing, matching a page
/// with no anchors.
#[must_use]
#[derive(Debug, Default)]
pub struct MockExtractor {
    results: HashMap<String, MockLinks>,
}

impl MockExtractor {
    /// Creates an empty [`MockExtractor`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an extraction result for bodies equal to `body`.
    pub fn body(mut self, body: impl Into<String>, links: MockLinks) -> Self {
        let _ = self.results.insert(body.into(), links);
        self
    }
}

#[async_trait::async_trait]
impl Extractor for MockExtractor {
    async fn extract(&self, _scope: &CancellationToken, _base_url: &str, body: Body) -> Extracted {
        let text = match body.text().await {
            Ok(text) => text,
            Err(error) => {
                return Extracted {
                    links: Vec::new(),
                    errors: vec![error],
                };
            }
        };

        let Some(result) = self.results.get(&text) else {
            return Extracted::new();
        };

        Extracted {
            links: result.links.clone(),
            errors: result
                .errors
                .iter()
                .map(|x| Error::new(ErrorKind::Parse, x.clone()).into())
                .collect(),
        }
    }
}

/// [`Reporter`] that records events as canonical strings.
///
/// The format mirrors what the console reporter aggregates: `queue a`,
/// `start a`, `finish a: 200, 2, 0` (status, links, parse errors), and
/// `error b: duplicate url`.
#[must_use]
#[derive(Debug, Default)]
pub struct RecordingReporter {
    events: Mutex<Vec<String>>,
}

impl RecordingReporter {
    /// Creates an empty [`RecordingReporter`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a snapshot of the recorded events.
    #[must_use]
    pub fn events(&self) -> Vec<String> {
        let guard = self.events.lock();
        guard.expect("should not be already held").clone()
    }

    fn record(&self, event: String) {
        let guard = self.events.lock();
        guard.expect("should not be already held").push(event);
    }
}

impl Reporter for RecordingReporter {
    fn queued(&self, url: &str) {
        self.record(format!("queue {url}"));
    }

    fn starting(&self, url: &str) {
        self.record(format!("start {url}"));
    }

    fn finished(
        &self,
        url: &str,
        status: StatusCode,
        _elapsed: Duration,
        links: usize,
        parse_errors: usize,
    ) {
        self.record(format!(
            "finish {url}: {}, {links}, {parse_errors}",
            status.as_u16()
        ));
    }

    fn error(&self, url: &str, kind: ErrorKind) {
        self.record(format!("error {url}: {kind}"));
    }
}
