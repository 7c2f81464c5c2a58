//! The [`Extractor`] trait: how links are pulled out of a response body.

use tokio_util::sync::CancellationToken;

use crate::BoxError;
use crate::body::Body;

/// Extracts outbound links from a response body.
///
/// Implementations consume the body stream lazily and return when it is
/// exhausted, an unrecoverable error occurs, or `scope` fires. Returned
/// links must come back normalized and filtered: resolved against
/// `base_url`, restricted to the crawlable scheme and host, with fragments
/// and trailing slashes stripped. The engine treats them as opaque strings.
#[async_trait::async_trait]
pub trait Extractor: Send + Sync + 'static {
    /// Parses `body`, resolving links against `base_url`.
    async fn extract(&self, scope: &CancellationToken, base_url: &str, body: Body) -> Extracted;
}

/// The outcome of parsing one page.
///
/// A malformed link never aborts parsing; it lands in `errors` and the scan
/// continues. The engine reports `errors.len()` in the page's `finished`
/// event rather than emitting each one individually.
#[derive(Debug, Default)]
pub struct Extracted {
    /// Normalized outbound links, in document order.
    pub links: Vec<String>,

    /// Per-link parse failures.
    pub errors: Vec<BoxError>,
}

impl Extracted {
    /// Creates an empty [`Extracted`].
    pub fn new() -> Self {
        Self::default()
    }
}
