//! The [`Fetcher`] trait: how the engine turns a URL into a response.
//!
//! The engine never talks to the network itself. It hands each dequeued URL
//! to a consumer-supplied `Fetcher` together with the per-item cancellation
//! scope, and interprets the outcome:
//!
//! - `Err(_)` becomes a `Transport` (or `Canceled`) reporter event,
//! - a non-200 [`Fetched::status`] terminates the URL with a `finished`
//!   event and zero extracted links,
//! - a response not flagged as HTML terminates with a `NotHtml` event,
//! - everything else is streamed into the [`Extractor`].
//!
//! [`Extractor`]: crate::extract::Extractor

use http::StatusCode;
use tokio_util::sync::CancellationToken;

use crate::Result;
use crate::body::Body;

/// Resolves a URL into a status code, HTML flag, and body stream.
///
/// Exactly one result is produced per invocation. Implementations must
/// honor `scope`: when it fires mid-request they return an [`Error`] with
/// [`ErrorKind::Canceled`] (see [`Error::canceled`]).
///
/// [`Error`]: crate::Error
/// [`Error::canceled`]: crate::Error::canceled
/// [`ErrorKind::Canceled`]: crate::ErrorKind::Canceled
#[async_trait::async_trait]
pub trait Fetcher: Send + Sync + 'static {
    /// Fetches `url`, honoring the cancellation `scope`.
    async fn fetch(&self, scope: &CancellationToken, url: &str) -> Result<Fetched>;
}

/// A successfully produced response, HTML or otherwise.
#[derive(Debug)]
pub struct Fetched {
    /// The response status code. Non-200 codes are terminal observations,
    /// not errors.
    pub status: StatusCode,

    /// Whether the response declared an HTML content type.
    pub html: bool,

    /// The response body. The caller owns its release.
    pub body: Body,
}

impl Fetched {
    /// Creates a new HTML [`Fetched`] with a `200 OK` status.
    pub fn html(body: impl Into<Body>) -> Self {
        Self {
            status: StatusCode::OK,
            html: true,
            body: body.into(),
        }
    }

    /// Replaces the status code.
    pub fn with_status(mut self, status: StatusCode) -> Self {
        self.status = status;
        self
    }
}
