//! HTTP [`Fetcher`] backed by reqwest.

use std::fmt;
use std::time::Duration;

use futures::TryStreamExt;
use http::header;
use tokio_util::sync::CancellationToken;

use burrow_core::body::Body;
use burrow_core::fetch::{Fetched, Fetcher};
use burrow_core::{BoxError, Error, ErrorKind, Result};

/// Connect timeout for the default client; the engine's per-item deadline
/// bounds the request as a whole.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

const USER_AGENT: &str = concat!("burrow/", env!("CARGO_PKG_VERSION"));

/// [`Fetcher`] that performs GET requests with a shared [`reqwest::Client`].
///
/// The response body is exposed to the engine as a chunk stream, so large
/// pages are never buffered here; the extractor decides how much to read.
/// Redirects are followed by reqwest's default policy.
#[derive(Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    /// Creates a new [`HttpFetcher`] with the default client configuration.
    pub fn new() -> Self {
        let client = reqwest::Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .user_agent(USER_AGENT)
            .build()
            .expect("reqwest client configuration is valid");

        Self { client }
    }

    /// Creates a new [`HttpFetcher`] from a preconfigured client.
    pub fn from_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for HttpFetcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpFetcher").finish_non_exhaustive()
    }
}

#[async_trait::async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, scope: &CancellationToken, url: &str) -> Result<Fetched> {
        let request = self.client.get(url).send();
        let response = tokio::select! {
            () = scope.cancelled() => return Err(Error::canceled()),
            result = request => result
                .map_err(|x| Error::with_source(ErrorKind::Transport, "request failed", Box::new(x)))?,
        };

        let status = response.status();
        let html = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|x| x.to_str().ok())
            .is_some_and(is_html_content_type);

        let stream = response
            .bytes_stream()
            .map_err(|x| -> BoxError { Box::new(x) });

        Ok(Fetched {
            status,
            html,
            body: Body::from_stream(stream),
        })
    }
}

/// Returns `true` for `text/html` content types, with or without
/// parameters.
fn is_html_content_type(value: &str) -> bool {
    value.contains("text/html")
}

#[cfg(test)]
mod test {
    use super::{HttpFetcher, is_html_content_type};

    #[test]
    fn html_content_types() {
        assert!(is_html_content_type("text/html"));
        assert!(is_html_content_type("text/html; charset=utf-8"));
        assert!(!is_html_content_type("application/json"));
        assert!(!is_html_content_type("text/plain"));
    }

    #[test]
    fn default_client() {
        let fetcher = HttpFetcher::default();
        let debug = format!("{fetcher:?}");
        assert!(debug.contains("HttpFetcher"));
    }
}
