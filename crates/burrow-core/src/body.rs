//! Response body streaming.
//!
//! The engine hands a [`Body`] to the extractor for the duration of one URL.
//! Ownership is the release mechanism: every exit path of the per-URL
//! pipeline drops the `Body`, which drops the underlying stream and frees
//! the connection it was read from.

use std::fmt;

use bytes::Bytes;
use futures::stream::{self, BoxStream, StreamExt};

use crate::BoxError;

/// An owned stream of response body chunks.
#[must_use]
pub struct Body {
    inner: BoxStream<'static, Result<Bytes, BoxError>>,
}

impl Body {
    /// Creates an empty [`Body`].
    pub fn empty() -> Self {
        Self {
            inner: stream::empty().boxed(),
        }
    }

    /// Creates a single-chunk [`Body`] from a byte buffer.
    pub fn from_bytes(bytes: impl Into<Bytes>) -> Self {
        let bytes = bytes.into();
        Self {
            inner: stream::once(async move { Ok(bytes) }).boxed(),
        }
    }

    /// Creates a [`Body`] from an arbitrary chunk stream.
    pub fn from_stream<S>(stream: S) -> Self
    where
        S: futures::Stream<Item = Result<Bytes, BoxError>> + Send + 'static,
    {
        Self {
            inner: stream.boxed(),
        }
    }

    /// Returns the next chunk, or `None` at the end of the stream.
    pub async fn chunk(&mut self) -> Option<Result<Bytes, BoxError>> {
        self.inner.next().await
    }

    /// Drains the remaining chunks into a lossily-decoded string.
    pub async fn text(mut self) -> Result<String, BoxError> {
        let mut buffer = Vec::new();
        while let Some(chunk) = self.chunk().await {
            buffer.extend_from_slice(&chunk?);
        }

        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }
}

impl Default for Body {
    fn default() -> Self {
        Self::empty()
    }
}

impl From<String> for Body {
    fn from(value: String) -> Self {
        Self::from_bytes(value)
    }
}

impl From<&'static str> for Body {
    fn from(value: &'static str) -> Self {
        Self::from_bytes(value)
    }
}

impl fmt::Debug for Body {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Body").finish_non_exhaustive()
    }
}
