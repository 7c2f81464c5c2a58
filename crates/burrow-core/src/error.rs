use std::convert::Infallible;
use std::fmt;

/// Type alias for a type-erased [`Error`] type.
///
/// [`Error`]: std::error::Error
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// The closed set of per-URL failure categories surfaced to the [`Reporter`].
///
/// Every URL that enters the crawl terminates in exactly one `finished` or
/// `error` event; `ErrorKind` names the error side of that split. Parse
/// failures are the exception: they are counted per page and surfaced in the
/// `finished` tuple rather than emitted individually.
///
/// [`Reporter`]: crate::report::Reporter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The fetcher failed to produce a response (connection refused,
    /// DNS failure, broken transfer).
    Transport,

    /// The per-item deadline elapsed or the external cancellation scope
    /// fired. The two are deliberately indistinguishable at this level.
    Canceled,

    /// The response was not flagged as HTML.
    NotHtml,

    /// The URL was already offered to the queue at least once.
    Duplicate,

    /// The queue was at capacity; the URL is skipped for this run.
    QueueFull,

    /// A malformed link inside an otherwise parseable page.
    Parse,
}

impl ErrorKind {
    /// Returns a string representation of the error kind.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Transport => "transport error",
            Self::Canceled => "canceled",
            Self::NotHtml => "unsupported content type",
            Self::Duplicate => "duplicate url",
            Self::QueueFull => "queue full",
            Self::Parse => "parse error",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Failure produced by a collaborator while processing a single URL.
///
/// Errors are observed, not propagated: the engine converts each of them
/// into a reporter event and moves on to the next URL. `Error` carries the
/// [`ErrorKind`] used for that event plus an optional source chain for
/// logging.
#[must_use]
#[derive(thiserror::Error)]
pub struct Error {
    kind: ErrorKind,
    message: String,
    #[source]
    source: Option<BoxError>,
}

impl Error {
    /// Creates a new [`Error`] with the given kind and message.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    /// Creates a new [`Error`] with the given kind, message, and source error.
    pub fn with_source(kind: ErrorKind, message: impl Into<String>, source: BoxError) -> Self {
        Self {
            kind,
            message: message.into(),
            source: Some(source),
        }
    }

    /// Creates the [`Error`] a fetcher returns when its cancellation scope
    /// fires mid-request.
    pub fn canceled() -> Self {
        Self::new(ErrorKind::Canceled, "canceled")
    }

    /// Returns the error kind.
    #[inline]
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Returns the error message.
    #[inline]
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns `true` if this error carries the cancellation kind.
    #[inline]
    #[must_use]
    pub const fn is_canceled(&self) -> bool {
        matches!(self.kind, ErrorKind::Canceled)
    }
}

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut debug = f.debug_struct("Error");
        debug
            .field("kind", &self.kind)
            .field("message", &self.message);

        if let Some(ref source) = self.source {
            debug.field("source", source);
        }

        debug.finish()
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.kind, self.message)
    }
}

impl From<Infallible> for Error {
    #[inline]
    fn from(_: Infallible) -> Self {
        unreachable!()
    }
}

#[cfg(test)]
mod test {
    use super::{Error, ErrorKind};

    #[test]
    fn kind_strings() {
        assert_eq!(ErrorKind::Duplicate.as_str(), "duplicate url");
        assert_eq!(ErrorKind::QueueFull.as_str(), "queue full");
        assert_eq!(ErrorKind::Canceled.to_string(), "canceled");
    }

    #[test]
    fn display_includes_kind() {
        let error = Error::new(ErrorKind::Transport, "connection refused");
        assert_eq!(error.to_string(), "[transport error] connection refused");
        assert_eq!(error.kind(), ErrorKind::Transport);
        assert!(!error.is_canceled());
        assert!(Error::canceled().is_canceled());
    }
}
