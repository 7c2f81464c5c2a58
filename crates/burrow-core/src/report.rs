//! The [`Reporter`] trait: the lifecycle event sink.
//!
//! Every URL the crawl touches produces a small, fixed vocabulary of
//! events. `queued` fires when a URL is accepted into the work queue,
//! `starting` when a worker picks it up, and exactly one of `finished` or
//! `error` when its pipeline terminates. Events for a single URL arrive in
//! pipeline order; events for different URLs interleave freely, so
//! implementations must accept concurrent calls and serialize internally.

use std::sync::Arc;
use std::time::Duration;

use http::StatusCode;

use crate::ErrorKind;

/// Consumes crawl lifecycle events for display or aggregation.
///
/// [`Reporter::init`] is called exactly once before any other method, and
/// [`Reporter::exit`] exactly once after all others. Everything in between
/// may arrive concurrently from multiple workers.
pub trait Reporter: Send + Sync + 'static {
    /// Called once, before any event.
    fn init(&self) {}

    /// A URL was accepted into the work queue.
    fn queued(&self, url: &str) {
        let _ = url;
    }

    /// A worker began processing a URL.
    fn starting(&self, url: &str) {
        let _ = url;
    }

    /// A URL terminated with a response. Non-200 responses land here with
    /// zero links; they are observations, not errors.
    fn finished(
        &self,
        url: &str,
        status: StatusCode,
        elapsed: Duration,
        links: usize,
        parse_errors: usize,
    ) {
        let _ = (url, status, elapsed, links, parse_errors);
    }

    /// A URL terminated with one of the closed set of failures.
    fn error(&self, url: &str, kind: ErrorKind) {
        let _ = (url, kind);
    }

    /// Called once, after every event.
    fn exit(&self) {}
}

impl<T> Reporter for Arc<T>
where
    T: Reporter + ?Sized,
{
    fn init(&self) {
        T::init(self);
    }

    fn queued(&self, url: &str) {
        T::queued(self, url);
    }

    fn starting(&self, url: &str) {
        T::starting(self, url);
    }

    fn finished(
        &self,
        url: &str,
        status: StatusCode,
        elapsed: Duration,
        links: usize,
        parse_errors: usize,
    ) {
        T::finished(self, url, status, elapsed, links, parse_errors);
    }

    fn error(&self, url: &str, kind: ErrorKind) {
        T::error(self, url, kind);
    }

    fn exit(&self) {
        T::exit(self);
    }
}

/// No-op [`Reporter`] for tests and headless runs.
#[derive(Debug, Default, Clone, Copy)]
pub struct Noop;

impl Reporter for Noop {}
