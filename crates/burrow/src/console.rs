//! Terminal [`Reporter`] with a live crawl summary.

use std::io::{self, Write};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crossterm::cursor::MoveTo;
use crossterm::terminal::{Clear, ClearType};
use http::StatusCode;
use tokio::task::JoinHandle;

use burrow_core::ErrorKind;
use burrow_core::report::Reporter;

/// How often the live summary repaints.
const TICK: Duration = Duration::from_millis(200);

/// [`Reporter`] that keeps a running summary on the terminal and prints
/// the sorted list of successfully crawled URLs on exit.
///
/// All counters are atomics and the URL list sits behind a mutex, so
/// concurrent calls from the worker pool serialize internally. The live
/// repaint runs on a 200 ms ticker task spawned by [`Reporter::init`] and
/// stopped by [`Reporter::exit`]; pass `false` to
/// [`ConsoleReporter::with_live_updates`] to skip it in non-interactive
/// runs.
#[must_use]
#[derive(Debug)]
pub struct ConsoleReporter {
    stats: Arc<Stats>,
    live: bool,
    ticker: Mutex<Option<JoinHandle<()>>>,
}

#[derive(Debug, Default)]
struct Stats {
    queued: AtomicU64,
    started: AtomicU64,
    errors: AtomicU64,
    success: AtomicU64,
    last_error: Mutex<Option<String>>,
    urls: Mutex<Vec<String>>,
}

impl Stats {
    fn render(&self) {
        let queued = self.queued.load(Ordering::Relaxed);
        let started = self.started.load(Ordering::Relaxed);
        let errors = self.errors.load(Ordering::Relaxed);
        let success = self.success.load(Ordering::Relaxed);

        let mut out = io::stdout();
        let _ = crossterm::queue!(out, Clear(ClearType::All), MoveTo(0, 0));
        let _ = writeln!(out, "Queued     {}", queued.saturating_sub(started));
        let _ = writeln!(out, "Started    {started}");
        let _ = writeln!(out, "Errors     {errors}");
        let _ = writeln!(out, "Success    {success}");
        let guard = self.last_error.lock();
        if let Some(error) = guard.expect("should not be already held").as_deref() {
            let _ = writeln!(out, "Last error {error}");
        }
        let _ = out.flush();
    }
}

impl ConsoleReporter {
    /// Creates a new [`ConsoleReporter`] with live updates enabled.
    pub fn new() -> Self {
        Self {
            stats: Arc::new(Stats::default()),
            live: true,
            ticker: Mutex::new(None),
        }
    }

    /// Enables or disables the live summary repaint.
    pub fn with_live_updates(mut self, live: bool) -> Self {
        self.live = live;
        self
    }
}

impl Default for ConsoleReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl Reporter for ConsoleReporter {
    fn init(&self) {
        if !self.live {
            return;
        }

        let stats = Arc::clone(&self.stats);
        let handle = tokio::spawn(async move {
            let mut tick = tokio::time::interval(TICK);
            loop {
                let _ = tick.tick().await;
                stats.render();
            }
        });

        let guard = self.ticker.lock();
        *guard.expect("should not be already held") = Some(handle);
    }

    fn queued(&self, _url: &str) {
        let _ = self.stats.queued.fetch_add(1, Ordering::Relaxed);
    }

    fn starting(&self, _url: &str) {
        let _ = self.stats.started.fetch_add(1, Ordering::Relaxed);
    }

    fn finished(
        &self,
        url: &str,
        status: StatusCode,
        _elapsed: Duration,
        _links: usize,
        _parse_errors: usize,
    ) {
        if status != StatusCode::OK {
            let _ = self.stats.errors.fetch_add(1, Ordering::Relaxed);
            return;
        }

        let _ = self.stats.success.fetch_add(1, Ordering::Relaxed);
        let guard = self.stats.urls.lock();
        guard
            .expect("should not be already held")
            .push(url.to_owned());
    }

    fn error(&self, url: &str, kind: ErrorKind) {
        let _ = self.stats.errors.fetch_add(1, Ordering::Relaxed);

        // Cancellations flood in at shutdown and would mask the last
        // interesting failure.
        if kind != ErrorKind::Canceled {
            let guard = self.stats.last_error.lock();
            let mut lock = guard.expect("should not be already held");
            *lock = Some(format!("{url}: {kind}"));
        }
    }

    fn exit(&self) {
        let handle = {
            let guard = self.ticker.lock();
            guard.expect("should not be already held").take()
        };
        if let Some(handle) = handle {
            handle.abort();
        }

        let mut urls = {
            let guard = self.stats.urls.lock();
            guard.expect("should not be already held").clone()
        };
        urls.sort();

        let mut out = io::stdout();
        if self.live {
            let _ = crossterm::queue!(out, Clear(ClearType::All), MoveTo(0, 0));
        }
        for url in &urls {
            let _ = writeln!(out, "{url}");
        }
        let _ = out.flush();
    }
}

#[cfg(test)]
mod test {
    use std::time::Duration;

    use http::StatusCode;

    use burrow_core::ErrorKind;
    use burrow_core::report::Reporter;

    use super::ConsoleReporter;

    #[tokio::test]
    async fn counters_accumulate() {
        let reporter = ConsoleReporter::new().with_live_updates(false);

        reporter.init();
        reporter.queued("a");
        reporter.starting("a");
        reporter.finished("a", StatusCode::OK, Duration::ZERO, 1, 0);
        reporter.queued("b");
        reporter.starting("b");
        reporter.finished("b", StatusCode::NOT_FOUND, Duration::ZERO, 0, 0);
        reporter.error("c", ErrorKind::QueueFull);

        assert_eq!(reporter.stats.queued.load(std::sync::atomic::Ordering::Relaxed), 2);
        assert_eq!(reporter.stats.success.load(std::sync::atomic::Ordering::Relaxed), 1);
        assert_eq!(reporter.stats.errors.load(std::sync::atomic::Ordering::Relaxed), 2);

        let last = reporter.stats.last_error.lock().unwrap().clone();
        assert_eq!(last.as_deref(), Some("c: queue full"));
    }

    #[tokio::test]
    async fn cancellations_do_not_overwrite_last_error() {
        let reporter = ConsoleReporter::new().with_live_updates(false);

        reporter.error("a", ErrorKind::Transport);
        reporter.error("b", ErrorKind::Canceled);

        let last = reporter.stats.last_error.lock().unwrap().clone();
        assert_eq!(last.as_deref(), Some("a: transport error"));
    }
}
