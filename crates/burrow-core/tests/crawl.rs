//! End-to-end crawl scenarios over the mock collaborators.
//!
//! With a single worker the event order is deterministic, so these tests
//! assert the recorded event streams verbatim, the same way the engine is
//! expected to behave against a live site.

use std::sync::Arc;
use std::time::Duration;

use burrow_core::Crawler;
use burrow_core::testing::{MockExtractor, MockFetcher, MockLinks, MockPage, RecordingReporter};

fn crawler(
    fetcher: MockFetcher,
    extractor: MockExtractor,
) -> (Crawler<MockFetcher, MockExtractor, Arc<RecordingReporter>>, Arc<RecordingReporter>) {
    let reporter = Arc::new(RecordingReporter::new());
    let crawler = Crawler::new(fetcher, extractor, reporter.clone())
        .with_workers(1)
        .with_queue_length(10);
    (crawler, reporter)
}

#[tokio::test]
async fn simple_leaf() {
    let fetcher = MockFetcher::new().page("a", MockPage::html("a_body"));
    let (crawler, reporter) = crawler(fetcher, MockExtractor::new());

    let processed = crawler.run("a").await;

    assert_eq!(processed, 1);
    assert_eq!(
        reporter.events(),
        ["queue a", "start a", "finish a: 200, 0, 0"]
    );
}

#[tokio::test]
async fn one_child() {
    let fetcher = MockFetcher::new().page("a", MockPage::html("a_body"));
    let extractor = MockExtractor::new().body("a_body", MockLinks::to(["b"]));
    let (crawler, reporter) = crawler(fetcher, extractor);

    crawler.run("a").await;

    assert_eq!(
        reporter.events(),
        [
            "queue a",
            "start a",
            "finish a: 200, 1, 0",
            "queue b",
            "start b",
            "finish b: 404, 0, 0",
        ]
    );
}

#[tokio::test]
async fn queue_full_drops_child() {
    let fetcher = MockFetcher::new().page("a", MockPage::html("a_body"));
    let extractor = MockExtractor::new().body("a_body", MockLinks::to(["b", "c", "d"]));
    let reporter = Arc::new(RecordingReporter::new());
    let crawler = Crawler::new(fetcher, extractor, reporter.clone())
        .with_workers(1)
        .with_queue_length(2);

    crawler.run("a").await;

    assert_eq!(
        reporter.events(),
        [
            "queue a",
            "start a",
            "finish a: 200, 3, 0",
            "queue b",
            "queue c",
            "error d: queue full",
            "start b",
            "finish b: 404, 0, 0",
            "start c",
            "finish c: 404, 0, 0",
        ]
    );
}

#[tokio::test]
async fn duplicate_child() {
    let fetcher = MockFetcher::new().page("a", MockPage::html("a_body"));
    let extractor = MockExtractor::new().body("a_body", MockLinks::to(["b", "b"]));
    let reporter = Arc::new(RecordingReporter::new());
    let crawler = Crawler::new(fetcher, extractor, reporter.clone())
        .with_workers(1)
        .with_queue_length(2);

    crawler.run("a").await;

    assert_eq!(
        reporter.events(),
        [
            "queue a",
            "start a",
            "finish a: 200, 2, 0",
            "queue b",
            "error b: duplicate url",
            "start b",
            "finish b: 404, 0, 0",
        ]
    );
}

#[tokio::test]
async fn transitive_graph() {
    let fetcher = MockFetcher::new()
        .page("a", MockPage::html("a_body"))
        .page("b", MockPage::html("b_body"))
        .page("c", MockPage::html("c_body"))
        .page("d", MockPage::html("d_body"));
    let extractor = MockExtractor::new()
        .body("a_body", MockLinks::to(["b", "c"]))
        .body("c_body", MockLinks::to(["d", "e"]));
    let (crawler, reporter) = crawler(fetcher, extractor);

    // Any finite reachable set terminates; guard against regressions that
    // would hang the run instead of failing it.
    let run = crawler.run("a");
    let processed = tokio::time::timeout(Duration::from_secs(5), run)
        .await
        .expect("crawl should terminate");

    assert_eq!(processed, 5);
    assert_eq!(
        reporter.events(),
        [
            "queue a",
            "start a",
            "finish a: 200, 2, 0",
            "queue b",
            "queue c",
            "start b",
            "finish b: 200, 0, 0",
            "start c",
            "finish c: 200, 2, 0",
            "queue d",
            "queue e",
            "start d",
            "finish d: 200, 0, 0",
            "start e",
            "finish e: 404, 0, 0",
        ]
    );
}

#[tokio::test]
async fn item_timeout_cancels() {
    let fetcher =
        MockFetcher::new().page("a", MockPage::html("a_body").with_latency(Duration::from_secs(1)));
    let reporter = Arc::new(RecordingReporter::new());
    let crawler = Crawler::new(fetcher, MockExtractor::new(), reporter.clone())
        .with_workers(1)
        .with_queue_length(10)
        .with_item_timeout(Duration::from_millis(10));

    crawler.run("a").await;

    assert_eq!(
        reporter.events(),
        ["queue a", "start a", "error a: canceled"]
    );
}

#[tokio::test]
async fn external_cancel_before_start() {
    let fetcher = MockFetcher::new().page("a", MockPage::html("a_body"));
    let (crawler, reporter) = crawler(fetcher, MockExtractor::new());

    crawler.cancellation_token().cancel();
    crawler.run("a").await;

    // Cancelled before any worker picked it up: terminal without a start.
    assert_eq!(reporter.events(), ["queue a", "error a: canceled"]);
}

#[tokio::test]
async fn external_cancel_mid_fetch() {
    let fetcher =
        MockFetcher::new().page("a", MockPage::html("a_body").with_latency(Duration::from_secs(10)));
    let (crawler, reporter) = crawler(fetcher, MockExtractor::new());

    let cancel = crawler.cancellation_token();
    let trigger = tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        cancel.cancel();
    });

    let run = crawler.run("a");
    tokio::time::timeout(Duration::from_secs(5), run)
        .await
        .expect("cancelled crawl should drain promptly");
    trigger.await.unwrap();

    assert_eq!(
        reporter.events(),
        ["queue a", "start a", "error a: canceled"]
    );
}

#[tokio::test]
async fn non_200_reported_without_children() {
    let fetcher = MockFetcher::new().page("a", MockPage::html("a_body").with_status(500));
    let (crawler, reporter) = crawler(fetcher, MockExtractor::new());

    crawler.run("a").await;

    assert_eq!(
        reporter.events(),
        ["queue a", "start a", "finish a: 500, 0, 0"]
    );
}

#[tokio::test]
async fn non_html_is_an_error() {
    let fetcher = MockFetcher::new().page("a", MockPage::html("a_body").with_content_type_other());
    let (crawler, reporter) = crawler(fetcher, MockExtractor::new());

    crawler.run("a").await;

    assert_eq!(
        reporter.events(),
        ["queue a", "start a", "error a: unsupported content type"]
    );
}

#[tokio::test]
async fn transport_failure_is_observed() {
    let fetcher = MockFetcher::new()
        .page("a", MockPage::html("").with_transport_error("connection refused"));
    let (crawler, reporter) = crawler(fetcher, MockExtractor::new());

    crawler.run("a").await;

    assert_eq!(
        reporter.events(),
        ["queue a", "start a", "error a: transport error"]
    );
}

#[tokio::test]
async fn parse_errors_are_counted_not_emitted() {
    let fetcher = MockFetcher::new().page("a", MockPage::html("a_body"));
    let extractor = MockExtractor::new().body(
        "a_body",
        MockLinks::to(["b"]).with_error("missing protocol scheme"),
    );
    let (crawler, reporter) = crawler(fetcher, extractor);

    crawler.run("a").await;

    assert_eq!(
        reporter.events(),
        [
            "queue a",
            "start a",
            "finish a: 200, 1, 1",
            "queue b",
            "start b",
            "finish b: 404, 0, 0",
        ]
    );
}

#[tokio::test]
async fn repeated_runs_use_fresh_state() {
    let fetcher = MockFetcher::new().page("a", MockPage::html("a_body"));
    let (crawler, reporter) = crawler(fetcher, MockExtractor::new());

    crawler.run("a").await;
    crawler.run("a").await;

    // A second run starts from a fresh dedup set and queue; the seed is
    // not a duplicate of the first run's.
    assert_eq!(
        reporter.events(),
        [
            "queue a",
            "start a",
            "finish a: 200, 0, 0",
            "queue a",
            "start a",
            "finish a: 200, 0, 0",
        ]
    );
}
