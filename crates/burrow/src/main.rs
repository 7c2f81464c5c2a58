//! Command-line front-end for the burrow crawler.

use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use tracing_subscriber::EnvFilter;
use url::Url;

use burrow::{ConsoleReporter, Crawler, HtmlExtractor, HttpFetcher, canonical};

/// Crawl a single origin and print every page it links to.
#[derive(Debug, Parser)]
#[command(name = "burrow", version, about)]
struct Args {
    /// Seed URL to crawl from.
    url: String,

    /// Number of concurrent workers.
    #[arg(long, default_value_t = 5)]
    workers: usize,

    /// Maximum number of pending URLs; further links are dropped.
    #[arg(long, default_value_t = 1000)]
    queue_length: usize,

    /// Per-URL deadline in seconds.
    #[arg(long, default_value_t = 10)]
    timeout: u64,

    /// Disable the live summary; print only the final URL list.
    #[arg(long)]
    quiet: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let seed = match Url::parse(&args.url) {
        Ok(seed) => seed,
        Err(error) => {
            eprintln!("invalid seed URL {:?}: {error}", args.url);
            return ExitCode::FAILURE;
        }
    };
    let Some(host) = seed.host_str().map(ToOwned::to_owned) else {
        eprintln!("seed URL {:?} has no host to crawl", args.url);
        return ExitCode::FAILURE;
    };

    let crawler = Crawler::new(
        HttpFetcher::new(),
        HtmlExtractor::new().with_allowed_host(host),
        ConsoleReporter::new().with_live_updates(!args.quiet),
    )
    .with_workers(args.workers)
    .with_queue_length(args.queue_length)
    .with_item_timeout(Duration::from_secs(args.timeout));

    let cancel = crawler.cancellation_token();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            cancel.cancel();
        }
    });

    // The seed goes through the same canonical form the extractor applies
    // to links, so it dedups against them correctly.
    let processed = crawler.run(canonical(&seed)).await;
    tracing::info!(processed, "crawl complete");

    ExitCode::SUCCESS
}
