// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Open the log file and start logging
// 3. Make sure the download directory exists
// 4. Run the crawl until there is nothing left to visit
// 5. Report the totals and exit (0 = crawl finished, 2 = could not start)
//
// A crawl that finishes always exits 0, even if some pages or PDFs failed;
// those failures are in the log.
// =============================================================================

// Module declarations - tells Rust about our other source files
mod cli;           // src/cli.rs - command-line parsing
mod config;        // src/config.rs - crawl settings and defaults
mod crawl;         // src/crawl/ - crawl loop, frontier, PDF downloads
mod error;         // src/error.rs - CrawlError
mod fetch;         // src/fetch/ - HTTP GET with retries
mod links;         // src/links/ - href extraction and URL canonicalization
mod logging;       // src/logging.rs - console + file logging

use anyhow::{Context, Result};
use clap::Parser;
use cli::Cli;
use crawl::{CrawlSummary, Crawler};
use fetch::Fetcher;
use tracing::info;
use url::Url;

#[tokio::main]
async fn main() {
    // Run our application logic and capture the exit code
    // std::process::exit() skips destructors, so everything that needs
    // flushing (the log writer) lives inside run()
    let exit_code = match run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

async fn run() -> Result<i32> {
    let cli = Cli::parse();

    let start_url = Url::parse(&cli.start_url)
        .with_context(|| format!("invalid start URL '{}'", cli.start_url))?;

    let _log_guard = logging::init(&cli.log_file)?;

    // Resolved links are compared against the start URL, and they always
    // come back in the url crate's normalized spelling
    let mut settings = cli.settings();
    settings.start_url = start_url.into();

    crawl::prepare_download_dir(&settings.download_dir)
        .await
        .with_context(|| {
            format!("cannot create download directory {}", settings.download_dir.display())
        })?;

    let fetcher = Fetcher::new(config::USER_AGENT, settings.retry)
        .context("cannot build HTTP client")?;

    let summary = Crawler::new(fetcher, settings).run().await;

    report(&summary, &cli)?;

    Ok(0)
}

// Logs the closing block and optionally prints the summary as JSON
fn report(summary: &CrawlSummary, cli: &Cli) -> Result<()> {
    info!("-----------------------------------------");
    info!("Crawling finished.");
    info!("Total unique pages visited: {}", summary.pages_visited);
    info!("Total unique PDFs downloaded: {}", summary.pdfs_downloaded);
    if summary.pages_failed > 0 || summary.downloads_failed > 0 {
        info!(
            "Pages that failed: {}, failed download attempts: {}",
            summary.pages_failed, summary.downloads_failed
        );
    }
    info!("Log file saved to: {}", summary.log_file.display());
    info!("-----------------------------------------");

    if cli.json {
        let json_output = serde_json::to_string_pretty(summary)?;
        println!("{}", json_output);
    }

    Ok(())
}
