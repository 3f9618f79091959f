// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// Every argument is optional: run the binary with no arguments and it crawls
// the default site into ./pdf_downloads, logging to ./crawl_log.txt.
// =============================================================================

use crate::config::{
    CrawlSettings, DEFAULT_DOWNLOAD_DIR, DEFAULT_LOG_FILE, DEFAULT_START_URL,
};
use crate::fetch::RetryPolicy;
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

// #[derive(Parser)] tells clap to automatically generate parsing code
// The #[command(...)] attributes configure how the CLI behaves
#[derive(Parser, Debug)]
#[command(
    name = "pdf-harvester",
    version,
    about = "Crawl every page under a URL and download the PDFs it links to",
    long_about = "pdf-harvester crawls breadth-first from START_URL, follows only links that \
                  start with START_URL, and saves every linked PDF into the output directory. \
                  Failed pages and downloads are retried a few times, then skipped."
)]
pub struct Cli {
    /// Where to start; only URLs beginning with this string are crawled
    #[arg(default_value = DEFAULT_START_URL)]
    pub start_url: String,

    /// Directory PDFs are saved into (created if missing)
    #[arg(short, long, default_value = DEFAULT_DOWNLOAD_DIR)]
    pub output_dir: PathBuf,

    /// Log file, overwritten on every run
    #[arg(long, default_value = DEFAULT_LOG_FILE)]
    pub log_file: PathBuf,

    /// Pause before each page fetch, in milliseconds
    #[arg(long, default_value_t = 500)]
    pub delay_ms: u64,

    /// Attempts per URL before giving up
    #[arg(long, default_value_t = 3, value_parser = clap::value_parser!(u32).range(1..))]
    pub max_attempts: u32,

    /// Wait after the first failed attempt, in seconds; doubles each retry
    #[arg(long, default_value_t = 1)]
    pub backoff_secs: u64,

    /// Print the final summary as JSON on stdout
    #[arg(long)]
    pub json: bool,
}

impl Cli {
    /// Turns the parsed arguments into crawl settings
    pub fn settings(&self) -> CrawlSettings {
        let mut settings = CrawlSettings::new(&self.start_url);
        settings.download_dir = self.output_dir.clone();
        settings.log_file = self.log_file.clone();
        settings.polite_delay = Duration::from_millis(self.delay_ms);
        settings.retry = RetryPolicy {
            max_attempts: self.max_attempts,
            backoff_base: Duration::from_secs(self.backoff_secs),
        };
        settings
    }
}
