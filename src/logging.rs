// src/logging.rs
// =============================================================================
// Log setup: every message goes to stderr and to the log file.
// stdout is left free for the --json summary.
//
// Lifecycle:
// 1. main() calls init() once, before anything else logs
// 2. The returned guard is held while the crawl runs
// 3. Dropping the guard flushes whatever the file writer still buffers
//
// The log file is truncated at startup so it only ever holds the latest run.
// Level defaults to info; RUST_LOG overrides it (e.g. RUST_LOG=debug).
// =============================================================================

use anyhow::{Context, Result};
use std::fs::File;
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Installs the global subscriber. Keep the guard alive until exit.
pub fn init(log_file: &Path) -> Result<WorkerGuard> {
    if let Some(parent) = log_file.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("cannot create log directory {}", parent.display()))?;
    }

    let file = File::create(log_file)
        .with_context(|| format!("cannot open log file {}", log_file.display()))?;
    let (file_writer, guard) = tracing_appender::non_blocking(file);

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .compact(),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(file_writer)
                .with_ansi(false) // No ANSI colors in files
                .with_target(false),
        )
        .try_init()
        .context("logging was already initialized")?;

    Ok(guard)
}
