// Copyright 2025 MorphoDB Contributors
// SPDX-License-Identifier: Apache-2.0

//! Logging initialization
//!
//! Console output always; JSON file output when a log directory is given.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Utc;
use tracing_appender::rolling;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry};

use crate::cli::CrateDebugFlags;

/// Name of the combined JSON log inside a run folder
pub const LOG_FILE_NAME: &str = "morphodb.log";

/// Keeps file writers alive; logs are flushed when it is dropped
pub struct LoggingGuard {
    _file_guard: Option<tracing_appender::non_blocking::WorkerGuard>,
    run_dir: Option<PathBuf>,
}

impl LoggingGuard {
    /// Run folder the JSON log is written to, if file logging is on
    pub fn run_dir(&self) -> Option<&Path> {
        self.run_dir.as_deref()
    }
}

/// Timestamped run folder under `base`, e.g. `logs/run_20250101_120000`
pub fn run_folder(base: &Path) -> PathBuf {
    let timestamp = Utc::now().format("%Y%m%d_%H%M%S");
    base.join(format!("run_{}", timestamp))
}

/// Install the global subscriber
///
/// Layout when `log_dir` is given:
/// ```text
/// <log_dir>/
///   └── run_20250101_120000/
///       └── morphodb.log   (JSON, one event per line)
/// ```
///
/// # Arguments
/// * `debug_flags` - Crates to raise to `debug`
/// * `default_level` - Level for everything else (e.g. `"info"`)
/// * `log_dir` - Base directory for JSON logs; console only when `None`
///
/// # Errors
///
/// Fails if the run folder cannot be created or a global subscriber is
/// already installed.
pub fn init_logging(
    debug_flags: &CrateDebugFlags,
    default_level: &str,
    log_dir: Option<&Path>,
) -> Result<LoggingGuard> {
    let filter = debug_flags.to_filter_string_with_default(default_level);
    let env_filter = EnvFilter::try_new(&filter)
        .with_context(|| format!("Invalid log filter: {}", filter))?;

    let mut layers = Vec::new();

    let console_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_filter(env_filter.clone());
    layers.push(console_layer.boxed());

    let mut file_guard = None;
    let mut run_dir = None;
    if let Some(base) = log_dir {
        let folder = run_folder(base);
        std::fs::create_dir_all(&folder)
            .with_context(|| format!("Failed to create log directory: {}", folder.display()))?;

        let appender = rolling::never(&folder, LOG_FILE_NAME);
        let (non_blocking, guard) = tracing_appender::non_blocking(appender);

        let file_layer = tracing_subscriber::fmt::layer()
            .with_writer(non_blocking)
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .json()
            .with_filter(env_filter)
            .boxed();
        layers.push(file_layer);

        file_guard = Some(guard);
        run_dir = Some(folder);
    }

    Registry::default()
        .with(layers)
        .try_init()
        .context("A global tracing subscriber is already installed")?;

    Ok(LoggingGuard {
        _file_guard: file_guard,
        run_dir,
    })
}

/// Console logging at `info`, with debug flags from args and `MORPHODB_DEBUG`
pub fn init_logging_default() -> Result<LoggingGuard> {
    init_logging(&crate::cli::parse_debug_flags(), "info", None)
}
