//! Tracing subscriber setup
//!
//! Console logs go to stderr so report output on stdout stays clean.
//! `RUST_LOG` takes precedence over the configured level.

use std::io;
use std::path::Path;

use anyhow::{Context, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;

use crate::config::{LoggingConfig, expand_home};

/// Crates whose chatter is capped below the application level
const NOISY_TARGETS: &str = "hyper=warn,hyper_util=warn,reqwest=warn,rustls=warn";

/// Build the filter directive for a base level
#[must_use]
pub fn filter_directive(level: &str, verbose: bool) -> String {
    let level = if verbose { "debug" } else { level };
    format!("{level},{NOISY_TARGETS}")
}

fn env_filter(level: &str, verbose: bool) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter_directive(level, verbose)))
}

/// Install the global subscriber.
///
/// The returned guard flushes the file writer on drop and must be held for
/// the life of the process.
pub fn configure_logging(config: &LoggingConfig, verbose: bool) -> Result<Option<WorkerGuard>> {
    let json = config.format == "json";
    let to_console = matches!(config.output.as_str(), "console" | "both");
    let to_file = matches!(config.output.as_str(), "file" | "both");

    let console_layer = to_console.then(|| {
        let layer = fmt::layer().with_writer(io::stderr).with_target(verbose);
        if json {
            layer.json().with_filter(env_filter(&config.level, verbose)).boxed()
        } else {
            layer.with_filter(env_filter(&config.level, verbose)).boxed()
        }
    });

    let (file_layer, guard) = if to_file {
        let path = expand_home(&config.file_path);
        let directory = path.parent().unwrap_or_else(|| Path::new("."));
        std::fs::create_dir_all(directory)
            .with_context(|| format!("Failed to create log directory: {}", directory.display()))?;
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "weatherai.log".to_string());

        let appender = tracing_appender::rolling::never(directory, file_name);
        let (writer, guard) = tracing_appender::non_blocking(appender);
        let layer = fmt::layer().with_writer(writer).with_ansi(false);
        let layer = if json {
            layer.json().with_filter(env_filter(&config.level, verbose)).boxed()
        } else {
            layer.with_filter(env_filter(&config.level, verbose)).boxed()
        };
        (Some(layer), Some(guard))
    } else {
        (None, None)
    };

    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .context("Failed to install tracing subscriber")?;

    Ok(guard)
}
