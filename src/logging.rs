use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use tracing::debug;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::fmt::format::{DefaultFields, Format};
use tracing_subscriber::fmt::{self, MakeWriter};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

// =============================================================================
// Logging Setup
// =============================================================================

const LOG_FILE_PREFIX: &str = "rusty-portboard.log";

/// Variable that replaces the `--log-level` directive when set and non-empty.
const FILTER_ENV: &str = "RUST_LOG";

/// `RUST_LOG` wins over the CLI level; the CLI level only covers this crate.
fn filter_directive(log_level: &str, env_override: Option<&str>) -> String {
    match env_override.map(str::trim) {
        Some(directive) if !directive.is_empty() => directive.to_string(),
        _ => format!("rusty_portboard={}", log_level.trim()),
    }
}

fn build_filter(log_level: &str, env_override: Option<&str>) -> Result<EnvFilter> {
    let directive = filter_directive(log_level, env_override);
    EnvFilter::try_new(&directive).with_context(|| format!("Invalid log filter: {}", directive))
}

/// Message-only lines: no targets, thread ids or source locations.
fn plain_layer<S, W>(writer: W, ansi: bool) -> fmt::Layer<S, DefaultFields, Format, W>
where
    W: for<'w> MakeWriter<'w> + 'static,
{
    fmt::layer()
        .with_writer(writer)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .with_ansi(ansi)
}

/// Console plus daily-rotated file output. Keep the guard alive for the
/// lifetime of the process or buffered file lines are lost.
pub fn setup_logging(log_dir: &Path, log_level: &str) -> Result<WorkerGuard> {
    let env_override = std::env::var(FILTER_ENV).ok();
    let filter = build_filter(log_level, env_override.as_deref())?;

    fs::create_dir_all(log_dir)
        .with_context(|| format!("Failed to create log directory: {}", log_dir.display()))?;
    let (file_writer, guard) = tracing_appender::non_blocking(RollingFileAppender::new(
        Rotation::DAILY,
        log_dir,
        LOG_FILE_PREFIX,
    ));

    tracing_subscriber::registry()
        .with(filter)
        .with(plain_layer(std::io::stdout, true))
        .with(plain_layer(file_writer, false))
        .try_init()
        .context("Failed to install tracing subscriber")?;

    debug!(
        "Logging to {} (filter from {})",
        log_dir.join(LOG_FILE_PREFIX).display(),
        if env_override.is_some_and(|v| !v.trim().is_empty()) {
            FILTER_ENV
        } else {
            "--log-level"
        }
    );

    Ok(guard)
}
