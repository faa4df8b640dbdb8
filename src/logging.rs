//! Logging setup: `tracing` to stderr, optionally teed to a (rotating) file

use crate::config::{LogRotation, LoggingOptions};
use crate::error::{Error, Result};
use std::fs::OpenOptions;
use std::io;
use std::path::Path;
use std::sync::OnceLock;
use tracing_appender::non_blocking::{NonBlocking, NonBlockingBuilder, WorkerGuard};
use tracing_appender::rolling;
use tracing_subscriber::fmt::time::UtcTime;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Registry, fmt};

static FILE_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

/// Install the global subscriber. Stdout is reserved for results, so the
/// console layer writes to stderr. A second call is a no-op.
pub fn init(options: &LoggingOptions) -> Result<()> {
    if tracing::dispatcher::has_been_set() {
        return Ok(());
    }

    let filter = level_filter(&options.level)?;

    let file_layer = match options.file.as_deref() {
        Some(path) => {
            let (writer, guard) = file_writer(path, options.rotation)?;
            let _ = FILE_GUARD.set(guard);
            Some(
                fmt::layer()
                    .with_timer(UtcTime::rfc_3339())
                    .with_ansi(false)
                    .with_target(true)
                    .with_writer(writer),
            )
        }
        None => None,
    };

    let console_layer = fmt::layer()
        .with_timer(UtcTime::rfc_3339())
        .with_ansi(options.color)
        .with_target(true)
        .with_writer(io::stderr);

    Registry::default()
        .with(filter)
        .with(file_layer)
        .with(console_layer)
        .try_init()
        .map_err(|e| Error::Config(format!("Failed to install tracing subscriber: {e}")))
}

fn level_filter(level: &str) -> Result<EnvFilter> {
    EnvFilter::try_new(level)
        .map_err(|e| Error::Config(format!("Invalid log level '{level}': {e}")))
}

/// Non-blocking writer for `path`, rolled over per `rotation` when set.
fn file_writer(path: &Path, rotation: Option<LogRotation>) -> Result<(NonBlocking, WorkerGuard)> {
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    std::fs::create_dir_all(dir).map_err(|e| {
        Error::Config(format!("Failed to create log directory {}: {e}", dir.display()))
    })?;

    let builder = NonBlockingBuilder::default().lossy(false);

    let Some(rotation) = rotation else {
        let file = OpenOptions::new()
            .append(true)
            .create(true)
            .open(path)
            .map_err(|e| Error::Config(format!("Failed to open log file {}: {e}", path.display())))?;
        return Ok(builder.finish(file));
    };

    let file_name = path.file_name().ok_or_else(|| {
        Error::Config(format!(
            "Log file path '{}' needs a file name for rotation",
            path.display()
        ))
    })?;
    let appender = match rotation {
        LogRotation::Hourly => rolling::hourly(dir, file_name),
        LogRotation::Daily => rolling::daily(dir, file_name),
    };
    Ok(builder.finish(appender))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_malformed_level() {
        assert!(level_filter("qrshape=loud[").is_err());
        assert!(level_filter("qrshape=debug,warn").is_ok());
    }

    #[test]
    fn file_writer_creates_parent_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logs").join("qrshape.log");
        let (_writer, _guard) = file_writer(&path, None).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn rotation_needs_a_file_name() {
        assert!(matches!(
            file_writer(Path::new("/"), Some(LogRotation::Daily)),
            Err(Error::Config(_))
        ));
    }
}
