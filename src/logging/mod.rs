//! Structured logging for the presence detector.
//!
//! Console output goes to stderr so query results on stdout stay clean for
//! scripting; file logs rotate daily under the per-user data directory.

use std::path::PathBuf;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::APP_DIR_NAME;

/// Initialize the logging system.
///
/// `RUST_LOG` controls the level when set; otherwise `info`, or `debug`
/// with `--verbose`.
pub fn init_logging(verbose: bool) -> Result<PathBuf, Box<dyn std::error::Error>> {
    let log_dir = get_log_directory()?;
    std::fs::create_dir_all(&log_dir)?;

    let file_appender = RollingFileAppender::new(Rotation::DAILY, &log_dir, "presenced.log");

    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact();

    let file_layer = fmt::layer()
        .with_writer(file_appender)
        .with_ansi(false)
        .with_target(true)
        .with_line_number(true)
        .with_file(true)
        .json();

    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(default_level))?;

    let init_result = tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .with(file_layer)
        .try_init();

    if let Err(e) = init_result {
        // Tolerate a subscriber installed earlier by a test harness.
        if e.to_string().contains("already been set") {
            return Ok(log_dir);
        }
        return Err(Box::new(e));
    }

    tracing::debug!("Logging initialized. Log directory: {}", log_dir.display());

    Ok(log_dir)
}

/// Log directory under the per-user data dir:
/// `%APPDATA%/presenced/logs` on Windows, `~/.local/share/presenced/logs`
/// (or the platform equivalent) elsewhere.
fn get_log_directory() -> Result<PathBuf, Box<dyn std::error::Error>> {
    let base_dir = dirs::data_local_dir()
        .ok_or("Could not find per-user data directory")?
        .join(APP_DIR_NAME);

    Ok(base_dir.join("logs"))
}
