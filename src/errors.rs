//! Error types for the presence engine.
//!
//! Configuration and capture failures are fatal to a detector run; query
//! failures are one-shot and reported to the caller. Budget expiry during a
//! listen is *not* an error anywhere in this taxonomy.

use std::path::PathBuf;
use thiserror::Error;

/// Device-table and registry errors. Fatal at startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read device table {path}: {source}")]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse device table {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid hardware address '{address}' for device '{name}'")]
    InvalidAddress { name: String, address: String },

    #[error("Device table contains no devices")]
    EmptyRegistry,

    #[error("No path given for {what} and no per-user default directory is available")]
    NoDefaultPath { what: &'static str },
}

/// Capture capability errors. Fatal: every subsequent cycle would fail
/// identically, so these must never be masked as "no device seen".
#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("No capture device available: {0}")]
    NoDevice(String),

    #[error("Failed to open capture handle on '{interface}': {message}")]
    Open { interface: String, message: String },

    #[error("Failed to install capture filter '{filter}': {message}")]
    Filter { filter: String, message: String },

    #[error("Capture read failed on '{interface}': {message}")]
    Read { interface: String, message: String },

    #[error("listen() called with an empty watch set")]
    EmptyWatchSet,
}

/// Presence-store errors. An absent slot is `Ok(None)`, never an error.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Invalid device name for store slot: '{0}'")]
    InvalidName(String),

    #[error("Presence slot {path} is malformed: '{content}'")]
    Malformed { path: PathBuf, content: String },

    #[error("Presence store I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Query-side errors. Only a genuinely unconfigured device name raises one;
/// expired or never-seen state are normal results.
#[derive(Debug, Error)]
pub enum QueryError {
    #[error("Unknown device: '{0}' is not in the device table")]
    UnknownDevice(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Anything that aborts a detector run. A cycle without a match is not in
/// here: budget expiry is normal scheduling, not failure.
#[derive(Debug, Error)]
pub enum SweepError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Capture(#[from] CaptureError),

    #[error(transparent)]
    Store(#[from] StoreError),
}
