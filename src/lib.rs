//! presenced — passive LAN presence detection
//!
//! Determines whether named devices are on the local network by passively
//! observing link-layer traffic, without probing or pinging:
//! - Sweep scheduler cycling a bounded passive listen over a pending set
//! - BPF-filtered capture port (source *or* destination address match)
//! - Atomically-replaced per-device last-seen state on disk
//! - Stateless presence query against a freshness timeout

pub mod capture;
pub mod cli;
pub mod commands;
pub mod config;
pub mod errors;
pub mod logging;
pub mod models;
pub mod query;
pub mod registry;
pub mod store;
pub mod sweep;

pub use capture::{build_filter, CapturePort, PcapCapture};
pub use cli::{parse_cli_args, usage_text, version_text, CliCommand};
pub use config::{load_device_table, DEFAULT_TIMEOUT_SECS, LISTEN_BUDGET};
pub use errors::{CaptureError, ConfigError, QueryError, StoreError, SweepError};
pub use models::{Device, Presence, SweepMode, SweepReport};
pub use query::{evaluate, query_device, render};
pub use registry::Registry;
pub use store::PresenceStore;
pub use sweep::{PendingSet, SweepScheduler};
