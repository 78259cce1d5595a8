//! Data models for the presence detector.

use pnet::util::MacAddr;
use serde::Serialize;

/// A named device the detector listens for.
///
/// Immutable once loaded; owned by the registry, read-only elsewhere.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Device {
    pub name: String,
    pub address: MacAddr,
}

impl Device {
    pub fn new(name: impl Into<String>, address: MacAddr) -> Self {
        Self {
            name: name.into(),
            address,
        }
    }
}

/// Operating mode of the sweep scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SweepMode {
    /// One sweep over the full registry, then stop.
    SinglePass,
    /// Sweep forever until externally cancelled.
    Continuous,
}

/// Summary of a finished (or cancelled) detector run.
#[derive(Debug, Clone, Serialize)]
pub struct SweepReport {
    /// Listen cycles executed.
    pub cycles: u64,
    /// Matched frames that produced a store write.
    pub detections: u64,
    /// True when a single-pass sweep confirmed every registered device.
    pub completed: bool,
}

/// Interpreted presence state for one device.
///
/// An expired record reads identically to a missing one: both mean
/// "not recently seen".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    /// Seen within the freshness window; age in whole seconds.
    Present { age_secs: i64 },
    /// Never seen, or last sighting is older than the freshness window.
    Unknown,
}
