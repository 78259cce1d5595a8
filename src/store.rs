//! Presence store: one atomically-replaced slot file per device.
//!
//! The detector is the only writer; any number of short-lived query
//! processes read concurrently. Each write goes to a temp file in the same
//! directory and is renamed over the slot, so a reader sees either the old
//! timestamp or the new one, never a partial write.
//!
//! Precondition: exactly one detector instance per store directory. Running
//! two detectors against the same store is undefined by design.

use std::path::{Path, PathBuf};

use crate::errors::StoreError;

/// Maximum slot name length, matching the device-name limits elsewhere.
const MAX_NAME_LENGTH: usize = 64;

/// Per-device last-seen timestamps under one directory.
#[derive(Debug, Clone)]
pub struct PresenceStore {
    state_dir: PathBuf,
}

impl PresenceStore {
    /// The directory does not need to exist yet; it is created lazily on
    /// first write, and reads against a missing directory return `None`.
    pub fn new(state_dir: impl Into<PathBuf>) -> Self {
        Self {
            state_dir: state_dir.into(),
        }
    }

    pub fn state_dir(&self) -> &Path {
        &self.state_dir
    }

    /// Record `epoch_secs` as the last sighting of `name`. Full replace,
    /// last-write-wins, idempotent.
    pub fn write(&self, name: &str, epoch_secs: i64) -> Result<(), StoreError> {
        validate_name(name)?;
        std::fs::create_dir_all(&self.state_dir)?;

        let slot = self.slot_path(name);
        let tmp = self.state_dir.join(format!(".{name}.tmp"));

        std::fs::write(&tmp, format!("{epoch_secs}\n"))?;
        // Atomic within one filesystem: readers see old or new, never both.
        std::fs::rename(&tmp, &slot)?;

        tracing::debug!("Recorded sighting: {} at {}", name, epoch_secs);
        Ok(())
    }

    /// Last sighting of `name`, or `None` if it was never recorded.
    pub fn read(&self, name: &str) -> Result<Option<i64>, StoreError> {
        validate_name(name)?;

        let slot = self.slot_path(name);
        let content = match std::fs::read_to_string(&slot) {
            Ok(content) => content,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(StoreError::Io(err)),
        };

        let trimmed = content.trim();
        trimmed
            .parse::<i64>()
            .map(Some)
            .map_err(|_| StoreError::Malformed {
                path: slot,
                content: trimmed.to_string(),
            })
    }

    fn slot_path(&self, name: &str) -> PathBuf {
        self.state_dir.join(format!("{name}.seen"))
    }
}

/// Slot names come from user configuration; keep them inside the directory.
fn validate_name(name: &str) -> Result<(), StoreError> {
    let well_formed = !name.is_empty()
        && name.len() <= MAX_NAME_LENGTH
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');

    if well_formed {
        Ok(())
    } else {
        Err(StoreError::InvalidName(name.to_string()))
    }
}
