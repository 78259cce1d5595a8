//! Configuration for the presence detector.
//!
//! Tuning constants live here, alongside loading of the device table: a
//! JSON object mapping device names to hardware addresses, e.g.
//! `{ "phone": "aa:bb:cc:dd:ee:ff" }`.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use pnet::util::MacAddr;

use crate::errors::ConfigError;
use crate::models::Device;

/// Time budget for one passive listen cycle.
///
/// Short enough that cancellation and capture failures surface quickly,
/// long enough to catch periodic broadcast chatter from idle devices.
pub const LISTEN_BUDGET: Duration = Duration::from_secs(10);

/// Default freshness window for queries: a record older than this reads
/// the same as no record at all.
pub const DEFAULT_TIMEOUT_SECS: i64 = 1800;

/// Directory name under the per-user data dir for state and logs.
pub const APP_DIR_NAME: &str = "presenced";

/// Default location of the device table.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR_NAME).join("devices.json"))
}

/// Default presence-store directory.
pub fn default_state_dir() -> Option<PathBuf> {
    dirs::data_local_dir().map(|dir| dir.join(APP_DIR_NAME).join("state"))
}

/// Load the device table from a JSON object of `name -> hardware address`.
///
/// The table is parsed into load order by name (BTreeMap) so reverse-lookup
/// tie-breaking is deterministic across runs. Unreadable files, unparseable
/// JSON, bad addresses and empty tables are all configuration errors.
pub fn load_device_table(path: &Path) -> Result<Vec<Device>, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Unreadable {
        path: path.to_path_buf(),
        source,
    })?;

    let table: BTreeMap<String, String> =
        serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

    if table.is_empty() {
        return Err(ConfigError::EmptyRegistry);
    }

    let mut devices = Vec::with_capacity(table.len());
    for (name, address_text) in table {
        let address: MacAddr =
            address_text
                .parse()
                .map_err(|_| ConfigError::InvalidAddress {
                    name: name.clone(),
                    address: address_text.clone(),
                })?;
        devices.push(Device::new(name, address));
    }

    Ok(devices)
}
