//! Presence query: read one stored timestamp and interpret it.
//!
//! Pure read-and-interpret, safe to run at any time, including while a
//! detector is concurrently writing. Never touches the capture port.

use crate::errors::QueryError;
use crate::models::Presence;
use crate::registry::Registry;
use crate::store::PresenceStore;

/// Interpret a stored last-seen timestamp against the freshness window.
///
/// Boundary policy: an age of exactly `timeout_secs` still counts as
/// present. Expired records and missing records are indistinguishable on
/// purpose; both mean "not recently seen".
pub fn evaluate(last_seen: Option<i64>, now: i64, timeout_secs: i64) -> Presence {
    match last_seen {
        Some(seen) => {
            let age_secs = now - seen;
            if (0..=timeout_secs).contains(&age_secs) {
                Presence::Present { age_secs }
            } else {
                Presence::Unknown
            }
        }
        None => Presence::Unknown,
    }
}

/// Query one device by name. Fails only when the name is not configured.
pub fn query_device(
    registry: &Registry,
    store: &PresenceStore,
    name: &str,
    now: i64,
    timeout_secs: i64,
) -> Result<Presence, QueryError> {
    let device = registry
        .lookup_by_name(name)
        .ok_or_else(|| QueryError::UnknownDevice(name.to_string()))?;

    let last_seen = store.read(&device.name)?;
    Ok(evaluate(last_seen, now, timeout_secs))
}

/// Render a presence result: an On/Off flag, or the age in seconds with an
/// empty string for "not recently seen".
pub fn render(presence: Presence, as_on_off: bool) -> String {
    match (presence, as_on_off) {
        (Presence::Present { .. }, true) => "On".to_string(),
        (Presence::Unknown, true) => "Off".to_string(),
        (Presence::Present { age_secs }, false) => age_secs.to_string(),
        (Presence::Unknown, false) => String::new(),
    }
}
