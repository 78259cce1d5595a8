//! End-to-end detector flow: scripted capture port -> sweep scheduler ->
//! presence store -> query.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use pnet::util::MacAddr;

use presenced::errors::CaptureError;
use presenced::{
    CapturePort, Device, Presence, PresenceStore, Registry, SweepMode, SweepScheduler,
};

fn mac(text: &str) -> MacAddr {
    text.parse().expect("test mac should parse")
}

/// Plays back a fixed sequence of listen outcomes; raises the cancel flag
/// once the script runs out.
struct ScriptedCapture {
    script: Vec<Option<MacAddr>>,
    cursor: usize,
    cancel: Arc<AtomicBool>,
}

impl CapturePort for ScriptedCapture {
    fn listen(
        &mut self,
        watch: &[MacAddr],
        _budget: Duration,
    ) -> Result<Option<MacAddr>, CaptureError> {
        assert!(!watch.is_empty(), "scheduler must never listen for nothing");
        match self.script.get(self.cursor) {
            Some(outcome) => {
                self.cursor += 1;
                Ok(*outcome)
            }
            None => {
                self.cancel.store(true, Ordering::SeqCst);
                Ok(None)
            }
        }
    }
}

fn household_registry() -> Registry {
    Registry::from_entries(vec![
        Device::new("phone", mac("aa:bb:cc:dd:ee:ff")),
        Device::new("tablet", mac("11:22:33:44:55:66")),
    ])
    .expect("registry should build")
}

#[test]
fn single_pass_sweep_persists_state_a_fresh_query_can_read() {
    let dir = tempfile::tempdir().expect("tempdir should create");
    let store = PresenceStore::new(dir.path().join("state"));
    let cancel = Arc::new(AtomicBool::new(false));

    let capture = ScriptedCapture {
        script: vec![Some(mac("aa:bb:cc:dd:ee:ff")), Some(mac("11:22:33:44:55:66"))],
        cursor: 0,
        cancel: Arc::clone(&cancel),
    };

    let mut scheduler = SweepScheduler::new(
        household_registry(),
        store.clone(),
        capture,
        Duration::from_millis(1),
        cancel,
    );

    let report = scheduler
        .run(SweepMode::SinglePass)
        .expect("sweep should run");
    assert!(report.completed);
    assert_eq!(report.detections, 2);

    // A separate, short-lived reader against the same store directory.
    let reader = PresenceStore::new(dir.path().join("state"));
    let now = chrono::Utc::now().timestamp();
    for name in ["phone", "tablet"] {
        let presence = presenced::query_device(&household_registry(), &reader, name, now, 1800)
            .expect("query should succeed");
        assert!(
            matches!(presence, Presence::Present { age_secs } if age_secs <= 2),
            "{name} should be freshly present, got {presence:?}"
        );
    }
}

#[test]
fn continuous_sweep_stops_within_one_cycle_of_cancellation() {
    let dir = tempfile::tempdir().expect("tempdir should create");
    let store = PresenceStore::new(dir.path().join("state"));
    let cancel = Arc::new(AtomicBool::new(false));

    // Empty script: the first listen raises the cancel flag.
    let capture = ScriptedCapture {
        script: Vec::new(),
        cursor: 0,
        cancel: Arc::clone(&cancel),
    };

    let mut scheduler = SweepScheduler::new(
        household_registry(),
        store,
        capture,
        Duration::from_millis(1),
        cancel,
    );

    let report = scheduler
        .run(SweepMode::Continuous)
        .expect("sweep should run");
    assert_eq!(report.cycles, 1);
    assert!(!report.completed);
}

#[test]
fn example_scenario_phone_seen_at_1000_with_1800s_window() {
    // Registry { "phone": "aa:bb:cc:dd:ee:ff" }, sighting at t=1000.
    let dir = tempfile::tempdir().expect("tempdir should create");
    let store = PresenceStore::new(dir.path().join("state"));
    let registry = Registry::from_entries(vec![Device::new("phone", mac("aa:bb:cc:dd:ee:ff"))])
        .expect("registry should build");

    store.write("phone", 1000).expect("sighting should record");

    let at = |now: i64| {
        presenced::query_device(&registry, &store, "phone", now, 1800)
            .expect("query should succeed")
    };

    assert_eq!(presenced::render(at(1500), true), "On");
    assert_eq!(presenced::render(at(3000), true), "Off");
    assert_eq!(presenced::render(at(2799), false), "1799");
}
