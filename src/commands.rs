//! Command handlers: wire the CLI onto the presence engine.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::{Context, Result};

use crate::capture::PcapCapture;
use crate::config::{self, LISTEN_BUDGET};
use crate::errors::ConfigError;
use crate::models::{SweepMode, SweepReport};
use crate::query;
use crate::registry::Registry;
use crate::store::PresenceStore;
use crate::sweep::SweepScheduler;

pub async fn handle_watch(
    config_path: Option<PathBuf>,
    state_dir: Option<PathBuf>,
    interface: Option<String>,
) -> Result<()> {
    let report = run_detector(config_path, state_dir, interface, SweepMode::Continuous).await?;
    tracing::info!(
        "Detector stopped: {} cycle(s), {} detection(s)",
        report.cycles,
        report.detections
    );
    Ok(())
}

pub async fn handle_sweep(
    config_path: Option<PathBuf>,
    state_dir: Option<PathBuf>,
    interface: Option<String>,
) -> Result<()> {
    let report = run_detector(config_path, state_dir, interface, SweepMode::SinglePass).await?;
    println!(
        "{}",
        serde_json::to_string_pretty(&report).context("Failed to serialize sweep report")?
    );
    Ok(())
}

pub async fn handle_query(
    name: String,
    config_path: Option<PathBuf>,
    state_dir: Option<PathBuf>,
    timeout_secs: i64,
    on_off: bool,
) -> Result<()> {
    let registry = load_registry(config_path)?;
    let store = PresenceStore::new(resolve_state_dir(state_dir)?);

    let now = chrono::Utc::now().timestamp();
    let presence = query::query_device(&registry, &store, &name, now, timeout_secs)?;

    println!("{}", query::render(presence, on_off));
    Ok(())
}

async fn run_detector(
    config_path: Option<PathBuf>,
    state_dir: Option<PathBuf>,
    interface: Option<String>,
    mode: SweepMode,
) -> Result<SweepReport> {
    let registry = load_registry(config_path)?;
    let store = PresenceStore::new(resolve_state_dir(state_dir)?);
    let capture = PcapCapture::from_interface_arg(interface)?;

    tracing::info!(
        "Watching {} device(s) on '{}', state in {}",
        registry.len(),
        capture.interface(),
        store.state_dir().display()
    );

    let cancel = Arc::new(AtomicBool::new(false));
    if mode == SweepMode::Continuous {
        let cancel_on_signal = Arc::clone(&cancel);
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::info!("Interrupt received; finishing the current cycle");
                cancel_on_signal.store(true, Ordering::SeqCst);
            }
        });
    }

    let mut scheduler = SweepScheduler::new(registry, store, capture, LISTEN_BUDGET, cancel);

    // The capture port blocks for up to one listen budget per cycle; keep
    // that off the async runtime.
    let report = tokio::task::spawn_blocking(move || scheduler.run(mode))
        .await
        .context("Detector task panicked")??;

    Ok(report)
}

fn load_registry(config_path: Option<PathBuf>) -> Result<Registry> {
    let path = config_path
        .or_else(config::default_config_path)
        .ok_or(ConfigError::NoDefaultPath {
            what: "the device table",
        })?;

    let devices = config::load_device_table(&path)?;
    let registry = Registry::from_entries(devices)?;
    tracing::debug!(
        "Loaded {} device(s) from {}",
        registry.len(),
        path.display()
    );
    Ok(registry)
}

fn resolve_state_dir(state_dir: Option<PathBuf>) -> Result<PathBuf> {
    Ok(state_dir
        .or_else(config::default_state_dir)
        .ok_or(ConfigError::NoDefaultPath {
            what: "the state directory",
        })?)
}
