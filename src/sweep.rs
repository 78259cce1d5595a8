//! Sweep scheduler: drives repeated listen cycles over the capture port.
//!
//! One sweep confirms each registered device at most once. The pending set
//! holds the devices not yet confirmed in the current sweep; it refills
//! from the full registry whenever it empties (continuous mode) and after
//! every quiet cycle, so a miss never permanently narrows future listening.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use pnet::util::MacAddr;

use crate::capture::CapturePort;
use crate::errors::{ConfigError, SweepError};
use crate::models::{SweepMode, SweepReport};
use crate::registry::Registry;
use crate::store::PresenceStore;

/// Addresses not yet confirmed in the current sweep.
///
/// Deliberately an explicit set with set-difference semantics; kept in
/// registry load order so each cycle's filter expression is deterministic.
#[derive(Debug, Clone, Default)]
pub struct PendingSet {
    addresses: Vec<MacAddr>,
}

impl PendingSet {
    pub fn full(registry: &Registry) -> Self {
        let mut set = Self::default();
        set.refill(registry);
        set
    }

    /// Reset to the full registry. Duplicate addresses across names
    /// collapse to one pending entry.
    pub fn refill(&mut self, registry: &Registry) {
        self.addresses.clear();
        for address in registry.addresses() {
            if !self.addresses.contains(&address) {
                self.addresses.push(address);
            }
        }
    }

    /// Remove a confirmed (or consumed) address from the current sweep.
    pub fn remove(&mut self, address: MacAddr) {
        self.addresses.retain(|candidate| *candidate != address);
    }

    pub fn addresses(&self) -> &[MacAddr] {
        &self.addresses
    }

    pub fn is_empty(&self) -> bool {
        self.addresses.is_empty()
    }

    pub fn len(&self) -> usize {
        self.addresses.len()
    }
}

/// Long-lived detector loop: the sole writer of the presence store.
///
/// Sequential by design; the only suspension point is the capture port's
/// bounded `listen`, so cancellation latency is bounded by one budget.
pub struct SweepScheduler<C: CapturePort> {
    registry: Registry,
    store: PresenceStore,
    capture: C,
    budget: Duration,
    cancel: Arc<AtomicBool>,
}

impl<C: CapturePort> SweepScheduler<C> {
    pub fn new(
        registry: Registry,
        store: PresenceStore,
        capture: C,
        budget: Duration,
        cancel: Arc<AtomicBool>,
    ) -> Self {
        Self {
            registry,
            store,
            capture,
            budget,
            cancel,
        }
    }

    /// Run sweeps until the mode finishes or the cancel flag is raised.
    ///
    /// Capture errors abort immediately: a broken capture capability would
    /// otherwise read as every device being absent, forever.
    pub fn run(&mut self, mode: SweepMode) -> Result<SweepReport, SweepError> {
        if self.registry.is_empty() {
            return Err(ConfigError::EmptyRegistry.into());
        }

        let mut pending = PendingSet::full(&self.registry);
        let mut cycles: u64 = 0;
        let mut detections: u64 = 0;

        tracing::info!(
            "Sweep started ({:?}): {} device(s), {:?} budget per cycle",
            mode,
            self.registry.len(),
            self.budget
        );

        loop {
            if self.cancel.load(Ordering::SeqCst) {
                tracing::info!("Sweep cancelled after {} cycle(s)", cycles);
                return Ok(SweepReport {
                    cycles,
                    detections,
                    completed: false,
                });
            }

            if pending.is_empty() {
                match mode {
                    SweepMode::SinglePass => {
                        tracing::info!("Single pass complete: every device confirmed");
                        return Ok(SweepReport {
                            cycles,
                            detections,
                            completed: true,
                        });
                    }
                    SweepMode::Continuous => {
                        tracing::debug!("Sweep complete; starting the next one");
                        pending.refill(&self.registry);
                    }
                }
            }

            cycles += 1;
            match self.capture.listen(pending.addresses(), self.budget)? {
                Some(address) => {
                    if let Some(device) = self.registry.lookup_by_address(address) {
                        let now = chrono::Utc::now().timestamp();
                        self.store.write(&device.name, now)?;
                        detections += 1;
                        tracing::info!("Detected {} ({})", device.name, address);
                    } else {
                        // No configured name for this address. Still consumed
                        // for this sweep so unknown traffic cannot busy-loop
                        // a cycle; refill restores it next sweep.
                        tracing::debug!("Matched unconfigured address {}", address);
                    }
                    pending.remove(address);
                }
                None => match mode {
                    SweepMode::Continuous => {
                        // Quiet cycle: re-offer every still-unconfirmed
                        // device next time instead of narrowing the watch.
                        tracing::debug!(
                            "Cycle {} quiet; re-arming full registry ({} pending before)",
                            cycles,
                            pending.len()
                        );
                        pending.refill(&self.registry);
                    }
                    SweepMode::SinglePass => {
                        tracing::info!(
                            "Single pass incomplete: {} device(s) not seen",
                            pending.len()
                        );
                        return Ok(SweepReport {
                            cycles,
                            detections,
                            completed: false,
                        });
                    }
                },
            }
        }
    }
}
