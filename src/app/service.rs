//! Receiver service: the hexagonal core of the lock.
//!
//! [`ProximityService`] owns the radio context, RSSI tracker, scan
//! scheduler and state machine.  It exposes a hardware-agnostic API: the
//! transport is a generic parameter and events leave through the
//! [`EventSink`] port, so the whole loop runs against mocks in tests.
//!
//! ```text
//!  Transport ──▶ ┌─────────────────────────────┐ ──▶ EventSink
//!                │      ProximityService        │
//!  Transport ◀── │ Framer · Queue · Tracker ·   │
//!                │ Scheduler · FSM              │
//!                └─────────────────────────────┘
//! ```

use log::{debug, info, trace, warn};

use crate::config::LockConfig;
use crate::fsm::{LockState, ProximityFsm, ProximityPolicy};
use crate::radio::{InboundLine, Radio, ScanResult, Transport};
use crate::scheduler::AutoScheduler;
use crate::tracker::{self, RssiTracker};

use super::events::AppEvent;
use super::ports::EventSink;

// ───────────────────────────────────────────────────────────────
// Statistics
// ───────────────────────────────────────────────────────────────

/// Counters kept by the receiver since startup.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanStats {
    /// `AT+SCAN` commands issued by the scheduler.
    pub scans: u32,
    /// Scan results whose name matched the target.
    pub sightings: u32,
    /// Target sightings whose RSSI text could not be used.
    pub rejected_rssi: u32,
}

// ───────────────────────────────────────────────────────────────
// ProximityService
// ───────────────────────────────────────────────────────────────

pub struct ProximityService<T: Transport> {
    radio: Radio<T>,
    tracker: RssiTracker,
    scheduler: AutoScheduler,
    fsm: ProximityFsm,
    /// Upper-cased target substring, matched case-insensitively.
    target: String,
    stats: ScanStats,
    tick_count: u64,
}

impl<T: Transport> ProximityService<T> {
    /// Build the service around an already-constructed radio.
    ///
    /// Does **not** start scanning; call [`start`](Self::start) next.
    pub fn new(radio: Radio<T>, config: &LockConfig) -> Self {
        let policy = ProximityPolicy {
            threshold_dbm: config.threshold_dbm,
            staleness_timeout_ms: config.staleness_timeout_ms,
        };
        Self {
            radio,
            tracker: RssiTracker::new(),
            scheduler: AutoScheduler::scan(config.scan_interval_ms),
            fsm: ProximityFsm::new(policy),
            target: config.target_device_substring.to_uppercase(),
            stats: ScanStats::default(),
            tick_count: 0,
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Enable the scan scheduler.  The first scan goes out on the next tick.
    pub fn start(&mut self, sink: &mut impl EventSink) {
        self.scheduler.start();
        sink.emit(&AppEvent::Started(self.fsm.current_state()));
        info!(
            "ProximityService started in {} (target '{}', threshold {} dBm)",
            self.fsm.current_state().label(),
            self.target,
            self.fsm.policy().threshold_dbm
        );
    }

    pub fn stop(&mut self) {
        self.scheduler.stop();
    }

    // ── Per-tick orchestration ────────────────────────────────

    /// Run one control cycle: inbound → dispatch → scheduler → FSM.
    ///
    /// Never blocks and never fails; every error is logged here and the
    /// loop carries on next tick.
    pub fn tick(&mut self, now_ms: u64, sink: &mut impl EventSink) {
        self.tick_count += 1;

        // 1. Drain inbound lines
        let mut lines = Vec::new();
        if let Err(e) = self.radio.process_inbound(|line| lines.push(line)) {
            warn!("Radio read: {}", e);
        }
        for line in lines {
            self.handle_line(line, now_ms, sink);
        }

        // 2. One outbound command
        match self.radio.dispatch_tick() {
            Ok(Some(id)) => trace!("Dispatched command #{}", id.0),
            Ok(None) => {}
            Err(e) => warn!("Radio write: {} (command dropped)", e),
        }

        // 3. Periodic scan
        if self.scheduler.tick(&mut self.radio, now_ms).is_some() {
            self.stats.scans = self.stats.scans.wrapping_add(1);
        }

        // 4. Re-derive the lock state
        if let Some(transition) = self.fsm.tick(&self.tracker, now_ms) {
            sink.emit(&AppEvent::StateTransition(transition));
        }
    }

    fn handle_line(&mut self, line: InboundLine, now_ms: u64, sink: &mut impl EventSink) {
        match line {
            InboundLine::ScanResult(result) => {
                let is_target = self.is_target(&result);
                if is_target {
                    self.record_sighting(&result, now_ms);
                }
                sink.emit(&AppEvent::ScanResult { result, is_target });
            }
            InboundLine::Response(text) => {
                sink.emit(&AppEvent::Response(text));
            }
        }
    }

    fn record_sighting(&mut self, result: &ScanResult, now_ms: u64) {
        self.stats.sightings = self.stats.sightings.wrapping_add(1);
        let accepted = tracker::read_rssi(&result.rssi_text)
            .and_then(|rssi| self.tracker.update(rssi, now_ms).map_err(Into::into));
        match accepted {
            Ok(()) => debug!(
                "Target '{}' at {} dBm",
                result.advertised_name,
                self.tracker.current()
            ),
            Err(e) => {
                self.stats.rejected_rssi = self.stats.rejected_rssi.wrapping_add(1);
                debug!(
                    "Target '{}' RSSI '{}' ignored: {}",
                    result.advertised_name, result.rssi_text, e
                );
            }
        }
    }

    fn is_target(&self, result: &ScanResult) -> bool {
        result.advertised_name.to_uppercase().contains(&self.target)
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn state(&self) -> LockState {
        self.fsm.current_state()
    }

    pub fn tracker(&self) -> &RssiTracker {
        &self.tracker
    }

    pub fn scheduler(&self) -> &AutoScheduler {
        &self.scheduler
    }

    pub fn stats(&self) -> ScanStats {
        self.stats
    }

    /// Total control ticks executed since startup.
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    pub fn radio(&self) -> &Radio<T> {
        &self.radio
    }

    pub fn radio_mut(&mut self) -> &mut Radio<T> {
        &mut self.radio
    }
}
