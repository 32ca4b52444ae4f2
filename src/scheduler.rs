//! Cooperative auto-scan scheduler.
//!
//! Issues a fixed AT command (normally `AT+SCAN`) through a
//! [`CommandSink`] at a fixed interval.  The scheduler is purely
//! time-gated: it never waits for the previous scan to produce results.
//!
//! ```text
//!   loop tick ──▶ should_fire(now)? ──yes──▶ fire(): enqueue + last_fire_at = now
//! ```
//!
//! `last_fire_at` is reset to the fire time, not advanced by one interval,
//! so a long stall yields a single fire instead of a catch-up burst.

use log::info;

use crate::app::ports::CommandSink;
use crate::radio::{AtCommand, CommandId};

/// Timing state of one periodic schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanSchedule {
    pub interval_ms: u64,
    /// `None` until the first fire; the first fire is immediate.
    pub last_fire_at: Option<u64>,
    pub enabled: bool,
}

pub struct AutoScheduler {
    /// Human-readable label for logs (e.g., "auto-scan").
    label: &'static str,
    command: AtCommand,
    schedule: ScanSchedule,
    fired: u32,
}

impl AutoScheduler {
    pub fn new(label: &'static str, command: AtCommand, interval_ms: u64) -> Self {
        Self {
            label,
            command,
            schedule: ScanSchedule {
                interval_ms,
                last_fire_at: None,
                enabled: false,
            },
            fired: 0,
        }
    }

    /// Periodic `AT+SCAN` for the receiver.
    pub fn scan(interval_ms: u64) -> Self {
        Self::new("auto-scan", AtCommand::Scan, interval_ms)
    }

    /// Periodic `AT+ADVEN=1` for the key fob.
    pub fn advertise(interval_ms: u64) -> Self {
        Self::new("auto-advertise", AtCommand::Advertise(true), interval_ms)
    }

    pub fn start(&mut self) {
        info!(
            "Scheduler: '{}' started ({} every {}ms)",
            self.label, self.command, self.schedule.interval_ms
        );
        self.schedule.enabled = true;
    }

    pub fn stop(&mut self) {
        info!("Scheduler: '{}' stopped", self.label);
        self.schedule.enabled = false;
    }

    /// Enabled and at least one interval since the last fire.
    pub fn should_fire(&self, now_ms: u64) -> bool {
        if !self.schedule.enabled {
            return false;
        }
        match self.schedule.last_fire_at {
            Some(last) => now_ms.saturating_sub(last) >= self.schedule.interval_ms,
            None => true,
        }
    }

    /// Enqueue the command and restart the interval.
    pub fn fire(&mut self, sink: &mut impl CommandSink, now_ms: u64) -> CommandId {
        let id = sink.enqueue_command(&self.command, now_ms);
        self.schedule.last_fire_at = Some(now_ms);
        self.fired = self.fired.wrapping_add(1);
        id
    }

    /// `fire` if due.  Call once per control loop tick.
    pub fn tick(&mut self, sink: &mut impl CommandSink, now_ms: u64) -> Option<CommandId> {
        if self.should_fire(now_ms) {
            Some(self.fire(sink, now_ms))
        } else {
            None
        }
    }

    pub fn schedule(&self) -> &ScanSchedule {
        &self.schedule
    }

    /// Total fires since startup.
    pub fn fire_count(&self) -> u32 {
        self.fired
    }
}

// ═══════════════════════════════════════════════════════════════
//  Tests
// ═══════════════════════════════════════════════════════════════
