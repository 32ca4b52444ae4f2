//! Proximity state machine.
//!
//! ```text
//!  any state ──[stale / never seen]────────▶ SCANNING
//!  any state ──[fresh, rssi >  threshold]──▶ UNLOCKED
//!  any state ──[fresh, rssi <= threshold]──▶ LOCKED
//! ```
//!
//! The next state is re-derived from scratch every tick from the tracker
//! alone ([`states::derive_state`]); there is no hysteresis band.  The
//! engine only remembers the current state so it can report changes: a
//! transition is produced exactly when the derived state differs from the
//! current one.

pub mod states;

use log::info;

use crate::tracker::RssiTracker;

// ---------------------------------------------------------------------------
// State identity
// ---------------------------------------------------------------------------

/// The lock's logical state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum LockState {
    Scanning = 0,
    Unlocked = 1,
    Locked = 2,
}

impl LockState {
    /// Total number of states, used to size the descriptor table.
    pub const COUNT: usize = 3;

    /// Short label shown on the display.
    pub fn label(self) -> &'static str {
        states::descriptor(self).label
    }
}

/// Emitted when the derived state changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateTransition {
    pub from: LockState,
    pub to: LockState,
    /// Tracker RSSI at the moment of the transition.
    pub rssi: i32,
}

/// Thresholds the derivation rule is evaluated against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProximityPolicy {
    /// RSSI strictly above this is "near".
    pub threshold_dbm: i32,
    pub staleness_timeout_ms: u64,
}

// ---------------------------------------------------------------------------
// FSM engine
// ---------------------------------------------------------------------------

pub struct ProximityFsm {
    policy: ProximityPolicy,
    current: LockState,
    transitions: u32,
    /// Time the current state was entered.
    entered_at: u64,
}

impl ProximityFsm {
    /// Starts in [`LockState::Scanning`].
    pub fn new(policy: ProximityPolicy) -> Self {
        Self {
            policy,
            current: LockState::Scanning,
            transitions: 0,
            entered_at: 0,
        }
    }

    /// Re-derive the state from the tracker.
    ///
    /// Returns `Some` only when the state changed; re-evaluating with an
    /// unchanged outcome is a no-op, even if the RSSI moved.
    pub fn tick(&mut self, tracker: &RssiTracker, now_ms: u64) -> Option<StateTransition> {
        let next = states::derive_state(tracker, now_ms, &self.policy);
        if next == self.current {
            return None;
        }

        let transition = StateTransition {
            from: self.current,
            to: next,
            rssi: tracker.current(),
        };
        info!(
            "FSM transition: {} -> {} (RSSI {} dBm, {}ms in previous state)",
            self.current.label(),
            next.label(),
            transition.rssi,
            now_ms.saturating_sub(self.entered_at)
        );
        self.current = next;
        self.entered_at = now_ms;
        self.transitions = self.transitions.wrapping_add(1);
        Some(transition)
    }

    pub fn current_state(&self) -> LockState {
        self.current
    }

    pub fn policy(&self) -> &ProximityPolicy {
        &self.policy
    }

    /// Number of transitions since startup.
    pub fn transition_count(&self) -> u32 {
        self.transitions
    }

    /// How long the machine has been in its current state.
    pub fn time_in_state(&self, now_ms: u64) -> u64 {
        now_ms.saturating_sub(self.entered_at)
    }
}
