//! State descriptor table and the derivation rule.
//!
//! Each state is one row: display label, LED colour, and a plain `fn`
//! that drives the presentation sink when the state is entered.  No
//! closures, no heap.

use super::{LockState, ProximityPolicy, StateTransition};
use crate::app::ports::PresentationSink;
use crate::tracker::RssiTracker;

/// Colour as (R, G, B) tuple, each 0–255.
pub type Rgb = (u8, u8, u8);

pub const COLOUR_SCANNING: Rgb = (15, 0, 15); // dim purple
pub const COLOUR_UNLOCKED: Rgb = (0, 30, 0); // dim green
pub const COLOUR_LOCKED: Rgb = (30, 0, 0); // dim red

/// Signature for the presentation action run on entering a state.
pub type StateEnterFn = fn(&mut dyn PresentationSink);

/// Static descriptor for a single state.
pub struct StateDescriptor {
    pub id: LockState,
    pub label: &'static str,
    pub colour: Rgb,
    pub on_enter: StateEnterFn,
}

static STATE_TABLE: [StateDescriptor; LockState::COUNT] = [
    // Index 0: Scanning
    StateDescriptor {
        id: LockState::Scanning,
        label: "SCAN",
        colour: COLOUR_SCANNING,
        on_enter: scanning_enter,
    },
    // Index 1: Unlocked
    StateDescriptor {
        id: LockState::Unlocked,
        label: "UNLOCK",
        colour: COLOUR_UNLOCKED,
        on_enter: unlocked_enter,
    },
    // Index 2: Locked
    StateDescriptor {
        id: LockState::Locked,
        label: "LOCK",
        colour: COLOUR_LOCKED,
        on_enter: locked_enter,
    },
];

/// Row for `state`.
pub fn descriptor(state: LockState) -> &'static StateDescriptor {
    &STATE_TABLE[state as usize]
}

/// The transition rule, evaluated every tick:
///
/// ```text
/// if stale:                 SCANNING
/// elif rssi > threshold:    UNLOCKED
/// else:                     LOCKED
/// ```
pub fn derive_state(tracker: &RssiTracker, now_ms: u64, policy: &ProximityPolicy) -> LockState {
    if tracker.is_stale(now_ms, policy.staleness_timeout_ms) {
        LockState::Scanning
    } else if tracker.current() > policy.threshold_dbm {
        LockState::Unlocked
    } else {
        LockState::Locked
    }
}

/// Drive the presentation sink for a transition: status text first, then
/// the new state's actuator setter.
///
/// The RSSI is withheld while scanning since the last sample is stale by
/// definition, so a timeout reads `No Signal / SCAN`.  This departs from
/// the earlier receiver display, which kept the last reading on screen
/// (`RSSI:-45 / SCAN`).
pub fn present(transition: &StateTransition, sink: &mut dyn PresentationSink) {
    let row = descriptor(transition.to);
    let rssi = match transition.to {
        LockState::Scanning => None,
        LockState::Unlocked | LockState::Locked => Some(transition.rssi),
    };
    sink.show_status(row.label, rssi);
    (row.on_enter)(sink);
}

// ═══════════════════════════════════════════════════════════════════════════
//  Enter actions
// ═══════════════════════════════════════════════════════════════════════════

fn scanning_enter(sink: &mut dyn PresentationSink) {
    sink.set_scanning();
}

fn unlocked_enter(sink: &mut dyn PresentationSink) {
    sink.set_unlocked();
}

fn locked_enter(sink: &mut dyn PresentationSink) {
    sink.set_locked();
}
