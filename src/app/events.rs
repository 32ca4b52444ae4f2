//! Outbound application events.
//!
//! The [`ProximityService`](super::service::ProximityService) and
//! [`BeaconService`](super::beacon::BeaconService) emit these through the
//! [`EventSink`](super::ports::EventSink) port.  Adapters on the other
//! side decide what to do with them: log to serial, drive the display, etc.

use crate::fsm::{LockState, StateTransition};
use crate::radio::ScanResult;

/// Structured events emitted by the application core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    /// The receiver service started (carries the initial state).
    Started(LockState),

    /// The beacon service started advertising.
    Advertising,

    /// A scan result line was received.
    ScanResult {
        result: ScanResult,
        /// The advertised name contains the configured target.
        is_target: bool,
    },

    /// An opaque response line was received (`OK`, `ERROR`, ...).
    Response(String),

    /// The proximity state machine changed state.
    StateTransition(StateTransition),
}
