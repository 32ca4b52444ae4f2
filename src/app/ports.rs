//! Port traits: the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ ProximityService (domain)
//! ```
//!
//! Driven adapters (clock, event sinks, display/LED) implement these
//! traits.  The services consume them via generics, so the domain core
//! never touches hardware directly.

use crate::radio::{AtCommand, CommandId, CommandQueue, Radio, Transport};

// ───────────────────────────────────────────────────────────────
// Clock port
// ───────────────────────────────────────────────────────────────

/// Monotonic millisecond clock.
pub trait Clock {
    /// Milliseconds since boot.  Never goes backwards.
    fn now_ms(&self) -> u64;
}

// ───────────────────────────────────────────────────────────────
// Command sink (decouples the scheduler from the radio)
// ───────────────────────────────────────────────────────────────

/// Anything that accepts outbound AT commands.
///
/// The [`AutoScheduler`](crate::scheduler::AutoScheduler) only knows this
/// trait, so it can be tested against a bare [`CommandQueue`].
pub trait CommandSink {
    fn enqueue_command(&mut self, cmd: &AtCommand, now_ms: u64) -> CommandId;
}

impl CommandSink for CommandQueue {
    fn enqueue_command(&mut self, cmd: &AtCommand, now_ms: u64) -> CommandId {
        self.enqueue(cmd.to_string(), now_ms)
    }
}

impl<T: Transport> CommandSink for Radio<T> {
    fn enqueue_command(&mut self, cmd: &AtCommand, now_ms: u64) -> CommandId {
        Radio::enqueue_command(self, cmd, now_ms)
    }
}

// ───────────────────────────────────────────────────────────────
// Event sink port (domain → logging / presentation)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port.  Adapters match on the variant and decide where
/// they go (serial log, display, LED).
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}

// ───────────────────────────────────────────────────────────────
// Presentation port (domain → display / status LED)
// ───────────────────────────────────────────────────────────────

/// Visual feedback for the lock state.  Implementations must never block
/// the control loop; animations belong on their own task.
pub trait PresentationSink {
    /// Render a state label and, if known, the RSSI behind it.
    fn show_status(&mut self, label: &str, rssi: Option<i32>);

    fn set_scanning(&mut self);

    fn set_unlocked(&mut self);

    fn set_locked(&mut self);

    /// Drive outputs to their idle state (shutdown).
    fn set_off(&mut self);
}
