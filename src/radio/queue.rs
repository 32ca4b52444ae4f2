//! Outbound command queue and one-per-tick dispatcher.
//!
//! Commands are queued as text and sent strictly FIFO, at most one per
//! control tick.  The module's UART receive buffer is small, so spacing
//! commands one tick apart gives it time to settle between them.
//!
//! Wire format of one dispatched command:
//!
//! ```text
//! ┌──────┬──────────────────┬──────┐
//! │ 'A'  │ command text     │ \r\n │
//! │ wake │ e.g. AT+SCAN     │      │
//! └──────┴──────────────────┴──────┘
//! ```

use std::collections::VecDeque;

use log::debug;

use super::transport::{RadioLink, Transport};
use crate::error::TransportError;

/// Byte sent ahead of every command to wake the module's UART.
pub const WAKE_BYTE: u8 = b'A';

/// Line terminator the module expects.
pub const LINE_TERMINATOR: &str = "\r\n";

/// Monotonic identifier assigned at enqueue time.  Never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CommandId(pub u32);

/// A command waiting for its dispatch tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundCommand {
    pub id: CommandId,
    pub text: String,
    pub enqueued_at: u64,
}

impl OutboundCommand {
    /// Wake byte + text + terminator (added only if missing).
    pub fn to_wire(&self) -> Vec<u8> {
        let mut frame = Vec::with_capacity(self.text.len() + 3);
        frame.push(WAKE_BYTE);
        frame.extend_from_slice(self.text.as_bytes());
        if !self.text.ends_with(LINE_TERMINATOR) {
            frame.extend_from_slice(LINE_TERMINATOR.as_bytes());
        }
        frame
    }
}

/// FIFO of outbound commands.
#[derive(Debug, Default)]
pub struct CommandQueue {
    pending: VecDeque<OutboundCommand>,
    next_id: u32,
    sent: u32,
}

impl CommandQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `text` to the tail and return its id.
    pub fn enqueue(&mut self, text: impl Into<String>, now_ms: u64) -> CommandId {
        let id = CommandId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        let text = text.into();
        debug!("queue #{} '{}' (depth {})", id.0, text, self.pending.len() + 1);
        self.pending.push_back(OutboundCommand {
            id,
            text,
            enqueued_at: now_ms,
        });
        id
    }

    /// Send at most one command from the head.
    ///
    /// Returns `Ok(None)` when the queue is empty.  A command whose write
    /// fails has already left the queue and is not retried.
    pub fn dispatch_tick<T: Transport>(
        &mut self,
        link: &mut RadioLink<T>,
    ) -> Result<Option<CommandId>, TransportError> {
        let Some(cmd) = self.pending.pop_front() else {
            return Ok(None);
        };
        link.write(&cmd.to_wire())?;
        self.sent = self.sent.wrapping_add(1);
        debug!("sent #{} '{}'", cmd.id.0, cmd.text.trim_end());
        Ok(Some(cmd.id))
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// The command that the next dispatch tick will send.
    pub fn peek(&self) -> Option<&OutboundCommand> {
        self.pending.front()
    }

    /// Commands successfully written since startup.
    pub fn sent_count(&self) -> u32 {
        self.sent
    }
}
