//! The radio context: transport, line framer and command queue together.
//!
//! [`Radio`] is constructed once at startup and threaded by `&mut`
//! through the control loop.  Each loop iteration calls
//! [`Radio::process_inbound`] then [`Radio::dispatch_tick`].
//!
//! [`Radio::send_and_await`] is the single blocking primitive and is only
//! meant for provisioning, before the control loop starts.

use embedded_hal::delay::DelayNs;
use log::{debug, trace};

use super::command::AtCommand;
use super::framer::{InboundLine, LineFramer};
use super::queue::{CommandId, CommandQueue};
use super::transport::{RadioLink, Transport};
use crate::app::ports::Clock;
use crate::error::TransportError;

/// Reads attempted per tick before yielding to the rest of the loop.
const MAX_READS_PER_TICK: usize = 8;

/// What happened while [`Radio::send_and_await`] drove the link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AwaitOutcome {
    pub id: CommandId,
    /// Whether our command was actually written to the module.
    pub sent: bool,
    /// Every line received during the wait, in arrival order.
    pub lines: Vec<InboundLine>,
}

impl AwaitOutcome {
    /// Opaque response lines (acknowledgements, errors).
    pub fn responses(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().filter_map(|l| match l {
            InboundLine::Response(text) => Some(text.as_str()),
            InboundLine::ScanResult(_) => None,
        })
    }
}

pub struct Radio<T: Transport> {
    link: RadioLink<T>,
    framer: LineFramer,
    queue: CommandQueue,
}

impl<T: Transport> Radio<T> {
    pub fn new(transport: T) -> Self {
        Self {
            link: RadioLink::new(transport),
            framer: LineFramer::new(),
            queue: CommandQueue::new(),
        }
    }

    /// Read whatever the module has sent and deliver every complete line.
    ///
    /// Returns the number of lines delivered.  A read failure stops this
    /// tick's reading; lines already delivered stay delivered.
    pub fn process_inbound(
        &mut self,
        mut emit: impl FnMut(InboundLine),
    ) -> Result<usize, TransportError> {
        let mut delivered = 0;
        for _ in 0..MAX_READS_PER_TICK {
            let data = self.link.poll_read()?;
            if data.is_empty() {
                break;
            }
            self.framer.push(data, |line| {
                delivered += 1;
                emit(line);
            });
        }
        Ok(delivered)
    }

    /// Queue raw command text.
    pub fn enqueue(&mut self, text: impl Into<String>, now_ms: u64) -> CommandId {
        self.queue.enqueue(text, now_ms)
    }

    /// Queue a typed AT command.
    pub fn enqueue_command(&mut self, cmd: &AtCommand, now_ms: u64) -> CommandId {
        self.queue.enqueue(cmd.to_string(), now_ms)
    }

    /// Send at most one queued command.
    pub fn dispatch_tick(&mut self) -> Result<Option<CommandId>, TransportError> {
        self.queue.dispatch_tick(&mut self.link)
    }

    /// Enqueue `text`, then pump inbound and dispatch every
    /// `poll_interval_ms` until `timeout_ms` has elapsed.  The first pass
    /// always runs, whatever the timeout.
    ///
    /// Blocks the caller for the whole timeout.  Never call this from the
    /// control loop.
    pub fn send_and_await<C: Clock + DelayNs>(
        &mut self,
        clock: &mut C,
        text: &str,
        timeout_ms: u32,
        poll_interval_ms: u32,
    ) -> AwaitOutcome {
        let start = clock.now_ms();
        let id = self.enqueue(text, start);
        let mut outcome = AwaitOutcome {
            id,
            sent: false,
            lines: Vec::new(),
        };

        // Always at least one pass: the command never outlives this call.
        loop {
            if let Err(e) = self.process_inbound(|line| outcome.lines.push(line)) {
                trace!("setup read: {}", e);
            }
            match self.dispatch_tick() {
                Ok(Some(sent)) if sent == id => outcome.sent = true,
                Ok(_) => {}
                Err(e) => debug!("setup write for #{}: {}", id.0, e),
            }
            if clock.now_ms().saturating_sub(start) >= u64::from(timeout_ms) {
                break;
            }
            clock.delay_ms(poll_interval_ms.max(1));
        }

        debug!(
            "'{}' -> sent={} lines={}",
            text,
            outcome.sent,
            outcome.lines.len()
        );
        outcome
    }

    pub fn queue(&self) -> &CommandQueue {
        &self.queue
    }

    pub fn framer(&self) -> &LineFramer {
        &self.framer
    }

    pub fn link(&self) -> &RadioLink<T> {
        &self.link
    }

    pub fn link_mut(&mut self) -> &mut RadioLink<T> {
        &mut self.link
    }
}
