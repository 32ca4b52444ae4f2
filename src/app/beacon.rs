//! Key fob service: the transmitter end of the link.
//!
//! The fob has no state machine.  It keeps the module advertising by
//! re-issuing `AT+ADVEN=1` on a fixed interval (the module may drop out of
//! advertising after a reset or a connection), and drains whatever the
//! module says so the UART never backs up.
//!
//! ```text
//!   tick ──▶ drain inbound ──▶ dispatch one ──▶ re-advertise if due
//! ```

use log::{info, trace, warn};

use crate::config::LockConfig;
use crate::radio::{InboundLine, Radio, Transport};
use crate::scheduler::AutoScheduler;

use super::events::AppEvent;
use super::ports::EventSink;

pub struct BeaconService<T: Transport> {
    radio: Radio<T>,
    scheduler: AutoScheduler,
    tick_count: u64,
}

impl<T: Transport> BeaconService<T> {
    pub fn new(radio: Radio<T>, config: &LockConfig) -> Self {
        Self {
            radio,
            scheduler: AutoScheduler::advertise(config.advertise_interval_ms),
            tick_count: 0,
        }
    }

    /// Enable advertising.  The first `AT+ADVEN=1` goes out on the next tick.
    pub fn start(&mut self, sink: &mut impl EventSink) {
        self.scheduler.start();
        sink.emit(&AppEvent::Advertising);
        info!(
            "BeaconService started (re-advertise every {}ms)",
            self.scheduler.schedule().interval_ms
        );
    }

    pub fn stop(&mut self) {
        self.scheduler.stop();
    }

    /// One control cycle.  Never blocks; errors are logged and dropped.
    pub fn tick(&mut self, now_ms: u64, sink: &mut impl EventSink) {
        self.tick_count += 1;

        let mut lines = Vec::new();
        if let Err(e) = self.radio.process_inbound(|line| lines.push(line)) {
            warn!("Radio read: {}", e);
        }
        for line in lines {
            // Scan results are meaningless here; only responses are surfaced.
            if let InboundLine::Response(text) = line {
                sink.emit(&AppEvent::Response(text));
            }
        }

        match self.radio.dispatch_tick() {
            Ok(Some(id)) => trace!("Dispatched command #{}", id.0),
            Ok(None) => {}
            Err(e) => warn!("Radio write: {} (command dropped)", e),
        }

        self.scheduler.tick(&mut self.radio, now_ms);
    }

    /// Number of `AT+ADVEN=1` issued since start.
    pub fn advertise_count(&self) -> u32 {
        self.scheduler.fire_count()
    }

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
