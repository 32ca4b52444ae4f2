//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to
//! the ESP-IDF logger (which goes to UART / USB-CDC in production).
//! A display adapter implements the same trait.

use log::{debug, info};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`] to the serial console.
#[derive(Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Started(state) => {
                info!("START | initial_state={}", state.label());
            }
            AppEvent::Advertising => {
                info!("START | advertising");
            }
            AppEvent::ScanResult { result, is_target } => {
                // Every advertiser in range shows up here; keep the noise at debug.
                if *is_target {
                    info!(
                        "SCAN  | {} | {} | target",
                        result.advertised_name, result.rssi_text
                    );
                } else {
                    debug!("SCAN  | {} | {}", result.advertised_name, result.rssi_text);
                }
            }
            AppEvent::Response(text) => {
                debug!("RESP  | {}", text);
            }
            AppEvent::StateTransition(t) => {
                info!(
                    "STATE | {} -> {} | rssi={}dBm",
                    t.from.label(),
                    t.to.label(),
                    t.rssi
                );
            }
        }
    }
}
