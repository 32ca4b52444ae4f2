//! Presentation adapters: status text rendering and event fan-out.
//!
//! The lock's display shows two lines:
//!
//! ```text
//!   RSSI:-48        (or "No Signal")
//!   UNLOCK
//! ```
//!
//! [`PresentingSink`] sits on the [`EventSink`] port, logs every event and
//! forwards state transitions to a [`PresentationSink`] (display, LED).

use log::info;

use crate::app::events::AppEvent;
use crate::app::ports::{EventSink, PresentationSink};
use crate::fsm::states;
use crate::tracker::NO_SIGNAL_DBM;

/// Label shown by the key fob while it advertises.
pub const ADVERTISING_LABEL: &str = "ADVERTISING";

/// Render the two display lines for `label` and an optional RSSI.
///
/// The first line is `RSSI:<n>` only when a signal stronger than the
/// no-signal sentinel is known.
pub fn status_text(label: &str, rssi: Option<i32>) -> (String, String) {
    let signal = match rssi {
        Some(r) if r > NO_SIGNAL_DBM => format!("RSSI:{r}"),
        _ => String::from("No Signal"),
    };
    (signal, String::from(label))
}

// ───────────────────────────────────────────────────────────────
// LogPresenter
// ───────────────────────────────────────────────────────────────

/// Presentation sink for boards without a display: renders the status
/// text to the log and remembers what it would show.
#[derive(Debug, Default)]
pub struct LogPresenter {
    lines: (String, String),
}

impl LogPresenter {
    pub fn new() -> Self {
        Self::default()
    }

    /// The two lines most recently rendered.
    pub fn lines(&self) -> (&str, &str) {
        (&self.lines.0, &self.lines.1)
    }
}

impl PresentationSink for LogPresenter {
    fn show_status(&mut self, label: &str, rssi: Option<i32>) {
        self.lines = status_text(label, rssi);
        info!("DISPLAY | {} | {}", self.lines.0, self.lines.1);
    }

    fn set_scanning(&mut self) {}

    fn set_unlocked(&mut self) {}

    fn set_locked(&mut self) {}

    fn set_off(&mut self) {
        self.lines = (String::new(), String::new());
    }
}

// ───────────────────────────────────────────────────────────────
// PresentingSink
// ───────────────────────────────────────────────────────────────

/// Event sink that forwards every event to an inner sink and drives a
/// presentation sink on start and on every state transition.
pub struct PresentingSink<E, P> {
    inner: E,
    presenter: P,
}

impl<E: EventSink, P: PresentationSink> PresentingSink<E, P> {
    pub fn new(inner: E, presenter: P) -> Self {
        Self { inner, presenter }
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    pub fn presenter_mut(&mut self) -> &mut P {
        &mut self.presenter
    }

    pub fn inner(&self) -> &E {
        &self.inner
    }

    pub fn into_parts(self) -> (E, P) {
        (self.inner, self.presenter)
    }
}

impl<E: EventSink, P: PresentationSink> EventSink for PresentingSink<E, P> {
    fn emit(&mut self, event: &AppEvent) {
        self.inner.emit(event);
        match event {
            AppEvent::Started(state) => {
                let row = states::descriptor(*state);
                self.presenter.show_status(row.label, None);
                (row.on_enter)(&mut self.presenter);
            }
            AppEvent::Advertising => {
                self.presenter.show_status(ADVERTISING_LABEL, None);
            }
            AppEvent::StateTransition(t) => states::present(t, &mut self.presenter),
            AppEvent::ScanResult { .. } | AppEvent::Response(_) => {}
        }
    }
}
