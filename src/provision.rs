//! One-shot module provisioning, run before the control loop starts.
//!
//! A profile is a flat list of steps: AT commands driven through
//! [`Radio::send_and_await`] and settle delays for the module to apply
//! settings that need a moment (connectable mode, radio function).
//!
//! ```text
//!  receiver:     NAME=<name> → CRFOP=<p> → CNE=1 → settle 2s → CFUN=1 → settle 1s
//!  transmitter:  NAME=<name> → CRFOP=<p> → CFUN=1 → settle 1s
//! ```
//!
//! Provisioning is best-effort.  The module gives no per-command status the
//! protocol can correlate, so a step that sees `ERROR` is logged and the
//! profile keeps going.

use embedded_hal::delay::DelayNs;
use log::{info, warn};

use crate::app::ports::Clock;
use crate::config::{LockConfig, Role};
use crate::radio::{AtCommand, Radio, Transport};

/// Settle after `AT+CNE=1` before enabling the radio function.
pub const CONNECTABLE_SETTLE_MS: u32 = 2000;
/// Settle after `AT+CFUN=1`.
pub const RADIO_FUNCTION_SETTLE_MS: u32 = 1000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProvisionStep {
    Command(AtCommand),
    /// Idle for this many milliseconds.
    Settle(u32),
}

/// Summary of a provisioning run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProvisionReport {
    /// Commands in the profile.
    pub commands: u32,
    /// Commands actually written to the module.
    pub sent: u32,
    /// Commands whose window contained an `ERROR` response.
    pub errors: u32,
}

impl ProvisionReport {
    pub fn is_clean(&self) -> bool {
        self.sent == self.commands && self.errors == 0
    }
}

/// Steps for the stationary lock.
pub fn receiver_profile(config: &LockConfig) -> Vec<ProvisionStep> {
    vec![
        ProvisionStep::Command(AtCommand::SetName(config.module_name.clone())),
        ProvisionStep::Command(AtCommand::SetTxPower(config.tx_power.clone())),
        ProvisionStep::Command(AtCommand::Connectable(true)),
        ProvisionStep::Settle(CONNECTABLE_SETTLE_MS),
        ProvisionStep::Command(AtCommand::RadioFunction(true)),
        ProvisionStep::Settle(RADIO_FUNCTION_SETTLE_MS),
    ]
}

/// Steps for the key fob.
pub fn transmitter_profile(config: &LockConfig) -> Vec<ProvisionStep> {
    vec![
        ProvisionStep::Command(AtCommand::SetName(config.module_name.clone())),
        ProvisionStep::Command(AtCommand::SetTxPower(config.tx_power.clone())),
        ProvisionStep::Command(AtCommand::RadioFunction(true)),
        ProvisionStep::Settle(RADIO_FUNCTION_SETTLE_MS),
    ]
}

/// The profile matching `config.role`.
pub fn profile_for(config: &LockConfig) -> Vec<ProvisionStep> {
    match config.role {
        Role::Receiver => receiver_profile(config),
        Role::Transmitter => transmitter_profile(config),
    }
}

/// Execute `steps` in order.  Blocks for the whole profile.
pub fn run_profile<T: Transport, C: Clock + DelayNs>(
    radio: &mut Radio<T>,
    clock: &mut C,
    steps: &[ProvisionStep],
    config: &LockConfig,
) -> ProvisionReport {
    let mut report = ProvisionReport::default();

    for step in steps {
        match step {
            ProvisionStep::Command(cmd) => {
                report.commands += 1;
                let text = cmd.to_string();
                let outcome = radio.send_and_await(
                    clock,
                    &text,
                    config.setup_command_timeout_ms,
                    config.setup_poll_interval_ms,
                );
                if outcome.sent {
                    report.sent += 1;
                } else {
                    warn!("Provision: '{}' was never written", text);
                }
                for response in outcome.responses() {
                    info!("Provision: '{}' -> {}", text, response);
                }
                if outcome.responses().any(|r| r.contains("ERROR")) {
                    report.errors += 1;
                }
            }
            ProvisionStep::Settle(ms) => clock.delay_ms(*ms),
        }
    }

    info!(
        "Provision: {}/{} commands sent, {} error responses",
        report.sent, report.commands, report.errors
    );
    report
}
