//! System configuration parameters
//!
//! All tunable parameters for the ProxLock receiver and key fob.
//! Defaults match the bench setup; a JSON document can override any subset.

use core::fmt;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Which end of the link this node plays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Stationary lock: scans and tracks the key fob's RSSI.
    Receiver,
    /// Portable key fob: advertises periodically.
    Transmitter,
}

/// Core system configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LockConfig {
    pub role: Role,

    // --- Proximity ---
    /// RSSI strictly above this unlocks (dBm)
    pub threshold_dbm: i32,
    /// No sample for longer than this falls back to scanning (ms)
    pub staleness_timeout_ms: u64,
    /// Case-insensitive substring matched against advertised names
    pub target_device_substring: String,

    // --- Radio ---
    /// Interval between `AT+SCAN` requests (ms)
    pub scan_interval_ms: u64,
    /// Interval between `AT+ADVEN=1` re-issues on the key fob (ms)
    pub advertise_interval_ms: u64,
    /// Name written with `AT+NAME` during provisioning
    pub module_name: String,
    /// Transmit power level written with `AT+CRFOP`
    pub tx_power: String,
    /// UART baud rate to the radio module
    pub uart_baud: u32,

    // --- Timing ---
    /// Control loop period (ms)
    pub control_loop_interval_ms: u32,
    /// How long each provisioning command is driven for (ms)
    pub setup_command_timeout_ms: u32,
    /// Poll period inside the provisioning helper (ms)
    pub setup_poll_interval_ms: u32,

    /// Run the role's provisioning profile before entering the loop
    pub provision_on_boot: bool,
}

impl Default for LockConfig {
    fn default() -> Self {
        Self {
            role: Role::Receiver,

            threshold_dbm: -60,
            staleness_timeout_ms: 5000,
            target_device_substring: String::from("PicoKey"),

            scan_interval_ms: 3000,
            advertise_interval_ms: 15_000,
            module_name: String::from("PicoLock"),
            tx_power: String::from("C"), // max power
            uart_baud: 9600,

            control_loop_interval_ms: 50, // 20 Hz
            setup_command_timeout_ms: 3000,
            setup_poll_interval_ms: 100,

            provision_on_boot: false,
        }
    }
}

/// Errors from loading or validating a [`LockConfig`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The document could not be deserialized.
    Corrupted,
    /// A field failed range validation.
    ValidationFailed(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Corrupted => write!(f, "config corrupted"),
            Self::ValidationFailed(msg) => write!(f, "validation failed: {}", msg),
        }
    }
}

impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        match e {
            ConfigError::Corrupted => Error::Config("config corrupted"),
            ConfigError::ValidationFailed(msg) => Error::Config(msg),
        }
    }
}

impl LockConfig {
    /// Defaults for the portable key fob: advertises as `PicoKey`.
    pub fn key_fob() -> Self {
        Self {
            role: Role::Transmitter,
            module_name: String::from("PicoKey"),
            ..Self::default()
        }
    }

    /// Parse a JSON override document.  Missing fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json).map_err(|e| {
            log::warn!("Config parse failed: {}", e);
            ConfigError::Corrupted
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the control loop cannot operate with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(-150..=0).contains(&self.threshold_dbm) {
            return Err(ConfigError::ValidationFailed(
                "threshold_dbm must be within [-150, 0]",
            ));
        }
        if self.staleness_timeout_ms == 0 {
            return Err(ConfigError::ValidationFailed(
                "staleness_timeout_ms must be positive",
            ));
        }
        if self.scan_interval_ms == 0 || self.advertise_interval_ms == 0 {
            return Err(ConfigError::ValidationFailed(
                "scan/advertise intervals must be positive",
            ));
        }
        if self.role == Role::Receiver && self.target_device_substring.trim().is_empty() {
            return Err(ConfigError::ValidationFailed(
                "target_device_substring must not be empty",
            ));
        }
        if self.control_loop_interval_ms == 0 || self.setup_poll_interval_ms == 0 {
            return Err(ConfigError::ValidationFailed(
                "loop and poll intervals must be positive",
            ));
        }
        if self.setup_command_timeout_ms == 0 {
            return Err(ConfigError::ValidationFailed(
                "setup_command_timeout_ms must be positive",
            ));
        }
        if self.module_name.is_empty() || self.module_name.contains(['\r', '\n']) {
            return Err(ConfigError::ValidationFailed(
                "module_name must be a single non-empty line",
            ));
        }
        Ok(())
    }
}
