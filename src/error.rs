//! Unified error types for the ProxLock firmware.
//!
//! Every fallible core operation returns one of these kinds.  None of them
//! is fatal: the control loop matches on the kind and decides explicitly
//! whether to log and carry on.  All variants are `Copy` so they can be
//! passed around the loop without allocation.

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level firmware error
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The serial link to the radio module failed.
    Transport(TransportError),
    /// An inbound line could not be interpreted.
    Parse(ParseError),
    /// A value was outside its physically plausible range.
    Range(RangeError),
    /// Configuration is invalid.
    Config(&'static str),
    /// A peripheral could not be brought up at boot.  Carries the
    /// peripheral's name.
    Init(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transport(e) => write!(f, "transport: {e}"),
            Self::Parse(e) => write!(f, "parse: {e}"),
            Self::Range(e) => write!(f, "range: {e}"),
            Self::Config(msg) => write!(f, "config: {msg}"),
            Self::Init(msg) => write!(f, "init: {msg}"),
        }
    }
}

impl core::error::Error for Error {}

// ---------------------------------------------------------------------------
// Transport errors
// ---------------------------------------------------------------------------

/// Serial I/O failures.  Swallowed by the loop and retried next tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportError {
    /// The UART read call failed.
    ReadFailed,
    /// The UART write call failed.
    WriteFailed,
    /// The driver accepted fewer bytes than requested.
    ShortWrite { written: usize, expected: usize },
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ReadFailed => write!(f, "UART read failed"),
            Self::WriteFailed => write!(f, "UART write failed"),
            Self::ShortWrite { written, expected } => {
                write!(f, "short write ({written} of {expected} bytes)")
            }
        }
    }
}

impl From<TransportError> for Error {
    fn from(e: TransportError) -> Self {
        Self::Transport(e)
    }
}

// ---------------------------------------------------------------------------
// Parse errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseError {
    /// A line had the scan-result shape but too few comma fields.
    MalformedScanResult,
    /// The RSSI field contained no integer.
    NoRssiValue,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MalformedScanResult => write!(f, "malformed scan result"),
            Self::NoRssiValue => write!(f, "no RSSI value in field"),
        }
    }
}

impl From<ParseError> for Error {
    fn from(e: ParseError) -> Self {
        Self::Parse(e)
    }
}

// ---------------------------------------------------------------------------
// Range errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeError {
    /// RSSI outside [-150, 0] dBm.  The sample is discarded.
    RssiOutOfRange(i32),
}

impl fmt::Display for RangeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RssiOutOfRange(v) => write!(f, "RSSI {v} dBm outside [-150, 0]"),
        }
    }
}

impl From<RangeError> for Error {
    fn from(e: RangeError) -> Self {
        Self::Range(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Firmware-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
