//! RSSI tracker: the latest proximity sample of the key fob.
//!
//! Only the most recent sample is kept.  There is no smoothing and no
//! history: the last valid reading wins.  A moving average or median
//! filter would reject more multipath noise and is the obvious next step
//! if the lock is seen to chatter.

use crate::error::{Error, ParseError, RangeError};

/// Lowest RSSI accepted (dBm).
pub const RSSI_MIN_DBM: i32 = -150;
/// Highest RSSI accepted (dBm).
pub const RSSI_MAX_DBM: i32 = 0;
/// Value reported by [`RssiTracker::current`] before any sample arrives.
pub const NO_SIGNAL_DBM: i32 = -100;

/// One accepted RSSI reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProximitySample {
    pub rssi: i32,
    pub observed_at: u64,
}

#[derive(Debug, Default)]
pub struct RssiTracker {
    latest: Option<ProximitySample>,
}

impl RssiTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrite the current sample.  Out-of-range values leave the
    /// tracker untouched.
    pub fn update(&mut self, rssi: i32, now_ms: u64) -> Result<(), RangeError> {
        check_range(rssi)?;
        self.latest = Some(ProximitySample {
            rssi,
            observed_at: now_ms,
        });
        Ok(())
    }

    /// Latest RSSI, or [`NO_SIGNAL_DBM`] if nothing was ever observed.
    pub fn current(&self) -> i32 {
        self.latest.map_or(NO_SIGNAL_DBM, |s| s.rssi)
    }

    pub fn sample(&self) -> Option<ProximitySample> {
        self.latest
    }

    /// True when more than `timeout_ms` has passed since the last sample,
    /// or when no sample has ever been taken.
    pub fn is_stale(&self, now_ms: u64, timeout_ms: u64) -> bool {
        match self.latest {
            Some(s) => now_ms.saturating_sub(s.observed_at) > timeout_ms,
            None => true,
        }
    }
}

fn check_range(rssi: i32) -> Result<(), RangeError> {
    if (RSSI_MIN_DBM..=RSSI_MAX_DBM).contains(&rssi) {
        Ok(())
    } else {
        Err(RangeError::RssiOutOfRange(rssi))
    }
}

/// Extract an RSSI from scan-result text such as `"RSSI:-45"` or `"-45"`.
///
/// The first integer in the text is used; a `-` separated from its digits
/// by whitespace still counts as the sign.
pub fn read_rssi(text: &str) -> Result<i32, Error> {
    let value = first_integer(text).ok_or(ParseError::NoRssiValue)?;
    let value = i32::try_from(value).map_err(|_| RangeError::RssiOutOfRange(i32::MIN))?;
    check_range(value)?;
    Ok(value)
}

/// [`read_rssi`] with the failure reason dropped.
pub fn parse_rssi(text: &str) -> Option<i32> {
    read_rssi(text).ok()
}

fn first_integer(text: &str) -> Option<i64> {
    let bytes = text.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        let (negative, digits_at) = match bytes[i] {
            b'0'..=b'9' => (false, i),
            b'-' => {
                let mut j = i + 1;
                while j < bytes.len() && bytes[j].is_ascii_whitespace() {
                    j += 1;
                }
                if j < bytes.len() && bytes[j].is_ascii_digit() {
                    (true, j)
                } else {
                    i += 1;
                    continue;
                }
            }
            _ => {
                i += 1;
                continue;
            }
        };

        let mut value: i64 = 0;
        for &b in bytes[digits_at..].iter().take_while(|b| b.is_ascii_digit()) {
            value = value.saturating_mul(10).saturating_add(i64::from(b - b'0'));
        }
        return Some(if negative { -value } else { value });
    }
    None
}
