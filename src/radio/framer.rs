//! Newline line framer and classifier for the AT-command stream.
//!
//! The module answers with `\r\n`-terminated text.  Bytes other than `\r`
//! are accumulated into a fixed-capacity buffer; each `\n` completes a
//! line, which is trimmed and classified:
//!
//! ```text
//!   "+SCAN:0x5C3A..,PicoKey,RSSI:-45"  ──▶ InboundLine::ScanResult
//!   "OK" / "ERROR" / anything else      ──▶ InboundLine::Response
//!   ""                                   ──▶ dropped
//! ```
//!
//! The buffer never grows past [`LINE_BUFFER_CAP`].  A line that overflows
//! it is discarded together with the rest of its bytes; framing resumes at
//! the next newline.

use heapless::Vec;
use log::{trace, warn};

use crate::error::ParseError;

/// Maximum content bytes held for one unterminated line (`\r` is not
/// buffered, so a `\r\n`-terminated line may carry this many).
pub const LINE_BUFFER_CAP: usize = 256;

/// RSSI text used when a scan line carries no third field.
pub const UNKNOWN_RSSI_TEXT: &str = "Unknown";

/// One advertiser reported by `AT+SCAN`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanResult {
    pub advertised_name: String,
    pub rssi_text: String,
}

/// A classified inbound line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundLine {
    ScanResult(ScanResult),
    /// Opaque acknowledgement or error text.  The protocol has no ids,
    /// so responses cannot be correlated with commands.
    Response(String),
}

/// Streaming line framer.
pub struct LineFramer {
    buf: Vec<u8, LINE_BUFFER_CAP>,
    /// Set after an overflow; bytes are dropped until the next newline.
    discarding: bool,
    overflows: u32,
    malformed: u32,
}

impl Default for LineFramer {
    fn default() -> Self {
        Self::new()
    }
}

impl LineFramer {
    pub fn new() -> Self {
        Self {
            buf: Vec::new(),
            discarding: false,
            overflows: 0,
            malformed: 0,
        }
    }

    /// Feed bytes and hand every completed, classified line to `emit`.
    ///
    /// All complete lines in `data` are delivered before this returns.
    pub fn push(&mut self, data: &[u8], mut emit: impl FnMut(InboundLine)) {
        for &byte in data {
            if byte == b'\n' {
                if self.discarding {
                    self.discarding = false;
                } else if let Some(line) = self.take_line() {
                    emit(line);
                }
                self.buf.clear();
                continue;
            }

            if self.discarding || byte == b'\r' {
                continue;
            }

            if self.buf.push(byte).is_err() {
                self.overflows = self.overflows.wrapping_add(1);
                warn!(
                    "line buffer overflow ({} bytes without newline), discarding",
                    LINE_BUFFER_CAP
                );
                self.buf.clear();
                self.discarding = true;
            }
        }
    }

    /// Bytes currently held for the unterminated line.
    pub fn pending_len(&self) -> usize {
        self.buf.len()
    }

    /// Number of lines discarded for exceeding the buffer cap.
    pub fn overflow_count(&self) -> u32 {
        self.overflows
    }

    /// Number of scan-shaped lines dropped as malformed.
    pub fn malformed_count(&self) -> u32 {
        self.malformed
    }

    /// Drop any partial line (e.g. after the module was reset).
    pub fn reset(&mut self) {
        self.buf.clear();
        self.discarding = false;
    }

    fn take_line(&mut self) -> Option<InboundLine> {
        let text = String::from_utf8_lossy(&self.buf);
        let line = text.trim();
        if line.is_empty() {
            return None;
        }
        match classify(line) {
            Ok(inbound) => Some(inbound),
            Err(e) => {
                self.malformed = self.malformed.wrapping_add(1);
                trace!("dropped line '{}': {}", line, e);
                None
            }
        }
    }
}

/// Whether a trimmed line has the scan-result shape.
pub fn is_scan_line(line: &str) -> bool {
    line.starts_with('+') && line.contains(":0x") && line.contains(',')
}

/// Classify one trimmed, non-empty line.
pub fn classify(line: &str) -> Result<InboundLine, ParseError> {
    if is_scan_line(line) {
        parse_scan_result(line).map(InboundLine::ScanResult)
    } else {
        Ok(InboundLine::Response(line.to_string()))
    }
}

/// Split a scan-result line on commas: field 1 is the name, field 2 the RSSI.
pub fn parse_scan_result(line: &str) -> Result<ScanResult, ParseError> {
    let mut fields = line.split(',');
    let _address = fields.next();
    let name = fields.next().ok_or(ParseError::MalformedScanResult)?;
    let rssi_text = fields.next().map_or(UNKNOWN_RSSI_TEXT, str::trim);
    Ok(ScanResult {
        advertised_name: name.trim().to_string(),
        rssi_text: rssi_text.to_string(),
    })
}
