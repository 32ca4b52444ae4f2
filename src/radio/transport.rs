//! Transport abstraction: the byte channel to the radio module.
//!
//! Concrete implementations:
//! - UART serial to the RYB080I module (`adapters::uart`, ESP-IDF only)
//! - in-memory mocks in the integration tests
//!
//! [`RadioLink`] wraps any [`Transport`] and turns its driver-specific
//! errors into [`TransportError`] values.  It never panics and never
//! retries: a failed call is reported once and the caller moves on.

use log::{trace, warn};

use crate::error::TransportError;

/// Scratch size for one non-blocking read.
pub const READ_CHUNK: usize = 128;

/// Byte-oriented transport channel.
pub trait Transport {
    /// Error type for this transport.
    type Error: core::fmt::Debug;

    /// Read up to `buf.len()` bytes into `buf`.
    /// Returns the number of bytes actually read.
    /// Returns 0 if no data is available (non-blocking).
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error>;

    /// Write `data` to the transport.
    /// Returns the number of bytes actually written.
    fn write(&mut self, data: &[u8]) -> Result<usize, Self::Error>;

    /// Flush any buffered output.
    fn flush(&mut self) -> Result<(), Self::Error>;
}

/// A null transport that discards all writes and never reads.
/// Used when the UART cannot be opened so the loop keeps running.
pub struct NullTransport;

impl Transport for NullTransport {
    type Error = ();

    fn read(&mut self, _buf: &mut [u8]) -> Result<usize, ()> {
        Ok(0)
    }

    fn write(&mut self, data: &[u8]) -> Result<usize, ()> {
        Ok(data.len())
    }

    fn flush(&mut self) -> Result<(), ()> {
        Ok(())
    }
}

/// Best-effort adapter over a [`Transport`].
pub struct RadioLink<T: Transport> {
    transport: T,
    scratch: [u8; READ_CHUNK],
    read_failures: u32,
    write_failures: u32,
}

impl<T: Transport> RadioLink<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            scratch: [0; READ_CHUNK],
            read_failures: 0,
            write_failures: 0,
        }
    }

    /// Non-blocking read.  Returns an empty slice when nothing is waiting.
    pub fn poll_read(&mut self) -> Result<&[u8], TransportError> {
        match self.transport.read(&mut self.scratch) {
            Ok(n) => {
                let n = n.min(READ_CHUNK);
                if n > 0 {
                    trace!("radio rx {} bytes", n);
                }
                Ok(&self.scratch[..n])
            }
            Err(e) => {
                self.read_failures = self.read_failures.wrapping_add(1);
                warn!("radio read failed: {:?}", e);
                Err(TransportError::ReadFailed)
            }
        }
    }

    /// Write and flush `data`.  Returns the byte count on success.
    pub fn write(&mut self, data: &[u8]) -> Result<usize, TransportError> {
        let written = match self.transport.write(data) {
            Ok(n) => n,
            Err(e) => {
                self.write_failures = self.write_failures.wrapping_add(1);
                warn!("radio write failed: {:?}", e);
                return Err(TransportError::WriteFailed);
            }
        };
        if let Err(e) = self.transport.flush() {
            self.write_failures = self.write_failures.wrapping_add(1);
            warn!("radio flush failed: {:?}", e);
            return Err(TransportError::WriteFailed);
        }
        if written < data.len() {
            self.write_failures = self.write_failures.wrapping_add(1);
            return Err(TransportError::ShortWrite {
                written,
                expected: data.len(),
            });
        }
        Ok(written)
    }

    /// Cumulative (read, write) failure counts.
    pub fn failure_counts(&self) -> (u32, u32) {
        (self.read_failures, self.write_failures)
    }

    /// Borrow the underlying transport (tests inspect mock state through this).
    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }
}
