//! Application core: pure domain logic, zero I/O.
//!
//! This module contains the business rules for both ends of the link:
//! the lock's scan/track/decide loop and the key fob's advertising loop.
//! All interaction with hardware happens through **port traits** defined
//! in [`ports`], keeping this layer fully testable without real peripherals.

pub mod beacon;
pub mod events;
pub mod ports;
pub mod service;
