//! Radio-link subsystem: AT-command text over a UART to the BLE module.
//!
//! ```text
//!  ┌───────────┐  bytes  ┌────────────┐  InboundLine  ┌────────────┐
//!  │ Transport │────────▶│ LineFramer │──────────────▶│  caller    │
//!  │  (UART)   │◀────────│            │               │ (service)  │
//!  └───────────┘  1/tick └────────────┘               └─────┬──────┘
//!        ▲                                                  │ enqueue
//!        │            ┌──────────────┐                      │
//!        └────────────│ CommandQueue │◀─────────────────────┘
//!                     └──────────────┘
//! ```

pub mod command;
pub mod framer;
pub mod link;
pub mod queue;
pub mod transport;

pub use command::AtCommand;
pub use framer::{InboundLine, LineFramer, ScanResult};
pub use link::{AwaitOutcome, Radio};
pub use queue::{CommandId, CommandQueue, OutboundCommand};
pub use transport::{NullTransport, RadioLink, Transport};
