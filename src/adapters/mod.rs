//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter     | Implements           | Connects to              |
//! |-------------|----------------------|--------------------------|
//! | `log_sink`  | EventSink            | Serial log output        |
//! | `presenter` | EventSink            | Display / status LED     |
//! |             | PresentationSink     | Serial log output        |
//! | `time`      | Clock, DelayNs       | ESP32-S3 system timer    |
//! | `uart`      | Transport            | RYB080I over UART        |

pub mod log_sink;
pub mod presenter;
pub mod time;
#[cfg(target_os = "espidf")]
pub mod uart;
