//! AT command vocabulary of the RYB080I radio module.
//!
//! | Command            | Effect                         |
//! |--------------------|--------------------------------|
//! | `AT+NAME=<name>`   | set advertised/module name     |
//! | `AT+CRFOP=<level>` | set transmit power             |
//! | `AT+CNE=<0\|1>`    | enable/disable connections     |
//! | `AT+CFUN=<0\|1>`   | enable/disable radio function  |
//! | `AT+SCAN`          | begin a discovery scan         |
//! | `AT+ADVEN=<0\|1>`  | start/stop advertising         |

use core::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AtCommand {
    SetName(String),
    SetTxPower(String),
    Connectable(bool),
    RadioFunction(bool),
    Scan,
    Advertise(bool),
}

impl fmt::Display for AtCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SetName(name) => write!(f, "AT+NAME={name}"),
            Self::SetTxPower(level) => write!(f, "AT+CRFOP={level}"),
            Self::Connectable(on) => write!(f, "AT+CNE={}", u8::from(*on)),
            Self::RadioFunction(on) => write!(f, "AT+CFUN={}", u8::from(*on)),
            Self::Scan => f.write_str("AT+SCAN"),
            Self::Advertise(on) => write!(f, "AT+ADVEN={}", u8::from(*on)),
        }
    }
}
