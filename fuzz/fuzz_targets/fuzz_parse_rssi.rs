//! Fuzz target: `parse_rssi`
//!
//! Any text either yields nothing or a value inside the accepted range.
//!
//! cargo fuzz run fuzz_parse_rssi

#![no_main]

use libfuzzer_sys::fuzz_target;
use proxlock::tracker::{RSSI_MAX_DBM, RSSI_MIN_DBM, parse_rssi};

fuzz_target!(|data: &[u8]| {
    let text = String::from_utf8_lossy(data);
    if let Some(v) = parse_rssi(&text) {
        assert!((RSSI_MIN_DBM..=RSSI_MAX_DBM).contains(&v));
    }
});
