//! Fuzz target: `LineFramer::push`
//!
//! Drives arbitrary byte sequences into the line framer, split at a
//! fuzzer-chosen point, and asserts that it never panics, never holds more
//! than `LINE_BUFFER_CAP` bytes, and never emits an empty response.
//!
//! cargo fuzz run fuzz_line_framer

#![no_main]

use libfuzzer_sys::fuzz_target;
use proxlock::radio::InboundLine;
use proxlock::radio::LineFramer;
use proxlock::radio::framer::LINE_BUFFER_CAP;

fuzz_target!(|data: &[u8]| {
    let Some((&split, rest)) = data.split_first() else {
        return;
    };
    let cut = usize::from(split).min(rest.len());

    let mut framer = LineFramer::new();
    for part in [&rest[..cut], &rest[cut..]] {
        framer.push(part, |line| {
            if let InboundLine::Response(text) = line {
                assert!(!text.is_empty(), "framer must not yield empty lines");
            }
        });
        assert!(framer.pending_len() <= LINE_BUFFER_CAP);
    }

    // After a reset the framer must accept bytes cleanly again.
    framer.reset();
    framer.push(rest, |_| {});
});
