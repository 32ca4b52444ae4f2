//! Integration tests for the blocking setup helper and provisioning profiles.

use proxlock::config::LockConfig;
use proxlock::provision::{self, ProvisionReport};
use proxlock::radio::{InboundLine, Radio};

use crate::mock_radio::{FakeClock, MockTransport};

fn radio_answering_ok() -> Radio<MockTransport> {
    let mut port = MockTransport::new();
    port.reply_to("AT+", "OK");
    Radio::new(port)
}

#[test]
fn send_and_await_writes_once_and_collects_the_reply() {
    let mut radio = radio_answering_ok();
    let mut clock = FakeClock::at(1_000);

    let outcome = radio.send_and_await(&mut clock, "AT+NAME=PicoLock", 3000, 100);

    assert!(outcome.sent);
    assert_eq!(outcome.responses().collect::<Vec<_>>(), vec!["OK"]);
    assert_eq!(
        radio.link().transport().written_text(),
        vec!["AAT+NAME=PicoLock\r\n"]
    );
    // Blocks for the whole timeout, not just until the reply.
    assert_eq!(clock.now, 4_000);
}

#[test]
fn send_and_await_keeps_scan_lines_seen_meanwhile() {
    let mut port = MockTransport::new();
    port.feed_line("+SCAN:0x01,PicoKey,RSSI:-52");
    let mut radio = Radio::new(port);
    let mut clock = FakeClock::default();

    let outcome = radio.send_and_await(&mut clock, "AT+SCAN", 500, 100);

    assert!(matches!(outcome.lines.as_slice(), [InboundLine::ScanResult(r)] if r.rssi_text == "RSSI:-52"));
    assert_eq!(outcome.responses().count(), 0);
}

#[test]
fn send_and_await_reports_unsent_on_write_failure() {
    let mut port = MockTransport::new();
    port.fail_writes = true;
    let mut radio = Radio::new(port);
    let mut clock = FakeClock::default();

    let outcome = radio.send_and_await(&mut clock, "AT+CFUN=1", 300, 100);

    assert!(!outcome.sent);
    assert!(radio.queue().is_empty(), "failed command must not be retried");
}

#[test]
fn send_and_await_with_zero_timeout_still_sends() {
    let mut radio = radio_answering_ok();
    let mut clock = FakeClock::at(500);

    let outcome = radio.send_and_await(&mut clock, "AT+CNE=1", 0, 100);

    assert!(outcome.sent);
    assert!(radio.queue().is_empty());
    assert_eq!(radio.link().transport().written_text(), vec!["AAT+CNE=1\r\n"]);
    assert_eq!(clock.now, 500);
}

#[test]
fn zero_setup_timeout_never_leaks_commands_into_the_loop() {
    let config = LockConfig {
        setup_command_timeout_ms: 0,
        ..LockConfig::default()
    };
    assert!(config.validate().is_err());

    let mut radio = radio_answering_ok();
    let mut clock = FakeClock::default();
    let steps = provision::receiver_profile(&config);
    let report = provision::run_profile(&mut radio, &mut clock, &steps, &config);

    assert_eq!(report.commands, 4);
    assert_eq!(report.sent, 4);
    assert!(radio.queue().is_empty(), "setup commands left for the control loop");
}

#[test]
fn receiver_profile_runs_in_order_with_settle_delays() {
    let config = LockConfig::default();
    let mut radio = radio_answering_ok();
    let mut clock = FakeClock::default();

    let steps = provision::receiver_profile(&config);
    let report = provision::run_profile(&mut radio, &mut clock, &steps, &config);

    assert_eq!(
        report,
        ProvisionReport {
            commands: 4,
            sent: 4,
            errors: 0,
        }
    );
    assert!(report.is_clean());
    assert_eq!(
        radio.link().transport().written_text(),
        vec![
            "AAT+NAME=PicoLock\r\n",
            "AAT+CRFOP=C\r\n",
            "AAT+CNE=1\r\n",
            "AAT+CFUN=1\r\n",
        ]
    );
    // 4 × 3 s command windows + 2 s + 1 s settles.
    assert_eq!(clock.now, 15_000);
}

#[test]
fn transmitter_profile_names_the_fob() {
    let config = LockConfig::key_fob();
    let mut radio = radio_answering_ok();
    let mut clock = FakeClock::default();

    let steps = provision::profile_for(&config);
    let report = provision::run_profile(&mut radio, &mut clock, &steps, &config);

    assert!(report.is_clean());
    assert_eq!(
        radio.link().transport().written_text(),
        vec!["AAT+NAME=PicoKey\r\n", "AAT+CRFOP=C\r\n", "AAT+CFUN=1\r\n"]
    );
    assert_eq!(clock.now, 10_000);
}

#[test]
fn error_reply_is_counted_but_profile_continues() {
    let config = LockConfig::default();
    let mut port = MockTransport::new();
    port.reply_to("AT+CRFOP", "ERROR");
    let mut radio = Radio::new(port);
    let mut clock = FakeClock::default();

    let steps = provision::receiver_profile(&config);
    let report = provision::run_profile(&mut radio, &mut clock, &steps, &config);

    assert_eq!(report.errors, 1);
    assert_eq!(report.sent, 4);
    assert!(!report.is_clean());
}
