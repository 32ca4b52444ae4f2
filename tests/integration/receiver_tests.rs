//! Integration tests for the receiver loop:
//! transport → framer → tracker → FSM → events / presentation.

use proxlock::adapters::presenter::PresentingSink;
use proxlock::app::events::AppEvent;
use proxlock::app::service::ProximityService;
use proxlock::config::LockConfig;
use proxlock::fsm::{LockState, StateTransition};
use proxlock::radio::{Radio, ScanResult};

use crate::mock_radio::{MockTransport, PresenterCall, RecordingPresenter, RecordingSink};

const TICK_MS: u64 = 50;
const KEY_NEAR: &str = "+SCAN:0x5C3A2B1F0E11,PicoKey,RSSI:-45";
const KEY_FAR: &str = "+SCAN:0x5C3A2B1F0E11,PicoKey,RSSI:-75";

fn make_service() -> (ProximityService<MockTransport>, RecordingSink) {
    let mut svc = ProximityService::new(Radio::new(MockTransport::new()), &LockConfig::default());
    let mut sink = RecordingSink::new();
    svc.start(&mut sink);
    (svc, sink)
}

fn radio_port(svc: &mut ProximityService<MockTransport>) -> &mut MockTransport {
    svc.radio_mut().link_mut().transport_mut()
}

/// Tick every `TICK_MS` over `[from, to)`.
fn run(svc: &mut ProximityService<MockTransport>, sink: &mut RecordingSink, from: u64, to: u64) {
    let mut t = from;
    while t < to {
        svc.tick(t, sink);
        t += TICK_MS;
    }
}

// ── Startup and scanning ──────────────────────────────────────

#[test]
fn starts_scanning_and_sends_first_scan_immediately() {
    let (mut svc, mut sink) = make_service();
    assert_eq!(sink.events[0], AppEvent::Started(LockState::Scanning));

    // Tick 0 queues the scan, tick 1 writes it.
    svc.tick(0, &mut sink);
    svc.tick(TICK_MS, &mut sink);

    assert_eq!(radio_port(&mut svc).written_text(), vec!["AAT+SCAN\r\n"]);
    assert_eq!(svc.state(), LockState::Scanning);
}

#[test]
fn scans_once_per_interval() {
    let (mut svc, mut sink) = make_service();
    run(&mut svc, &mut sink, 0, 10_000);

    // Fires at 0, 3000, 6000, 9000.
    assert_eq!(radio_port(&mut svc).count_written("AT+SCAN"), 4);
    assert_eq!(svc.stats().scans, 4);
}

// ── Proximity decisions ───────────────────────────────────────

#[test]
fn near_key_unlocks() {
    let (mut svc, mut sink) = make_service();
    run(&mut svc, &mut sink, 0, 100);

    radio_port(&mut svc).feed_line(KEY_NEAR);
    svc.tick(100, &mut sink);

    assert_eq!(
        sink.transitions(),
        vec![StateTransition {
            from: LockState::Scanning,
            to: LockState::Unlocked,
            rssi: -45,
        }]
    );
    assert_eq!(svc.tracker().current(), -45);
    assert_eq!(svc.stats().sightings, 1);
}

#[test]
fn far_key_locks() {
    let (mut svc, mut sink) = make_service();
    radio_port(&mut svc).feed_line(KEY_FAR);
    svc.tick(0, &mut sink);

    assert_eq!(svc.state(), LockState::Locked);
    assert_eq!(sink.transitions()[0].rssi, -75);
}

#[test]
fn rssi_at_threshold_locks() {
    let (mut svc, mut sink) = make_service();
    radio_port(&mut svc).feed_line("+SCAN:0x01,PicoKey,RSSI:-60");
    svc.tick(0, &mut sink);
    assert_eq!(svc.state(), LockState::Locked);
}

#[test]
fn key_going_silent_falls_back_to_scanning() {
    let (mut svc, mut sink) = make_service();
    radio_port(&mut svc).feed_line(KEY_NEAR);
    svc.tick(100, &mut sink);
    assert_eq!(svc.state(), LockState::Unlocked);

    // Exactly at the timeout the sample is still fresh.
    svc.tick(5100, &mut sink);
    assert_eq!(svc.state(), LockState::Unlocked);

    svc.tick(5101, &mut sink);
    assert_eq!(svc.state(), LockState::Scanning);
    assert_eq!(
        sink.transitions().last(),
        Some(&StateTransition {
            from: LockState::Unlocked,
            to: LockState::Scanning,
            rssi: -45,
        })
    );
}

#[test]
fn moving_away_relocks_without_passing_through_scanning() {
    let (mut svc, mut sink) = make_service();
    radio_port(&mut svc).feed_line(KEY_NEAR);
    svc.tick(0, &mut sink);
    radio_port(&mut svc).feed_line(KEY_FAR);
    svc.tick(3000, &mut sink);

    let to: Vec<_> = sink.transitions().iter().map(|t| t.to).collect();
    assert_eq!(to, vec![LockState::Unlocked, LockState::Locked]);
}

#[test]
fn readings_either_side_of_threshold_flip_every_time() {
    // No hysteresis: each crossing is its own transition.
    let (mut svc, mut sink) = make_service();
    for (i, rssi) in [-59, -61, -59].iter().enumerate() {
        radio_port(&mut svc).feed_line(&format!("+SCAN:0x01,PicoKey,RSSI:{rssi}"));
        svc.tick(i as u64 * TICK_MS, &mut sink);
    }
    assert_eq!(sink.transitions().len(), 3);
}

// ── Target filtering and parsing ──────────────────────────────

#[test]
fn other_advertisers_do_not_move_the_tracker() {
    let (mut svc, mut sink) = make_service();
    radio_port(&mut svc).feed_line("+SCAN:0x77,OtherDevice,RSSI:-30");
    svc.tick(0, &mut sink);

    assert_eq!(svc.state(), LockState::Scanning);
    assert!(svc.tracker().sample().is_none());
    assert!(sink.events.contains(&AppEvent::ScanResult {
        result: ScanResult {
            advertised_name: "OtherDevice".into(),
            rssi_text: "RSSI:-30".into(),
        },
        is_target: false,
    }));
}

#[test]
fn target_name_matches_case_insensitively() {
    let (mut svc, mut sink) = make_service();
    radio_port(&mut svc).feed_line("+SCAN:0x01,my-picokey-02,RSSI:-50");
    svc.tick(0, &mut sink);
    assert_eq!(svc.state(), LockState::Unlocked);
}

#[test]
fn unusable_rssi_is_counted_and_ignored() {
    let (mut svc, mut sink) = make_service();
    let port = radio_port(&mut svc);
    port.feed_line("+SCAN:0x01,PicoKey");
    port.feed_line("+SCAN:0x01,PicoKey,RSSI:-200");
    port.feed_line("+SCAN:0x01,PicoKey,RSSI:strong");
    svc.tick(0, &mut sink);

    assert_eq!(svc.state(), LockState::Scanning);
    assert_eq!(svc.tracker().current(), -100);
    let stats = svc.stats();
    assert_eq!((stats.sightings, stats.rejected_rssi), (3, 3));
}

#[test]
fn line_split_across_reads_is_reassembled() {
    let (mut svc, mut sink) = make_service();
    radio_port(&mut svc).feed(b"+SCAN:0x5C3A,Pico");
    svc.tick(0, &mut sink);
    assert_eq!(svc.state(), LockState::Scanning);

    radio_port(&mut svc).feed(b"Key,RSSI:-40\r\n");
    svc.tick(TICK_MS, &mut sink);
    assert_eq!(svc.state(), LockState::Unlocked);
}

#[test]
fn responses_and_scan_results_in_one_read() {
    let (mut svc, mut sink) = make_service();
    radio_port(&mut svc).feed(b"OK\r\n\r\n+SCAN:0x01,PicoKey,RSSI:-70\r\n");
    svc.tick(0, &mut sink);

    assert_eq!(sink.responses(), vec!["OK"]);
    assert_eq!(svc.state(), LockState::Locked);
}

#[test]
fn oversized_garbage_is_discarded_and_framing_recovers() {
    let (mut svc, mut sink) = make_service();
    radio_port(&mut svc).feed(&[b'x'; 300]);
    svc.tick(0, &mut sink);
    radio_port(&mut svc).feed(format!("tail\n{KEY_NEAR}\r\n").as_bytes());
    svc.tick(TICK_MS, &mut sink);

    assert_eq!(svc.radio().framer().overflow_count(), 1);
    assert!(sink.responses().is_empty());
    assert_eq!(svc.state(), LockState::Unlocked);
}

// ── Transport failures ────────────────────────────────────────

#[test]
fn read_failures_do_not_stop_the_loop() {
    let (mut svc, mut sink) = make_service();
    radio_port(&mut svc).fail_reads = true;
    run(&mut svc, &mut sink, 0, 200);
    assert_eq!(radio_port(&mut svc).count_written("AT+SCAN"), 1);

    let port = radio_port(&mut svc);
    port.fail_reads = false;
    port.feed_line(KEY_NEAR);
    svc.tick(200, &mut sink);
    assert_eq!(svc.state(), LockState::Unlocked);
}

#[test]
fn failed_write_drops_the_command() {
    let (mut svc, mut sink) = make_service();
    radio_port(&mut svc).fail_writes = true;
    run(&mut svc, &mut sink, 0, 100);
    assert!(svc.radio().queue().is_empty());

    radio_port(&mut svc).fail_writes = false;
    run(&mut svc, &mut sink, 100, 3000);
    assert!(radio_port(&mut svc).written.is_empty());

    // Next scheduled scan goes through.
    run(&mut svc, &mut sink, 3000, 3100);
    assert_eq!(radio_port(&mut svc).count_written("AT+SCAN"), 1);
}

// ── Presentation ──────────────────────────────────────────────

#[test]
fn transitions_drive_the_presenter() {
    let mut svc = ProximityService::new(Radio::new(MockTransport::new()), &LockConfig::default());
    let mut sink = PresentingSink::new(RecordingSink::new(), RecordingPresenter::default());
    svc.start(&mut sink);

    radio_port(&mut svc).feed_line(KEY_NEAR);
    svc.tick(0, &mut sink);
    radio_port(&mut svc).feed_line(KEY_FAR);
    svc.tick(TICK_MS, &mut sink);
    svc.tick(10_000, &mut sink);

    assert_eq!(
        sink.presenter().calls,
        vec![
            PresenterCall::Status("SCAN".into(), None),
            PresenterCall::Scanning,
            PresenterCall::Status("UNLOCK".into(), Some(-45)),
            PresenterCall::Unlocked,
            PresenterCall::Status("LOCK".into(), Some(-75)),
            PresenterCall::Locked,
            PresenterCall::Status("SCAN".into(), None),
            PresenterCall::Scanning,
        ]
    );
    assert_eq!(sink.inner().transitions().len(), 3);
}
