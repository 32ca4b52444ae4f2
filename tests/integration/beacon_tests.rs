//! Integration tests for the key fob's advertising loop.

use proxlock::adapters::presenter::PresentingSink;
use proxlock::app::beacon::BeaconService;
use proxlock::app::events::AppEvent;
use proxlock::config::LockConfig;
use proxlock::radio::Radio;

use crate::mock_radio::{MockTransport, PresenterCall, RecordingPresenter, RecordingSink};

fn make_beacon() -> (BeaconService<MockTransport>, RecordingSink) {
    let mut svc = BeaconService::new(Radio::new(MockTransport::new()), &LockConfig::key_fob());
    let mut sink = RecordingSink::new();
    svc.start(&mut sink);
    (svc, sink)
}

#[test]
fn advertises_immediately_then_every_fifteen_seconds() {
    let (mut svc, mut sink) = make_beacon();
    let mut t = 0;
    while t < 31_000 {
        svc.tick(t, &mut sink);
        t += 50;
    }

    // Fires at 0, 15 000 and 30 000.
    assert_eq!(svc.advertise_count(), 3);
    let written = svc.radio().link().transport().written_text();
    assert_eq!(written, vec!["AAT+ADVEN=1\r\n"; 3]);
}

#[test]
fn responses_are_surfaced_and_scan_lines_ignored() {
    let (mut svc, mut sink) = make_beacon();
    let port = svc.radio_mut().link_mut().transport_mut();
    port.feed_line("OK");
    port.feed_line("+SCAN:0x01,Someone,RSSI:-40");
    svc.tick(0, &mut sink);

    assert_eq!(sink.responses(), vec!["OK"]);
    assert!(
        !sink
            .events
            .iter()
            .any(|e| matches!(e, AppEvent::ScanResult { .. }))
    );
}

#[test]
fn start_shows_advertising() {
    let mut svc = BeaconService::new(Radio::new(MockTransport::new()), &LockConfig::key_fob());
    let mut sink = PresentingSink::new(RecordingSink::new(), RecordingPresenter::default());
    svc.start(&mut sink);

    assert_eq!(sink.inner().events, vec![AppEvent::Advertising]);
    assert_eq!(
        sink.presenter().calls,
        vec![PresenterCall::Status("ADVERTISING".into(), None)]
    );
}
