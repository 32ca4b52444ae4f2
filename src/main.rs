//! ProxLock Firmware: Main Entry Point
//!
//! One image, two roles: the stationary lock (scan, track, decide) and
//! the portable key fob (advertise).
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  UartTransport   LogEventSink   PresentingSink   Esp32Time     │
//! │  (Transport)     (EventSink)    (EventSink)      (Clock)       │
//! │                                 StatusLed (PresentationSink)   │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │   ProximityService / BeaconService (pure logic)        │    │
//! │  │   Radio · Tracker · Scheduler · FSM                    │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! └────────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use anyhow::Result;
use embedded_hal::delay::DelayNs;
use esp_idf_hal::ledc::config::TimerConfig;
use esp_idf_hal::ledc::{LedcDriver, LedcTimerDriver, Resolution};
use esp_idf_hal::peripherals::Peripherals;
use esp_idf_hal::units::Hertz;
use esp_idf_svc::sys::EspError;
use log::{error, info, warn};

use proxlock::Error;
use proxlock::adapters::log_sink::LogEventSink;
use proxlock::adapters::presenter::PresentingSink;
use proxlock::adapters::time::Esp32TimeAdapter;
use proxlock::adapters::uart::UartTransport;
use proxlock::app::beacon::BeaconService;
use proxlock::app::ports::{Clock, PresentationSink};
use proxlock::app::service::ProximityService;
use proxlock::config::{LockConfig, Role};
use proxlock::drivers::status_led::StatusLed;
use proxlock::pins;
use proxlock::provision;
use proxlock::radio::{NullTransport, Radio, Transport};

/// Ticks between statistics log lines (20 s at the default 50 ms period).
const STATS_EVERY_TICKS: u64 = 400;

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  ProxLock v{}                        ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    // ── 2. Configuration ──────────────────────────────────────
    let config = load_config();
    config.validate().map_err(Error::from)?;
    info!(
        "Role: {:?}, threshold {} dBm, stale after {}ms",
        config.role, config.threshold_dbm, config.staleness_timeout_ms
    );

    let peripherals = Peripherals::take()?;
    let mut clock = Esp32TimeAdapter::new();

    // ── 3. Status LED ─────────────────────────────────────────
    let timer = init_step(
        "LEDC timer",
        LedcTimerDriver::new(
            peripherals.ledc.timer0,
            &TimerConfig::new()
                .frequency(Hertz(pins::LED_PWM_FREQ_HZ))
                .resolution(Resolution::Bits8),
        ),
    )?;
    let mut led = StatusLed::new(
        init_step(
            "LED red channel",
            LedcDriver::new(peripherals.ledc.channel0, &timer, peripherals.pins.gpio11),
        )?,
        init_step(
            "LED green channel",
            LedcDriver::new(peripherals.ledc.channel1, &timer, peripherals.pins.gpio12),
        )?,
        init_step(
            "LED blue channel",
            LedcDriver::new(peripherals.ledc.channel2, &timer, peripherals.pins.gpio13),
        )?,
    );
    led.set_off();

    // ── 4. Radio link ─────────────────────────────────────────
    // A dead UART is not fatal: the loop keeps running (and the LED keeps
    // showing SCAN) so the fault is visible on the bench.
    match UartTransport::new(
        peripherals.uart1,
        peripherals.pins.gpio4,
        peripherals.pins.gpio5,
        config.uart_baud,
    ) {
        Ok(uart) => run(uart, &config, &mut clock, led),
        Err(e) => {
            warn!("UART init failed ({}), running without a radio", e);
            run(NullTransport, &config, &mut clock, led)
        }
    }
}

/// Log a failed peripheral bring-up and map it to [`Error::Init`].
fn init_step<T>(
    what: &'static str,
    result: core::result::Result<T, EspError>,
) -> proxlock::Result<T> {
    result.map_err(|e| {
        error!("{} init failed: {}", what, e);
        Error::Init(what)
    })
}

/// Defaults, optionally overridden by a JSON document baked in at build
/// time through `PROXLOCK_CONFIG_JSON`.
fn load_config() -> LockConfig {
    match option_env!("PROXLOCK_CONFIG_JSON") {
        Some(json) => LockConfig::from_json(json).unwrap_or_else(|e| {
            warn!("Baked-in config rejected ({}), using defaults", e);
            LockConfig::default()
        }),
        None => LockConfig::default(),
    }
}

// ── Control loop ──────────────────────────────────────────────

fn run<T: Transport, P: PresentationSink>(
    transport: T,
    config: &LockConfig,
    clock: &mut Esp32TimeAdapter,
    presenter: P,
) -> ! {
    let mut radio = Radio::new(transport);

    if config.provision_on_boot {
        let steps = provision::profile_for(config);
        let report = provision::run_profile(&mut radio, clock, &steps, config);
        if !report.is_clean() {
            warn!("Provisioning incomplete: {:?}", report);
        }
    }

    let mut sink = PresentingSink::new(LogEventSink::new(), presenter);
    let period = config.control_loop_interval_ms;
    info!("System ready. Entering control loop ({}ms).", period);

    match config.role {
        Role::Receiver => {
            let mut svc = ProximityService::new(radio, config);
            svc.start(&mut sink);
            loop {
                svc.tick(clock.now_ms(), &mut sink);
                if svc.tick_count() % STATS_EVERY_TICKS == 0 {
                    let stats = svc.stats();
                    info!(
                        "STATS | state={} scans={} sightings={} rejected={} rssi={}dBm",
                        svc.state().label(),
                        stats.scans,
                        stats.sightings,
                        stats.rejected_rssi,
                        svc.tracker().current()
                    );
                }
                clock.delay_ms(period);
            }
        }
        Role::Transmitter => {
            let mut svc = BeaconService::new(radio, config);
            svc.start(&mut sink);
            loop {
                svc.tick(clock.now_ms(), &mut sink);
                clock.delay_ms(period);
            }
        }
    }
}
