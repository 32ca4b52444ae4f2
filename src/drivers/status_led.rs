//! RGB status LED driver.
//!
//! Three PWM channels drive discrete R/G/B LEDs (or a common-cathode RGB
//! LED).  Each channel is any `embedded_hal::pwm::SetDutyCycle`: LEDC
//! channels on the ESP32-S3, plain mocks on the host.
//!
//! | State    | Colour        |
//! |----------|---------------|
//! | SCAN     | dim purple    |
//! | UNLOCK   | dim green     |
//! | LOCK     | dim red       |
//! | shutdown | off           |

use embedded_hal::pwm::SetDutyCycle;
use log::{debug, warn};

use crate::app::ports::PresentationSink;
use crate::fsm::states::{COLOUR_LOCKED, COLOUR_SCANNING, COLOUR_UNLOCKED, Rgb};

pub const COLOUR_OFF: Rgb = (0, 0, 0);

pub struct StatusLed<R, G, B> {
    red: R,
    green: G,
    blue: B,
    current: Rgb,
}

impl<R, G, B> StatusLed<R, G, B>
where
    R: SetDutyCycle,
    G: SetDutyCycle,
    B: SetDutyCycle,
{
    pub fn new(red: R, green: G, blue: B) -> Self {
        Self {
            red,
            green,
            blue,
            current: COLOUR_OFF,
        }
    }

    /// Set each channel to `level / 255` of full duty.
    ///
    /// A channel that rejects the duty is logged and left as it was; the
    /// other two are still updated.
    pub fn set_colour(&mut self, (r, g, b): Rgb) {
        let results = [
            self.red.set_duty_cycle_fraction(u16::from(r), 255).is_ok(),
            self.green.set_duty_cycle_fraction(u16::from(g), 255).is_ok(),
            self.blue.set_duty_cycle_fraction(u16::from(b), 255).is_ok(),
        ];
        if results.iter().any(|ok| !ok) {
            warn!("StatusLed: duty update failed (r/g/b ok = {:?})", results);
        }
        self.current = (r, g, b);
    }

    pub fn off(&mut self) {
        self.set_colour(COLOUR_OFF);
    }

    pub fn current_colour(&self) -> Rgb {
        self.current
    }
}

impl<R, G, B> PresentationSink for StatusLed<R, G, B>
where
    R: SetDutyCycle,
    G: SetDutyCycle,
    B: SetDutyCycle,
{
    fn show_status(&mut self, label: &str, rssi: Option<i32>) {
        // No display on this board; the text only goes to the log.
        debug!("StatusLed: {} ({:?})", label, rssi);
    }

    fn set_scanning(&mut self) {
        self.set_colour(COLOUR_SCANNING);
    }

    fn set_unlocked(&mut self) {
        self.set_colour(COLOUR_UNLOCKED);
    }

    fn set_locked(&mut self) {
        self.set_colour(COLOUR_LOCKED);
    }

    fn set_off(&mut self) {
        self.off();
    }
}
