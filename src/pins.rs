//! GPIO / peripheral pin assignments for the ProxLock board.
//!
//! Single source of truth for the wiring.  `main` takes the typed pins
//! from `esp_idf_hal::peripherals`; keep the two in step when rewiring.

// ---------------------------------------------------------------------------
// Radio module (RYB080I, AT commands over UART1)
// ---------------------------------------------------------------------------

/// MCU TX → module RX.
pub const RADIO_UART_TX_GPIO: i32 = 4;
/// Module TX → MCU RX.
pub const RADIO_UART_RX_GPIO: i32 = 5;

// ---------------------------------------------------------------------------
// Status LED (discrete RGB, LEDC PWM)
// ---------------------------------------------------------------------------
// GPIO11-13 are free on the ESP32-S3; on the classic ESP32 they are SPI flash.

pub const LED_R_GPIO: i32 = 11;
pub const LED_G_GPIO: i32 = 12;
pub const LED_B_GPIO: i32 = 13;

/// LEDC frequency for RGB status LED (1 kHz).
pub const LED_PWM_FREQ_HZ: u32 = 1_000;
