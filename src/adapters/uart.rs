//! UART transport to the RYB080I radio module (ESP-IDF only).
//!
//! 9600 baud 8N1 on [`pins::RADIO_UART_TX_GPIO`] / [`pins::RADIO_UART_RX_GPIO`].
//! Reads use a zero-tick timeout so [`Transport::read`] never blocks the
//! control loop.

use esp_idf_hal::delay::NON_BLOCK;
use esp_idf_hal::gpio::{AnyIOPin, InputPin, OutputPin};
use esp_idf_hal::peripheral::Peripheral;
use esp_idf_hal::uart::{self, Uart, UartDriver};
use esp_idf_hal::units::Hertz;
use esp_idf_svc::sys::EspError;
use log::info;

use crate::pins;
use crate::radio::Transport;

pub struct UartTransport<'d> {
    driver: UartDriver<'d>,
}

impl<'d> UartTransport<'d> {
    pub fn new<U: Uart>(
        uart: impl Peripheral<P = U> + 'd,
        tx: impl Peripheral<P = impl OutputPin> + 'd,
        rx: impl Peripheral<P = impl InputPin> + 'd,
        baud: u32,
    ) -> Result<Self, EspError> {
        let config = uart::config::Config::default().baudrate(Hertz(baud));
        let driver = UartDriver::new(
            uart,
            tx,
            rx,
            Option::<AnyIOPin>::None,
            Option::<AnyIOPin>::None,
            &config,
        )?;
        info!(
            "UART: radio link up ({} baud, tx=GPIO{} rx=GPIO{})",
            baud,
            pins::RADIO_UART_TX_GPIO,
            pins::RADIO_UART_RX_GPIO
        );
        Ok(Self { driver })
    }
}

impl Transport for UartTransport<'_> {
    type Error = EspError;

    fn read(&mut self, buf: &mut [u8]) -> Result<usize, EspError> {
        self.driver.read(buf, NON_BLOCK)
    }

    fn write(&mut self, data: &[u8]) -> Result<usize, EspError> {
        self.driver.write(data)
    }

    // Writes land in the driver's TX ring buffer; waiting for the line to
    // drain at 9600 baud would stall the loop.
    fn flush(&mut self) -> Result<(), EspError> {
        Ok(())
    }
}
