//! Glue between embassy peripherals and the nasmon-hal traits

use embassy_stm32::gpio::Output;
use embassy_time::Instant;
use embedded_io::{Read, ReadReady, Write};
use nasmon_hal::{Clock, LinkError, SerialLink, StatusLed};

/// Bytes pulled from the UART per refill
const RX_CHUNK: usize = 64;

/// Host link over a buffered UART
///
/// The UART only says whether data is waiting, not how much, so received
/// bytes are staged here in chunks to give `available` a real count.
pub struct UartLink<U> {
    uart: U,
    rx: [u8; RX_CHUNK],
    start: usize,
    end: usize,
}

impl<U> UartLink<U>
where
    U: Read + ReadReady + Write,
{
    pub fn new(uart: U) -> Self {
        Self {
            uart,
            rx: [0; RX_CHUNK],
            start: 0,
            end: 0,
        }
    }

    fn refill(&mut self) {
        self.start = 0;
        self.end = 0;

        if !matches!(self.uart.read_ready(), Ok(true)) {
            return;
        }

        match self.uart.read(&mut self.rx) {
            Ok(n) => self.end = n,
            Err(_e) => {
                #[cfg(feature = "defmt")]
                defmt::warn!("UART receive error: {:?}", defmt::Debug2Format(&_e));
            }
        }
    }
}

impl<U> SerialLink for UartLink<U>
where
    U: Read + ReadReady + Write,
{
    fn available(&mut self) -> usize {
        if self.start == self.end {
            self.refill();
        }
        self.end - self.start
    }

    fn read_exact(&mut self, buf: &mut [u8]) -> Result<(), LinkError> {
        let staged = &self.rx[self.start..self.end];
        if buf.len() > staged.len() {
            return Err(LinkError::Receive);
        }
        buf.copy_from_slice(&staged[..buf.len()]);
        self.start += buf.len();
        Ok(())
    }

    fn write_all(&mut self, data: &[u8]) -> Result<(), LinkError> {
        self.uart.write_all(data).map_err(|_| LinkError::Transmit)?;
        self.uart.flush().map_err(|_| LinkError::Transmit)
    }
}

/// Milliseconds since boot from the embassy time driver
#[derive(Clone, Copy)]
pub struct EmbassyClock;

impl Clock for EmbassyClock {
    fn now_ms(&self) -> u32 {
        // Wraps after ~49 days; the core only uses differences
        Instant::now().as_millis() as u32
    }
}

/// Active-high indicator LED
pub struct LedPin(pub Output<'static>);

impl StatusLed for LedPin {
    fn set_on(&mut self) {
        self.0.set_high();
    }

    fn set_off(&mut self) {
        self.0.set_low();
    }
}
