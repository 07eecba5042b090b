//! Test doubles for embedded-hal buses and pins

use core::cell::Cell;
use core::convert::Infallible;

use embedded_hal::digital::{ErrorType as PinErrorType, InputPin};
use embedded_hal::i2c::{ErrorKind, ErrorType, I2c, Operation};
use nasmon_hal::Clock;

/// I2C bus that records every write
#[derive(Default)]
pub struct RecordingI2c {
    pub writes: Vec<(u8, Vec<u8>)>,
    pub fail: bool,
}

impl RecordingI2c {
    pub fn new() -> Self {
        Self::default()
    }

    /// Payloads written to `address`, in order
    pub fn writes_to(&self, address: u8) -> Vec<&[u8]> {
        self.writes
            .iter()
            .filter(|(a, _)| *a == address)
            .map(|(_, bytes)| bytes.as_slice())
            .collect()
    }
}

impl ErrorType for RecordingI2c {
    type Error = ErrorKind;
}

impl I2c for RecordingI2c {
    fn transaction(
        &mut self,
        address: u8,
        operations: &mut [Operation<'_>],
    ) -> Result<(), Self::Error> {
        if self.fail {
            return Err(ErrorKind::Other);
        }
        for op in operations.iter_mut() {
            match op {
                Operation::Write(bytes) => self.writes.push((address, bytes.to_vec())),
                Operation::Read(buf) => buf.fill(0),
            }
        }
        Ok(())
    }
}

/// Input pin whose level the test sets
pub struct FakePin<'a> {
    pub high: &'a Cell<bool>,
}

impl PinErrorType for FakePin<'_> {
    type Error = Infallible;
}

impl InputPin for FakePin<'_> {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        Ok(self.high.get())
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        Ok(!self.high.get())
    }
}

/// Clock the test moves by hand
pub struct FakeClock<'a> {
    pub now: &'a Cell<u32>,
}

impl Clock for FakeClock<'_> {
    fn now_ms(&self) -> u32 {
        self.now.get()
    }
}
