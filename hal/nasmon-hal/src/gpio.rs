//! GPIO pin abstractions
//!
//! Only the board's indicator LED is driven through this layer; everything
//! else on GPIO belongs to a driver.

/// Single indicator LED
///
/// Implementations handle pin polarity, so `set_on` always means lit.
pub trait StatusLed {
    /// Light the LED
    fn set_on(&mut self);

    /// Turn the LED off
    fn set_off(&mut self);

    /// Set the LED to a specific state
    fn set_state(&mut self, on: bool) {
        if on {
            self.set_on();
        } else {
            self.set_off();
        }
    }
}
