//! Debounced push button
//!
//! The debouncing itself lives in the driver; the core only sees clean
//! edges and the settled level.

/// Edge reported by a [`DebouncedButton::read`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ButtonEdge {
    /// No change since the previous read
    None,
    /// The button went down
    Pressed,
    /// The button came back up
    Released,
}

/// A button with debounced state
pub trait DebouncedButton {
    /// Sample the button and report the edge since the previous read
    fn read(&mut self) -> ButtonEdge;

    /// Settled state as of the last read
    fn is_pressed(&self) -> bool;
}
