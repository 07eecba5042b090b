//! LED bargraph abstraction
//!
//! A 24 segment bar where each segment has a red and a green LED; both lit
//! gives yellow. Segment colours and brightness are staged and only reach
//! the LEDs on [`Bargraph::commit`].

/// Number of segments on the bar
pub const SEGMENT_COUNT: usize = 24;

/// Highest brightness step the controller supports
pub const MAX_BRIGHTNESS: u8 = 15;

/// Segment colour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LedColor {
    #[default]
    Off,
    Red,
    Yellow,
    Green,
}

/// Bargraph errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BargraphError {
    /// Communication error with the LED controller
    Communication,
    /// Segment index past the end of the bar
    InvalidSegment,
}

/// 24 segment tri-colour bargraph
pub trait Bargraph {
    /// Stage the colour of one segment (0-23)
    fn set_segment(&mut self, index: usize, color: LedColor) -> Result<(), BargraphError>;

    /// Set the global brightness (0 = dimmest lit level, 15 = brightest)
    ///
    /// Values above the device maximum are the driver's concern.
    fn set_brightness(&mut self, level: u8) -> Result<(), BargraphError>;

    /// Turn every segment off and send the blank bar to the LEDs
    fn clear(&mut self) -> Result<(), BargraphError>;

    /// Send the staged segment colours to the LEDs
    fn commit(&mut self) -> Result<(), BargraphError>;
}
