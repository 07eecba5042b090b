//! Output devices driven by the core

use nasmon_hal::{Bargraph, PixelDisplay};

/// The two output devices
///
/// Kept together because most commands and both interactions touch the
/// display, and some also touch the bargraph.
pub struct Devices<D, B> {
    pub display: D,
    pub bargraph: B,
}

impl<D, B> Devices<D, B>
where
    D: PixelDisplay,
    B: Bargraph,
{
    pub fn new(display: D, bargraph: B) -> Self {
        Self { display, bargraph }
    }
}
