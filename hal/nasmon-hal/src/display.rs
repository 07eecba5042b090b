//! Pixel display abstraction
//!
//! A small monochrome display with an in-memory framebuffer. Drawing calls
//! only touch the framebuffer; [`PixelDisplay::commit`] sends it to the
//! panel.

/// Display width in pixels
pub const SCREEN_WIDTH: u8 = 128;

/// Display height in pixels
pub const SCREEN_HEIGHT: u8 = 32;

/// Framebuffer size in bytes (1 bit per pixel)
pub const FRAMEBUFFER_LEN: usize = SCREEN_WIDTH as usize * SCREEN_HEIGHT as usize / 8;

/// Display errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DisplayError {
    /// Communication error with display
    Communication,
    /// Display not initialized
    NotInitialized,
    /// Buffer passed in has the wrong length
    BufferSize,
}

/// Text drawing parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TextStyle {
    /// Integer scale factor (1 = smallest font)
    pub size: u8,
    /// Draw dark text on a lit background
    pub inverted: bool,
}

impl TextStyle {
    /// Lit text at the given scale
    pub const fn scale(size: u8) -> Self {
        Self {
            size,
            inverted: false,
        }
    }
}

impl Default for TextStyle {
    fn default() -> Self {
        Self::scale(1)
    }
}

/// Monochrome framebuffer display
pub trait PixelDisplay {
    /// Blank the framebuffer
    fn clear(&mut self) -> Result<(), DisplayError>;

    /// Draw a 1bpp bitmap with its top-left corner at (x, y)
    ///
    /// `data` is row-major, most significant bit first, each row padded to a
    /// whole byte. Set bits are lit; clear bits leave the framebuffer alone.
    fn draw_bitmap(
        &mut self,
        x: u8,
        y: u8,
        width: u8,
        height: u8,
        data: &[u8],
    ) -> Result<(), DisplayError>;

    /// Draw text with the cursor starting at (x, y)
    ///
    /// `\n` moves the cursor to the start of the next text line.
    fn draw_text(&mut self, x: u8, y: u8, style: TextStyle, text: &str)
        -> Result<(), DisplayError>;

    /// Draw a one pixel rectangle outline
    fn draw_rect(&mut self, x: u8, y: u8, width: u8, height: u8) -> Result<(), DisplayError>;

    /// Fill a rectangle with lit pixels
    fn fill_rect(&mut self, x: u8, y: u8, width: u8, height: u8) -> Result<(), DisplayError>;

    /// Send the framebuffer to the panel
    fn commit(&mut self) -> Result<(), DisplayError>;

    /// Current framebuffer contents, `FRAMEBUFFER_LEN` bytes
    fn buffer(&self) -> &[u8];

    /// Replace the framebuffer with a copy previously taken from [`Self::buffer`]
    fn load_buffer(&mut self, buffer: &[u8]) -> Result<(), DisplayError>;
}
