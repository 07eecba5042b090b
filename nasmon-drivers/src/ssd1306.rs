//! SSD1306 OLED Display Driver
//!
//! Driver for 128x32 SSD1306-based OLED displays via I2C. Drawing happens in
//! a local framebuffer laid out the way the controller stores it (4 pages of
//! 128 columns, one byte per 8 vertical pixels); `commit` sends the whole
//! buffer in horizontal addressing mode.

use embedded_graphics::mono_font::ascii::FONT_6X10;
use embedded_graphics::mono_font::MonoTextStyleBuilder;
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{PrimitiveStyle, Rectangle};
use embedded_graphics::text::{Baseline, Text};
use embedded_hal::i2c::I2c;
use nasmon_hal::{DisplayError, PixelDisplay, TextStyle, FRAMEBUFFER_LEN};

/// SSD1306 I2C address (0x3C, or 0x3D with SA0 high)
pub const SSD1306_ADDR: u8 = 0x3C;

/// Display dimensions
const WIDTH: usize = nasmon_hal::SCREEN_WIDTH as usize;
const HEIGHT: usize = nasmon_hal::SCREEN_HEIGHT as usize;
const PAGES: usize = HEIGHT / 8;

/// Control byte prefixes
const CONTROL_COMMAND: u8 = 0x00;
const CONTROL_DATA: u8 = 0x40;

/// SSD1306 commands
mod cmd {
    pub const DISPLAY_OFF: u8 = 0xAE;
    pub const DISPLAY_ON: u8 = 0xAF;
    pub const SET_CONTRAST: u8 = 0x81;
    pub const RESUME_RAM: u8 = 0xA4;
    pub const SET_NORMAL: u8 = 0xA6;
    pub const DEACTIVATE_SCROLL: u8 = 0x2E;
    pub const SET_DISPLAY_OFFSET: u8 = 0xD3;
    pub const SET_COM_PINS: u8 = 0xDA;
    pub const SET_VCOM_DETECT: u8 = 0xDB;
    pub const SET_CLOCK_DIV: u8 = 0xD5;
    pub const SET_PRECHARGE: u8 = 0xD9;
    pub const SET_MUX_RATIO: u8 = 0xA8;
    pub const SET_START_LINE: u8 = 0x40;
    pub const SET_MEMORY_MODE: u8 = 0x20;
    pub const SET_COLUMN_ADDR: u8 = 0x21;
    pub const SET_PAGE_ADDR: u8 = 0x22;
    pub const SET_SEG_REMAP: u8 = 0xA1;
    pub const SET_COM_SCAN_DEC: u8 = 0xC8;
    pub const SET_CHARGE_PUMP: u8 = 0x8D;
}

/// SSD1306 OLED driver
pub struct Ssd1306<I2C> {
    i2c: I2C,
    address: u8,
    /// Frame buffer (1 bit per pixel, organized as pages)
    buffer: [u8; FRAMEBUFFER_LEN],
    initialized: bool,
}

impl<I2C: I2c> Ssd1306<I2C> {
    /// Create a driver for a display at the default address
    pub fn new(i2c: I2C) -> Self {
        Self::with_address(i2c, SSD1306_ADDR)
    }

    pub fn with_address(i2c: I2C, address: u8) -> Self {
        Self {
            i2c,
            address,
            buffer: [0; FRAMEBUFFER_LEN],
            initialized: false,
        }
    }

    /// Initialize the display
    ///
    /// Powers the panel up with the internal charge pump and blank contents.
    pub fn init(&mut self) -> Result<(), DisplayError> {
        let init_cmds: &[u8] = &[
            cmd::DISPLAY_OFF,
            cmd::SET_CLOCK_DIV,
            0x80, // Default clock
            cmd::SET_MUX_RATIO,
            (HEIGHT - 1) as u8,
            cmd::SET_DISPLAY_OFFSET,
            0x00,
            cmd::SET_START_LINE,
            cmd::SET_CHARGE_PUMP,
            0x14, // Enable charge pump
            cmd::SET_MEMORY_MODE,
            0x00, // Horizontal addressing
            cmd::SET_SEG_REMAP,
            cmd::SET_COM_SCAN_DEC,
            cmd::SET_COM_PINS,
            0x02, // Sequential COM for 32 rows
            cmd::SET_CONTRAST,
            0x8F,
            cmd::SET_PRECHARGE,
            0xF1,
            cmd::SET_VCOM_DETECT,
            0x40,
            cmd::RESUME_RAM,
            cmd::SET_NORMAL,
            cmd::DEACTIVATE_SCROLL,
            cmd::DISPLAY_ON,
        ];

        for &c in init_cmds {
            self.command(c)?;
        }

        self.initialized = true;
        self.buffer.fill(0);
        self.commit()
    }

    /// Send a command to the display
    fn command(&mut self, cmd: u8) -> Result<(), DisplayError> {
        self.i2c
            .write(self.address, &[CONTROL_COMMAND, cmd])
            .map_err(|_| DisplayError::Communication)
    }

    fn set_pixel(&mut self, x: i32, y: i32, on: bool) {
        if x < 0 || y < 0 || x >= WIDTH as i32 || y >= HEIGHT as i32 {
            return;
        }
        let (x, y) = (x as usize, y as usize);
        let index = (y / 8) * WIDTH + x;
        let mask = 1u8 << (y % 8);
        if on {
            self.buffer[index] |= mask;
        } else {
            self.buffer[index] &= !mask;
        }
    }

    /// Whether the pixel at (x, y) is lit in the framebuffer
    pub fn pixel(&self, x: u8, y: u8) -> bool {
        let (x, y) = (usize::from(x), usize::from(y));
        if x >= WIDTH || y >= HEIGHT {
            return false;
        }
        self.buffer[(y / 8) * WIDTH + x] & (1 << (y % 8)) != 0
    }
}

/// Draw target that blows every pixel up to a `scale` x `scale` block
///
/// Text is drawn with one 6x10 font; larger text sizes are this font
/// magnified, so every size the host asks for renders distinctly.
struct Scaled<'a, I2C> {
    display: &'a mut Ssd1306<I2C>,
    origin: Point,
    scale: i32,
}

impl<I2C> OriginDimensions for Scaled<'_, I2C> {
    fn size(&self) -> Size {
        let scale = self.scale as u32;
        Size::new((WIDTH as u32).div_ceil(scale), (HEIGHT as u32).div_ceil(scale))
    }
}

impl<I2C: I2c> DrawTarget for Scaled<'_, I2C> {
    type Color = BinaryColor;
    type Error = core::convert::Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(p, color) in pixels {
            let x = self.origin.x + p.x * self.scale;
            let y = self.origin.y + p.y * self.scale;
            for dy in 0..self.scale {
                for dx in 0..self.scale {
                    self.display.set_pixel(x + dx, y + dy, color.is_on());
                }
            }
        }
        Ok(())
    }
}

fn point(x: u8, y: u8) -> Point {
    Point::new(i32::from(x), i32::from(y))
}

impl<I2C> OriginDimensions for Ssd1306<I2C> {
    fn size(&self) -> Size {
        Size::new(WIDTH as u32, HEIGHT as u32)
    }
}

impl<I2C: I2c> DrawTarget for Ssd1306<I2C> {
    type Color = BinaryColor;
    type Error = core::convert::Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(p, color) in pixels {
            self.set_pixel(p.x, p.y, color.is_on());
        }
        Ok(())
    }
}

impl<I2C: I2c> PixelDisplay for Ssd1306<I2C> {
    fn clear(&mut self) -> Result<(), DisplayError> {
        self.buffer.fill(0);
        Ok(())
    }

    fn draw_bitmap(
        &mut self,
        x: u8,
        y: u8,
        width: u8,
        height: u8,
        data: &[u8],
    ) -> Result<(), DisplayError> {
        let row_bytes = usize::from(width).div_ceil(8);

        for row in 0..usize::from(height) {
            for col in 0..usize::from(width) {
                let Some(byte) = data.get(row * row_bytes + col / 8) else {
                    // Bitmap shorter than width x height; draw what there is
                    return Ok(());
                };
                if byte & (0x80 >> (col % 8)) != 0 {
                    self.set_pixel(
                        i32::from(x) + col as i32,
                        i32::from(y) + row as i32,
                        true,
                    );
                }
            }
        }
        Ok(())
    }

    fn draw_text(
        &mut self,
        x: u8,
        y: u8,
        style: TextStyle,
        text: &str,
    ) -> Result<(), DisplayError> {
        let builder = MonoTextStyleBuilder::new().font(&FONT_6X10);
        let character_style = if style.inverted {
            builder
                .text_color(BinaryColor::Off)
                .background_color(BinaryColor::On)
                .build()
        } else {
            builder.text_color(BinaryColor::On).build()
        };

        let mut target = Scaled {
            display: self,
            origin: point(x, y),
            scale: i32::from(style.size.max(1)),
        };
        let _ = Text::with_baseline(text, Point::zero(), character_style, Baseline::Top)
            .draw(&mut target);
        Ok(())
    }

    fn draw_rect(&mut self, x: u8, y: u8, width: u8, height: u8) -> Result<(), DisplayError> {
        let _ = Rectangle::new(point(x, y), Size::new(width.into(), height.into()))
            .into_styled(PrimitiveStyle::with_stroke(BinaryColor::On, 1))
            .draw(self);
        Ok(())
    }

    fn fill_rect(&mut self, x: u8, y: u8, width: u8, height: u8) -> Result<(), DisplayError> {
        let _ = Rectangle::new(point(x, y), Size::new(width.into(), height.into()))
            .into_styled(PrimitiveStyle::with_fill(BinaryColor::On))
            .draw(self);
        Ok(())
    }

    fn commit(&mut self) -> Result<(), DisplayError> {
        if !self.initialized {
            return Err(DisplayError::NotInitialized);
        }

        for c in [
            cmd::SET_COLUMN_ADDR,
            0,
            (WIDTH - 1) as u8,
            cmd::SET_PAGE_ADDR,
            0,
            (PAGES - 1) as u8,
        ] {
            self.command(c)?;
        }

        for page in 0..PAGES {
            let mut data = [0u8; WIDTH + 1];
            data[0] = CONTROL_DATA;
            data[1..].copy_from_slice(&self.buffer[page * WIDTH..(page + 1) * WIDTH]);
            self.i2c
                .write(self.address, &data)
                .map_err(|_| DisplayError::Communication)?;
        }

        Ok(())
    }

    fn buffer(&self) -> &[u8] {
        &self.buffer
    }

    fn load_buffer(&mut self, buffer: &[u8]) -> Result<(), DisplayError> {
        if buffer.len() != FRAMEBUFFER_LEN {
            return Err(DisplayError::BufferSize);
        }
        self.buffer.copy_from_slice(buffer);
        Ok(())
    }
}
