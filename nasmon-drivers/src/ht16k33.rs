//! HT16K33 bargraph driver
//!
//! Drives the Adafruit 24-segment bi-colour bargraph backpack. Each segment
//! has a red and a green LED; yellow is both. The 24 segments are spread
//! over the first three rows of the HT16K33 display RAM, red on the low
//! byte and green on the high byte of each row.

use embedded_hal::i2c::I2c;
use nasmon_hal::{Bargraph, BargraphError, LedColor, MAX_BRIGHTNESS, SEGMENT_COUNT};

/// Default HT16K33 I2C address (0x70-0x77 via solder jumpers)
pub const HT16K33_ADDR: u8 = 0x70;

/// Display RAM rows (16 bits each)
const ROWS: usize = 8;

/// HT16K33 commands
mod cmd {
    pub const OSCILLATOR_ON: u8 = 0x21;
    /// Display setup; bit 0 = display on, bits 1-2 = blink rate
    pub const DISPLAY_SETUP: u8 = 0x80;
    pub const DISPLAY_ON: u8 = 0x01;
    pub const DIMMING: u8 = 0xE0;
    pub const RAM_START: u8 = 0x00;
}

/// Row and red bit for a segment; green is 8 bits higher
fn segment_position(index: usize) -> (usize, u16) {
    let (row, bit) = if index < 12 {
        (index / 4, index % 4)
    } else {
        ((index - 12) / 4, index % 4 + 4)
    };
    (row, 1 << bit)
}

/// 24-segment bargraph on an HT16K33
pub struct Ht16k33Bargraph<I2C> {
    i2c: I2C,
    address: u8,
    rows: [u16; ROWS],
}

impl<I2C: I2c> Ht16k33Bargraph<I2C> {
    pub fn new(i2c: I2C) -> Self {
        Self::with_address(i2c, HT16K33_ADDR)
    }

    pub fn with_address(i2c: I2C, address: u8) -> Self {
        Self {
            i2c,
            address,
            rows: [0; ROWS],
        }
    }

    /// Start the oscillator and turn the display on with blinking off
    pub fn init(&mut self) -> Result<(), BargraphError> {
        self.command(cmd::OSCILLATOR_ON)?;
        self.command(cmd::DISPLAY_SETUP | cmd::DISPLAY_ON)?;
        self.command(cmd::DIMMING | MAX_BRIGHTNESS)?;
        self.rows = [0; ROWS];
        self.commit()
    }

    fn command(&mut self, cmd: u8) -> Result<(), BargraphError> {
        self.i2c
            .write(self.address, &[cmd])
            .map_err(|_| BargraphError::Communication)
    }

    /// Colour currently staged for a segment
    pub fn segment(&self, index: usize) -> LedColor {
        if index >= SEGMENT_COUNT {
            return LedColor::Off;
        }
        let (row, red) = segment_position(index);
        let green = red << 8;
        match (self.rows[row] & red != 0, self.rows[row] & green != 0) {
            (true, true) => LedColor::Yellow,
            (true, false) => LedColor::Red,
            (false, true) => LedColor::Green,
            (false, false) => LedColor::Off,
        }
    }
}

impl<I2C: I2c> Bargraph for Ht16k33Bargraph<I2C> {
    fn set_segment(&mut self, index: usize, color: LedColor) -> Result<(), BargraphError> {
        if index >= SEGMENT_COUNT {
            return Err(BargraphError::InvalidSegment);
        }

        let (row, red) = segment_position(index);
        let green = red << 8;
        let bits = match color {
            LedColor::Off => 0,
            LedColor::Red => red,
            LedColor::Yellow => red | green,
            LedColor::Green => green,
        };
        self.rows[row] = (self.rows[row] & !(red | green)) | bits;
        Ok(())
    }

    fn set_brightness(&mut self, level: u8) -> Result<(), BargraphError> {
        self.command(cmd::DIMMING | level.min(MAX_BRIGHTNESS))
    }

    fn clear(&mut self) -> Result<(), BargraphError> {
        self.rows = [0; ROWS];
        self.commit()
    }

    fn commit(&mut self) -> Result<(), BargraphError> {
        let mut data = [0u8; 1 + ROWS * 2];
        data[0] = cmd::RAM_START;
        for (chunk, row) in data[1..].chunks_exact_mut(2).zip(self.rows.iter()) {
            chunk.copy_from_slice(&row.to_le_bytes());
        }
        self.i2c
            .write(self.address, &data)
            .map_err(|_| BargraphError::Communication)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::RecordingI2c;

    fn bargraph() -> Ht16k33Bargraph<RecordingI2c> {
        Ht16k33Bargraph::new(RecordingI2c::new())
    }

    #[test]
    fn test_segment_positions() {
        assert_eq!(segment_position(0), (0, 1 << 0));
        assert_eq!(segment_position(3), (0, 1 << 3));
        assert_eq!(segment_position(4), (1, 1 << 0));
        assert_eq!(segment_position(11), (2, 1 << 3));
        assert_eq!(segment_position(12), (0, 1 << 4));
        assert_eq!(segment_position(23), (2, 1 << 7));
    }

    #[test]
    fn test_init_sequence() {
        let mut bar = bargraph();
        bar.init().unwrap();

        let writes = bar.i2c.writes_to(HT16K33_ADDR);
        assert_eq!(writes[0], &[0x21]);
        assert_eq!(writes[1], &[0x81]);
        assert_eq!(writes[2], &[0xEF]);
        assert_eq!(writes[3].len(), 17);
    }

    #[test]
    fn test_colors_map_to_red_and_green_bits() {
        let mut bar = bargraph();
        bar.set_segment(0, LedColor::Red).unwrap();
        bar.set_segment(1, LedColor::Green).unwrap();
        bar.set_segment(2, LedColor::Yellow).unwrap();
        bar.set_segment(12, LedColor::Red).unwrap();
        bar.commit().unwrap();

        let frame = bar.i2c.writes[0].1.clone();
        assert_eq!(frame[0], 0x00);
        // Row 0 low byte: red bits for 0, 2 and 12
        assert_eq!(frame[1], 0b0001_0101);
        // Row 0 high byte: green bits for 1 and 2
        assert_eq!(frame[2], 0b0000_0110);
        assert!(frame[3..].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_recolor_replaces_previous() {
        let mut bar = bargraph();
        bar.set_segment(7, LedColor::Yellow).unwrap();
        bar.set_segment(7, LedColor::Green).unwrap();
        assert_eq!(bar.segment(7), LedColor::Green);
        bar.set_segment(7, LedColor::Off).unwrap();
        assert_eq!(bar.segment(7), LedColor::Off);
    }

    #[test]
    fn test_invalid_segment() {
        let mut bar = bargraph();
        assert_eq!(
            bar.set_segment(24, LedColor::Red),
            Err(BargraphError::InvalidSegment)
        );
    }

    #[test]
    fn test_brightness_is_capped() {
        let mut bar = bargraph();
        bar.set_brightness(3).unwrap();
        bar.set_brightness(200).unwrap();
        assert_eq!(bar.i2c.writes[0].1, vec![0xE3]);
        assert_eq!(bar.i2c.writes[1].1, vec![0xEF]);
    }

    #[test]
    fn test_clear_sends_blank_frame() {
        let mut bar = bargraph();
        for i in 0..SEGMENT_COUNT {
            bar.set_segment(i, LedColor::Yellow).unwrap();
        }
        bar.clear().unwrap();

        let frame = &bar.i2c.writes[0].1;
        assert_eq!(frame.len(), 17);
        assert!(frame.iter().all(|&b| b == 0));
        assert_eq!(bar.segment(5), LedColor::Off);
    }

    #[test]
    fn test_bus_error() {
        let mut bar = bargraph();
        bar.i2c.fail = true;
        assert_eq!(bar.commit(), Err(BargraphError::Communication));
    }
}
