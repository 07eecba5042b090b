//! Percentage to bargraph codes
//!
//! Builds the code string a host sends in a `g` frame to show a 0-100 value
//! as a level meter. Segments light from the end of the string (segment 23)
//! towards the start, each segment standing for 100/24 percent.

use crate::command::BARGRAPH_SEGMENTS;

/// Colour bands for a level meter, in percent
///
/// A lit segment whose upper edge is at or above a threshold takes that
/// band's colour; red is checked first, then yellow, then green.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Thresholds {
    pub green: u8,
    pub yellow: u8,
    pub red: u8,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            green: 0,
            yellow: 50,
            red: 75,
        }
    }
}

/// Codes for a `g` frame showing `value` percent
///
/// A segment is lit only when `value` is strictly above its upper edge, so
/// 100 lights 23 segments. Values above 100 behave like 100.
pub fn percent_to_codes(value: u8, thresholds: Thresholds) -> [u8; BARGRAPH_SEGMENTS] {
    let segments = BARGRAPH_SEGMENTS as u32;
    // Compare in units of 1/segments percent to stay in integers
    let value = u32::from(value.min(100)) * segments;
    let red = u32::from(thresholds.red) * segments;
    let yellow = u32::from(thresholds.yellow) * segments;
    let green = u32::from(thresholds.green) * segments;

    let mut codes = [b'o'; BARGRAPH_SEGMENTS];
    for (index, code) in codes.iter_mut().rev().enumerate() {
        let edge = (index as u32 + 1) * 100;
        if value <= edge {
            break;
        }
        *code = if edge >= red {
            b'r'
        } else if edge >= yellow {
            b'y'
        } else if edge >= green {
            b'g'
        } else {
            b'o'
        };
    }
    codes
}
