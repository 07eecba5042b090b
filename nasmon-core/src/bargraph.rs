//! Bargraph renderer
//!
//! Two independent jobs on the same device: showing the colour codes from a
//! `g` frame, and fading the bar out when the display times out. The fade is
//! a state machine stepped from the poll loop, one brightness level every
//! [`FADE_STEP_MS`].

use nasmon_hal::{Bargraph, BargraphError, LedColor, SEGMENT_COUNT};

/// Time between fade-out brightness steps
pub const FADE_STEP_MS: u32 = 50;

/// Colour for a segment code from a `g` frame
///
/// Anything other than `r`, `y` or `g` (including `o`) turns the segment off.
pub fn color_for_code(code: u8) -> LedColor {
    match code {
        b'r' => LedColor::Red,
        b'y' => LedColor::Yellow,
        b'g' => LedColor::Green,
        _ => LedColor::Off,
    }
}

/// Colour of segment `index` in the power-on test pattern
pub fn test_pattern_color(index: usize) -> LedColor {
    match index % 3 {
        0 => LedColor::Red,
        1 => LedColor::Yellow,
        _ => LedColor::Green,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
enum FadeState {
    Idle,
    Fading {
        /// Brightness to show on the next step; 0 means clear
        level: u8,
        last_step_ms: Option<u32>,
    },
}

/// Drives the bargraph on behalf of the dispatcher and the poll loop
#[derive(Debug, Clone)]
pub struct BargraphRenderer {
    fade: FadeState,
}

impl Default for BargraphRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl BargraphRenderer {
    pub const fn new() -> Self {
        Self {
            fade: FadeState::Idle,
        }
    }

    /// Show a full set of segment codes
    ///
    /// All 24 segments are staged first and the bar is committed once, at
    /// `brightness`. Codes past the 24th are ignored; missing codes turn
    /// their segment off. Any fade in progress is abandoned.
    pub fn apply_codes<B: Bargraph>(
        &mut self,
        bargraph: &mut B,
        codes: &[u8],
        brightness: u8,
    ) -> Result<(), BargraphError> {
        self.cancel_fade();

        for index in 0..SEGMENT_COUNT {
            let code = codes.get(index).copied().unwrap_or(0);
            bargraph.set_segment(index, color_for_code(code))?;
        }

        bargraph.set_brightness(brightness)?;
        bargraph.commit()
    }

    /// Show the red/yellow/green power-on pattern
    pub fn show_test_pattern<B: Bargraph>(
        &mut self,
        bargraph: &mut B,
        brightness: u8,
    ) -> Result<(), BargraphError> {
        self.cancel_fade();

        for index in 0..SEGMENT_COUNT {
            bargraph.set_segment(index, test_pattern_color(index))?;
        }

        bargraph.set_brightness(brightness)?;
        bargraph.commit()
    }

    /// Blank the bar, abandoning any fade
    pub fn clear<B: Bargraph>(&mut self, bargraph: &mut B) -> Result<(), BargraphError> {
        self.cancel_fade();
        bargraph.clear()
    }

    /// Begin fading out from `brightness`
    ///
    /// The first step happens on the next [`Self::poll_fade`].
    pub fn start_fade(&mut self, brightness: u8) {
        self.fade = FadeState::Fading {
            level: brightness,
            last_step_ms: None,
        };
    }

    pub fn cancel_fade(&mut self) {
        self.fade = FadeState::Idle;
    }

    pub fn is_fading(&self) -> bool {
        matches!(self.fade, FadeState::Fading { .. })
    }

    /// Advance a fade in progress
    ///
    /// Each step sets the brightness one lower and commits. After the step at
    /// level 1 and one more interval, the bar is cleared and the fade ends.
    pub fn poll_fade<B: Bargraph>(
        &mut self,
        bargraph: &mut B,
        now_ms: u32,
    ) -> Result<(), BargraphError> {
        let FadeState::Fading {
            level,
            last_step_ms,
        } = self.fade
        else {
            return Ok(());
        };

        if let Some(last) = last_step_ms {
            if now_ms.wrapping_sub(last) < FADE_STEP_MS {
                return Ok(());
            }
        }

        if level == 0 {
            self.fade = FadeState::Idle;
            return bargraph.clear();
        }

        self.fade = FadeState::Fading {
            level: level - 1,
            last_step_ms: Some(now_ms),
        };
        bargraph.set_brightness(level)?;
        bargraph.commit()
    }
}
