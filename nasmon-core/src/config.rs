//! Device configuration
//!
//! [`DeviceConfig`] is fixed at build time (the firmware generates it from
//! `device.toml`). [`Settings`] is the part the host can change at runtime
//! with an `s` frame; it starts from the config defaults on every boot.

use nasmon_hal::MAX_BRIGHTNESS;

/// Default display inactivity timeout
pub const DEFAULT_DISPLAY_ON_MS: u32 = 5000;

/// Default bargraph brightness (0-15)
pub const DEFAULT_BRIGHTNESS: u8 = 10;

/// Shortest display timeout the host can set
pub const MIN_DISPLAY_ON_SECS: u8 = 1;

/// Build-time device configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DeviceConfig {
    /// Display inactivity timeout until the host sends settings (ms)
    pub display_on_ms: u32,
    /// Bargraph brightness until the host sends settings
    pub brightness: u8,
    /// Interval between progress bar steps while the trigger is held (ms)
    pub progress_step_ms: u32,
    /// Time the trigger input must be stable to count as a press (ms)
    pub debounce_ms: u32,
    /// Quiet time after which a partial frame is discarded (ms)
    pub frame_stale_ms: u32,
    /// Host link baud rate
    pub baudrate: u32,
}

impl DeviceConfig {
    pub const fn new() -> Self {
        Self {
            display_on_ms: DEFAULT_DISPLAY_ON_MS,
            brightness: DEFAULT_BRIGHTNESS,
            progress_step_ms: 20,
            debounce_ms: 100,
            frame_stale_ms: 200,
            baudrate: 115200,
        }
    }

    /// Runtime settings at power-on
    pub fn initial_settings(&self) -> Settings {
        Settings {
            display_on_ms: self.display_on_ms,
            brightness: self.brightness.min(MAX_BRIGHTNESS),
        }
    }
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Host-adjustable settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Settings {
    /// Display inactivity timeout (ms)
    pub display_on_ms: u32,
    /// Bargraph brightness (0-15)
    pub brightness: u8,
}

/// What [`Settings::apply`] had to adjust
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Clamped {
    pub display_on: bool,
    pub brightness: bool,
}

impl Clamped {
    pub fn any(&self) -> bool {
        self.display_on || self.brightness
    }
}

impl Settings {
    /// Apply values from an `s` frame
    ///
    /// The timeout byte is in seconds. Brightness is capped at the bargraph
    /// maximum and the timeout raised to [`MIN_DISPLAY_ON_SECS`].
    pub fn apply(&mut self, display_on_secs: u8, brightness: u8) -> Clamped {
        let secs = display_on_secs.max(MIN_DISPLAY_ON_SECS);
        let level = brightness.min(MAX_BRIGHTNESS);

        self.display_on_ms = u32::from(secs) * 1000;
        self.brightness = level;

        Clamped {
            display_on: secs != display_on_secs,
            brightness: level != brightness,
        }
    }
}
