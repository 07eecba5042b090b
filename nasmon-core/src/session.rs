//! Display session
//!
//! Tracks whether the screen is showing host content, when that content was
//! last refreshed, and keeps a copy of the last successful render so the
//! screen can be put back after the progress overlay.
//!
//! Writers: the dispatcher owns settings, activity and the snapshot; the
//! timeout check only ever moves activity back to idle.

use nasmon_hal::FRAMEBUFFER_LEN;

use crate::config::{Clamped, Settings};

/// Per-power-cycle session state
#[derive(Debug, Clone)]
pub struct Session {
    settings: Settings,
    /// Time of the last display refresh, `None` once timed out
    last_activity_ms: Option<u32>,
    snapshot: [u8; FRAMEBUFFER_LEN],
    debug_mode: bool,
}

impl Session {
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            last_activity_ms: None,
            snapshot: [0; FRAMEBUFFER_LEN],
            debug_mode: false,
        }
    }

    pub fn brightness(&self) -> u8 {
        self.settings.brightness
    }

    pub fn display_on_ms(&self) -> u32 {
        self.settings.display_on_ms
    }

    /// Update settings from an `s` frame
    pub fn apply_settings(&mut self, display_on_secs: u8, brightness: u8) -> Clamped {
        self.settings.apply(display_on_secs, brightness)
    }

    /// Record a display refresh
    pub fn mark_active(&mut self, now_ms: u32) {
        self.last_activity_ms = Some(now_ms);
    }

    /// Whether the display is lit with content that has not timed out
    pub fn is_active(&self) -> bool {
        self.last_activity_ms.is_some()
    }

    /// Check the inactivity timeout
    ///
    /// Returns `true` exactly once per period of activity: the first call
    /// where more than `display_on_ms` has passed since the last refresh. The
    /// session is then idle until the next [`Self::mark_active`].
    pub fn check_timeout(&mut self, now_ms: u32) -> bool {
        let Some(since) = self.last_activity_ms else {
            return false;
        };

        if now_ms.wrapping_sub(since) > self.settings.display_on_ms {
            self.last_activity_ms = None;
            true
        } else {
            false
        }
    }

    /// Keep a copy of the display framebuffer
    pub fn save_snapshot(&mut self, buffer: &[u8]) {
        let len = buffer.len().min(FRAMEBUFFER_LEN);
        self.snapshot[..len].copy_from_slice(&buffer[..len]);
        self.snapshot[len..].fill(0);
    }

    /// The last successfully rendered framebuffer
    pub fn snapshot(&self) -> &[u8] {
        &self.snapshot
    }

    pub fn set_debug_mode(&mut self, enabled: bool) {
        self.debug_mode = enabled;
    }

    pub fn debug_mode(&self) -> bool {
        self.debug_mode
    }
}
