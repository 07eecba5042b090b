//! Push button debouncer
//!
//! Samples an input pin on every read. After the settled state changes, new
//! samples are ignored until the debounce time has passed, so contact bounce
//! right after an edge cannot produce a second edge.

use embedded_hal::digital::InputPin;
use nasmon_hal::{ButtonEdge, Clock, DebouncedButton};

/// Debounced button on a GPIO input
pub struct Debouncer<P, C> {
    pin: P,
    clock: C,
    debounce_ms: u32,
    /// Pressed reads low (pull-up wiring)
    active_low: bool,
    pressed: bool,
    last_change_ms: u32,
}

impl<P: InputPin, C: Clock> Debouncer<P, C> {
    /// Create a debouncer; the current pin level is taken as settled
    pub fn new(mut pin: P, clock: C, debounce_ms: u32, active_low: bool) -> Self {
        let pressed = sample(&mut pin, active_low).unwrap_or(false);
        let last_change_ms = clock.now_ms();
        Self {
            pin,
            clock,
            debounce_ms,
            active_low,
            pressed,
            last_change_ms,
        }
    }
}

fn sample<P: InputPin>(pin: &mut P, active_low: bool) -> Option<bool> {
    pin.is_high().ok().map(|high| high != active_low)
}

impl<P: InputPin, C: Clock> DebouncedButton for Debouncer<P, C> {
    fn read(&mut self) -> ButtonEdge {
        let now = self.clock.now_ms();
        if now.wrapping_sub(self.last_change_ms) < self.debounce_ms {
            return ButtonEdge::None;
        }

        let Some(level) = sample(&mut self.pin, self.active_low) else {
            #[cfg(feature = "defmt")]
            defmt::warn!("Trigger pin read failed");
            return ButtonEdge::None;
        };

        if level == self.pressed {
            return ButtonEdge::None;
        }

        self.pressed = level;
        self.last_change_ms = now;
        if level {
            ButtonEdge::Pressed
        } else {
            ButtonEdge::Released
        }
    }

    fn is_pressed(&self) -> bool {
        self.pressed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{FakeClock, FakePin};
    use core::cell::Cell;

    #[test]
    fn test_press_and_release_edges() {
        let high = Cell::new(true);
        let now = Cell::new(0);
        let mut button = Debouncer::new(FakePin { high: &high }, FakeClock { now: &now }, 100, true);
        assert!(!button.is_pressed());

        now.set(200);
        assert_eq!(button.read(), ButtonEdge::None);

        high.set(false);
        assert_eq!(button.read(), ButtonEdge::Pressed);
        assert!(button.is_pressed());
        assert_eq!(button.read(), ButtonEdge::None);

        now.set(400);
        high.set(true);
        assert_eq!(button.read(), ButtonEdge::Released);
        assert!(!button.is_pressed());
    }

    #[test]
    fn test_bounce_is_ignored() {
        let high = Cell::new(true);
        let now = Cell::new(1_000);
        let mut button = Debouncer::new(FakePin { high: &high }, FakeClock { now: &now }, 100, true);

        now.set(1_200);
        high.set(false);
        assert_eq!(button.read(), ButtonEdge::Pressed);

        // Contact bounce inside the window
        for t in [1_210, 1_230, 1_250] {
            now.set(t);
            high.set(!high.get());
            assert_eq!(button.read(), ButtonEdge::None);
        }

        // Settled low after the window: still pressed, no new edge
        now.set(1_300);
        high.set(false);
        assert_eq!(button.read(), ButtonEdge::None);
        assert!(button.is_pressed());
    }

    #[test]
    fn test_active_high_wiring() {
        let high = Cell::new(false);
        let now = Cell::new(0);
        let mut button = Debouncer::new(FakePin { high: &high }, FakeClock { now: &now }, 10, false);

        now.set(50);
        high.set(true);
        assert_eq!(button.read(), ButtonEdge::Pressed);
    }

    #[test]
    fn test_window_across_counter_wrap() {
        let high = Cell::new(true);
        let now = Cell::new(u32::MAX - 500);
        let mut button = Debouncer::new(FakePin { high: &high }, FakeClock { now: &now }, 100, true);

        now.set(u32::MAX - 20);
        high.set(false);
        assert_eq!(button.read(), ButtonEdge::Pressed);

        now.set(50); // 71 ms later
        high.set(true);
        assert_eq!(button.read(), ButtonEdge::None);

        now.set(80); // 101 ms later
        assert_eq!(button.read(), ButtonEdge::Released);
    }
}
