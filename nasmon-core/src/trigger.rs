//! Hold-to-refresh trigger
//!
//! Holding the trigger fills a progress bar drawn over the current screen.
//! Holding until it is full asks the host for fresh data; letting go early
//! puts the last render back.
//!
//! ```text
//!            press                      progress == 100
//!   Idle ───────────▶ Held ─────────────────────────────▶ Completed ─┐
//!    ▲                 │                                              │
//!    │                 │ release                                      │
//!    │                 ▼                                              │
//!    └──────────── Cancelled ◀────────────────────────────────────────┘
//!                  (progress back to 0 on every exit)
//! ```

use core::fmt::Write as _;

use heapless::String;
use nasmon_hal::{ButtonEdge, DebouncedButton, DisplayError, PixelDisplay, TextStyle};

use crate::session::Session;

/// Progress added per step while held
pub const PROGRESS_STEP: u8 = 2;

/// Progress at which a hold completes
pub const PROGRESS_FULL: u8 = 100;

/// Where the progress overlay is drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ProgressBar {
    pub x: u8,
    pub y: u8,
    pub width: u8,
    pub height: u8,
}

impl ProgressBar {
    /// Right half of the screen, vertically centred
    pub const OVERLAY: Self = Self {
        x: 64,
        y: 12,
        width: 64,
        height: 16,
    };

    /// Width of the filled part for `progress` percent
    pub fn fill_width(&self, progress: u8) -> u8 {
        let progress = u32::from(progress.min(PROGRESS_FULL));
        let inner = u32::from(self.width.saturating_sub(1));
        // inner <= 254, so the result fits
        (inner * progress / 100) as u8
    }

    /// Draw the outline, the fill and the percentage label
    ///
    /// The label turns dark-on-lit once the fill has reached it.
    pub fn draw<D: PixelDisplay>(&self, display: &mut D, progress: u8) -> Result<(), DisplayError> {
        let progress = progress.min(PROGRESS_FULL);

        display.draw_rect(self.x, self.y, self.width, self.height)?;
        display.fill_rect(
            self.x + 2,
            self.y + 2,
            self.fill_width(progress),
            self.height.saturating_sub(4),
        )?;

        let mut label: String<4> = String::new();
        let _ = write!(label, "{}%", progress);
        let style = TextStyle {
            size: 1,
            inverted: progress >= 50,
        };
        display.draw_text(self.x + self.width / 2 - 6, self.y + 5, style, &label)
    }
}

/// What the trigger did this tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TriggerOutcome {
    /// Not held
    Idle,
    /// Held, progress bar at this percentage
    Animating(u8),
    /// Held to the end; the host should be asked for data
    Completed,
    /// Released early; the last render is back on screen
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
enum TriggerState {
    Idle,
    Held { last_step_ms: Option<u32> },
}

/// Trigger interaction state machine
#[derive(Debug, Clone)]
pub struct Trigger {
    state: TriggerState,
    progress: u8,
    step_ms: u32,
    bar: ProgressBar,
}

impl Trigger {
    /// A trigger that adds [`PROGRESS_STEP`] every `step_ms` while held
    pub const fn new(step_ms: u32) -> Self {
        Self {
            state: TriggerState::Idle,
            progress: 0,
            step_ms,
            bar: ProgressBar::OVERLAY,
        }
    }

    pub fn is_held(&self) -> bool {
        matches!(self.state, TriggerState::Held { .. })
    }

    pub fn progress(&self) -> u8 {
        self.progress
    }

    /// Read the button and advance the animation
    ///
    /// Must be called every tick so the button sees every edge. The first
    /// step is drawn on the tick the press is seen. Every overlay commit and
    /// the restore on release count as display activity.
    pub fn poll<Btn, D>(
        &mut self,
        now_ms: u32,
        button: &mut Btn,
        display: &mut D,
        session: &mut Session,
    ) -> Result<TriggerOutcome, DisplayError>
    where
        Btn: DebouncedButton,
        D: PixelDisplay,
    {
        let edge = button.read();

        let last_step_ms = match self.state {
            TriggerState::Idle => {
                if edge != ButtonEdge::Pressed {
                    return Ok(TriggerOutcome::Idle);
                }
                #[cfg(feature = "defmt")]
                defmt::debug!("Trigger pressed");
                self.progress = 0;
                None
            }
            TriggerState::Held { last_step_ms } => {
                if edge == ButtonEdge::Released {
                    return self
                        .cancel(now_ms, display, session)
                        .map(|()| TriggerOutcome::Cancelled);
                }
                last_step_ms
            }
        };

        if let Some(last) = last_step_ms {
            if now_ms.wrapping_sub(last) < self.step_ms {
                self.state = TriggerState::Held { last_step_ms };
                return Ok(TriggerOutcome::Animating(self.progress));
            }
        }

        self.state = TriggerState::Held {
            last_step_ms: Some(now_ms),
        };
        self.progress = self.progress.saturating_add(PROGRESS_STEP).min(PROGRESS_FULL);

        self.bar.draw(display, self.progress)?;
        display.commit()?;
        session.mark_active(now_ms);

        if self.progress >= PROGRESS_FULL {
            self.finish();
            display.clear()?;
            display.commit()?;
            #[cfg(feature = "defmt")]
            defmt::info!("Trigger completed, requesting data");
            return Ok(TriggerOutcome::Completed);
        }

        #[cfg(feature = "defmt")]
        defmt::trace!("Trigger progress {}", self.progress);
        Ok(TriggerOutcome::Animating(self.progress))
    }

    fn cancel<D: PixelDisplay>(
        &mut self,
        now_ms: u32,
        display: &mut D,
        session: &mut Session,
    ) -> Result<(), DisplayError> {
        #[cfg(feature = "defmt")]
        defmt::debug!("Trigger released at {}%", self.progress);
        self.finish();

        display.clear()?;
        display.load_buffer(session.snapshot())?;
        display.commit()?;
        session.mark_active(now_ms);
        Ok(())
    }

    fn finish(&mut self) {
        self.state = TriggerState::Idle;
        self.progress = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DeviceConfig;
    use crate::mock::{DisplayOp, MockButton, MockDisplay};

    fn session_with_snapshot(fill: u8) -> Session {
        let mut session = Session::new(DeviceConfig::default().initial_settings());
        session.save_snapshot(&[fill; nasmon_hal::FRAMEBUFFER_LEN]);
        session
    }

    fn fills(display: &MockDisplay) -> Vec<u8> {
        display
            .ops
            .iter()
            .filter_map(|op| match op {
                DisplayOp::Fill { width, .. } => Some(*width),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_fill_width() {
        let bar = ProgressBar::OVERLAY;
        assert_eq!(bar.fill_width(0), 0);
        assert_eq!(bar.fill_width(50), 31);
        assert_eq!(bar.fill_width(100), 63);
        assert_eq!(bar.fill_width(250), 63);
    }

    #[test]
    fn test_idle_without_press() {
        let mut trigger = Trigger::new(20);
        let mut button = MockButton::new();
        let mut display = MockDisplay::new();
        let mut session = session_with_snapshot(0);

        button.hold(false, 3);
        for now in 0..3 {
            let outcome = trigger.poll(now, &mut button, &mut display, &mut session).unwrap();
            assert_eq!(outcome, TriggerOutcome::Idle);
        }
        assert!(display.ops.is_empty());
    }

    #[test]
    fn test_full_hold_completes() {
        let mut trigger = Trigger::new(20);
        let mut button = MockButton::new();
        let mut display = MockDisplay::new();
        let mut session = session_with_snapshot(0x0F);

        button.hold(true, 1_000);

        let mut seen = Vec::new();
        let mut completed_at = None;
        for now in 0..2_000u32 {
            match trigger.poll(now, &mut button, &mut display, &mut session).unwrap() {
                TriggerOutcome::Animating(p) => {
                    if seen.last() != Some(&p) {
                        seen.push(p);
                    }
                }
                TriggerOutcome::Completed => {
                    completed_at = Some(now);
                    break;
                }
                other => panic!("unexpected {:?}", other),
            }
        }

        // 2, 4, .. 98 while animating; the 100 step completes
        let expected: Vec<u8> = (1..50).map(|i| i * 2).collect();
        assert_eq!(seen, expected);
        assert_eq!(completed_at, Some(49 * 20));
        assert_eq!(fills(&display).len(), 50);
        assert_eq!(*fills(&display).last().unwrap(), 63);

        assert!(display.is_blank());
        assert_eq!(display.ops[display.ops.len() - 2], DisplayOp::Clear);
        assert_eq!(display.ops[display.ops.len() - 1], DisplayOp::Commit);
        assert!(!trigger.is_held());
        assert_eq!(trigger.progress(), 0);
    }

    #[test]
    fn test_release_at_forty_restores_snapshot() {
        let mut trigger = Trigger::new(20);
        let mut button = MockButton::new();
        let mut display = MockDisplay::new();
        let mut session = session_with_snapshot(0x5A);

        // One read per 20 ms tick: 20 steps reach 40
        button.hold(true, 20);
        button.hold(false, 1);

        let mut now = 0;
        for _ in 0..20 {
            trigger.poll(now, &mut button, &mut display, &mut session).unwrap();
            now += 20;
        }
        assert_eq!(trigger.progress(), 40);

        let outcome = trigger.poll(now, &mut button, &mut display, &mut session).unwrap();
        assert_eq!(outcome, TriggerOutcome::Cancelled);
        assert!(display.ops.contains(&DisplayOp::Load));
        assert_eq!(display.buffer(), session.snapshot());
        assert_eq!(display.ops.last(), Some(&DisplayOp::Commit));
        assert_eq!(trigger.progress(), 0);
        assert!(!trigger.is_held());
    }

    #[test]
    fn test_overlay_and_restore_count_as_activity() {
        let mut trigger = Trigger::new(20);
        let mut button = MockButton::new();
        let mut display = MockDisplay::new();
        let mut session = session_with_snapshot(0x33);
        assert!(!session.is_active());

        button.hold(true, 1);
        button.hold(false, 1);

        trigger.poll(7_000, &mut button, &mut display, &mut session).unwrap();
        assert!(session.is_active());
        assert!(!session.check_timeout(7_000 + 5_000));

        let outcome = trigger.poll(7_010, &mut button, &mut display, &mut session).unwrap();
        assert_eq!(outcome, TriggerOutcome::Cancelled);
        assert!(!session.check_timeout(7_010 + 5_000));
        assert!(session.check_timeout(7_010 + 5_001));
    }

    #[test]
    fn test_label_inverts_from_half() {
        let mut display = MockDisplay::new();
        let bar = ProgressBar::OVERLAY;

        bar.draw(&mut display, 48).unwrap();
        bar.draw(&mut display, 50).unwrap();

        let styles: Vec<(std::string::String, bool)> = display
            .ops
            .iter()
            .filter_map(|op| match op {
                DisplayOp::Text { text, style, .. } => Some((text.clone(), style.inverted)),
                _ => None,
            })
            .collect();
        assert_eq!(styles, vec![("48%".into(), false), ("50%".into(), true)]);
    }

    #[test]
    fn test_steps_wait_for_interval() {
        let mut trigger = Trigger::new(20);
        let mut button = MockButton::new();
        let mut display = MockDisplay::new();
        let mut session = session_with_snapshot(0);

        button.hold(true, 100);
        assert_eq!(
            trigger.poll(0, &mut button, &mut display, &mut session).unwrap(),
            TriggerOutcome::Animating(2)
        );
        assert_eq!(
            trigger.poll(19, &mut button, &mut display, &mut session).unwrap(),
            TriggerOutcome::Animating(2)
        );
        assert_eq!(
            trigger.poll(20, &mut button, &mut display, &mut session).unwrap(),
            TriggerOutcome::Animating(4)
        );
        assert_eq!(display.commits(), 2);
    }
}
