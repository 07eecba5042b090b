//! Main controller: the cooperative poll loop
//!
//! One [`Controller::tick`] does, in order:
//! - read whatever the host has sent into the frame assembler
//! - dispatch a complete frame, if one is pending
//! - check the display timeout and step a running fade-out
//! - read the trigger and step a running hold
//!
//! Nothing in a tick waits on time; fades and holds remember when they last
//! stepped and act once enough time has passed.

use nasmon_hal::{Bargraph, DebouncedButton, PixelDisplay, SerialLink, StatusLed};
use nasmon_protocol::{FrameAssembler, Response};

use crate::bargraph::BargraphRenderer;
use crate::config::DeviceConfig;
use crate::devices::Devices;
use crate::dispatcher::{self, FrameSlot};
use crate::error::ControllerError;
use crate::session::Session;
use crate::trigger::{Trigger, TriggerOutcome};

/// Controller state for the whole device
pub struct Controller<D, B, Btn, L, Led> {
    devices: Devices<D, B>,
    button: Btn,
    link: L,
    led: Led,
    session: Session,
    renderer: BargraphRenderer,
    trigger: Trigger,
    assembler: FrameAssembler,
    slot: FrameSlot,
}

impl<D, B, Btn, L, Led> Controller<D, B, Btn, L, Led>
where
    D: PixelDisplay,
    B: Bargraph,
    Btn: DebouncedButton,
    L: SerialLink,
    Led: StatusLed,
{
    pub fn new(
        config: &DeviceConfig,
        devices: Devices<D, B>,
        button: Btn,
        link: L,
        led: Led,
    ) -> Self {
        Self {
            devices,
            button,
            link,
            led,
            session: Session::new(config.initial_settings()),
            renderer: BargraphRenderer::new(),
            trigger: Trigger::new(config.progress_step_ms),
            assembler: FrameAssembler::new(config.frame_stale_ms),
            slot: FrameSlot::new(),
        }
    }

    /// Power-on sequence
    ///
    /// Shows the bargraph test pattern, which fades out after the normal
    /// display timeout, and tells the host the device is up.
    pub fn boot(&mut self, now_ms: u32) -> Result<(), ControllerError> {
        if let Err(_e) = self
            .devices
            .display
            .clear()
            .and_then(|()| self.devices.display.commit())
        {
            #[cfg(feature = "defmt")]
            defmt::warn!("Display init failed: {:?}", _e);
        }

        if let Err(_e) = self
            .renderer
            .show_test_pattern(&mut self.devices.bargraph, self.session.brightness())
        {
            #[cfg(feature = "defmt")]
            defmt::warn!("Bargraph test pattern failed: {:?}", _e);
        }

        self.session.mark_active(now_ms);
        self.led.set_on();

        #[cfg(feature = "defmt")]
        defmt::info!(
            "NASMon ready: timeout {}ms, brightness {}",
            self.session.display_on_ms(),
            self.session.brightness()
        );

        dispatcher::send_response(&mut self.link, Response::Booted)
    }

    /// Run one pass of the poll loop
    ///
    /// Only link failures are returned; the caller may log them and keep
    /// ticking.
    pub fn tick(&mut self, now_ms: u32) -> Result<(), ControllerError> {
        self.ingest(now_ms)?;

        dispatcher::dispatch(
            &mut self.slot,
            now_ms,
            &mut self.session,
            &mut self.renderer,
            &mut self.devices,
            &mut self.link,
        )?;

        self.check_timeout(now_ms);
        self.poll_trigger(now_ms)
    }

    /// Move available link bytes into the assembler
    ///
    /// Stops as soon as a frame completes so that it is dispatched this tick;
    /// later bytes wait in the link for the next one.
    fn ingest(&mut self, now_ms: u32) -> Result<(), ControllerError> {
        let _dropped = self.assembler.expire(now_ms);
        #[cfg(feature = "defmt")]
        {
            if _dropped > 0 {
                defmt::warn!("Discarded {} bytes of a stale partial frame", _dropped);
            }
        }

        loop {
            let available = self.link.available();
            if available == 0 {
                return Ok(());
            }

            let count = available.min(self.assembler.remaining());
            if let Err(e) = self
                .link
                .read_exact(&mut self.assembler.spare_mut()[..count])
            {
                self.assembler.reset();
                return Err(e.into());
            }

            if let Some(frame) = self.assembler.advance(count, now_ms) {
                if self.slot.load(frame) {
                    #[cfg(feature = "defmt")]
                    defmt::warn!("Undispatched frame replaced by a newer one");
                }
                return Ok(());
            }
        }
    }

    fn check_timeout(&mut self, now_ms: u32) {
        if self.session.check_timeout(now_ms) {
            #[cfg(feature = "defmt")]
            defmt::debug!("Display timed out");

            if let Err(_e) = self
                .devices
                .display
                .clear()
                .and_then(|()| self.devices.display.commit())
            {
                #[cfg(feature = "defmt")]
                defmt::warn!("Display clear failed: {:?}", _e);
            }
            self.renderer.start_fade(self.session.brightness());
        }

        if let Err(_e) = self.renderer.poll_fade(&mut self.devices.bargraph, now_ms) {
            #[cfg(feature = "defmt")]
            defmt::warn!("Bargraph fade failed: {:?}", _e);
            self.renderer.cancel_fade();
        }
    }

    fn poll_trigger(&mut self, now_ms: u32) -> Result<(), ControllerError> {
        let outcome = self.trigger.poll(
            now_ms,
            &mut self.button,
            &mut self.devices.display,
            &mut self.session,
        );

        let result = match outcome {
            Ok(TriggerOutcome::Completed) => {
                dispatcher::send_response(&mut self.link, Response::DataRequest)
            }
            Ok(_) => Ok(()),
            Err(_e) => {
                #[cfg(feature = "defmt")]
                defmt::warn!("Progress overlay failed: {:?}", _e);
                Ok(())
            }
        };

        self.led.set_state(!self.trigger.is_held());
        result
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn devices(&self) -> &Devices<D, B> {
        &self.devices
    }

    pub fn link(&self) -> &L {
        &self.link
    }

    pub fn link_mut(&mut self) -> &mut L {
        &mut self.link
    }

    pub fn button_mut(&mut self) -> &mut Btn {
        &mut self.button
    }

    pub fn led(&self) -> &Led {
        &self.led
    }

    pub fn is_fading(&self) -> bool {
        self.renderer.is_fading()
    }
}
