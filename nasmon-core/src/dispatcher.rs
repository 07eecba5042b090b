//! Command dispatcher
//!
//! Turns one pending frame into device actions and exactly one reply token.
//! Whatever the command does, afterwards the frame slot is empty and zeroed,
//! and the session snapshot holds the framebuffer if (and only if) the
//! command finished a successful render.

use core::fmt::Write as _;

use heapless::String;
use nasmon_hal::{Bargraph, PixelDisplay, SerialLink, TextStyle};
use nasmon_protocol::{text_str, Command, RawFrame, Response};

use crate::bargraph::BargraphRenderer;
use crate::devices::Devices;
use crate::error::{ControllerError, DeviceError};
use crate::session::Session;

/// Banner shown by `d`
pub const DEBUG_BANNER: &str = "DEBUG!";

/// Banner shown by `p`
pub const PING_BANNER: &str = "ping";

/// Banner shown by `s`
pub const SETTINGS_BANNER: &str = "settings";

/// The single frame waiting to be dispatched
///
/// A newer frame replaces an undispatched one; there is no queue.
#[derive(Debug, Clone, Default)]
pub struct FrameSlot {
    frame: RawFrame,
    pending: bool,
}

impl FrameSlot {
    pub const fn new() -> Self {
        Self {
            frame: RawFrame::zeroed(),
            pending: false,
        }
    }

    /// Store a complete frame; returns `true` if it replaced a pending one
    pub fn load(&mut self, frame: &RawFrame) -> bool {
        let replaced = self.pending;
        self.frame.clone_from(frame);
        self.pending = true;
        replaced
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    pub fn frame(&self) -> &RawFrame {
        &self.frame
    }

    /// Drop the pending flag and zero the frame
    pub fn clear(&mut self) {
        self.pending = false;
        self.frame.clear();
    }
}

/// Result of executing one command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Outcome {
    /// Token to send to the host
    pub response: Response,
    /// The display now shows this command's successful render
    pub rendered: bool,
}

/// Dispatch the pending frame, if any
///
/// Returns the token sent, or `None` when nothing was pending. The slot is
/// cleared before the token is written, so a link failure never leaves the
/// same frame to be dispatched twice.
pub fn dispatch<D, B, L>(
    slot: &mut FrameSlot,
    now_ms: u32,
    session: &mut Session,
    renderer: &mut BargraphRenderer,
    devices: &mut Devices<D, B>,
    link: &mut L,
) -> Result<Option<Response>, ControllerError>
where
    D: PixelDisplay,
    B: Bargraph,
    L: SerialLink,
{
    if !slot.is_pending() {
        return Ok(None);
    }

    let outcome = {
        let command = slot.frame().decode();
        #[cfg(feature = "defmt")]
        {
            if session.debug_mode() {
                defmt::info!("Frame: {:?}", command);
            } else {
                defmt::debug!("Command tag {=u8:#x}", command.tag());
            }
        }
        execute(&command, now_ms, session, renderer, devices)
    };

    if outcome.rendered {
        session.save_snapshot(devices.display.buffer());
    }
    slot.clear();

    send_response(link, outcome.response)?;
    Ok(Some(outcome.response))
}

/// Write a token, with or without line ending as the protocol requires
pub fn send_response<L: SerialLink>(link: &mut L, response: Response) -> Result<(), ControllerError> {
    if response.is_line() {
        link.write_line(response.token())?;
    } else {
        link.write_all(response.token().as_bytes())?;
    }
    Ok(())
}

/// Carry out one command against the devices
///
/// Driver failures are logged and reported as "not rendered"; the command's
/// token is still returned so the host always gets its reply.
pub fn execute<D, B>(
    command: &Command<'_>,
    now_ms: u32,
    session: &mut Session,
    renderer: &mut BargraphRenderer,
    devices: &mut Devices<D, B>,
) -> Outcome
where
    D: PixelDisplay,
    B: Bargraph,
{
    let response = Response::for_command(command);

    let result = match *command {
        Command::Bitmap {
            x,
            y,
            width,
            height,
            data,
        } => show_bitmap(&mut devices.display, session, now_ms, x, y, width, height, data),
        Command::Clear => clear_all(devices, renderer),
        Command::Debug => {
            session.set_debug_mode(true);
            show_banner(&mut devices.display, session, now_ms, DEBUG_BANNER)
        }
        Command::Graph { codes } => renderer
            .apply_codes(&mut devices.bargraph, codes, session.brightness())
            .map(|()| false)
            .map_err(DeviceError::from),
        Command::Ping => show_banner(&mut devices.display, session, now_ms, PING_BANNER),
        Command::Settings {
            display_on_secs,
            brightness,
        } => apply_settings(devices, session, renderer, now_ms, display_on_secs, brightness),
        Command::Text { x, y, size, text } => {
            show_text(&mut devices.display, session, now_ms, x, y, size, text)
        }
        Command::Unrecognized(tag) => show_diagnostic(&mut devices.display, session, now_ms, tag)
            .map(|()| false),
    };

    let rendered = match result {
        Ok(rendered) => rendered,
        Err(_e) => {
            #[cfg(feature = "defmt")]
            defmt::warn!("Command {=u8:#x} failed: {:?}", command.tag(), _e);
            false
        }
    };

    Outcome { response, rendered }
}

#[allow(clippy::too_many_arguments)]
fn show_bitmap<D: PixelDisplay>(
    display: &mut D,
    session: &mut Session,
    now_ms: u32,
    x: u8,
    y: u8,
    width: u8,
    height: u8,
    data: &[u8],
) -> Result<bool, DeviceError> {
    display.clear()?;
    display.draw_bitmap(x, y, width, height, data)?;
    display.commit()?;
    session.mark_active(now_ms);
    Ok(true)
}

fn show_text<D: PixelDisplay>(
    display: &mut D,
    session: &mut Session,
    now_ms: u32,
    x: u8,
    y: u8,
    size: u8,
    text: &[u8],
) -> Result<bool, DeviceError> {
    display.clear()?;
    display.draw_text(x, y, TextStyle::scale(size.max(1)), text_str(text))?;
    display.commit()?;
    session.mark_active(now_ms);
    Ok(true)
}

fn clear_all<D, B>(
    devices: &mut Devices<D, B>,
    renderer: &mut BargraphRenderer,
) -> Result<bool, DeviceError>
where
    D: PixelDisplay,
    B: Bargraph,
{
    // The bargraph is cleared even if the display fails
    let display = devices
        .display
        .clear()
        .and_then(|()| devices.display.commit());
    renderer.clear(&mut devices.bargraph)?;
    display?;
    Ok(true)
}

fn apply_settings<D, B>(
    devices: &mut Devices<D, B>,
    session: &mut Session,
    renderer: &mut BargraphRenderer,
    now_ms: u32,
    display_on_secs: u8,
    brightness: u8,
) -> Result<bool, DeviceError>
where
    D: PixelDisplay,
    B: Bargraph,
{
    let clamped = session.apply_settings(display_on_secs, brightness);
    if clamped.any() {
        #[cfg(feature = "defmt")]
        defmt::warn!(
            "Settings clamped: requested {}s/{} -> {}ms/{}",
            display_on_secs,
            brightness,
            session.display_on_ms(),
            session.brightness()
        );
    }

    renderer.cancel_fade();
    devices.bargraph.set_brightness(session.brightness())?;
    show_banner(&mut devices.display, session, now_ms, SETTINGS_BANNER)
}

/// Full-screen status text at the top-left corner
fn show_banner<D: PixelDisplay>(
    display: &mut D,
    session: &mut Session,
    now_ms: u32,
    text: &str,
) -> Result<bool, DeviceError> {
    display.clear()?;
    display.draw_text(0, 0, TextStyle::default(), text)?;
    display.commit()?;
    session.mark_active(now_ms);
    Ok(true)
}

/// Diagnostic for an unknown tag, showing the tag and the time
fn show_diagnostic<D: PixelDisplay>(
    display: &mut D,
    session: &mut Session,
    now_ms: u32,
    tag: u8,
) -> Result<(), DeviceError> {
    let mut text: String<48> = String::new();
    // Fits: 20 fixed characters, a 4 byte char and up to 10 digits
    let _ = write!(text, "unknown\ncommand:{}\nts:{}", char::from(tag), now_ms);

    show_banner(display, session, now_ms, &text).map(|_| ())
}
