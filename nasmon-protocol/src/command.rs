//! Host commands
//!
//! Every frame carries exactly one command. The tag byte picks which of the
//! overlapping payload layouts applies; the other layouts are never read.
//!
//! | Tag | Payload                                   |
//! |-----|-------------------------------------------|
//! | `b` | x, y, w, h, 512 bytes of 1bpp bitmap      |
//! | `c` | -                                         |
//! | `d` | -                                         |
//! | `g` | 24 segment colour codes                   |
//! | `p` | -                                         |
//! | `s` | display-on seconds, bargraph brightness   |
//! | `t` | x, y, size, 128 bytes of NUL-terminated text |

use crate::frame::FRAME_SIZE;

// Command tags
pub const TAG_BITMAP: u8 = b'b';
pub const TAG_CLEAR: u8 = b'c';
pub const TAG_DEBUG: u8 = b'd';
pub const TAG_GRAPH: u8 = b'g';
pub const TAG_PING: u8 = b'p';
pub const TAG_SETTINGS: u8 = b's';
pub const TAG_TEXT: u8 = b't';

/// Bitmap bytes carried by a `b` frame
pub const BITMAP_DATA_LEN: usize = 512;

/// Colour codes carried by a `g` frame (one per bargraph segment)
pub const BARGRAPH_SEGMENTS: usize = 24;

/// Text field size of a `t` frame
pub const TEXT_FIELD_LEN: usize = 128;

const BITMAP_DATA_START: usize = 5;
const GRAPH_START: usize = 1;
const TEXT_START: usize = 4;

/// A decoded host command, borrowing its payload from the frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Command<'a> {
    /// Blit a monochrome bitmap
    Bitmap {
        x: u8,
        y: u8,
        width: u8,
        height: u8,
        /// Row-major 1bpp data, `BITMAP_DATA_LEN` bytes
        data: &'a [u8],
    },
    /// Clear the display and the bargraph
    Clear,
    /// Show the debug banner
    Debug,
    /// Set every bargraph segment
    Graph {
        /// One code per segment, `BARGRAPH_SEGMENTS` bytes
        codes: &'a [u8],
    },
    /// Liveness check
    Ping,
    /// Update session settings
    Settings {
        /// Display inactivity timeout in whole seconds
        display_on_secs: u8,
        /// Bargraph brightness (0-15)
        brightness: u8,
    },
    /// Render text
    Text {
        x: u8,
        y: u8,
        size: u8,
        /// Raw text field, `TEXT_FIELD_LEN` bytes, NUL terminated if shorter
        text: &'a [u8],
    },
    /// Any other tag byte
    Unrecognized(u8),
}

impl<'a> Command<'a> {
    /// Interpret a frame
    ///
    /// Decoding never fails: unknown tags map to [`Command::Unrecognized`],
    /// and fields of short commands simply read the zero padding.
    pub fn decode(bytes: &'a [u8; FRAME_SIZE]) -> Self {
        match bytes[0] {
            TAG_BITMAP => Command::Bitmap {
                x: bytes[1],
                y: bytes[2],
                width: bytes[3],
                height: bytes[4],
                data: &bytes[BITMAP_DATA_START..BITMAP_DATA_START + BITMAP_DATA_LEN],
            },
            TAG_CLEAR => Command::Clear,
            TAG_DEBUG => Command::Debug,
            TAG_GRAPH => Command::Graph {
                codes: &bytes[GRAPH_START..GRAPH_START + BARGRAPH_SEGMENTS],
            },
            TAG_PING => Command::Ping,
            TAG_SETTINGS => Command::Settings {
                display_on_secs: bytes[1],
                brightness: bytes[2],
            },
            TAG_TEXT => Command::Text {
                x: bytes[1],
                y: bytes[2],
                size: bytes[3],
                text: &bytes[TEXT_START..TEXT_START + TEXT_FIELD_LEN],
            },
            other => Command::Unrecognized(other),
        }
    }

    /// The tag byte this command is sent with
    pub fn tag(&self) -> u8 {
        match self {
            Command::Bitmap { .. } => TAG_BITMAP,
            Command::Clear => TAG_CLEAR,
            Command::Debug => TAG_DEBUG,
            Command::Graph { .. } => TAG_GRAPH,
            Command::Ping => TAG_PING,
            Command::Settings { .. } => TAG_SETTINGS,
            Command::Text { .. } => TAG_TEXT,
            Command::Unrecognized(tag) => *tag,
        }
    }

    /// Write this command into a frame (host side)
    ///
    /// The frame is zeroed first. Oversized payloads are truncated to their
    /// field; text keeps at least one trailing NUL.
    pub fn encode(&self, out: &mut [u8; FRAME_SIZE]) {
        out.fill(0);
        out[0] = self.tag();

        match *self {
            Command::Bitmap {
                x,
                y,
                width,
                height,
                data,
            } => {
                out[1] = x;
                out[2] = y;
                out[3] = width;
                out[4] = height;
                copy_field(&mut out[BITMAP_DATA_START..], data, BITMAP_DATA_LEN);
            }
            Command::Graph { codes } => {
                copy_field(&mut out[GRAPH_START..], codes, BARGRAPH_SEGMENTS);
            }
            Command::Settings {
                display_on_secs,
                brightness,
            } => {
                out[1] = display_on_secs;
                out[2] = brightness;
            }
            Command::Text { x, y, size, text } => {
                out[1] = x;
                out[2] = y;
                out[3] = size;
                copy_field(&mut out[TEXT_START..], c_str(text), TEXT_FIELD_LEN - 1);
            }
            Command::Clear | Command::Debug | Command::Ping | Command::Unrecognized(_) => {}
        }
    }
}

fn copy_field(dest: &mut [u8], src: &[u8], max: usize) {
    let len = src.len().min(max).min(dest.len());
    dest[..len].copy_from_slice(&src[..len]);
}

/// The bytes of a C-style string field, up to the first NUL
pub fn c_str(field: &[u8]) -> &[u8] {
    let end = field.iter().position(|&b| b == 0).unwrap_or(field.len());
    &field[..end]
}

/// The longest valid UTF-8 prefix of a C-style string field
///
/// The host sends ASCII; anything after an invalid byte is dropped rather
/// than rejecting the whole frame.
pub fn text_str(field: &[u8]) -> &str {
    let bytes = c_str(field);
    match core::str::from_utf8(bytes) {
        Ok(text) => text,
        Err(e) => core::str::from_utf8(&bytes[..e.valid_up_to()]).unwrap_or(""),
    }
}
