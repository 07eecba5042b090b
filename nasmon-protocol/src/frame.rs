//! Fixed-size frame storage and assembly.
//!
//! Frame format:
//! - TAG (1 byte): ASCII command character
//! - PAYLOAD (516 bytes): tag-specific fields, zero padded
//!
//! The link has no framing bytes, so the only way to find frame boundaries
//! is to count. [`FrameAssembler`] counts bytes across reads and throws away
//! a partial frame once the link has been quiet for too long, which puts the
//! count back in step with the host after a dropped byte.

use crate::command::Command;

/// Size of every host → device frame
pub const FRAME_SIZE: usize = 517;

/// One complete frame as received from the host
#[derive(Clone, PartialEq, Eq)]
pub struct RawFrame {
    bytes: [u8; FRAME_SIZE],
}

impl Default for RawFrame {
    fn default() -> Self {
        Self::zeroed()
    }
}

impl core::fmt::Debug for RawFrame {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("RawFrame")
            .field("tag", &char::from(self.tag()))
            .finish_non_exhaustive()
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for RawFrame {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "RawFrame(tag={=u8:#x})", self.tag());
    }
}

impl RawFrame {
    /// An all-zero frame
    pub const fn zeroed() -> Self {
        Self {
            bytes: [0; FRAME_SIZE],
        }
    }

    /// Wrap bytes received from the link
    pub const fn from_bytes(bytes: [u8; FRAME_SIZE]) -> Self {
        Self { bytes }
    }

    /// The command tag (byte 0)
    pub const fn tag(&self) -> u8 {
        self.bytes[0]
    }

    pub fn as_bytes(&self) -> &[u8; FRAME_SIZE] {
        &self.bytes
    }

    pub fn as_bytes_mut(&mut self) -> &mut [u8; FRAME_SIZE] {
        &mut self.bytes
    }

    /// Zero every byte
    pub fn clear(&mut self) {
        self.bytes.fill(0);
    }

    /// Interpret the frame according to its tag
    pub fn decode(&self) -> Command<'_> {
        Command::decode(&self.bytes)
    }
}

/// Collects link bytes until a full frame is available
///
/// Bytes are written straight into the assembler's buffer through
/// [`FrameAssembler::spare_mut`] and accounted for with
/// [`FrameAssembler::advance`].
#[derive(Debug, Clone)]
pub struct FrameAssembler {
    buffer: RawFrame,
    filled: usize,
    last_byte_ms: u32,
    stale_after_ms: u32,
}

impl FrameAssembler {
    /// Create an assembler that drops partial frames after `stale_after_ms`
    /// without new bytes
    pub const fn new(stale_after_ms: u32) -> Self {
        Self {
            buffer: RawFrame::zeroed(),
            filled: 0,
            last_byte_ms: 0,
            stale_after_ms,
        }
    }

    /// Bytes still needed to complete the current frame
    pub const fn remaining(&self) -> usize {
        FRAME_SIZE - self.filled
    }

    /// Whether some, but not all, bytes of a frame have arrived
    pub const fn is_partial(&self) -> bool {
        self.filled > 0
    }

    /// The unfilled tail of the frame buffer
    pub fn spare_mut(&mut self) -> &mut [u8] {
        &mut self.buffer.as_bytes_mut()[self.filled..]
    }

    /// Account for `count` bytes written into [`Self::spare_mut`]
    ///
    /// Returns the frame once the last byte has been written. The assembler
    /// then starts over with the next frame.
    pub fn advance(&mut self, count: usize, now_ms: u32) -> Option<&RawFrame> {
        if count == 0 {
            return None;
        }

        self.filled = (self.filled + count).min(FRAME_SIZE);
        self.last_byte_ms = now_ms;

        if self.filled == FRAME_SIZE {
            self.filled = 0;
            Some(&self.buffer)
        } else {
            None
        }
    }

    /// Drop a partial frame when the link has gone quiet
    ///
    /// Returns the number of bytes discarded.
    pub fn expire(&mut self, now_ms: u32) -> usize {
        if !self.is_partial() || now_ms.wrapping_sub(self.last_byte_ms) <= self.stale_after_ms {
            return 0;
        }

        let dropped = self.filled;
        self.reset();
        dropped
    }

    /// Forget any partial frame
    pub fn reset(&mut self) {
        self.filled = 0;
        self.buffer.clear();
    }
}
