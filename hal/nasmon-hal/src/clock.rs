//! Time source
//!
//! The core measures every interval as a difference of two readings with
//! wrapping subtraction, so the counter may roll over freely.

/// Millisecond counter
pub trait Clock {
    /// Milliseconds since an arbitrary epoch, wrapping at `u32::MAX`
    fn now_ms(&self) -> u32;
}
