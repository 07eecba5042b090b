//! Serial link to the host
//!
//! A byte stream in both directions. Reads are never issued for more bytes
//! than [`SerialLink::available`] reported, so `read_exact` does not block
//! the poll loop in practice.

/// Link errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LinkError {
    /// Receive overrun, framing or parity error
    Receive,
    /// Transmit failed or the host is not listening
    Transmit,
}

/// Bidirectional byte stream
pub trait SerialLink {
    /// Number of received bytes that can be read without waiting
    ///
    /// Implementations that cannot count may report a lower bound, as long as
    /// it is non-zero whenever data is waiting.
    fn available(&mut self) -> usize;

    /// Fill `buf` completely
    fn read_exact(&mut self, buf: &mut [u8]) -> Result<(), LinkError>;

    /// Write all of `data`
    fn write_all(&mut self, data: &[u8]) -> Result<(), LinkError>;

    /// Write `line` followed by `\r\n`
    fn write_line(&mut self, line: &str) -> Result<(), LinkError> {
        self.write_all(line.as_bytes())?;
        self.write_all(b"\r\n")
    }
}
