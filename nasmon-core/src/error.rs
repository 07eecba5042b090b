//! Core error types

use nasmon_hal::{BargraphError, DisplayError, LinkError};

/// A display or bargraph driver failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DeviceError {
    Display(DisplayError),
    Bargraph(BargraphError),
}

impl From<DisplayError> for DeviceError {
    fn from(e: DisplayError) -> Self {
        DeviceError::Display(e)
    }
}

impl From<BargraphError> for DeviceError {
    fn from(e: BargraphError) -> Self {
        DeviceError::Bargraph(e)
    }
}

/// Errors that stop a controller tick early
///
/// Device failures are logged and absorbed inside the tick; only losing the
/// host link is reported to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ControllerError {
    Link(LinkError),
}

impl From<LinkError> for ControllerError {
    fn from(e: LinkError) -> Self {
        ControllerError::Link(e)
    }
}
