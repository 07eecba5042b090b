//! Board-agnostic core logic for the NASMon display controller
//!
//! This crate contains all application logic that does not depend on
//! specific hardware implementations:
//!
//! - Device configuration and host-adjustable settings
//! - Display session (inactivity timeout, last-render snapshot)
//! - Bargraph renderer (colour codes, boot pattern, fade-out)
//! - Command dispatcher
//! - Hold-to-refresh trigger interaction
//! - The cooperative poll loop tying them together
//!
//! Everything runs from [`Controller::tick`] on a single thread. Long
//! visual sequences (fade-out, progress bar) are state machines advanced
//! once per tick, so incoming frames keep being read while they run.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod bargraph;
pub mod config;
pub mod controller;
pub mod devices;
pub mod dispatcher;
pub mod error;
pub mod session;
pub mod trigger;

#[cfg(test)]
mod mock;

pub use config::{DeviceConfig, Settings};
pub use controller::Controller;
pub use devices::Devices;
pub use error::{ControllerError, DeviceError};
