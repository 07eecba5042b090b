//! NASMon Host Link Protocol
//!
//! This crate defines the serial protocol between the host computer (which
//! gathers the statistics) and the NASMon display controller (which shows
//! them on an OLED and a 24-segment bargraph).
//!
//! # Protocol Overview
//!
//! The host sends fixed-size binary frames. There is no start byte, length
//! or checksum; the link delivers exactly 517 bytes per frame:
//! ```text
//! ┌─────┬──────────────────────────────────────────┐
//! │ TAG │ PAYLOAD (tag-specific, zero padded)      │
//! │ 1B  │ 516B                                     │
//! └─────┴──────────────────────────────────────────┘
//! ```
//!
//! The device answers every frame with exactly one newline-terminated ASCII
//! token, and sends two unsolicited tokens: one after boot and one when the
//! user holds the trigger long enough to ask for fresh data.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod command;
pub mod frame;
pub mod levels;
pub mod response;

pub use command::{c_str, text_str, Command, BARGRAPH_SEGMENTS, BITMAP_DATA_LEN, TEXT_FIELD_LEN};
pub use frame::{FrameAssembler, RawFrame, FRAME_SIZE};
pub use levels::{percent_to_codes, Thresholds};
pub use response::Response;
