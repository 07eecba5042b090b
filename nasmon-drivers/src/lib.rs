//! Hardware driver implementations
//!
//! This crate provides concrete implementations of the traits defined
//! in nasmon-hal, written against `embedded-hal` 1.0 so they work on any
//! board with a blocking I2C bus and GPIO:
//!
//! - SSD1306 128x32 OLED (framebuffer, `embedded-graphics` drawing)
//! - HT16K33 driving an Adafruit 24-segment bi-colour bargraph
//! - Push button debouncer

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod debounce;
pub mod ht16k33;
pub mod ssd1306;

#[cfg(test)]
mod mock;

pub use debounce::Debouncer;
pub use ht16k33::Ht16k33Bargraph;
pub use ssd1306::Ssd1306;
