//! NASMon Hardware Abstraction Layer
//!
//! This crate defines the traits the board-agnostic core talks to. Drivers
//! and board support implement them; tests implement them with recording
//! mocks.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  nasmon-core (dispatcher, session, ...) │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  nasmon-hal (this crate - traits)       │
//! └─────────────────────────────────────────┘
//!                     │
//!         ┌───────────┴───────────┐
//!         ▼                       ▼
//! ┌───────────────┐       ┌───────────────┐
//! │ nasmon-drivers│       │ nasmon-       │
//! │ (OLED, LEDs)  │       │ firmware glue │
//! └───────────────┘       └───────────────┘
//! ```
//!
//! # Traits
//!
//! - [`display::PixelDisplay`] - Monochrome framebuffer display
//! - [`bargraph::Bargraph`] - 24 segment tri-colour LED bargraph
//! - [`button::DebouncedButton`] - Debounced push button
//! - [`serial::SerialLink`] - Byte stream to the host
//! - [`gpio::StatusLed`] - Single indicator LED
//! - [`clock::Clock`] - Wrapping millisecond counter

#![no_std]
#![deny(unsafe_code)]

pub mod bargraph;
pub mod button;
pub mod clock;
pub mod display;
pub mod gpio;
pub mod serial;

// Re-export key traits at crate root for convenience
pub use bargraph::{Bargraph, BargraphError, LedColor, MAX_BRIGHTNESS, SEGMENT_COUNT};
pub use button::{ButtonEdge, DebouncedButton};
pub use clock::Clock;
pub use display::{
    DisplayError, PixelDisplay, TextStyle, FRAMEBUFFER_LEN, SCREEN_HEIGHT, SCREEN_WIDTH,
};
pub use gpio::StatusLed;
pub use serial::{LinkError, SerialLink};
