//! Poll task
//!
//! Runs the controller's cooperative loop: boot once, then one tick every
//! [`POLL_INTERVAL_MS`] with the current time.

use core::cell::RefCell;

use defmt::*;
use embassy_stm32::gpio::Input;
use embassy_stm32::i2c::I2c;
use embassy_stm32::mode::Blocking;
use embassy_stm32::usart::BufferedUart;
use embassy_time::{Duration, Ticker};
use embedded_hal_bus::i2c::RefCellDevice;
use nasmon_core::Controller;
use nasmon_drivers::{Debouncer, Ht16k33Bargraph, Ssd1306};
use nasmon_hal::Clock;

use crate::adapters::{EmbassyClock, LedPin, UartLink};

/// Tick interval in milliseconds
pub const POLL_INTERVAL_MS: u64 = 1;

/// Shared I2C bus handle for one device
pub type BusDevice = RefCellDevice<'static, I2c<'static, Blocking>>;

/// The controller with this board's peripherals
pub type Board = Controller<
    Ssd1306<BusDevice>,
    Ht16k33Bargraph<BusDevice>,
    Debouncer<Input<'static>, EmbassyClock>,
    UartLink<BufferedUart<'static>>,
    LedPin,
>;

/// Bus shared by the OLED and the bargraph
pub type SharedBus = RefCell<I2c<'static, Blocking>>;

#[embassy_executor::task]
pub async fn poll_task(mut controller: Board, clock: EmbassyClock) {
    info!("Poll task started");

    if let Err(e) = controller.boot(clock.now_ms()) {
        warn!("Boot announcement failed: {:?}", e);
    }

    let mut ticker = Ticker::every(Duration::from_millis(POLL_INTERVAL_MS));

    loop {
        ticker.next().await;

        if let Err(e) = controller.tick(clock.now_ms()) {
            warn!("Tick failed: {:?}", e);
        }
    }
}
