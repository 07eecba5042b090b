//! NASMon - NAS status display firmware
//!
//! Main firmware binary for STM32F103 (Blue Pill) boards with a 128x32
//! SSD1306 OLED and an HT16K33 24-segment bargraph on I2C1, a trigger
//! button on PB5 and a status LED on PB12. The host talks to the board over
//! USART1.

#![no_std]
#![no_main]

mod adapters;
mod config;
mod tasks;

use core::cell::RefCell;

use defmt::*;
use embassy_executor::Spawner;
use embassy_stm32::bind_interrupts;
use embassy_stm32::gpio::{Input, Level, Output, Pull, Speed};
use embassy_stm32::i2c::{self, I2c};
use embassy_stm32::peripherals::USART1;
use embassy_stm32::time::Hertz;
use embassy_stm32::usart::{self, BufferedUart};
use embedded_hal_bus::i2c::RefCellDevice;
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use nasmon_core::{Controller, Devices};
use nasmon_drivers::{Debouncer, Ht16k33Bargraph, Ssd1306};

use crate::adapters::{EmbassyClock, LedPin, UartLink};
use crate::config::DEVICE_CONFIG;
use crate::tasks::SharedBus;

bind_interrupts!(struct Irqs {
    USART1 => usart::BufferedInterruptHandler<USART1>;
});

// Static cells for UART buffers (must live forever)
// RX holds more than one 517 byte frame so a whole frame can arrive between ticks
static TX_BUF: StaticCell<[u8; 128]> = StaticCell::new();
static RX_BUF: StaticCell<[u8; 1024]> = StaticCell::new();

static I2C_BUS: StaticCell<SharedBus> = StaticCell::new();

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("NASMon firmware starting...");

    let p = embassy_stm32::init(Default::default());
    info!("Peripherals initialized");

    let config = DEVICE_CONFIG;
    info!("Device config: {:?}", config);

    // Setup I2C1 for OLED and bargraph (PB6=SCL, PB7=SDA)
    let mut i2c_config = i2c::Config::default();
    i2c_config.frequency = Hertz::khz(400);
    let i2c = I2c::new_blocking(p.I2C1, p.PB6, p.PB7, i2c_config);
    let bus = I2C_BUS.init(RefCell::new(i2c));

    let mut display = Ssd1306::new(RefCellDevice::new(bus));
    match display.init() {
        Ok(()) => info!("OLED initialized"),
        Err(e) => error!("Failed to initialize display: {:?}", e),
    }

    let mut bargraph = Ht16k33Bargraph::new(RefCellDevice::new(bus));
    match bargraph.init() {
        Ok(()) => info!("Bargraph initialized"),
        Err(e) => error!("Failed to initialize bargraph: {:?}", e),
    }

    // Trigger on PB5, pulled up and pressed to ground
    let trigger = Debouncer::new(
        Input::new(p.PB5, Pull::Up),
        EmbassyClock,
        config.debounce_ms,
        true,
    );

    let led = LedPin(Output::new(p.PB12, Level::Low, Speed::Low));

    // Setup USART1 for the host link (PA9=TX, PA10=RX)
    let mut uart_config = usart::Config::default();
    uart_config.baudrate = config.baudrate;

    let tx_buf = TX_BUF.init([0u8; 128]);
    let rx_buf = RX_BUF.init([0u8; 1024]);

    let uart = unwrap!(BufferedUart::new(
        p.USART1,
        p.PA10, // RX
        p.PA9,  // TX
        tx_buf,
        rx_buf,
        Irqs,
        uart_config,
    ));
    info!("USART1 initialized at {} baud", config.baudrate);

    let controller = Controller::new(
        &config,
        Devices::new(display, bargraph),
        trigger,
        UartLink::new(uart),
        led,
    );

    spawner
        .spawn(tasks::poll_task(controller, EmbassyClock))
        .unwrap();
}
