//! Seira - LED matrix display firmware
//!
//! Main firmware binary for RP2040 boards driving a chain of MAX7219
//! 8x8 LED matrices over SPI.
//!
//! Named after the Greek "seira" meaning "series, chain" -
//! reflecting the daisy-chained matrix modules it drives.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::gpio::{Level, Output};
use embassy_rp::spi::{self, Spi};
use {defmt_rtt as _, panic_probe as _};

use seira_core::config::DisplayConfig;
use seira_core::display::MatrixDisplay;
use seira_core::font::Font5x7;
use seira_core::layout::Alignment;
use seira_core::scroll::ScrollMode;
use seira_drivers::max7219::Max7219;

use crate::tasks::tick::{tick_task, FRAME_TICK};

mod tasks;

/// SPI clock for the MAX7219 chain (datasheet maximum)
const SPI_FREQUENCY_HZ: u32 = 10_000_000;

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Seira firmware starting...");

    // Initialize RP2040 peripherals
    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    // MAX7219 chain on SPI0: SCK on GP18, MOSI on GP19, CS on GP17.
    // The chain is write-only; MISO stays free.
    let mut spi_config = spi::Config::default();
    spi_config.frequency = SPI_FREQUENCY_HZ;
    let spi = Spi::new_blocking_txonly(p.SPI0, p.PIN_18, p.PIN_19, spi_config);
    let cs = Output::new(p.PIN_17, Level::High);

    let config = DisplayConfig {
        device_count: 4,
        intensity: 2,
        alignment: Alignment::LeftEnd,
        ..Default::default()
    };

    let mut chain = Max7219::new(spi, cs, config.device_count);
    if chain.init().is_err() {
        error!("MAX7219 chain init failed");
    }
    info!("MAX7219 chain initialized ({} devices)", config.device_count);

    let mut display = unwrap!(MatrixDisplay::new(chain, Font5x7, &config));

    display.set_text("SEIRA");
    display.set_next_text("HELLO WORLD");
    display.start_animation(ScrollMode::Left);

    unwrap!(spawner.spawn(tick_task()));
    info!("Display running");

    // Single consumer of the display: every animation frame runs to
    // completion here before the next pulse is awaited.
    loop {
        FRAME_TICK.wait().await;
        display.tick();
    }
}
