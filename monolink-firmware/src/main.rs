//! Monolink bring-up firmware
//!
//! Brings up the console and the SPI OLED on an M5Stack C6L, switches
//! the panel off as a smoke test, then echoes every console key to the
//! defmt log.

#![no_std]
#![no_main]

use defmt::{error, info, warn};
use esp_backtrace as _;
use esp_hal::delay::Delay;
use esp_println as _;

use monolink_drivers::display::{ByteEvent, ControlEvent, DisplayLink};
use monolink_drivers::{input, SpiControlPins, SpiTransport};
use monolink_hal::{Clock, Error, Level, SerialPort};
use monolink_hal_esp32c6::Board;

esp_bootloader_esp_idf::esp_app_desc!();

/// SSD1306-class "display off" command
const CMD_DISPLAY_OFF: u8 = 0xAE;

/// Main loop period
const POLL_INTERVAL_MS: u32 = 10;

/// Upper bound on keys handled per loop iteration
const KEYS_PER_POLL: usize = 32;

/// Reset pulse, then one command, the way a display library would
fn bring_up_display<L: DisplayLink>(link: &mut L) -> Result<(), Error> {
    link.on_control(ControlEvent::Init)?;
    link.on_byte(ByteEvent::Init)?;

    link.on_control(ControlEvent::Reset(Level::Low))?;
    link.on_control(ControlEvent::DelayMs(10))?;
    link.on_control(ControlEvent::Reset(Level::High))?;
    link.on_control(ControlEvent::DelayMs(10))?;

    link.on_byte(ByteEvent::SetDataCommand(Level::Low))?;
    link.on_byte(ByteEvent::StartTransfer)?;
    let sent = link.on_byte(ByteEvent::Send(&[CMD_DISPLAY_OFF]));
    link.on_byte(ByteEvent::EndTransfer)?;
    sent
}

#[esp_hal::main]
fn main() -> ! {
    info!("Monolink firmware starting...");

    let peripherals = esp_hal::init(esp_hal::Config::default());
    let board = Board::new(peripherals);
    let clock = board.clock;

    let mut console = board.console;
    if let Err(e) = console.initialize() {
        error!("Console init failed: {}", e);
    }

    let pins = SpiControlPins {
        cs: board.cs,
        dc: board.dc,
        rst: board.rst,
    };
    let mut display = SpiTransport::new(board.spi, pins, clock.delay());
    match bring_up_display(&mut display) {
        Ok(()) => info!("Display link up"),
        Err(e) => error!("Display bring-up failed: {}", e),
    }

    let delay = Delay::new();
    loop {
        let result = input::drain(&mut console, KEYS_PER_POLL, |key| {
            info!("Key {=u8:#x} at {}s", key, clock.now_secs());
        });
        if let Err(e) = result {
            warn!("Console read failed: {}", e);
        }
        delay.delay_millis(POLL_INTERVAL_MS);
    }
}
