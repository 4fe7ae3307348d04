//! ESP32-C6 backends for the monolink HAL
//!
//! This crate implements the `monolink-hal` backend traits on top of
//! esp-hal for the M5Stack C6L and boards wired the same way:
//!
//! - [`EspI2c`], [`EspSpi`] - bus controllers for the display transports
//! - [`EspPin`] - control lines (CS, DC, RST)
//! - [`EspUart`], [`EspUsbSerial`] - console input backends
//! - [`EspClock`] - millisecond tick counter
//!
//! # Features
//!
//! - `console-uart` - console input on UART0
//! - `console-usb` - console input on the USB-Serial-JTAG function
//! - `defmt` - Enable debug formatting support
//!
//! Exactly one console feature must be enabled; [`Console`] names the
//! transport it selects.

#![no_std]

#[cfg(all(feature = "console-uart", feature = "console-usb"))]
compile_error!("features `console-uart` and `console-usb` are mutually exclusive");

#[cfg(not(any(feature = "console-uart", feature = "console-usb")))]
compile_error!("enable one console backend: `console-uart` or `console-usb`");

pub mod clock;
pub mod gpio;
pub mod i2c;
pub mod spi;
pub mod uart;
pub mod usb;

pub use clock::EspClock;
pub use gpio::EspPin;
pub use i2c::EspI2c;
pub use spi::EspSpi;
pub use uart::EspUart;
pub use usb::EspUsbSerial;

use esp_hal::gpio::Pin;
use esp_hal::peripherals::Peripherals;

/// Console input transport chosen at build time
#[cfg(feature = "console-uart")]
pub type Console<'d> = monolink_drivers::UartSerial<EspUart<'d>>;

/// Console input transport chosen at build time
#[cfg(feature = "console-usb")]
pub type Console<'d> = monolink_drivers::UsbSerial<EspUsbSerial<'d>>;

/// Every backend the board offers, built from the raw peripherals
///
/// Pin numbers follow [`monolink_hal::pins::M5STACK_C6L`]; the bus
/// controllers check them again against the bus configuration.
pub struct Board {
    pub i2c: EspI2c<'static>,
    pub spi: EspSpi<'static>,
    pub cs: EspPin<'static>,
    pub dc: EspPin<'static>,
    pub rst: EspPin<'static>,
    pub console: Console<'static>,
    pub clock: EspClock,
}

impl Board {
    pub fn new(p: Peripherals) -> Self {
        let i2c = EspI2c::new(p.I2C0, p.GPIO5.degrade(), p.GPIO4.degrade());
        let spi = EspSpi::new(p.SPI2, p.GPIO20.degrade(), p.GPIO21.degrade());

        #[cfg(feature = "console-uart")]
        let console = monolink_drivers::UartSerial::new(EspUart::new(
            p.UART0,
            p.GPIO17.degrade(),
            p.GPIO16.degrade(),
        ));
        #[cfg(feature = "console-usb")]
        let console = {
            let (source, _tx) = EspUsbSerial::new(p.USB_DEVICE);
            monolink_drivers::UsbSerial::new(source)
        };

        Self {
            i2c,
            spi,
            cs: EspPin::new(p.GPIO6.degrade()),
            dc: EspPin::new(p.GPIO18.degrade()),
            rst: EspPin::new(p.GPIO15.degrade()),
            console,
            clock: EspClock::new(),
        }
    }
}
