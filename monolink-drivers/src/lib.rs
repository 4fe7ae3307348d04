//! Peripheral transports
//!
//! This crate builds the bus and serial transports on top of the traits
//! defined in monolink-hal:
//!
//! - I2C and SPI byte transports for a single display device
//! - UART and USB-native serial input, polled without blocking
//! - Display callback adapter (byte stream and control lines)
//! - Input pump for the main loop

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

// Must come first so the logging macros are visible to the other modules
#[macro_use]
mod fmt;

pub mod bus;
pub mod display;
pub mod input;
pub mod serial;

#[cfg(test)]
mod mock;

pub use bus::{I2cTransport, SpiControlPins, SpiTransport};
pub use display::{ByteEvent, ControlEvent, DisplayLink, I2cDisplayLink};
pub use serial::{Lookahead, UartSerial, UsbSerial};
