//! Serial byte transports
//!
//! Two implementations of [`SerialPort`](monolink_hal::SerialPort):
//!
//! - [`UartSerial`] - hardware UART, asks the driver for its buffered length
//! - [`UsbSerial`] - USB serial function, answers `has_data` via a one-byte
//!   lookahead
//!
//! Firmware builds compile in exactly one of them as the console.

pub mod lookahead;
pub mod uart;
pub mod usb;

pub use lookahead::Lookahead;
pub use uart::UartSerial;
pub use usb::UsbSerial;
