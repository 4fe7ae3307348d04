//! Bus transports (I2C and SPI)

pub mod i2c;
pub mod spi;

pub use i2c::I2cTransport;
pub use spi::{SpiControlPins, SpiTransport};
