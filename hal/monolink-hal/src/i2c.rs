//! I2C bus abstractions
//!
//! Configuration for an I2C master bus and the single device attached to
//! it. Backends implement [`BusController`](crate::bus::BusController)
//! with these config types; see [`I2cController`].

use crate::bus::BusController;
use crate::pins::{I2cPins, BOARD};

/// 7-bit I2C device address
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Address(u8);

impl Address {
    /// Create an address, rejecting values that do not fit in 7 bits
    pub const fn new(addr: u8) -> Option<Self> {
        if addr <= 0x7F {
            Some(Self(addr))
        } else {
            None
        }
    }

    pub const fn get(self) -> u8 {
        self.0
    }
}

/// Source clock feeding the I2C peripheral
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ClockSource {
    /// Whatever the chip uses by default
    #[default]
    Default,
    /// Crystal oscillator
    Xtal,
    /// Internal RC oscillator
    RcFast,
}

/// Bus-wide I2C configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct I2cBusConfig {
    /// Peripheral index (I2C0, I2C1, ...)
    pub port: u8,
    pub pins: I2cPins,
    pub clock_source: ClockSource,
    /// Glitch filter length in source clock cycles
    pub glitch_ignore_cnt: u8,
    /// Enable the internal pull-ups on SDA and SCL
    pub internal_pullup: bool,
}

impl I2cBusConfig {
    pub const BOARD: Self = Self {
        port: 0,
        pins: BOARD.i2c,
        clock_source: ClockSource::Default,
        glitch_ignore_cnt: 7,
        internal_pullup: true,
    };
}

impl Default for I2cBusConfig {
    fn default() -> Self {
        Self::BOARD
    }
}

/// Per-device I2C configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct I2cDeviceConfig {
    pub address: Address,
    /// SCL frequency in Hz
    pub scl_speed_hz: u32,
}

impl I2cDeviceConfig {
    /// SSD1306-class OLED at 0x3C, Fast Mode Plus
    pub const OLED: Self = Self {
        address: Address(0x3C),
        scl_speed_hz: FAST_PLUS_HZ,
    };
}

impl Default for I2cDeviceConfig {
    fn default() -> Self {
        Self::OLED
    }
}

/// Blocking transfer timeout for I2C writes
pub const TRANSFER_TIMEOUT_MS: u32 = 1000;

/// Fast-mode Plus SCL frequency in Hz
pub const FAST_PLUS_HZ: u32 = 1_000_000;

/// A [`BusController`] speaking I2C
pub trait I2cController:
    BusController<BusConfig = I2cBusConfig, DeviceConfig = I2cDeviceConfig>
{
}

impl<T> I2cController for T where
    T: BusController<BusConfig = I2cBusConfig, DeviceConfig = I2cDeviceConfig>
{
}
