//! SPI bus abstractions
//!
//! Configuration for an SPI master bus with one device whose chip-select
//! is driven by the caller. Backends implement
//! [`BusController`](crate::bus::BusController) with these config types;
//! see [`SpiController`].

use crate::bus::BusController;
use crate::pins::{SpiPins, BOARD};

/// SPI host peripheral
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SpiHost {
    Spi1,
    Spi2,
    Spi3,
}

/// Bus-wide SPI configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SpiBusConfig {
    pub host: SpiHost,
    pub pins: SpiPins,
    /// Largest single transfer in bytes
    pub max_transfer_size: usize,
}

impl SpiBusConfig {
    pub const BOARD: Self = Self {
        host: SpiHost::Spi2,
        pins: BOARD.spi,
        max_transfer_size: 1024,
    };
}

impl Default for SpiBusConfig {
    fn default() -> Self {
        Self::BOARD
    }
}

/// How chip-select is driven
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ChipSelect {
    /// The caller toggles CS through a GPIO
    Manual,
    /// The peripheral drives CS on the given pin around each transfer
    Hardware(u8),
}

/// Per-device SPI configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SpiDeviceConfig {
    /// SCLK frequency in Hz
    pub clock_speed_hz: u32,
    pub mode: Mode,
    pub chip_select: ChipSelect,
}

impl SpiDeviceConfig {
    /// Write-only OLED at 10 MHz, mode 0, caller-driven CS
    pub const OLED: Self = Self {
        clock_speed_hz: 10_000_000,
        mode: Mode::Mode0,
        chip_select: ChipSelect::Manual,
    };
}

impl Default for SpiDeviceConfig {
    fn default() -> Self {
        Self::OLED
    }
}

/// Blocking transfer timeout for SPI writes
pub const TRANSFER_TIMEOUT_MS: u32 = 1000;

/// SPI mode (clock polarity and phase)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Mode {
    /// Mode 0: CPOL=0, CPHA=0
    Mode0,
    /// Mode 1: CPOL=0, CPHA=1
    Mode1,
    /// Mode 2: CPOL=1, CPHA=0
    Mode2,
    /// Mode 3: CPOL=1, CPHA=1
    Mode3,
}

/// A [`BusController`] speaking SPI
pub trait SpiController:
    BusController<BusConfig = SpiBusConfig, DeviceConfig = SpiDeviceConfig>
{
}

impl<T> SpiController for T where
    T: BusController<BusConfig = SpiBusConfig, DeviceConfig = SpiDeviceConfig>
{
}
