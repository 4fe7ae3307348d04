//! SPI master backend
//!
//! Write-only bus on SPI2 with a manually driven chip select. Transfers
//! go through the blocking FIFO path; long writes are split by esp-hal.

use embedded_hal::spi::{Error as _, ErrorKind, SpiBus};
use esp_hal::gpio::{AnyPin, Pin};
use esp_hal::peripherals::SPI2;
use esp_hal::spi::master::{Config, ConfigError, Spi};
use esp_hal::spi::Mode as EspMode;
use esp_hal::time::Rate;
use esp_hal::Blocking;
use monolink_hal::bus::BusController;
use monolink_hal::spi::{ChipSelect, Mode, SpiBusConfig, SpiDeviceConfig, SpiHost};
use monolink_hal::{BusFault, Deadline};

use crate::clock::EspClock;

fn fault_from_kind(kind: ErrorKind) -> BusFault {
    match kind {
        ErrorKind::ModeFault => BusFault::InvalidState,
        _ => BusFault::Other,
    }
}

fn config_fault(_: ConfigError) -> BusFault {
    BusFault::InvalidArgument
}

fn esp_mode(mode: Mode) -> EspMode {
    match mode {
        Mode::Mode0 => EspMode::_0,
        Mode::Mode1 => EspMode::_1,
        Mode::Mode2 => EspMode::_2,
        Mode::Mode3 => EspMode::_3,
    }
}

/// ESP32-C6 SPI2 as a [`BusController`]
pub struct EspSpi<'d> {
    peripheral: Option<SPI2<'d>>,
    sclk: Option<AnyPin<'d>>,
    mosi: Option<AnyPin<'d>>,
}

impl<'d> EspSpi<'d> {
    pub fn new(peripheral: SPI2<'d>, sclk: AnyPin<'d>, mosi: AnyPin<'d>) -> Self {
        Self {
            peripheral: Some(peripheral),
            sclk: Some(sclk),
            mosi: Some(mosi),
        }
    }
}

impl<'d> BusController for EspSpi<'d> {
    type BusConfig = SpiBusConfig;
    type DeviceConfig = SpiDeviceConfig;
    type Bus = Spi<'d, Blocking>;
    type Device = ();

    fn create_bus(&mut self, config: &SpiBusConfig) -> Result<Self::Bus, BusFault> {
        if !matches!(config.host, SpiHost::Spi2) || config.pins.miso.is_some() {
            return Err(BusFault::InvalidArgument);
        }
        match (&self.sclk, &self.mosi) {
            (Some(sclk), Some(mosi))
                if sclk.number() == config.pins.sclk && mosi.number() == config.pins.mosi => {}
            (Some(_), Some(_)) => return Err(BusFault::InvalidArgument),
            _ => return Err(BusFault::InvalidState),
        }

        let (Some(peripheral), Some(sclk), Some(mosi)) =
            (self.peripheral.take(), self.sclk.take(), self.mosi.take())
        else {
            return Err(BusFault::InvalidState);
        };

        let bus = Spi::new(peripheral, Config::default())
            .map_err(config_fault)?
            .with_sck(sclk)
            .with_mosi(mosi);
        Ok(bus)
    }

    fn attach_device(
        &mut self,
        bus: &mut Self::Bus,
        config: &SpiDeviceConfig,
    ) -> Result<(), BusFault> {
        // CS is a plain GPIO owned by the transport
        if !matches!(config.chip_select, ChipSelect::Manual) {
            return Err(BusFault::InvalidArgument);
        }
        let bus_config = Config::default()
            .with_frequency(Rate::from_hz(config.clock_speed_hz))
            .with_mode(esp_mode(config.mode));
        bus.apply_config(&bus_config).map_err(config_fault)
    }

    fn transmit(
        &mut self,
        bus: &mut Self::Bus,
        _device: &mut (),
        data: &[u8],
        timeout_ms: u32,
    ) -> Result<(), BusFault> {
        let deadline = Deadline::start(&EspClock, timeout_ms);
        let result = SpiBus::write(bus, data).and_then(|()| SpiBus::flush(bus));
        if deadline.is_expired(&EspClock) {
            return Err(BusFault::Timeout);
        }
        result.map_err(|e| fault_from_kind(e.kind()))
    }
}
