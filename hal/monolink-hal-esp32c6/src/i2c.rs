//! I2C master backend
//!
//! Wraps the blocking esp-hal I2C driver. The peripheral and its pins are
//! handed over at construction; [`create_bus`] checks that the configured
//! pin numbers match them before taking the peripheral.
//!
//! esp-hal always enables the SDA/SCL pull-ups and programs a 7-cycle
//! glitch filter on the default clock source. Bus configs asking for
//! anything else are rejected with [`BusFault::InvalidArgument`].
//!
//! [`create_bus`]: BusController::create_bus

use embedded_hal::i2c::{Error as _, ErrorKind, NoAcknowledgeSource};
use esp_hal::gpio::{AnyPin, Pin};
use esp_hal::i2c::master::{Config, ConfigError, I2c};
use esp_hal::peripherals::I2C0;
use esp_hal::time::Rate;
use esp_hal::Blocking;
use monolink_hal::bus::BusController;
use monolink_hal::i2c::{Address, ClockSource, I2cBusConfig, I2cDeviceConfig};
use monolink_hal::{BusFault, Deadline};

use crate::clock::EspClock;

/// Glitch filter length esp-hal programs, in source clock cycles
const GLITCH_FILTER_CYCLES: u8 = 7;

/// Map an embedded-hal I2C error kind onto a bus fault
pub fn fault_from_kind(kind: ErrorKind) -> BusFault {
    match kind {
        ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address)
        | ErrorKind::NoAcknowledge(NoAcknowledgeSource::Data)
        | ErrorKind::NoAcknowledge(NoAcknowledgeSource::Unknown) => BusFault::Nack,
        ErrorKind::ArbitrationLoss => BusFault::ArbitrationLost,
        _ => BusFault::Other,
    }
}

fn config_fault(_: ConfigError) -> BusFault {
    BusFault::InvalidArgument
}

fn check_supported(config: &I2cBusConfig) -> Result<(), BusFault> {
    let supported = config.port == 0
        && config.clock_source == ClockSource::Default
        && config.glitch_ignore_cnt == GLITCH_FILTER_CYCLES
        && config.internal_pullup;
    if supported {
        Ok(())
    } else {
        Err(BusFault::InvalidArgument)
    }
}

/// ESP32-C6 I2C0 as a [`BusController`]
pub struct EspI2c<'d> {
    peripheral: Option<I2C0<'d>>,
    sda: Option<AnyPin<'d>>,
    scl: Option<AnyPin<'d>>,
}

impl<'d> EspI2c<'d> {
    pub fn new(peripheral: I2C0<'d>, sda: AnyPin<'d>, scl: AnyPin<'d>) -> Self {
        Self {
            peripheral: Some(peripheral),
            sda: Some(sda),
            scl: Some(scl),
        }
    }
}

impl<'d> BusController for EspI2c<'d> {
    type BusConfig = I2cBusConfig;
    type DeviceConfig = I2cDeviceConfig;
    type Bus = I2c<'d, Blocking>;
    type Device = Address;

    fn create_bus(&mut self, config: &I2cBusConfig) -> Result<Self::Bus, BusFault> {
        check_supported(config)?;
        match (&self.sda, &self.scl) {
            (Some(sda), Some(scl))
                if sda.number() == config.pins.sda && scl.number() == config.pins.scl => {}
            (Some(_), Some(_)) => return Err(BusFault::InvalidArgument),
            _ => return Err(BusFault::InvalidState),
        }

        let (Some(peripheral), Some(sda), Some(scl)) =
            (self.peripheral.take(), self.sda.take(), self.scl.take())
        else {
            return Err(BusFault::InvalidState);
        };

        let bus = I2c::new(peripheral, Config::default())
            .map_err(config_fault)?
            .with_sda(sda)
            .with_scl(scl);
        Ok(bus)
    }

    fn attach_device(
        &mut self,
        bus: &mut Self::Bus,
        config: &I2cDeviceConfig,
    ) -> Result<Address, BusFault> {
        // One device per bus, so its clock speed becomes the bus speed
        let bus_config = Config::default().with_frequency(Rate::from_hz(config.scl_speed_hz));
        bus.apply_config(&bus_config).map_err(config_fault)?;
        Ok(config.address)
    }

    fn transmit(
        &mut self,
        bus: &mut Self::Bus,
        device: &mut Address,
        data: &[u8],
        timeout_ms: u32,
    ) -> Result<(), BusFault> {
        // Bus stalls are cut short by the peripheral's own timeout; a
        // transfer finishing past the deadline is still reported as one.
        let deadline = Deadline::start(&EspClock, timeout_ms);
        let result = bus.write(device.get(), data);
        if deadline.is_expired(&EspClock) {
            return Err(BusFault::Timeout);
        }
        result.map_err(|e| fault_from_kind(e.kind()))
    }
}
