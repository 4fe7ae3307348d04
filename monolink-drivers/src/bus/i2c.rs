//! I2C master transport
//!
//! One bus, one fixed-address device (the OLED at 0x3C by default),
//! blocking writes bounded by [`TRANSFER_TIMEOUT_MS`].
//!
//! ```ignore
//! let mut oled = I2cTransport::new(backend);
//! oled.initialize()?;
//! oled.write(0x3C, &[0x00, 0xAE])?; // display off
//! ```

use monolink_hal::bus::{BusLink, LinkStage};
use monolink_hal::i2c::{I2cBusConfig, I2cController, I2cDeviceConfig, TRANSFER_TIMEOUT_MS};
use monolink_hal::Error;

/// I2C bus plus its single attached device
pub struct I2cTransport<C: I2cController> {
    link: BusLink<C>,
    bus_config: I2cBusConfig,
    device_config: I2cDeviceConfig,
}

impl<C: I2cController> I2cTransport<C> {
    /// Transport using the board's bus and OLED device settings
    pub fn new(controller: C) -> Self {
        Self::with_config(controller, I2cBusConfig::BOARD, I2cDeviceConfig::OLED)
    }

    pub fn with_config(
        controller: C,
        bus_config: I2cBusConfig,
        device_config: I2cDeviceConfig,
    ) -> Self {
        Self {
            link: BusLink::new(controller),
            bus_config,
            device_config,
        }
    }

    /// Create the master bus and attach the device
    ///
    /// Call once. If bus creation fails nothing is usable; if the device
    /// attach fails the bus stays allocated but every write fails.
    pub fn initialize(&mut self) -> Result<(), Error> {
        info!("Creating I2C master bus...");
        match self.link.initialize(&self.bus_config, &self.device_config) {
            Ok(()) => {
                info!(
                    "I2C initialization successful - SCL: {}, SDA: {}, Frequency: {} Hz",
                    self.bus_config.pins.scl,
                    self.bus_config.pins.sda,
                    self.device_config.scl_speed_hz
                );
                Ok(())
            }
            Err(e) => {
                error!("I2C initialization failed: {}", e);
                Err(e)
            }
        }
    }

    /// Blocking write to the attached device
    ///
    /// The transfer always goes to the address bound at initialize time.
    /// `address` is only compared against it for a diagnostic.
    pub fn write(&mut self, address: u8, data: &[u8]) -> Result<(), Error> {
        if !self.link.is_ready() {
            error!("I2C not initialized");
            return Err(Error::NotInitialized);
        }

        let bound = self.device_config.address.get();
        if address != bound {
            warn!(
                "I2C write to 0x{:x} sent to bound device 0x{:x}",
                address, bound
            );
        }

        self.link
            .transmit(data, TRANSFER_TIMEOUT_MS)
            .inspect_err(|e| error!("I2C write failed: {}", e))
    }

    /// Address of the attached device
    pub fn address(&self) -> u8 {
        self.device_config.address.get()
    }

    pub fn is_initialized(&self) -> bool {
        self.link.is_ready()
    }

    pub fn stage(&self) -> LinkStage {
        self.link.stage()
    }

    pub fn controller(&self) -> &C {
        self.link.controller()
    }

    pub fn controller_mut(&mut self) -> &mut C {
        self.link.controller_mut()
    }
}
