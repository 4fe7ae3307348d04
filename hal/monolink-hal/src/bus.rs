//! Bus lifecycle shared by the I2C and SPI transports
//!
//! Both buses follow the same pattern: create the bus, attach one device
//! to it, then transfer bytes to that device. [`BusController`] is what a
//! vendor backend implements; [`BusLink`] tracks how far setup got so a
//! failed step leaves the link unusable instead of half-initialized.

use crate::error::{BusFault, Error};

/// Vendor-side bus operations
///
/// `Bus` and `Device` are the backend's handles. The link owns them for
/// the rest of its lifetime; there is no teardown.
pub trait BusController {
    /// Bus-wide settings (pins, clock source, host peripheral)
    type BusConfig;
    /// Per-device settings (address, clock speed, mode)
    type DeviceConfig;
    /// Handle for a created bus
    type Bus;
    /// Handle for a device attached to a bus
    type Device;

    /// Create and configure the bus
    fn create_bus(&mut self, config: &Self::BusConfig) -> Result<Self::Bus, BusFault>;

    /// Attach a device to a created bus
    fn attach_device(
        &mut self,
        bus: &mut Self::Bus,
        config: &Self::DeviceConfig,
    ) -> Result<Self::Device, BusFault>;

    /// Blocking transfer of `data` to `device`, bounded by `timeout_ms`
    fn transmit(
        &mut self,
        bus: &mut Self::Bus,
        device: &mut Self::Device,
        data: &[u8],
        timeout_ms: u32,
    ) -> Result<(), BusFault>;
}

/// How far bus setup has progressed
enum LinkState<B, D> {
    /// Nothing created yet
    Idle,
    /// Bus created, device attach failed
    BusOnly(B),
    /// Bus and device ready for transfers
    Ready(B, D),
}

/// Setup stage of a [`BusLink`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LinkStage {
    Idle,
    BusOnly,
    Ready,
}

/// A backend plus the handles it produced
pub struct BusLink<C: BusController> {
    controller: C,
    state: LinkState<C::Bus, C::Device>,
}

impl<C: BusController> BusLink<C> {
    pub fn new(controller: C) -> Self {
        Self {
            controller,
            state: LinkState::Idle,
        }
    }

    /// Create the bus, then attach the device
    ///
    /// On bus failure the link stays idle. On attach failure the bus is
    /// kept but no writable device exists. Either way every later
    /// [`transmit`](Self::transmit) returns [`Error::NotInitialized`].
    pub fn initialize(
        &mut self,
        bus_config: &C::BusConfig,
        device_config: &C::DeviceConfig,
    ) -> Result<(), Error> {
        let state = core::mem::replace(&mut self.state, LinkState::Idle);
        let mut bus = match state {
            LinkState::Idle => self
                .controller
                .create_bus(bus_config)
                .map_err(Error::BusInit)?,
            other => {
                self.state = other;
                return Err(Error::AlreadyInitialized);
            }
        };

        match self.controller.attach_device(&mut bus, device_config) {
            Ok(device) => {
                self.state = LinkState::Ready(bus, device);
                Ok(())
            }
            Err(fault) => {
                self.state = LinkState::BusOnly(bus);
                Err(Error::DeviceAttach(fault))
            }
        }
    }

    /// Transfer bytes to the attached device
    pub fn transmit(&mut self, data: &[u8], timeout_ms: u32) -> Result<(), Error> {
        match &mut self.state {
            LinkState::Ready(bus, device) => self
                .controller
                .transmit(bus, device, data, timeout_ms)
                .map_err(Error::from_transfer),
            _ => Err(Error::NotInitialized),
        }
    }

    pub fn stage(&self) -> LinkStage {
        match self.state {
            LinkState::Idle => LinkStage::Idle,
            LinkState::BusOnly(_) => LinkStage::BusOnly,
            LinkState::Ready(..) => LinkStage::Ready,
        }
    }

    /// True once a device is attached
    pub fn is_ready(&self) -> bool {
        self.stage() == LinkStage::Ready
    }

    /// Access the backend (mostly for inspection in tests)
    pub fn controller(&self) -> &C {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut C {
        &mut self.controller
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Controller whose steps can be told to fail
    #[derive(Default)]
    struct ScriptedController {
        fail_bus: Option<BusFault>,
        fail_device: Option<BusFault>,
        fail_transfer: Option<BusFault>,
        buses_created: u8,
        transfers: u8,
    }

    impl BusController for ScriptedController {
        type BusConfig = ();
        type DeviceConfig = ();
        type Bus = u8;
        type Device = u8;

        fn create_bus(&mut self, _config: &()) -> Result<u8, BusFault> {
            if let Some(fault) = self.fail_bus {
                return Err(fault);
            }
            self.buses_created += 1;
            Ok(self.buses_created)
        }

        fn attach_device(&mut self, bus: &mut u8, _config: &()) -> Result<u8, BusFault> {
            match self.fail_device {
                Some(fault) => Err(fault),
                None => Ok(*bus),
            }
        }

        fn transmit(
            &mut self,
            _bus: &mut u8,
            _device: &mut u8,
            _data: &[u8],
            _timeout_ms: u32,
        ) -> Result<(), BusFault> {
            if let Some(fault) = self.fail_transfer {
                return Err(fault);
            }
            self.transfers += 1;
            Ok(())
        }
    }

    #[test]
    fn test_bus_failure_leaves_link_idle() {
        let mut link = BusLink::new(ScriptedController {
            fail_bus: Some(BusFault::InvalidArgument),
            ..Default::default()
        });

        assert_eq!(
            link.initialize(&(), &()),
            Err(Error::BusInit(BusFault::InvalidArgument))
        );
        assert_eq!(link.stage(), LinkStage::Idle);
        assert_eq!(link.transmit(&[1], 10), Err(Error::NotInitialized));
        assert_eq!(link.controller().transfers, 0);
    }

    #[test]
    fn test_attach_failure_keeps_bus() {
        let mut link = BusLink::new(ScriptedController {
            fail_device: Some(BusFault::NoMemory),
            ..Default::default()
        });

        assert_eq!(
            link.initialize(&(), &()),
            Err(Error::DeviceAttach(BusFault::NoMemory))
        );
        assert_eq!(link.stage(), LinkStage::BusOnly);
        assert_eq!(link.transmit(&[1], 10), Err(Error::NotInitialized));

        // A second attempt must not create another bus
        assert_eq!(link.initialize(&(), &()), Err(Error::AlreadyInitialized));
        assert_eq!(link.controller().buses_created, 1);
    }

    #[test]
    fn test_ready_link_transfers() {
        let mut link = BusLink::new(ScriptedController::default());
        link.initialize(&(), &()).unwrap();
        assert!(link.is_ready());

        link.transmit(&[0xAE], 1000).unwrap();
        assert_eq!(link.controller().transfers, 1);

        assert_eq!(link.initialize(&(), &()), Err(Error::AlreadyInitialized));
        assert!(link.is_ready());
    }

    #[test]
    fn test_transfer_fault_mapping() {
        let mut link = BusLink::new(ScriptedController::default());
        link.initialize(&(), &()).unwrap();

        link.controller_mut().fail_transfer = Some(BusFault::Timeout);
        assert_eq!(link.transmit(&[1], 1000), Err(Error::Timeout));

        link.controller_mut().fail_transfer = Some(BusFault::Nack);
        assert_eq!(
            link.transmit(&[1], 1000),
            Err(Error::Transfer(BusFault::Nack))
        );
    }
}
