//! Test doubles for the HAL backend traits

use std::cell::RefCell;
use std::collections::VecDeque;
use std::marker::PhantomData;
use std::rc::Rc;
use std::vec::Vec;

use embedded_hal::delay::DelayNs;
use monolink_hal::bus::BusController;
use monolink_hal::gpio::{Level, OutputPin, PinConfig};
use monolink_hal::i2c::{I2cBusConfig, I2cDeviceConfig};
use monolink_hal::serial::{ByteSource, UartConfig, UartDriver};
use monolink_hal::spi::{SpiBusConfig, SpiDeviceConfig};
use monolink_hal::BusFault;

/// One recorded bus transfer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transfer {
    pub bytes: Vec<u8>,
    pub timeout_ms: u32,
}

/// Bus controller that records everything and fails on request
pub struct MockBus<BC, DC> {
    pub fail_create: Option<BusFault>,
    pub fail_attach: Option<BusFault>,
    pub fail_transmit: Option<BusFault>,
    pub buses_created: usize,
    pub devices_attached: usize,
    pub bus_config: Option<BC>,
    pub device_config: Option<DC>,
    pub transfers: Vec<Transfer>,
    _marker: PhantomData<(BC, DC)>,
}

pub type MockI2c = MockBus<I2cBusConfig, I2cDeviceConfig>;
pub type MockSpi = MockBus<SpiBusConfig, SpiDeviceConfig>;

impl<BC, DC> MockBus<BC, DC> {
    pub fn new() -> Self {
        Self {
            fail_create: None,
            fail_attach: None,
            fail_transmit: None,
            buses_created: 0,
            devices_attached: 0,
            bus_config: None,
            device_config: None,
            transfers: Vec::new(),
            _marker: PhantomData,
        }
    }
}

impl<BC, DC> Default for MockBus<BC, DC> {
    fn default() -> Self {
        Self::new()
    }
}

impl<BC: Clone, DC: Clone> BusController for MockBus<BC, DC> {
    type BusConfig = BC;
    type DeviceConfig = DC;
    type Bus = ();
    type Device = ();

    fn create_bus(&mut self, config: &BC) -> Result<(), BusFault> {
        if let Some(fault) = self.fail_create {
            return Err(fault);
        }
        self.buses_created += 1;
        self.bus_config = Some(config.clone());
        Ok(())
    }

    fn attach_device(&mut self, _bus: &mut (), config: &DC) -> Result<(), BusFault> {
        if let Some(fault) = self.fail_attach {
            return Err(fault);
        }
        self.devices_attached += 1;
        self.device_config = Some(config.clone());
        Ok(())
    }

    fn transmit(
        &mut self,
        _bus: &mut (),
        _device: &mut (),
        data: &[u8],
        timeout_ms: u32,
    ) -> Result<(), BusFault> {
        if let Some(fault) = self.fail_transmit {
            return Err(fault);
        }
        self.transfers.push(Transfer {
            bytes: data.to_vec(),
            timeout_ms,
        });
        Ok(())
    }
}

/// Shared record of pin activity, indexed by pin id
#[derive(Default)]
pub struct PinLog {
    pub levels: [Option<Level>; 8],
    pub configs: [Option<PinConfig>; 8],
    /// Every write in order: (pin id, level)
    pub writes: Vec<(usize, Level)>,
}

pub type PinSink = Rc<RefCell<PinLog>>;

pub fn pin_sink() -> PinSink {
    Rc::new(RefCell::new(PinLog::default()))
}

/// Output pin that reports into a [`PinSink`]
pub struct MockPin {
    id: usize,
    sink: PinSink,
}

impl MockPin {
    pub fn new(id: usize, sink: &PinSink) -> Self {
        Self {
            id,
            sink: sink.clone(),
        }
    }

    fn write(&mut self, level: Level) {
        let mut log = self.sink.borrow_mut();
        log.levels[self.id] = Some(level);
        log.writes.push((self.id, level));
    }
}

impl OutputPin for MockPin {
    fn configure(&mut self, config: PinConfig) {
        self.sink.borrow_mut().configs[self.id] = Some(config);
    }

    fn set_high(&mut self) {
        self.write(Level::High);
    }

    fn set_low(&mut self) {
        self.write(Level::Low);
    }

    fn is_set_high(&self) -> bool {
        self.sink.borrow().levels[self.id] == Some(Level::High)
    }
}

/// Delay that only records what it was asked for
#[derive(Default)]
pub struct MockDelay {
    pub ms: Vec<u32>,
    pub us: Vec<u32>,
    pub ns: Vec<u32>,
}

impl DelayNs for MockDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.ns.push(ns);
    }

    fn delay_us(&mut self, us: u32) {
        self.us.push(us);
    }

    fn delay_ms(&mut self, ms: u32) {
        self.ms.push(ms);
    }
}

/// UART driver backed by an in-memory receive queue
#[derive(Default)]
pub struct MockUart {
    pub fail_install: Option<BusFault>,
    pub fail_configure: Option<BusFault>,
    pub fail_read: Option<BusFault>,
    pub installs: usize,
    pub buffers: Option<(usize, usize)>,
    pub config: Option<UartConfig>,
    pub rx: VecDeque<u8>,
    pub read_timeouts: Vec<u32>,
}

impl UartDriver for MockUart {
    fn install(&mut self, rx_buffer_size: usize, tx_buffer_size: usize) -> Result<(), BusFault> {
        if let Some(fault) = self.fail_install {
            return Err(fault);
        }
        self.installs += 1;
        self.buffers = Some((rx_buffer_size, tx_buffer_size));
        Ok(())
    }

    fn configure(&mut self, config: &UartConfig) -> Result<(), BusFault> {
        if let Some(fault) = self.fail_configure {
            return Err(fault);
        }
        self.config = Some(*config);
        Ok(())
    }

    fn read(&mut self, buf: &mut [u8], timeout_ms: u32) -> Result<usize, BusFault> {
        self.read_timeouts.push(timeout_ms);
        if let Some(fault) = self.fail_read {
            return Err(fault);
        }
        let mut n = 0;
        while n < buf.len() {
            match self.rx.pop_front() {
                Some(b) => {
                    buf[n] = b;
                    n += 1;
                }
                None => break,
            }
        }
        Ok(n)
    }

    fn buffered_len(&mut self) -> Result<usize, BusFault> {
        Ok(self.rx.len())
    }
}

/// USB-style byte source backed by an in-memory queue
#[derive(Default)]
pub struct MockSource {
    pub fail_enable: Option<BusFault>,
    pub fail_read: Option<BusFault>,
    pub enables: usize,
    pub reads: usize,
    pub rx: VecDeque<u8>,
}

impl MockSource {
    pub fn with_bytes(bytes: &[u8]) -> Self {
        Self {
            rx: bytes.iter().copied().collect(),
            ..Default::default()
        }
    }
}

impl ByteSource for MockSource {
    fn enable(&mut self) -> Result<(), BusFault> {
        if let Some(fault) = self.fail_enable {
            return Err(fault);
        }
        self.enables += 1;
        Ok(())
    }

    fn try_read(&mut self) -> Result<Option<u8>, BusFault> {
        self.reads += 1;
        if let Some(fault) = self.fail_read {
            return Err(fault);
        }
        Ok(self.rx.pop_front())
    }
}
