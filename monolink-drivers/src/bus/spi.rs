//! SPI display transport
//!
//! SPI bus plus one write-only device, with chip-select, data/command and
//! reset driven as plain GPIOs by the caller. Both [`initialize`] and
//! [`initialize_gpio`] must run before the first transfer.
//!
//! [`initialize`]: SpiTransport::initialize
//! [`initialize_gpio`]: SpiTransport::initialize_gpio

use embedded_hal::delay::DelayNs;
use monolink_hal::bus::{BusLink, LinkStage};
use monolink_hal::gpio::{Level, OutputPin, PinConfig};
use monolink_hal::spi::{SpiBusConfig, SpiController, SpiDeviceConfig, TRANSFER_TIMEOUT_MS};
use monolink_hal::Error;

/// The three display control lines
pub struct SpiControlPins<CS, DC, RST> {
    /// Chip-select, active low
    pub cs: CS,
    /// Data/command select, high = data
    pub dc: DC,
    /// Reset, active low
    pub rst: RST,
}

/// SPI bus, attached device, control lines and a delay source
pub struct SpiTransport<C: SpiController, CS, DC, RST, D> {
    link: BusLink<C>,
    bus_config: SpiBusConfig,
    device_config: SpiDeviceConfig,
    pins: SpiControlPins<CS, DC, RST>,
    delay: D,
}

impl<C, CS, DC, RST, D> SpiTransport<C, CS, DC, RST, D>
where
    C: SpiController,
    CS: OutputPin,
    DC: OutputPin,
    RST: OutputPin,
    D: DelayNs,
{
    /// Transport using the board's bus and OLED device settings
    pub fn new(controller: C, pins: SpiControlPins<CS, DC, RST>, delay: D) -> Self {
        Self::with_config(
            controller,
            SpiBusConfig::BOARD,
            SpiDeviceConfig::OLED,
            pins,
            delay,
        )
    }

    pub fn with_config(
        controller: C,
        bus_config: SpiBusConfig,
        device_config: SpiDeviceConfig,
        pins: SpiControlPins<CS, DC, RST>,
        delay: D,
    ) -> Self {
        Self {
            link: BusLink::new(controller),
            bus_config,
            device_config,
            pins,
            delay,
        }
    }

    /// Initialize the bus and add the device
    pub fn initialize(&mut self) -> Result<(), Error> {
        info!("Initializing SPI bus...");
        match self.link.initialize(&self.bus_config, &self.device_config) {
            Ok(()) => {
                info!(
                    "SPI initialization successful - MOSI: {}, SCK: {}, Speed: {} Hz",
                    self.bus_config.pins.mosi,
                    self.bus_config.pins.sclk,
                    self.device_config.clock_speed_hz
                );
                Ok(())
            }
            Err(e) => {
                error!("SPI initialization failed: {}", e);
                Err(e)
            }
        }
    }

    /// Configure CS, DC and RST as outputs and park them high
    ///
    /// High means: deselected, data mode, out of reset.
    pub fn initialize_gpio(&mut self) {
        self.pins.cs.configure(PinConfig::OUTPUT);
        self.pins.dc.configure(PinConfig::OUTPUT);
        self.pins.rst.configure(PinConfig::OUTPUT);

        self.pins.cs.set_high();
        self.pins.dc.set_high();
        self.pins.rst.set_high();

        info!(
            "GPIO initialized - CS: {}, DC: {}, RST: {}",
            self.bus_config.pins.cs,
            self.bus_config.pins.dc,
            self.bus_config.pins.rst
        );
    }

    /// One blocking transfer of `data`, no chunking
    ///
    /// Empty writes and writes longer than the bus maximum are rejected
    /// before the backend is touched.
    pub fn write(&mut self, data: &[u8]) -> Result<(), Error> {
        if !self.link.is_ready() {
            error!("SPI not initialized");
            return Err(Error::NotInitialized);
        }
        if data.is_empty() {
            warn!("SPI write with no data");
            return Err(Error::EmptyWrite);
        }
        let max = self.bus_config.max_transfer_size;
        if data.len() > max {
            error!("SPI write of {} bytes exceeds max transfer {}", data.len(), max);
            return Err(Error::TransferTooLarge {
                len: data.len(),
                max,
            });
        }

        self.link
            .transmit(data, TRANSFER_TIMEOUT_MS)
            .inspect_err(|e| error!("SPI write data failed: {}", e))
    }

    pub fn set_chip_select(&mut self, level: Level) {
        self.pins.cs.set_level(level);
    }

    pub fn set_data_command(&mut self, level: Level) {
        self.pins.dc.set_level(level);
    }

    pub fn set_reset(&mut self, level: Level) {
        self.pins.rst.set_level(level);
    }

    pub fn sleep_ms(&mut self, ms: u32) {
        self.delay.delay_ms(ms);
    }

    /// Busy-wait; resolution is whatever the delay source offers
    pub fn sleep_us(&mut self, us: u32) {
        self.delay.delay_us(us);
    }

    pub fn is_initialized(&self) -> bool {
        self.link.is_ready()
    }

    pub fn stage(&self) -> LinkStage {
        self.link.stage()
    }

    pub fn max_transfer_size(&self) -> usize {
        self.bus_config.max_transfer_size
    }

    pub fn controller(&self) -> &C {
        self.link.controller()
    }

    pub fn controller_mut(&mut self) -> &mut C {
        self.link.controller_mut()
    }

    pub fn delay(&self) -> &D {
        &self.delay
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{pin_sink, MockDelay, MockPin, MockSpi, PinSink};
    use monolink_hal::BusFault;

    const CS: usize = 0;
    const DC: usize = 1;
    const RST: usize = 2;

    type TestSpi = SpiTransport<MockSpi, MockPin, MockPin, MockPin, MockDelay>;

    fn transport() -> (TestSpi, PinSink) {
        let sink = pin_sink();
        let pins = SpiControlPins {
            cs: MockPin::new(CS, &sink),
            dc: MockPin::new(DC, &sink),
            rst: MockPin::new(RST, &sink),
        };
        (
            SpiTransport::new(MockSpi::new(), pins, MockDelay::default()),
            sink,
        )
    }

    #[test]
    fn test_empty_write_never_reaches_backend() {
        let (mut spi, _sink) = transport();

        // Uninitialized
        assert_eq!(spi.write(&[]), Err(Error::NotInitialized));

        spi.initialize().unwrap();
        assert_eq!(spi.write(&[]), Err(Error::EmptyWrite));
        assert!(spi.controller().transfers.is_empty());
    }

    #[test]
    fn test_write_before_initialize() {
        let (mut spi, _sink) = transport();
        assert_eq!(spi.write(&[0xAE]), Err(Error::NotInitialized));
        assert_eq!(spi.controller().buses_created, 0);
    }

    #[test]
    fn test_write_single_transfer() {
        let (mut spi, _sink) = transport();
        spi.initialize().unwrap();

        let frame = [0x55u8; 64];
        assert_eq!(spi.write(&frame), Ok(()));

        let transfers = &spi.controller().transfers;
        assert_eq!(transfers.len(), 1);
        assert_eq!(transfers[0].bytes.len(), 64);
    }

    #[test]
    fn test_oversized_write_rejected() {
        let (mut spi, _sink) = transport();
        spi.initialize().unwrap();

        let frame = [0u8; 1025];
        assert_eq!(
            spi.write(&frame),
            Err(Error::TransferTooLarge { len: 1025, max: 1024 })
        );
        assert!(spi.controller().transfers.is_empty());

        let frame = [0u8; 1024];
        assert_eq!(spi.write(&frame), Ok(()));
    }

    #[test]
    fn test_initialize_applies_board_config() {
        let (mut spi, _sink) = transport();
        spi.initialize().unwrap();

        let bus = spi.controller().bus_config.unwrap();
        assert_eq!(bus.pins.mosi, 21);
        assert_eq!(bus.pins.sclk, 20);
        assert_eq!(bus.pins.miso, None);
        assert_eq!(bus.max_transfer_size, 1024);

        let dev = spi.controller().device_config.unwrap();
        assert_eq!(dev.clock_speed_hz, 10_000_000);
        assert_eq!(dev.chip_select, monolink_hal::spi::ChipSelect::Manual);
        assert_eq!(dev.mode, monolink_hal::spi::Mode::Mode0);
        assert_eq!(spi.controller().buses_created, 1);
        assert_eq!(spi.controller().devices_attached, 1);
    }

    #[test]
    fn test_init_failures() {
        let (mut spi, _sink) = transport();
        spi.controller_mut().fail_create = Some(BusFault::InvalidState);
        assert_eq!(spi.initialize(), Err(Error::BusInit(BusFault::InvalidState)));
        assert_eq!(spi.stage(), LinkStage::Idle);

        let (mut spi, _sink) = transport();
        spi.controller_mut().fail_attach = Some(BusFault::NoMemory);
        assert_eq!(spi.initialize(), Err(Error::DeviceAttach(BusFault::NoMemory)));
        assert_eq!(spi.write(&[1]), Err(Error::NotInitialized));
    }

    #[test]
    fn test_gpio_init_parks_lines_high() {
        let (mut spi, sink) = transport();
        spi.initialize_gpio();

        let log = sink.borrow();
        for id in [CS, DC, RST] {
            assert_eq!(log.configs[id], Some(PinConfig::OUTPUT));
            assert_eq!(log.levels[id], Some(Level::High));
        }
    }

    #[test]
    fn test_control_lines_are_independent() {
        let (mut spi, sink) = transport();
        spi.initialize_gpio();

        spi.set_chip_select(Level::Low);
        assert_eq!(sink.borrow().levels[CS], Some(Level::Low));
        assert_eq!(sink.borrow().levels[DC], Some(Level::High));
        assert_eq!(sink.borrow().levels[RST], Some(Level::High));

        spi.set_data_command(Level::Low);
        assert_eq!(sink.borrow().levels[CS], Some(Level::Low));
        assert_eq!(sink.borrow().levels[DC], Some(Level::Low));
        assert_eq!(sink.borrow().levels[RST], Some(Level::High));

        spi.set_reset(Level::Low);
        spi.set_chip_select(Level::High);
        assert_eq!(sink.borrow().levels[CS], Some(Level::High));
        assert_eq!(sink.borrow().levels[DC], Some(Level::Low));
        assert_eq!(sink.borrow().levels[RST], Some(Level::Low));

        // Each call wrote exactly one pin
        let log = sink.borrow();
        assert_eq!(
            &log.writes[3..],
            &[
                (CS, Level::Low),
                (DC, Level::Low),
                (RST, Level::Low),
                (CS, Level::High)
            ]
        );
    }

    #[test]
    fn test_sleeps_use_delay_source() {
        let (mut spi, _sink) = transport();
        spi.sleep_ms(20);
        spi.sleep_us(10);

        assert_eq!(spi.delay().ms, [20]);
        assert_eq!(spi.delay().us, [10]);
    }
}
