//! UART-backed serial transport
//!
//! Reads go through the driver's receive buffer with a zero timeout, so
//! neither [`read_char`](SerialPort::read_char) nor
//! [`has_data`](SerialPort::has_data) ever waits.

use monolink_hal::serial::{SerialPort, UartConfig, UartDriver};
use monolink_hal::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum UartState {
    Uninitialized,
    /// Driver installed, line parameters not applied yet
    Installed,
    Initialized,
}

/// Serial input over a UART peripheral
pub struct UartSerial<U> {
    driver: U,
    config: UartConfig,
    state: UartState,
}

impl<U: UartDriver> UartSerial<U> {
    /// Console settings: UART0, 115200 8N1
    pub fn new(driver: U) -> Self {
        Self::with_config(driver, UartConfig::CONSOLE)
    }

    pub fn with_config(driver: U, config: UartConfig) -> Self {
        Self {
            driver,
            config,
            state: UartState::Uninitialized,
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.state == UartState::Initialized
    }

    pub fn config(&self) -> &UartConfig {
        &self.config
    }

    pub fn driver(&self) -> &U {
        &self.driver
    }

    pub fn driver_mut(&mut self) -> &mut U {
        &mut self.driver
    }
}

impl<U: UartDriver> SerialPort for UartSerial<U> {
    /// Install the driver and apply line parameters
    ///
    /// Not idempotent: a second call after success is refused. If only
    /// the configuration step failed, a retry skips the install.
    fn initialize(&mut self) -> Result<(), Error> {
        if self.state == UartState::Initialized {
            warn!("UART{} already initialized", self.config.port);
            return Err(Error::AlreadyInitialized);
        }

        if self.state == UartState::Uninitialized {
            self.driver
                .install(self.config.rx_buffer_size, self.config.tx_buffer_size)
                .map_err(|fault| {
                    error!("UART driver install failed: {}", fault);
                    Error::DriverInstall(fault)
                })?;
            self.state = UartState::Installed;
        }

        self.driver.configure(&self.config).map_err(|fault| {
            error!("UART parameter config failed: {}", fault);
            Error::DriverInstall(fault)
        })?;
        self.state = UartState::Initialized;

        info!(
            "UART{} initialized at {} baud",
            self.config.port, self.config.baudrate
        );
        Ok(())
    }

    fn read_char(&mut self) -> Result<Option<u8>, Error> {
        if !self.is_initialized() {
            return Err(Error::NotInitialized);
        }

        let mut byte = [0u8; 1];
        match self.driver.read(&mut byte, 0) {
            Ok(0) => Ok(None),
            Ok(_) => Ok(Some(byte[0])),
            Err(fault) => {
                warn!("UART read failed: {}", fault);
                Err(Error::from_transfer(fault))
            }
        }
    }

    /// Non-destructive: only asks the driver how much is buffered
    fn has_data(&mut self) -> bool {
        if !self.is_initialized() {
            return false;
        }

        match self.driver.buffered_len() {
            Ok(n) => n > 0,
            Err(fault) => {
                warn!("UART buffered length query failed: {}", fault);
                false
            }
        }
    }
}
