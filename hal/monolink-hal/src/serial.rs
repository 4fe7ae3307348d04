//! Serial byte transport abstractions
//!
//! [`SerialPort`] is the one interface application code polls for input.
//! Two backends sit behind it: a UART peripheral ([`UartDriver`]) and a
//! USB-native serial function ([`ByteSource`]). A firmware build picks
//! exactly one of them.

use crate::error::{BusFault, Error};

/// Poll-driven byte input
///
/// Implementations are single-consumer: one owner calls these methods in
/// sequence.
pub trait SerialPort {
    /// Bring up the backend
    fn initialize(&mut self) -> Result<(), Error>;

    /// Read one byte without blocking
    ///
    /// `Ok(None)` means no byte was available.
    fn read_char(&mut self) -> Result<Option<u8>, Error>;

    /// Check whether a byte is waiting
    ///
    /// Takes `&mut self` because some backends can only answer by
    /// reading ahead; see the USB transport.
    fn has_data(&mut self) -> bool;
}

/// Vendor UART driver operations
pub trait UartDriver {
    /// Install the driver with ring buffers of the given sizes
    ///
    /// A TX size of 0 means writes go straight to the FIFO.
    fn install(&mut self, rx_buffer_size: usize, tx_buffer_size: usize) -> Result<(), BusFault>;

    /// Apply line parameters
    fn configure(&mut self, config: &UartConfig) -> Result<(), BusFault>;

    /// Read up to `buf.len()` bytes, waiting at most `timeout_ms`
    ///
    /// A timeout of 0 returns immediately with whatever is buffered.
    fn read(&mut self, buf: &mut [u8], timeout_ms: u32) -> Result<usize, BusFault>;

    /// Number of received bytes waiting in the driver
    fn buffered_len(&mut self) -> Result<usize, BusFault>;
}

/// Non-blocking byte source (USB-native serial)
pub trait ByteSource {
    /// Prepare the source for reads
    fn enable(&mut self) -> Result<(), BusFault> {
        Ok(())
    }

    /// Take one byte if one is ready, never waiting
    fn try_read(&mut self) -> Result<Option<u8>, BusFault>;
}

/// UART configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct UartConfig {
    /// UART peripheral index
    pub port: u8,
    /// Baud rate in bits per second
    pub baudrate: u32,
    /// Number of data bits (typically 8)
    pub data_bits: DataBits,
    /// Parity mode
    pub parity: Parity,
    /// Number of stop bits
    pub stop_bits: StopBits,
    pub flow_control: FlowControl,
    /// Driver receive buffer size in bytes
    pub rx_buffer_size: usize,
    /// Driver transmit buffer size in bytes (0 = unbuffered)
    pub tx_buffer_size: usize,
}

impl UartConfig {
    /// Console on UART0, 115200 8N1
    pub const CONSOLE: Self = Self {
        port: 0,
        baudrate: 115200,
        data_bits: DataBits::Eight,
        parity: Parity::None,
        stop_bits: StopBits::One,
        flow_control: FlowControl::None,
        rx_buffer_size: 2048,
        tx_buffer_size: 0,
    };
}

impl Default for UartConfig {
    fn default() -> Self {
        Self::CONSOLE
    }
}

/// Number of data bits per frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DataBits {
    Five,
    Six,
    Seven,
    Eight,
}

/// Parity mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Parity {
    None,
    Even,
    Odd,
}

/// Number of stop bits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StopBits {
    One,
    OnePointFive,
    Two,
}

/// Hardware flow control
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FlowControl {
    None,
    RtsCts,
}
