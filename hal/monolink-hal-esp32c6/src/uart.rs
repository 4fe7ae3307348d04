//! UART backend
//!
//! Console UART0 on the board's default pins (TX GPIO16, RX GPIO17).
//! Bytes are moved from the peripheral FIFO into a receive ring sized at
//! [`install`] time, up to [`RX_CAPACITY`]. Transmit is unbuffered.
//!
//! [`install`]: UartDriver::install

use embedded_io::{Error as _, ErrorKind};
use esp_hal::gpio::AnyPin;
use esp_hal::peripherals::UART0;
use esp_hal::uart::{
    Config, ConfigError, DataBits as EspDataBits, Parity as EspParity, StopBits as EspStopBits,
    Uart,
};
use esp_hal::Blocking;
use heapless::Deque;
use monolink_hal::serial::{DataBits, FlowControl, Parity, StopBits, UartConfig, UartDriver};
use monolink_hal::{BusFault, Deadline};

use crate::clock::EspClock;

/// Largest receive ring the driver can be installed with
pub const RX_CAPACITY: usize = 2048;

fn fault_from_kind(kind: ErrorKind) -> BusFault {
    match kind {
        ErrorKind::TimedOut => BusFault::Timeout,
        ErrorKind::InvalidInput => BusFault::InvalidArgument,
        _ => BusFault::Other,
    }
}

fn config_fault(_: ConfigError) -> BusFault {
    BusFault::InvalidArgument
}

fn esp_config(config: &UartConfig) -> Config {
    let data_bits = match config.data_bits {
        DataBits::Five => EspDataBits::_5,
        DataBits::Six => EspDataBits::_6,
        DataBits::Seven => EspDataBits::_7,
        DataBits::Eight => EspDataBits::_8,
    };
    let parity = match config.parity {
        Parity::None => EspParity::None,
        Parity::Even => EspParity::Even,
        Parity::Odd => EspParity::Odd,
    };
    let stop_bits = match config.stop_bits {
        StopBits::One => EspStopBits::_1,
        StopBits::OnePointFive => EspStopBits::_1p5,
        StopBits::Two => EspStopBits::_2,
    };
    Config::default()
        .with_baudrate(config.baudrate)
        .with_data_bits(data_bits)
        .with_parity(parity)
        .with_stop_bits(stop_bits)
}

/// Pins and peripheral waiting for `install`
struct Parts<'d> {
    peripheral: UART0<'d>,
    rx: AnyPin<'d>,
    tx: AnyPin<'d>,
}

/// ESP32-C6 UART0 as a [`UartDriver`]
pub struct EspUart<'d> {
    parts: Option<Parts<'d>>,
    uart: Option<Uart<'d, Blocking>>,
    rx: Deque<u8, RX_CAPACITY>,
    /// Ring size requested at install
    rx_limit: usize,
}

impl<'d> EspUart<'d> {
    pub fn new(peripheral: UART0<'d>, rx: AnyPin<'d>, tx: AnyPin<'d>) -> Self {
        Self {
            parts: Some(Parts { peripheral, rx, tx }),
            uart: None,
            rx: Deque::new(),
            rx_limit: 0,
        }
    }

    /// Move whatever the FIFO holds into the ring, up to its size
    fn pump(&mut self) -> Result<(), BusFault> {
        let uart = self.uart.as_mut().ok_or(BusFault::InvalidState)?;
        let mut chunk = [0u8; 32];
        loop {
            let room = self.rx_limit - self.rx.len();
            if room == 0 || !uart.read_ready() {
                return Ok(());
            }
            let want = room.min(chunk.len());
            let n = uart
                .read(&mut chunk[..want])
                .map_err(|e| fault_from_kind(e.kind()))?;
            for &byte in &chunk[..n] {
                // Cannot fail: n <= room
                let _ = self.rx.push_back(byte);
            }
            if n == 0 {
                return Ok(());
            }
        }
    }
}

impl UartDriver for EspUart<'_> {
    fn install(&mut self, rx_buffer_size: usize, tx_buffer_size: usize) -> Result<(), BusFault> {
        if rx_buffer_size == 0 || rx_buffer_size > RX_CAPACITY || tx_buffer_size != 0 {
            return Err(BusFault::InvalidArgument);
        }
        let parts = self.parts.take().ok_or(BusFault::InvalidState)?;
        let uart = Uart::new(parts.peripheral, Config::default())
            .map_err(config_fault)?
            .with_rx(parts.rx)
            .with_tx(parts.tx);
        self.uart = Some(uart);
        self.rx_limit = rx_buffer_size;
        Ok(())
    }

    fn configure(&mut self, config: &UartConfig) -> Result<(), BusFault> {
        if config.port != 0 || config.flow_control != FlowControl::None {
            return Err(BusFault::InvalidArgument);
        }
        let esp = esp_config(config);
        let uart = self.uart.as_mut().ok_or(BusFault::InvalidState)?;
        uart.apply_config(&esp).map_err(config_fault)
    }

    fn read(&mut self, buf: &mut [u8], timeout_ms: u32) -> Result<usize, BusFault> {
        if buf.is_empty() {
            return Ok(0);
        }

        let deadline = Deadline::start(&EspClock, timeout_ms);
        self.pump()?;
        while self.rx.is_empty() && !deadline.is_expired(&EspClock) {
            self.pump()?;
        }

        let mut n = 0;
        while n < buf.len() {
            match self.rx.pop_front() {
                Some(byte) => {
                    buf[n] = byte;
                    n += 1;
                }
                None => break,
            }
        }
        Ok(n)
    }

    fn buffered_len(&mut self) -> Result<usize, BusFault> {
        self.pump()?;
        Ok(self.rx.len())
    }
}
