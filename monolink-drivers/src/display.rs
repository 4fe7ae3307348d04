//! Display byte link
//!
//! Monochrome display libraries talk to hardware through two callbacks:
//! one for the byte stream (start/stop a transfer, send bytes, switch
//! between command and data) and one for control lines and delays. This
//! module maps those events onto the SPI and I2C transports. Pixel and
//! font handling stays in the display library.

use embedded_hal::delay::DelayNs;
use heapless::Vec;
use monolink_hal::gpio::{Level, OutputPin};
use monolink_hal::i2c::I2cController;
use monolink_hal::spi::SpiController;
use monolink_hal::Error;

use crate::bus::{I2cTransport, SpiTransport};

/// Byte-stream events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ByteEvent<'a> {
    /// Bring up the bus
    Init,
    /// Switch between command (low) and data (high)
    SetDataCommand(Level),
    /// Begin a transfer (select the device)
    StartTransfer,
    /// Bytes belonging to the current transfer
    Send(&'a [u8]),
    /// Finish the transfer (deselect the device)
    EndTransfer,
}

/// Control line and delay events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlEvent {
    /// Configure control lines
    Init,
    ChipSelect(Level),
    DataCommand(Level),
    Reset(Level),
    DelayMs(u8),
    /// Delay in units of 10 µs
    Delay10Us(u8),
    /// Delay in units of 100 ns
    Delay100Ns(u8),
}

/// Something that can carry a display's byte and control callbacks
pub trait DisplayLink {
    fn on_byte(&mut self, event: ByteEvent<'_>) -> Result<(), Error>;

    fn on_control(&mut self, event: ControlEvent) -> Result<(), Error>;
}

/// `Init` may arrive more than once from a display library
fn tolerate_reinit(result: Result<(), Error>) -> Result<(), Error> {
    match result {
        Err(Error::AlreadyInitialized) => Ok(()),
        other => other,
    }
}

impl<C, CS, DC, RST, D> DisplayLink for SpiTransport<C, CS, DC, RST, D>
where
    C: SpiController,
    CS: OutputPin,
    DC: OutputPin,
    RST: OutputPin,
    D: DelayNs,
{
    fn on_byte(&mut self, event: ByteEvent<'_>) -> Result<(), Error> {
        match event {
            ByteEvent::Init => tolerate_reinit(self.initialize()),
            ByteEvent::SetDataCommand(level) => {
                self.set_data_command(level);
                Ok(())
            }
            ByteEvent::StartTransfer => {
                self.set_chip_select(Level::Low);
                Ok(())
            }
            ByteEvent::Send(bytes) => self.write(bytes),
            ByteEvent::EndTransfer => {
                self.set_chip_select(Level::High);
                Ok(())
            }
        }
    }

    fn on_control(&mut self, event: ControlEvent) -> Result<(), Error> {
        match event {
            ControlEvent::Init => self.initialize_gpio(),
            ControlEvent::ChipSelect(level) => self.set_chip_select(level),
            ControlEvent::DataCommand(level) => self.set_data_command(level),
            ControlEvent::Reset(level) => self.set_reset(level),
            ControlEvent::DelayMs(ms) => self.sleep_ms(ms.into()),
            ControlEvent::Delay10Us(n) => self.sleep_us(u32::from(n) * 10),
            // Below the resolution of the delay source
            ControlEvent::Delay100Ns(_) => {}
        }
        Ok(())
    }
}

/// Bytes one I2C frame may hold between start and end of a transfer
pub const FRAME_CAPACITY: usize = 256;

fn too_large(len: usize) -> Error {
    Error::TransferTooLarge {
        len,
        max: FRAME_CAPACITY,
    }
}

/// I2C display link
///
/// I2C has no separate DC or CS lines; the display library embeds the
/// control byte in the stream. Bytes sent between `StartTransfer` and
/// `EndTransfer` are collected and written in one bus transfer. A frame
/// that overflowed is dropped whole at `EndTransfer`.
pub struct I2cDisplayLink<C: I2cController, D> {
    transport: I2cTransport<C>,
    delay: D,
    frame: Vec<u8, FRAME_CAPACITY>,
    /// Total length requested once the frame overflowed
    overflow: Option<usize>,
}

impl<C: I2cController, D: DelayNs> I2cDisplayLink<C, D> {
    pub fn new(transport: I2cTransport<C>, delay: D) -> Self {
        Self {
            transport,
            delay,
            frame: Vec::new(),
            overflow: None,
        }
    }

    pub fn transport(&self) -> &I2cTransport<C> {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut I2cTransport<C> {
        &mut self.transport
    }

    /// Bytes collected for the transfer in progress
    pub fn pending(&self) -> &[u8] {
        &self.frame
    }
}

impl<C: I2cController, D: DelayNs> DisplayLink for I2cDisplayLink<C, D> {
    fn on_byte(&mut self, event: ByteEvent<'_>) -> Result<(), Error> {
        match event {
            ByteEvent::Init => tolerate_reinit(self.transport.initialize()),
            ByteEvent::SetDataCommand(_) => Ok(()),
            ByteEvent::StartTransfer => {
                self.frame.clear();
                self.overflow = None;
                Ok(())
            }
            ByteEvent::Send(bytes) => {
                if let Some(len) = self.overflow.as_mut() {
                    *len += bytes.len();
                    return Err(too_large(*len));
                }
                let len = self.frame.len() + bytes.len();
                self.frame.extend_from_slice(bytes).map_err(|_| {
                    error!("I2C display frame overflow: {} bytes", len);
                    self.overflow = Some(len);
                    too_large(len)
                })
            }
            ByteEvent::EndTransfer => {
                let result = match self.overflow.take() {
                    Some(len) => {
                        warn!("Dropping overflowed I2C display frame");
                        Err(too_large(len))
                    }
                    None => {
                        let address = self.transport.address();
                        self.transport.write(address, &self.frame)
                    }
                };
                self.frame.clear();
                result
            }
        }
    }

    fn on_control(&mut self, event: ControlEvent) -> Result<(), Error> {
        match event {
            ControlEvent::DelayMs(ms) => self.delay.delay_ms(ms.into()),
            ControlEvent::Delay10Us(n) => self.delay.delay_us(u32::from(n) * 10),
            ControlEvent::Init
            | ControlEvent::ChipSelect(_)
            | ControlEvent::DataCommand(_)
            | ControlEvent::Reset(_)
            | ControlEvent::Delay100Ns(_) => {}
        }
        Ok(())
    }
}
