//! USB-Serial-JTAG backend
//!
//! The receive half of the built-in USB serial function. It exposes only
//! "byte or nothing", which is why the transport above needs a lookahead.

use esp_hal::peripherals::USB_DEVICE;
use esp_hal::usb::usb_serial_jtag::{UsbSerialJtag, UsbSerialJtagRx, UsbSerialJtagTx};
use esp_hal::Blocking;
use monolink_hal::serial::ByteSource;
use monolink_hal::BusFault;

/// Receive side of USB-Serial-JTAG as a [`ByteSource`]
pub struct EspUsbSerial<'d> {
    rx: UsbSerialJtagRx<'d, Blocking>,
}

impl<'d> EspUsbSerial<'d> {
    /// Split the peripheral, keeping the receive half
    ///
    /// The transmit half is returned for console output.
    pub fn new(usb: USB_DEVICE<'d>) -> (Self, UsbSerialJtagTx<'d, Blocking>) {
        let (rx, tx) = UsbSerialJtag::new(usb).split();
        (Self { rx }, tx)
    }
}

impl ByteSource for EspUsbSerial<'_> {
    fn try_read(&mut self) -> Result<Option<u8>, BusFault> {
        // The only error is WouldBlock: the FIFO is empty
        Ok(self.rx.read_byte().ok())
    }
}
