//! USB-native serial transport
//!
//! The USB backend has no "bytes waiting" counter, so [`has_data`]
//! answers by reading one byte ahead into a [`Lookahead`] slot. That byte
//! is owed to the next [`read_char`], which keeps the stream in order:
//! if `has_data()` returns true, the following `read_char()` returns the
//! byte that was pulled in to answer it.
//!
//! [`has_data`]: SerialPort::has_data
//! [`read_char`]: SerialPort::read_char

use monolink_hal::serial::{ByteSource, SerialPort};
use monolink_hal::Error;

use super::lookahead::Lookahead;

/// Serial input over a USB serial function
pub struct UsbSerial<S> {
    source: S,
    lookahead: Lookahead,
    initialized: bool,
}

impl<S: ByteSource> UsbSerial<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            lookahead: Lookahead::new(),
            initialized: false,
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// The peek slot, for inspection
    pub fn lookahead(&self) -> &Lookahead {
        &self.lookahead
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }
}

impl<S: ByteSource> SerialPort for UsbSerial<S> {
    /// Enable the source; later calls return `Ok` without touching it
    fn initialize(&mut self) -> Result<(), Error> {
        if self.initialized {
            return Ok(());
        }

        self.source.enable().map_err(|fault| {
            error!("USB serial enable failed: {}", fault);
            Error::DriverInstall(fault)
        })?;
        self.initialized = true;

        info!("USB serial initialized");
        Ok(())
    }

    /// Drain the peek slot first, otherwise do one non-blocking read
    fn read_char(&mut self) -> Result<Option<u8>, Error> {
        if !self.initialized {
            return Err(Error::NotInitialized);
        }

        if let Some(byte) = self.lookahead.take() {
            return Ok(Some(byte));
        }

        self.source.try_read().map_err(|fault| {
            warn!("USB serial read failed: {}", fault);
            Error::from_transfer(fault)
        })
    }

    /// Side effect: may move one byte from the backend into the peek slot
    ///
    /// Repeated calls without a read in between do not pull further bytes.
    fn has_data(&mut self) -> bool {
        if !self.initialized {
            return false;
        }

        let source = &mut self.source;
        match self.lookahead.fill_with(|| source.try_read()) {
            Ok(held) => held.is_some(),
            Err(fault) => {
                warn!("USB serial read failed: {}", fault);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockSource;
    use monolink_hal::BusFault;
    use proptest::prelude::*;
    use std::collections::VecDeque;
    use std::vec::Vec;

    fn ready(bytes: &[u8]) -> UsbSerial<MockSource> {
        let mut usb = UsbSerial::new(MockSource::with_bytes(bytes));
        usb.initialize().unwrap();
        usb
    }

    #[test]
    fn test_initialize_is_idempotent() {
        let mut usb = UsbSerial::new(MockSource::default());

        assert_eq!(usb.initialize(), Ok(()));
        assert_eq!(usb.initialize(), Ok(()));
        assert_eq!(usb.source().enables, 1);
        assert!(usb.is_initialized());
    }

    #[test]
    fn test_failed_enable_can_be_retried() {
        let mut usb = UsbSerial::new(MockSource {
            fail_enable: Some(BusFault::InvalidState),
            ..Default::default()
        });

        assert_eq!(
            usb.initialize(),
            Err(Error::DriverInstall(BusFault::InvalidState))
        );
        assert!(!usb.is_initialized());

        usb.source_mut().fail_enable = None;
        assert_eq!(usb.initialize(), Ok(()));
    }

    #[test]
    fn test_has_data_then_read_returns_peeked_byte() {
        let mut usb = ready(b"ab");

        assert!(usb.has_data());
        assert_eq!(usb.lookahead().peek(), Some(b'a'));
        assert_eq!(usb.read_char(), Ok(Some(b'a')));
        assert_eq!(usb.read_char(), Ok(Some(b'b')));
        assert_eq!(usb.read_char(), Ok(None));
    }

    #[test]
    fn test_repeated_has_data_reads_once() {
        let mut usb = ready(b"xyz");

        assert!(usb.has_data());
        assert!(usb.has_data());
        assert!(usb.has_data());
        assert_eq!(usb.source().reads, 1);
        assert_eq!(usb.read_char(), Ok(Some(b'x')));
    }

    #[test]
    fn test_no_data() {
        let mut usb = ready(b"");

        assert!(!usb.has_data());
        assert!(!usb.lookahead().is_present());
        assert_eq!(usb.read_char(), Ok(None));
    }

    #[test]
    fn test_use_before_initialize() {
        let mut usb = UsbSerial::new(MockSource::with_bytes(b"a"));

        assert!(!usb.has_data());
        assert_eq!(usb.read_char(), Err(Error::NotInitialized));
        assert_eq!(usb.source().reads, 0);
    }

    #[test]
    fn test_read_fault() {
        let mut usb = ready(b"a");
        usb.source_mut().fail_read = Some(BusFault::Timeout);

        assert!(!usb.has_data());
        assert_eq!(usb.read_char(), Err(Error::Timeout));

        usb.source_mut().fail_read = None;
        assert_eq!(usb.read_char(), Ok(Some(b'a')));
    }

    proptest! {
        /// Any interleaving of peeks and reads yields the bytes in order
        #[test]
        fn prop_lookahead_preserves_order(
            bytes in proptest::collection::vec(any::<u8>(), 0..32),
            ops in proptest::collection::vec(any::<bool>(), 0..96),
        ) {
            let mut usb = ready(&bytes);
            let mut expected: VecDeque<u8> = bytes.iter().copied().collect();
            let mut received = Vec::new();

            for peek in ops {
                if peek {
                    let front = expected.front().copied();
                    prop_assert_eq!(usb.has_data(), front.is_some());
                    if front.is_some() {
                        // The next read must return exactly this byte
                        prop_assert_eq!(usb.read_char(), Ok(front));
                        expected.pop_front();
                        received.extend(front);
                    }
                } else {
                    let got = usb.read_char().unwrap();
                    prop_assert_eq!(got, expected.pop_front());
                    received.extend(got);
                }
            }

            prop_assert!(bytes.starts_with(&received));
        }
    }
}
