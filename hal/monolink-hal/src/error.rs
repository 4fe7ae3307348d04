//! Error taxonomy shared by every transport
//!
//! Backends report [`BusFault`]s; transports wrap them into [`Error`] so
//! callers can tell an initialization problem from a transfer problem
//! from a misuse of the API.

use core::fmt;

/// Classified failure reported by a vendor backend
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BusFault {
    /// Operation did not complete within its timeout
    Timeout,
    /// Target did not acknowledge
    Nack,
    /// Another master won bus arbitration
    ArbitrationLost,
    /// Backend rejected an argument (pin, length, frequency)
    InvalidArgument,
    /// Peripheral already claimed or in the wrong state
    InvalidState,
    /// Backend could not allocate buffers or DMA descriptors
    NoMemory,
    /// Anything the backend could not classify
    Other,
}

impl fmt::Display for BusFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            BusFault::Timeout => "timeout",
            BusFault::Nack => "no acknowledge",
            BusFault::ArbitrationLost => "arbitration lost",
            BusFault::InvalidArgument => "invalid argument",
            BusFault::InvalidState => "invalid state",
            BusFault::NoMemory => "out of memory",
            BusFault::Other => "backend error",
        };
        f.write_str(s)
    }
}

/// Error returned by transport operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// Bus creation failed; nothing was set up
    BusInit(BusFault),
    /// Bus exists but the device could not be attached
    DeviceAttach(BusFault),
    /// Serial driver could not be installed or configured
    DriverInstall(BusFault),
    /// `initialize` called on a transport that was already set up
    AlreadyInitialized,
    /// Operation needs a successful `initialize` first
    NotInitialized,
    /// Write called with no bytes
    EmptyWrite,
    /// Write longer than the bus accepts in one transfer
    TransferTooLarge {
        /// Requested length in bytes
        len: usize,
        /// Largest accepted length in bytes
        max: usize,
    },
    /// Transfer did not finish within the bus timeout
    Timeout,
    /// Backend reported an error during a transfer
    Transfer(BusFault),
}

impl Error {
    /// Map a backend fault raised during a transfer
    ///
    /// Timeouts get their own variant so callers can treat them as
    /// transient.
    pub fn from_transfer(fault: BusFault) -> Self {
        match fault {
            BusFault::Timeout => Error::Timeout,
            other => Error::Transfer(other),
        }
    }

    /// True for failures raised before any hardware was touched
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            Error::NotInitialized
                | Error::EmptyWrite
                | Error::AlreadyInitialized
                | Error::TransferTooLarge { .. }
        )
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::BusInit(fault) => write!(f, "bus creation failed: {}", fault),
            Error::DeviceAttach(fault) => write!(f, "device attach failed: {}", fault),
            Error::DriverInstall(fault) => write!(f, "driver install failed: {}", fault),
            Error::AlreadyInitialized => f.write_str("already initialized"),
            Error::NotInitialized => f.write_str("not initialized"),
            Error::EmptyWrite => f.write_str("empty write"),
            Error::TransferTooLarge { len, max } => {
                write!(f, "transfer of {} bytes exceeds limit of {}", len, max)
            }
            Error::Timeout => f.write_str("transfer timed out"),
            Error::Transfer(fault) => write!(f, "transfer failed: {}", fault),
        }
    }
}

impl From<BusFault> for Error {
    fn from(fault: BusFault) -> Self {
        Error::from_transfer(fault)
    }
}
