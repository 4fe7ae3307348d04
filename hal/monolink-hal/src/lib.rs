//! Monolink Hardware Abstraction Layer
//!
//! This crate defines the traits and configuration types the monolink
//! transports are written against. Chip-specific crates implement the
//! backend traits; `monolink-drivers` builds the transports on top.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  Application (monolink-firmware)        │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  monolink-drivers (transports)          │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  monolink-hal (this crate - traits)     │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  monolink-hal-esp32c6                   │
//! └─────────────────────────────────────────┘
//! ```
//!
//! # Traits
//!
//! - [`gpio::OutputPin`], [`gpio::InputPin`] - Digital I/O
//! - [`bus::BusController`] - Create bus, attach device, transmit
//! - [`serial::SerialPort`] - Poll-driven byte input
//! - [`serial::UartDriver`], [`serial::ByteSource`] - Serial backends
//! - [`clock::Clock`] - Millisecond tick counter

#![no_std]
#![deny(unsafe_code)]

pub mod bus;
pub mod clock;
pub mod error;
pub mod gpio;
pub mod i2c;
pub mod pins;
pub mod serial;
pub mod spi;

// Re-export key traits at crate root for convenience
pub use bus::{BusController, BusLink};
pub use clock::{Clock, Deadline, DelayNs};
pub use error::{BusFault, Error};
pub use gpio::{InputPin, Level, OutputPin};
pub use i2c::I2cController;
pub use serial::{ByteSource, SerialPort, UartDriver};
pub use spi::SpiController;
