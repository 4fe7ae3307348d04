//! Board pin assignment
//!
//! Logical roles mapped to GPIO numbers. Fixed for the lifetime of the
//! firmware; change the constants and rebuild to move a signal.

/// Pins used by the I2C master bus
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct I2cPins {
    pub scl: u8,
    pub sda: u8,
}

/// Pins used by the SPI display
///
/// `miso` is `None` for write-only devices. `cs`, `dc` and `rst` are
/// plain GPIOs driven by the caller, not by the SPI peripheral.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SpiPins {
    pub sclk: u8,
    pub mosi: u8,
    pub miso: Option<u8>,
    pub cs: u8,
    pub dc: u8,
    pub rst: u8,
}

/// Full pin map of a board
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PinAssignment {
    pub name: &'static str,
    pub i2c: I2cPins,
    pub spi: SpiPins,
}

impl PinAssignment {
    /// True if no GPIO is assigned to two roles
    pub fn is_conflict_free(&self) -> bool {
        let mut used: u64 = 0;
        let pins = [
            Some(self.i2c.scl),
            Some(self.i2c.sda),
            Some(self.spi.sclk),
            Some(self.spi.mosi),
            self.spi.miso,
            Some(self.spi.cs),
            Some(self.spi.dc),
            Some(self.spi.rst),
        ];
        for pin in pins.into_iter().flatten() {
            if pin >= 64 {
                return false;
            }
            let mask = 1u64 << pin;
            if used & mask != 0 {
                return false;
            }
            used |= mask;
        }
        true
    }
}

/// M5Stack C6L (ESP32-C6 with 64x48 OLED)
pub const M5STACK_C6L: PinAssignment = PinAssignment {
    name: "m5stack_c6l",
    i2c: I2cPins { scl: 4, sda: 5 },
    spi: SpiPins {
        sclk: 20,
        mosi: 21,
        miso: None,
        cs: 6,
        dc: 18,
        rst: 15,
    },
};

/// Pin map the firmware is built for
pub const BOARD: PinAssignment = M5STACK_C6L;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_board_has_no_conflicts() {
        assert!(BOARD.is_conflict_free());
    }

    #[test]
    fn test_conflict_detected() {
        let mut board = M5STACK_C6L;
        board.spi.dc = board.spi.cs;
        assert!(!board.is_conflict_free());
    }
}
