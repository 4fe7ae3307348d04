//! GPIO pin abstractions
//!
//! Discrete control lines (chip-select, data/command, reset) are driven
//! through these traits. Chip-specific HALs wrap their own pin types.

/// Logic level of a pin
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Level {
    Low,
    High,
}

impl Level {
    /// Interpret a raw level the way the display callbacks pass it (0 = low)
    pub fn from_raw(raw: u8) -> Self {
        if raw == 0 {
            Level::Low
        } else {
            Level::High
        }
    }

    pub fn is_high(self) -> bool {
        self == Level::High
    }
}

impl From<bool> for Level {
    fn from(high: bool) -> Self {
        if high {
            Level::High
        } else {
            Level::Low
        }
    }
}

impl core::ops::Not for Level {
    type Output = Level;

    fn not(self) -> Level {
        match self {
            Level::Low => Level::High,
            Level::High => Level::Low,
        }
    }
}

/// Pin direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Direction {
    Input,
    Output,
    InputOutput,
}

/// Internal pull resistor selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Pull {
    #[default]
    None,
    Up,
    Down,
}

/// Direction and pull configuration applied to a pin
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PinConfig {
    pub direction: Direction,
    pub pull: Pull,
}

impl PinConfig {
    /// Push-pull output without pull resistors
    pub const OUTPUT: Self = Self {
        direction: Direction::Output,
        pull: Pull::None,
    };

    /// Input with internal pull-up
    pub const INPUT_PULLUP: Self = Self {
        direction: Direction::Input,
        pull: Pull::Up,
    };

    pub const fn new(direction: Direction, pull: Pull) -> Self {
        Self { direction, pull }
    }
}

/// Digital output pin
///
/// Pin writes are treated as infallible; a backend that can fail
/// should log and carry on.
pub trait OutputPin {
    /// Apply direction and pull configuration
    fn configure(&mut self, config: PinConfig);

    /// Set the pin high (logic 1)
    fn set_high(&mut self);

    /// Set the pin low (logic 0)
    fn set_low(&mut self);

    /// Set the pin to a specific level
    fn set_level(&mut self, level: Level) {
        match level {
            Level::High => self.set_high(),
            Level::Low => self.set_low(),
        }
    }

    /// Check if the pin is currently driven high
    fn is_set_high(&self) -> bool;

    /// Currently driven level
    fn output_level(&self) -> Level {
        Level::from(self.is_set_high())
    }
}

/// Digital input pin
pub trait InputPin {
    /// Check if the pin reads high (logic 1)
    fn is_high(&self) -> bool;

    /// Check if the pin reads low (logic 0)
    fn is_low(&self) -> bool {
        !self.is_high()
    }
}
