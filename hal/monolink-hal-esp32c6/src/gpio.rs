//! GPIO backend
//!
//! [`EspPin`] wraps an esp-hal `Flex` pin so one type can serve as a
//! control line output or an input, switched by [`OutputPin::configure`].

use esp_hal::gpio::{AnyPin, Flex, InputConfig, OutputConfig, Pin, Pull as EspPull};
use monolink_hal::gpio::{Direction, InputPin, OutputPin, PinConfig, Pull};

fn esp_pull(pull: Pull) -> EspPull {
    match pull {
        Pull::None => EspPull::None,
        Pull::Up => EspPull::Up,
        Pull::Down => EspPull::Down,
    }
}

/// A GPIO pin usable through the monolink pin traits
pub struct EspPin<'d> {
    pin: Flex<'d>,
    number: u8,
}

impl<'d> EspPin<'d> {
    pub fn new(pin: AnyPin<'d>) -> Self {
        let number = pin.number();
        Self {
            pin: Flex::new(pin),
            number,
        }
    }

    /// GPIO number, as used in the board pin assignment
    pub fn number(&self) -> u8 {
        self.number
    }
}

impl OutputPin for EspPin<'_> {
    fn configure(&mut self, config: PinConfig) {
        let output = matches!(
            config.direction,
            Direction::Output | Direction::InputOutput
        );
        let input = matches!(config.direction, Direction::Input | Direction::InputOutput);

        self.pin
            .apply_input_config(&InputConfig::default().with_pull(esp_pull(config.pull)));
        self.pin
            .apply_output_config(&OutputConfig::default().with_pull(esp_pull(config.pull)));
        self.pin.set_input_enable(input);
        self.pin.set_output_enable(output);
    }

    fn set_high(&mut self) {
        self.pin.set_high();
    }

    fn set_low(&mut self) {
        self.pin.set_low();
    }

    fn is_set_high(&self) -> bool {
        self.pin.is_set_high()
    }
}

impl InputPin for EspPin<'_> {
    fn is_high(&self) -> bool {
        self.pin.is_high()
    }
}
