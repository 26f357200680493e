//! Single-wire data line control.
//!
//! The DHT11 shares one bidirectional pin for both directions of the
//! conversation. The host drives it during the start signal and then lets
//! go so the pull-up and the sensor own the level.

use core::ops::Not;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PinLevel {
    Low,
    High,
}

impl PinLevel {
    pub fn is_high(self) -> bool {
        self == PinLevel::High
    }
}

impl From<bool> for PinLevel {
    fn from(high: bool) -> Self {
        if high {
            PinLevel::High
        } else {
            PinLevel::Low
        }
    }
}

impl Not for PinLevel {
    type Output = PinLevel;

    fn not(self) -> PinLevel {
        match self {
            PinLevel::Low => PinLevel::High,
            PinLevel::High => PinLevel::Low,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Input,
    Output,
}

/// Raw hardware commands for the data pin.
///
/// None of these can fail from the decoder's point of view. `write` is only
/// meaningful while the line is an output and `read` while it is an input.
pub trait DataLine {
    fn set_direction(&mut self, direction: Direction);
    fn write(&mut self, level: PinLevel);
    fn read(&mut self) -> PinLevel;
}

impl<L: DataLine + ?Sized> DataLine for &mut L {
    fn set_direction(&mut self, direction: Direction) {
        (**self).set_direction(direction)
    }

    fn write(&mut self, level: PinLevel) {
        (**self).write(level)
    }

    fn read(&mut self) -> PinLevel {
        (**self).read()
    }
}

#[cfg(target_os = "espidf")]
pub use esp::EspDataLine;

#[cfg(target_os = "espidf")]
mod esp {
    use esp_idf_sys as sys;
    use log::warn;

    use super::{DataLine, Direction, PinLevel};

    /// Data line on a plain ESP32 GPIO, driven through the IDF gpio driver.
    pub struct EspDataLine {
        gpio: i32,
    }

    impl EspDataLine {
        // Idles as an input with the internal pull-up, so the bus floats high.
        pub fn new(gpio: i32) -> Self {
            unsafe {
                sys::esp_rom_gpio_pad_select_gpio(gpio as u32);
                sys::gpio_set_direction(gpio, sys::gpio_mode_t_GPIO_MODE_INPUT);
                let err = sys::gpio_set_pull_mode(gpio, sys::gpio_pull_mode_t_GPIO_PULLUP_ONLY);
                if err != sys::ESP_OK as i32 {
                    warn!("GPIO{} pull-up not enabled (err {})", gpio, err);
                }
            }
            Self { gpio }
        }
    }

    impl DataLine for EspDataLine {
        fn set_direction(&mut self, direction: Direction) {
            let mode = match direction {
                Direction::Input => sys::gpio_mode_t_GPIO_MODE_INPUT,
                Direction::Output => sys::gpio_mode_t_GPIO_MODE_OUTPUT,
            };
            unsafe {
                sys::gpio_set_direction(self.gpio, mode);
            }
        }

        fn write(&mut self, level: PinLevel) {
            unsafe {
                sys::gpio_set_level(self.gpio, u32::from(level.is_high()));
            }
        }

        fn read(&mut self) -> PinLevel {
            PinLevel::from(unsafe { sys::gpio_get_level(self.gpio) } != 0)
        }
    }
}
