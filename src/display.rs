//! Text status screen for a 128x64 monochrome OLED.

use embedded_graphics::mono_font::{ascii::FONT_6X10, MonoTextStyle};
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::text::{Baseline, Text};

use crate::reading::TemperatureUnit;

// Text rows are 8 px tall, matching the panel's RAM pages.
const ROW_H: i32 = 8;
const SPLASH_ROW: i32 = 0;
const TEMP_ROW: i32 = 3;
const HUMID_ROW: i32 = 5;

pub fn temperature_line(temperature: f32, unit: TemperatureUnit) -> String {
    format!("Temp: {:.2}{}", temperature, unit)
}

pub fn humidity_line(humidity: f32) -> String {
    format!("Humid: {:.2}%", humidity)
}

fn draw_row<D>(target: &mut D, row: i32, text: &str) -> Result<(), D::Error>
where
    D: DrawTarget<Color = BinaryColor>,
{
    let style = MonoTextStyle::new(&FONT_6X10, BinaryColor::On);
    Text::with_baseline(text, Point::new(0, row * ROW_H), style, Baseline::Top).draw(target)?;
    Ok(())
}

pub fn draw_splash<D>(target: &mut D, text: &str) -> Result<(), D::Error>
where
    D: DrawTarget<Color = BinaryColor>,
{
    target.clear(BinaryColor::Off)?;
    draw_row(target, SPLASH_ROW, text)
}

pub fn draw_reading<D>(
    target: &mut D,
    temperature: f32,
    humidity: f32,
    unit: TemperatureUnit,
) -> Result<(), D::Error>
where
    D: DrawTarget<Color = BinaryColor>,
{
    target.clear(BinaryColor::Off)?;
    draw_row(target, TEMP_ROW, &temperature_line(temperature, unit))?;
    draw_row(target, HUMID_ROW, &humidity_line(humidity))
}

#[cfg(target_os = "espidf")]
pub use esp::OledDisplay;

#[cfg(target_os = "espidf")]
mod esp {
    use anyhow::{anyhow, Result};
    use esp_idf_hal::i2c::I2cDriver;
    use ssd1306::mode::BufferedGraphicsMode;
    use ssd1306::prelude::*;
    use ssd1306::{I2CDisplayInterface, Ssd1306};

    use super::{draw_reading, draw_splash};
    use crate::reading::TemperatureUnit;
    use crate::station::ReadingDisplay;

    type Panel = Ssd1306<
        I2CInterface<I2cDriver<'static>>,
        DisplaySize128x64,
        BufferedGraphicsMode<DisplaySize128x64>,
    >;

    pub struct OledDisplay {
        panel: Panel,
        unit: TemperatureUnit,
    }

    impl OledDisplay {
        pub fn new(i2c: I2cDriver<'static>, unit: TemperatureUnit) -> Result<Self> {
            let interface = I2CDisplayInterface::new(i2c);
            let mut panel = Ssd1306::new(interface, DisplaySize128x64, DisplayRotation::Rotate0)
                .into_buffered_graphics_mode();
            panel
                .init()
                .map_err(|e| anyhow!("SSD1306 init failed: {:?}", e))?;
            panel
                .set_brightness(Brightness::BRIGHTEST)
                .map_err(|e| anyhow!("SSD1306 contrast failed: {:?}", e))?;
            Ok(Self { panel, unit })
        }

        pub fn splash(&mut self, text: &str) -> Result<()> {
            draw_splash(&mut self.panel, text).map_err(|e| anyhow!("{:?}", e))?;
            self.flush()
        }

        fn flush(&mut self) -> Result<()> {
            self.panel
                .flush()
                .map_err(|e| anyhow!("SSD1306 flush failed: {:?}", e))
        }
    }

    impl ReadingDisplay for OledDisplay {
        fn render(&mut self, temperature: f32, humidity: f32) -> Result<()> {
            draw_reading(&mut self.panel, temperature, humidity, self.unit)
                .map_err(|e| anyhow!("{:?}", e))?;
            self.flush()
        }
    }
}
