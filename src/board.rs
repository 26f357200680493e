use anyhow::Result;
use esp_idf_hal::i2c::{I2cConfig, I2cDriver};
use esp_idf_hal::peripherals::Peripherals;
use esp_idf_hal::prelude::*;
use esp_idf_svc::wifi::{BlockingWifi, EspWifi};
use log::{error, info};

use crate::config::StationConfig;
use crate::display::OledDisplay;
use crate::line::EspDataLine;
use crate::wifi::init_wifi;

// OLED on I2C0: SDA=GPIO21, SCL=GPIO22
pub struct Board {
    pub line: EspDataLine,
    pub display: Option<OledDisplay>,
    pub wifi: BlockingWifi<EspWifi<'static>>,
}

impl Board {
    pub fn init(config: &StationConfig) -> Result<Self> {
        let Peripherals {
            pins, i2c0, modem, ..
        } = Peripherals::take()?;

        let i2c_cfg = I2cConfig::new().baudrate(400.kHz().into());
        let i2c = I2cDriver::new(i2c0, pins.gpio21, pins.gpio22, &i2c_cfg)?;

        // The station is still useful without a screen.
        let display = match OledDisplay::new(i2c, config.unit) {
            Ok(mut display) => {
                if let Err(e) = display.splash("Starting up...") {
                    error!("Splash failed: {:?}", e);
                }
                Some(display)
            }
            Err(e) => {
                error!("OLED init failed: {:?}", e);
                None
            }
        };

        let wifi = init_wifi(modem, config)?;

        info!("DHT11 sensor on GPIO{}", config.dht_gpio);
        // The data pin is picked by number at build time and driven through
        // the raw gpio driver, so it is deliberately left outside HAL pin
        // ownership; nothing else here claims it from `pins`.
        let line = EspDataLine::new(config.dht_gpio);

        Ok(Self {
            line,
            display,
            wifi,
        })
    }
}
