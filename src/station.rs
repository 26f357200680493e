//! Periodic sampling loop: read the sensor, hand good readings to the
//! display and the uploader, log everything else and try again next period.

use std::time::Duration;

use anyhow::Result;
use log::{error, info, warn};

use crate::dht11::{DecodeError, FrameSource};
use crate::reading::{Reading, TemperatureUnit};
use crate::timer::Scheduler;

/// Something that shows the latest values.
pub trait ReadingDisplay {
    fn render(&mut self, temperature: f32, humidity: f32) -> Result<()>;
}

/// Best-effort delivery of a reading to a remote collector.
pub trait Uploader {
    fn upload(&mut self, temperature: f32, humidity: f32) -> Result<()>;
}

// A missing collaborator (e.g. the OLED did not probe) is simply skipped.
impl<D: ReadingDisplay> ReadingDisplay for Option<D> {
    fn render(&mut self, temperature: f32, humidity: f32) -> Result<()> {
        match self {
            Some(display) => display.render(temperature, humidity),
            None => Ok(()),
        }
    }
}

impl<U: Uploader> Uploader for Option<U> {
    fn upload(&mut self, temperature: f32, humidity: f32) -> Result<()> {
        match self {
            Some(uploader) => uploader.upload(temperature, humidity),
            None => Ok(()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Cycle {
    Forwarded(Reading),
    Skipped(DecodeError),
}

// FreeRTOS task settings for the thread that runs `Station::run`. The IDF
// thread config wants a NUL-terminated name.
pub const SAMPLER_TASK_NAME: &[u8] = b"dht_task\0";
pub const SAMPLER_TASK_PRIORITY: u8 = 5;
pub const SAMPLER_STACK_SIZE: usize = 8 * 1024;

pub struct Station<F, D, U, S> {
    sensor: F,
    display: D,
    uploader: U,
    scheduler: S,
    period: Duration,
    unit: TemperatureUnit,
}

impl<F, D, U, S> Station<F, D, U, S>
where
    F: FrameSource,
    D: ReadingDisplay,
    U: Uploader,
    S: Scheduler,
{
    pub fn new(sensor: F, display: D, uploader: U, scheduler: S) -> Self {
        Self {
            sensor,
            display,
            uploader,
            scheduler,
            period: Duration::from_secs(30),
            unit: TemperatureUnit::Celsius,
        }
    }

    pub fn with_period(mut self, period: Duration) -> Self {
        self.period = period;
        self
    }

    pub fn with_unit(mut self, unit: TemperatureUnit) -> Self {
        self.unit = unit;
        self
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// One sampling cycle. Never fails: sensor and collaborator problems are
    /// logged and the cycle ends early.
    pub fn poll_once(&mut self) -> Cycle {
        let frame = match self.sensor.read_frame() {
            Ok(frame) => frame,
            Err(err) => {
                warn!("Failed to read from DHT sensor: {}", err);
                return Cycle::Skipped(err);
            }
        };

        let reading = frame.to_reading();
        let temperature = reading.temperature_in(self.unit);
        let humidity = reading.humidity_pct;
        info!(
            "Temperature: {:.2}°{}, Humidity: {:.2}%",
            temperature, self.unit, humidity
        );

        if let Err(e) = self.display.render(temperature, humidity) {
            error!("Display update failed: {:?}", e);
        }
        if let Err(e) = self.uploader.upload(temperature, humidity) {
            error!("Upload failed: {:?}", e);
        }

        Cycle::Forwarded(reading)
    }

    pub fn run(&mut self) -> ! {
        info!("Sampling every {} s", self.period.as_secs());
        let period_ms = u32::try_from(self.period.as_millis()).unwrap_or(u32::MAX);
        loop {
            self.poll_once();
            self.scheduler.delay_ms(period_ms);
        }
    }
}
