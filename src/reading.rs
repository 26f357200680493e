use core::fmt;

use crate::dht11::DecodeError;

pub const FRAME_LEN: usize = 5;

/// Checksum byte the sensor should send for the four data bytes.
pub fn checksum(data: &[u8]) -> u8 {
    data.iter().fold(0u8, |sum, b| sum.wrapping_add(*b))
}

/// One checksum-validated DHT11 transfer:
/// `[humidity_int, humidity_frac, temp_int, temp_frac, checksum]`.
///
/// The only way to get one is through [`RawFrame::from_bytes`], so holding a
/// `RawFrame` means the checksum matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawFrame([u8; FRAME_LEN]);

impl RawFrame {
    pub fn from_bytes(bytes: [u8; FRAME_LEN]) -> Result<Self, DecodeError> {
        let expected = checksum(&bytes[..4]);
        if expected != bytes[4] {
            return Err(DecodeError::ChecksumFailed {
                expected,
                actual: bytes[4],
            });
        }
        Ok(Self(bytes))
    }

    pub fn bytes(&self) -> &[u8; FRAME_LEN] {
        &self.0
    }

    pub fn humidity_int(&self) -> u8 {
        self.0[0]
    }

    pub fn humidity_frac(&self) -> u8 {
        self.0[1]
    }

    pub fn temp_int(&self) -> u8 {
        self.0[2]
    }

    pub fn temp_frac(&self) -> u8 {
        self.0[3]
    }

    // Fractional bytes above 99 are passed through; the checksum is the only
    // validation the sensor offers.
    pub fn to_reading(&self) -> Reading {
        Reading {
            temperature_c: f32::from(self.temp_int()) + f32::from(self.temp_frac()) / 100.0,
            humidity_pct: f32::from(self.humidity_int()) + f32::from(self.humidity_frac()) / 100.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Reading {
    pub temperature_c: f32,
    pub humidity_pct: f32,
}

impl Reading {
    pub fn temperature_f(&self) -> f32 {
        self.temperature_c * 1.8 + 32.0
    }

    pub fn temperature_in(&self, unit: TemperatureUnit) -> f32 {
        match unit {
            TemperatureUnit::Celsius => self.temperature_c,
            TemperatureUnit::Fahrenheit => self.temperature_f(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TemperatureUnit {
    #[default]
    Celsius,
    Fahrenheit,
}

impl TemperatureUnit {
    pub fn parse(text: &str) -> Option<Self> {
        match text.trim().to_ascii_lowercase().as_str() {
            "c" | "celsius" => Some(Self::Celsius),
            "f" | "fahrenheit" => Some(Self::Fahrenheit),
            _ => None,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Celsius => "C",
            Self::Fahrenheit => "F",
        }
    }
}

impl fmt::Display for TemperatureUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}
