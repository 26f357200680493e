//! DHT11 sampling station for ESP32.
//!
//! The protocol code (`line`, `timer`, `edge`, `dht11`, `reading`) and the
//! sampling loop (`station`) are hardware independent and run on the host
//! under test. Modules that touch ESP-IDF are only built for `espidf`.

pub mod config;
pub mod dht11;
pub mod display;
pub mod edge;
pub mod line;
pub mod reading;
pub mod station;
pub mod timer;
pub mod uploader;

#[cfg(target_os = "espidf")]
pub mod board;
#[cfg(target_os = "espidf")]
pub mod wifi;

#[cfg(test)]
mod sim;
