//! Build-time settings. Every value can be overridden through an environment
//! variable of the same name when building; `build.rs` re-runs on changes.

use std::time::Duration;

use anyhow::{bail, Result};
use log::warn;

use crate::edge::YieldPolicy;
use crate::reading::TemperatureUnit;

const WIFI_SSID: &str = match option_env!("WIFI_SSID") {
    Some(v) => v,
    None => SSID_PLACEHOLDER,
};
const WIFI_PASS: &str = match option_env!("WIFI_PASS") {
    Some(v) => v,
    None => "",
};
const UPLOAD_URL: &str = match option_env!("UPLOAD_URL") {
    Some(v) => v,
    None => "http://192.168.4.107:5000/upload",
};
const DHT_GPIO_ENV: Option<&str> = option_env!("DHT_GPIO");
const POLL_PERIOD_ENV: Option<&str> = option_env!("POLL_PERIOD_SECS");
const TEMP_UNIT_ENV: Option<&str> = option_env!("TEMP_UNIT");
const YIELD_EVERY_ENV: Option<&str> = option_env!("YIELD_EVERY");

const SSID_PLACEHOLDER: &str = "YOUR_WIFI_SSID";
// 802.11 limits, also the capacity of the IDF client configuration strings.
const SSID_MAX_LEN: usize = 32;
const PASS_MAX_LEN: usize = 64;

pub const DHT_GPIO_DEFAULT: i32 = 4;
pub const POLL_PERIOD_DEFAULT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone)]
pub struct StationConfig {
    pub wifi_ssid: &'static str,
    pub wifi_pass: &'static str,
    pub upload_url: &'static str,
    pub dht_gpio: i32,
    pub poll_period: Duration,
    pub unit: TemperatureUnit,
    pub yield_policy: YieldPolicy,
}

impl StationConfig {
    pub fn from_env() -> Self {
        Self {
            wifi_ssid: WIFI_SSID,
            wifi_pass: WIFI_PASS,
            upload_url: UPLOAD_URL,
            dht_gpio: parse_or("DHT_GPIO", DHT_GPIO_ENV, parse_gpio, DHT_GPIO_DEFAULT),
            poll_period: parse_or(
                "POLL_PERIOD_SECS",
                POLL_PERIOD_ENV,
                parse_period,
                POLL_PERIOD_DEFAULT,
            ),
            unit: parse_or("TEMP_UNIT", TEMP_UNIT_ENV, TemperatureUnit::parse, TemperatureUnit::Celsius),
            yield_policy: parse_or(
                "YIELD_EVERY",
                YIELD_EVERY_ENV,
                parse_yield_every,
                YieldPolicy::default(),
            ),
        }
    }

    /// Rejects credentials the access point could never accept.
    pub fn check_wifi(&self) -> Result<()> {
        if self.wifi_ssid.is_empty() || self.wifi_ssid == SSID_PLACEHOLDER {
            bail!("WIFI_SSID not configured");
        }
        if self.wifi_ssid.len() > SSID_MAX_LEN {
            bail!("WIFI_SSID longer than {} bytes", SSID_MAX_LEN);
        }
        if self.wifi_pass.len() > PASS_MAX_LEN {
            bail!("WIFI_PASS longer than {} bytes", PASS_MAX_LEN);
        }
        Ok(())
    }

    /// No password means an open network.
    pub fn is_open_network(&self) -> bool {
        self.wifi_pass.is_empty()
    }
}

fn parse_or<T>(key: &str, raw: Option<&str>, parse: fn(&str) -> Option<T>, default: T) -> T {
    match raw.filter(|v| !v.trim().is_empty()) {
        None => default,
        Some(v) => parse(v).unwrap_or_else(|| {
            warn!("{} has invalid value {:?}, using default", key, v);
            default
        }),
    }
}

fn parse_gpio(text: &str) -> Option<i32> {
    let gpio = text.trim().parse::<i32>().ok()?;
    (0..=48).contains(&gpio).then_some(gpio)
}

fn parse_period(text: &str) -> Option<Duration> {
    let secs = text.trim().parse::<u64>().ok()?;
    (secs > 0).then(|| Duration::from_secs(secs))
}

fn parse_yield_every(text: &str) -> Option<YieldPolicy> {
    let every = text.trim().parse::<u32>().ok()?;
    (every > 0).then(|| YieldPolicy::every(every))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_wifi(ssid: &'static str, pass: &'static str) -> StationConfig {
        StationConfig {
            wifi_ssid: ssid,
            wifi_pass: pass,
            ..StationConfig::from_env()
        }
    }

    #[test]
    fn unset_or_blank_values_use_defaults() {
        assert_eq!(parse_or("DHT_GPIO", None, parse_gpio, 4), 4);
        assert_eq!(parse_or("DHT_GPIO", Some("  "), parse_gpio, 4), 4);
    }

    #[test]
    fn invalid_values_fall_back() {
        assert_eq!(parse_or("DHT_GPIO", Some("gpio4"), parse_gpio, 4), 4);
        assert_eq!(parse_or("DHT_GPIO", Some("99"), parse_gpio, 4), 4);
        assert_eq!(
            parse_or("POLL_PERIOD_SECS", Some("0"), parse_period, POLL_PERIOD_DEFAULT),
            POLL_PERIOD_DEFAULT
        );
    }

    #[test]
    fn valid_values_are_used() {
        assert_eq!(parse_gpio(" 15 "), Some(15));
        assert_eq!(parse_period("60"), Some(Duration::from_secs(60)));
        assert_eq!(parse_yield_every("500"), Some(YieldPolicy::every(500)));
        assert_eq!(parse_yield_every("0"), None);
    }

    #[test]
    fn placeholder_or_empty_ssid_is_rejected() {
        assert!(with_wifi(SSID_PLACEHOLDER, "secret").check_wifi().is_err());
        assert!(with_wifi("", "secret").check_wifi().is_err());
    }

    #[test]
    fn oversized_credentials_are_rejected() {
        let long_ssid = "s".repeat(SSID_MAX_LEN + 1).leak();
        assert!(with_wifi(long_ssid, "").check_wifi().is_err());
        let long_pass = "p".repeat(PASS_MAX_LEN + 1).leak();
        assert!(with_wifi("range", long_pass).check_wifi().is_err());
    }

    #[test]
    fn usable_credentials_pass_and_pick_auth() {
        let secured = with_wifi("range", "dillyboy11");
        assert!(secured.check_wifi().is_ok());
        assert!(!secured.is_open_network());

        let open = with_wifi("s".repeat(SSID_MAX_LEN).leak(), "");
        assert!(open.check_wifi().is_ok());
        assert!(open.is_open_network());
    }
}
