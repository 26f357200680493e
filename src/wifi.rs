use anyhow::{anyhow, Result};
use embedded_svc::wifi::{AuthMethod, ClientConfiguration, Configuration};
use esp_idf_hal::delay::FreeRtos;
use esp_idf_hal::modem::Modem;
use esp_idf_svc::eventloop::EspSystemEventLoop;
use esp_idf_svc::nvs::EspDefaultNvsPartition;
use esp_idf_svc::wifi::{BlockingWifi, EspWifi};
use log::{info, warn};

use crate::config::StationConfig;

const RETRY_DELAY_MS: u32 = 5_000;

/// Joins the configured access point in station mode. Blocks, retrying the
/// association, until the interface has an IP address; sampling only starts
/// once uploads can reach the collector.
pub fn init_wifi(modem: Modem, config: &StationConfig) -> Result<BlockingWifi<EspWifi<'static>>> {
    config.check_wifi()?;

    let sys_loop = EspSystemEventLoop::take()?;
    let nvs = EspDefaultNvsPartition::take()?;
    let mut wifi = BlockingWifi::wrap(
        EspWifi::new(modem, sys_loop.clone(), Some(nvs))?,
        sys_loop,
    )?;

    let auth_method = if config.is_open_network() {
        AuthMethod::None
    } else {
        AuthMethod::WPA2Personal
    };
    wifi.set_configuration(&Configuration::Client(ClientConfiguration {
        ssid: config
            .wifi_ssid
            .try_into()
            .map_err(|_| anyhow!("WIFI_SSID does not fit the client config"))?,
        password: config
            .wifi_pass
            .try_into()
            .map_err(|_| anyhow!("WIFI_PASS does not fit the client config"))?,
        auth_method,
        ..Default::default()
    }))?;
    wifi.start()?;

    let mut attempt = 1u32;
    while let Err(e) = wifi.connect() {
        warn!(
            "Wi-Fi connect to {} failed (attempt {}): {:?}",
            config.wifi_ssid, attempt, e
        );
        attempt += 1;
        FreeRtos::delay_ms(RETRY_DELAY_MS);
    }
    wifi.wait_netif_up()?;

    let ip = wifi.wifi().sta_netif().get_ip_info()?;
    info!("Wi-Fi connected to {}, ip {}", config.wifi_ssid, ip.ip);
    Ok(wifi)
}
