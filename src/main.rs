// main.rs
// ESP32 + DHT11 weather station
//
// Every poll period the DHT11 on GPIO4 is read by bit-banging its one-wire
// protocol, the result is shown on a 128x64 SSD1306 OLED and POSTed as JSON
// to UPLOAD_URL.
//
// Pin map:
// DHT11 data: GPIO4 (pull-up enabled)
// OLED (I2C): SDA=GPIO21, SCL=GPIO22

#[cfg(target_os = "espidf")]
fn main() -> anyhow::Result<()> {
    use anyhow::anyhow;
    use dht11_station::board::Board;
    use dht11_station::config::StationConfig;
    use dht11_station::dht11::Dht11;
    use dht11_station::station::{
        Station, SAMPLER_STACK_SIZE, SAMPLER_TASK_NAME, SAMPLER_TASK_PRIORITY,
    };
    use dht11_station::timer::{EspTimer, FreeRtosScheduler};
    use dht11_station::uploader::HttpUploader;
    use esp_idf_hal::task::thread::ThreadSpawnConfiguration;
    use esp_idf_svc::log::EspLogger;
    use esp_idf_sys as sys;
    use log::info;

    sys::link_patches();
    EspLogger::initialize_default();

    let config = StationConfig::from_env();
    info!(
        "Polling every {:?}, uploading to {} in {}",
        config.poll_period, config.upload_url, config.unit
    );

    // The Wi-Fi driver stays owned by this thread for the life of the app.
    let Board {
        line,
        display,
        wifi: _wifi,
    } = Board::init(&config)?;

    let sensor = Dht11::with_policy(line, EspTimer, FreeRtosScheduler, config.yield_policy);
    let mut station = Station::new(
        sensor,
        display,
        HttpUploader::new(config.upload_url),
        FreeRtosScheduler,
    )
    .with_period(config.poll_period)
    .with_unit(config.unit);

    // Applies to the next std thread spawned from here, then reset.
    ThreadSpawnConfiguration {
        name: Some(SAMPLER_TASK_NAME),
        priority: SAMPLER_TASK_PRIORITY,
        stack_size: SAMPLER_STACK_SIZE,
        ..Default::default()
    }
    .set()?;
    let sampler = std::thread::Builder::new()
        .stack_size(SAMPLER_STACK_SIZE)
        .spawn(move || station.run())?;
    ThreadSpawnConfiguration::default().set()?;

    sampler
        .join()
        .map_err(|_| anyhow!("sampling thread panicked"))?;
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
fn main() {
    eprintln!("dht11-station only runs on ESP-IDF targets; build it with the esp toolchain");
}
