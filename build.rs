fn main() {
    // Propagate ESP-IDF link/cfg/include args from esp-idf-sys.
    if let Err(err) = embuild::build::LinkArgs::output_propagated("ESP_IDF") {
        println!("cargo:warning=esp-idf link args not propagated: {err}");
    }
    if let Err(err) = embuild::build::CfgArgs::output_propagated("ESP_IDF") {
        println!("cargo:warning=esp-idf cfg args not propagated: {err}");
    }

    println!("cargo:rerun-if-env-changed=WIFI_SSID");
    println!("cargo:rerun-if-env-changed=WIFI_PASS");
    println!("cargo:rerun-if-env-changed=UPLOAD_URL");
    println!("cargo:rerun-if-env-changed=DHT_GPIO");
    println!("cargo:rerun-if-env-changed=POLL_PERIOD_SECS");
    println!("cargo:rerun-if-env-changed=TEMP_UNIT");
    println!("cargo:rerun-if-env-changed=YIELD_EVERY");
}
