//! HTTP upload of each reading as a small JSON document.

/// `{"temperature": 24.05, "humidity": 50.00}`
pub fn json_body(temperature: f32, humidity: f32) -> String {
    format!(r#"{{"temperature": {temperature:.2}, "humidity": {humidity:.2}}}"#)
}

#[cfg(target_os = "espidf")]
pub use esp::HttpUploader;

#[cfg(target_os = "espidf")]
mod esp {
    use anyhow::Result;
    use embedded_svc::http::client::Client as HttpClient;
    use embedded_svc::io::Write;
    use esp_idf_svc::http::client::{Configuration, EspHttpConnection};
    use log::{error, info};

    use super::json_body;
    use crate::station::Uploader;

    /// One POST per reading. The response body is never read.
    pub struct HttpUploader {
        url: &'static str,
    }

    impl HttpUploader {
        pub fn new(url: &'static str) -> Self {
            Self { url }
        }

        fn post(&self, body: &str) -> Result<u16> {
            let mut client = HttpClient::wrap(EspHttpConnection::new(&Configuration::default())?);
            let content_length = body.len().to_string();
            let headers = [
                ("Content-Type", "application/json"),
                ("Content-Length", content_length.as_str()),
            ];

            let mut request = client.post(self.url, &headers)?;
            request.write_all(body.as_bytes())?;
            request.flush()?;
            let response = request.submit()?;
            Ok(response.status())
        }
    }

    impl Uploader for HttpUploader {
        fn upload(&mut self, temperature: f32, humidity: f32) -> Result<()> {
            let body = json_body(temperature, humidity);
            match self.post(&body) {
                Ok(status) => info!("POST status = {}", status),
                Err(e) => error!("POST to {} failed: {:?}", self.url, e),
            }
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn body_uses_two_decimals() {
        assert_eq!(
            json_body(24.05, 50.0),
            r#"{"temperature": 24.05, "humidity": 50.00}"#
        );
    }

    #[test]
    fn body_handles_fahrenheit_values() {
        assert_eq!(
            json_body(75.29, 41.5),
            r#"{"temperature": 75.29, "humidity": 41.50}"#
        );
    }
}
