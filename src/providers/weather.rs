//! Live weather integration (OpenWeatherMap current-conditions API).
//!
//! Any failure here is absorbed by the condition service, which falls back
//! to its synthetic generator; nothing in this module surfaces to callers.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use crate::domain::WeatherObservation;

/// Weather collaborator boundary
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait WeatherProvider: Send + Sync {
    async fn fetch(&self, lat: f64, lon: f64) -> Result<WeatherObservation>;
}

/// OpenWeatherMap current-conditions client
pub struct OpenWeatherClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl OpenWeatherClient {
    pub fn new(base_url: String, api_key: String) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static("ev-trip-planner/0.2"));
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .default_headers(headers)
            .build()?;
        Ok(Self {
            client,
            base_url,
            api_key,
        })
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherClient {
    async fn fetch(&self, lat: f64, lon: f64) -> Result<WeatherObservation> {
        let url = format!(
            "{}/data/2.5/weather?lat={:.4}&lon={:.4}&units=imperial&appid={}",
            self.base_url.trim_end_matches('/'),
            lat,
            lon,
            self.api_key
        );

        debug!(lat, lon, "fetching current conditions");

        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .context("weather GET failed")?;
        let status = resp.status();
        if !status.is_success() {
            anyhow::bail!("weather API error: HTTP {status}");
        }

        let raw: OwmResponse = resp.json().await.context("weather JSON parse failed")?;

        let condition_label = raw
            .weather
            .first()
            .map(|w| w.description.clone())
            .unwrap_or_else(|| "clear".to_string());

        Ok(WeatherObservation {
            temperature_f: raw.main.temp,
            condition_label,
            humidity_percent: raw.main.humidity,
            wind_speed_mph: raw.wind.map(|w| w.speed).unwrap_or(0.0),
            visibility_miles: raw.visibility.unwrap_or(10_000.0) / 1609.344,
            is_daytime: raw
                .sys
                .as_ref()
                .map(|s| raw.dt >= s.sunrise && raw.dt < s.sunset)
                .unwrap_or(true),
        })
    }
}

// OpenWeatherMap response structures
#[derive(Debug, Deserialize)]
struct OwmResponse {
    main: OwmMain,
    weather: Vec<OwmWeather>,
    wind: Option<OwmWind>,
    visibility: Option<f64>,
    sys: Option<OwmSys>,
    dt: i64,
}

#[derive(Debug, Deserialize)]
struct OwmMain {
    temp: f64,
    humidity: f64,
}

#[derive(Debug, Deserialize)]
struct OwmWeather {
    description: String,
}

#[derive(Debug, Deserialize)]
struct OwmWind {
    speed: f64,
}

#[derive(Debug, Deserialize)]
struct OwmSys {
    sunrise: i64,
    sunset: i64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn owm_body(temp: f64, description: &str) -> serde_json::Value {
        serde_json::json!({
            "main": { "temp": temp, "humidity": 60.0 },
            "weather": [{ "description": description }],
            "wind": { "speed": 8.5 },
            "visibility": 8046.7,
            "sys": { "sunrise": 1_700_000_000, "sunset": 1_700_040_000 },
            "dt": 1_700_020_000
        })
    }

    #[tokio::test]
    async fn test_fetch_translates_response() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/data/2.5/weather"))
            .respond_with(ResponseTemplate::new(200).set_body_json(owm_body(28.4, "light snow")))
            .mount(&server)
            .await;

        let client = OpenWeatherClient::new(server.uri(), "test-key".to_string()).unwrap();
        let obs = client.fetch(44.98, -93.27).await.unwrap();

        assert_eq!(obs.temperature_f, 28.4);
        assert_eq!(obs.condition_label, "light snow");
        assert!((obs.visibility_miles - 5.0).abs() < 0.01);
        assert!(obs.is_daytime);
    }

    #[tokio::test]
    async fn test_fetch_surfaces_http_errors() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let client = OpenWeatherClient::new(server.uri(), "bad-key".to_string()).unwrap();
        assert!(client.fetch(44.98, -93.27).await.is_err());
    }
}
