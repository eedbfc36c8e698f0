//! Address geocoding (Nominatim).

use anyhow::Context;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

use crate::domain::{Coordinate, GeocodedPlace};

#[derive(Debug, Error)]
pub enum GeocodeError {
    #[error("no match found for address: {0}")]
    NotFound(String),
    #[error("geocoding upstream error: {0}")]
    Upstream(#[from] anyhow::Error),
}

/// Geocoding collaborator boundary
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Geocoder: Send + Sync {
    async fn resolve(&self, address: &str) -> Result<GeocodedPlace, GeocodeError>;
}

/// Nominatim search client
pub struct NominatimGeocoder {
    client: reqwest::Client,
    base_url: String,
}

impl NominatimGeocoder {
    pub fn new(base_url: String) -> anyhow::Result<Self> {
        let mut headers = HeaderMap::new();
        // Nominatim's usage policy requires an identifying user agent
        headers.insert(USER_AGENT, HeaderValue::from_static("ev-trip-planner/0.2"));
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .default_headers(headers)
            .build()?;
        Ok(Self { client, base_url })
    }
}

#[async_trait]
impl Geocoder for NominatimGeocoder {
    async fn resolve(&self, address: &str) -> Result<GeocodedPlace, GeocodeError> {
        let url = format!("{}/search", self.base_url.trim_end_matches('/'));

        debug!(address, "geocoding address");

        let resp = self
            .client
            .get(&url)
            .query(&[("q", address), ("format", "json"), ("limit", "1")])
            .send()
            .await
            .context("geocode GET failed")?;
        let status = resp.status();
        if !status.is_success() {
            return Err(anyhow::anyhow!("geocoding API error: HTTP {status}").into());
        }

        let matches: Vec<NominatimPlace> =
            resp.json().await.context("geocode JSON parse failed")?;

        let place = matches
            .into_iter()
            .next()
            .ok_or_else(|| GeocodeError::NotFound(address.to_string()))?;

        let lat: f64 = place.lat.parse().context("non-numeric latitude")?;
        let lon: f64 = place.lon.parse().context("non-numeric longitude")?;

        Ok(GeocodedPlace {
            coord: Coordinate::new(lat, lon),
            display_name: place.display_name,
        })
    }
}

// Nominatim returns coordinates as strings
#[derive(Debug, Deserialize)]
struct NominatimPlace {
    lat: String,
    lon: String,
    display_name: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_resolve_first_match() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search"))
            .and(query_param("q", "Denver, CO"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                { "lat": "39.7392", "lon": "-104.9903", "display_name": "Denver, Colorado, USA" },
                { "lat": "39.5", "lon": "-104.5", "display_name": "Denver Tech Center" }
            ])))
            .mount(&server)
            .await;

        let geocoder = NominatimGeocoder::new(server.uri()).unwrap();
        let place = geocoder.resolve("Denver, CO").await.unwrap();
        assert_eq!(place.coord.lat, 39.7392);
        assert_eq!(place.display_name, "Denver, Colorado, USA");
    }

    #[tokio::test]
    async fn test_resolve_no_match_is_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
            .mount(&server)
            .await;

        let geocoder = NominatimGeocoder::new(server.uri()).unwrap();
        let err = geocoder.resolve("Nowheresville").await.unwrap_err();
        assert!(matches!(err, GeocodeError::NotFound(_)));
    }
}
