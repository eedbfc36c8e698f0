//! Turn-by-turn routing (OSRM HTTP API).

use anyhow::Context;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

use crate::domain::{Coordinate, RouteGeometry};

#[derive(Debug, Error)]
pub enum RouteError {
    #[error("no drivable route between the given coordinates")]
    NoRoute,
    #[error("routing upstream error: {0}")]
    Upstream(#[from] anyhow::Error),
}

/// Routing collaborator boundary
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RouteProvider: Send + Sync {
    /// Returns at least one geometry; alternatives are capped upstream.
    async fn route(
        &self,
        origin: Coordinate,
        destination: Coordinate,
    ) -> Result<Vec<RouteGeometry>, RouteError>;
}

/// OSRM route service client
pub struct OsrmRouteProvider {
    client: reqwest::Client,
    base_url: String,
    profile: String,
    max_alternatives: u8,
}

impl OsrmRouteProvider {
    pub fn new(base_url: String, max_alternatives: u8) -> anyhow::Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static("ev-trip-planner/0.2"));
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(15))
            .default_headers(headers)
            .build()?;
        Ok(Self {
            client,
            base_url,
            profile: "driving".to_string(),
            max_alternatives,
        })
    }
}

#[async_trait]
impl RouteProvider for OsrmRouteProvider {
    async fn route(
        &self,
        origin: Coordinate,
        destination: Coordinate,
    ) -> Result<Vec<RouteGeometry>, RouteError> {
        // OSRM expects lon,lat ordering
        let url = format!(
            "{}/route/v1/{}/{:.6},{:.6};{:.6},{:.6}",
            self.base_url.trim_end_matches('/'),
            self.profile,
            origin.lon,
            origin.lat,
            destination.lon,
            destination.lat
        );

        debug!(%origin, %destination, "requesting route alternatives");

        let resp = self
            .client
            .get(&url)
            .query(&[
                ("alternatives", self.max_alternatives.to_string()),
                ("overview", "full".to_string()),
                ("geometries", "geojson".to_string()),
            ])
            .send()
            .await
            .context("route GET failed")?;
        let status = resp.status();
        if !status.is_success() {
            return Err(anyhow::anyhow!("routing API error: HTTP {status}").into());
        }

        let raw: OsrmRouteResponse = resp.json().await.context("route JSON parse failed")?;
        if raw.code != "Ok" || raw.routes.is_empty() {
            return Err(RouteError::NoRoute);
        }

        let routes = raw
            .routes
            .into_iter()
            .map(|r| RouteGeometry {
                distance_meters: r.distance,
                duration_seconds: r.duration,
                points: r
                    .geometry
                    .coordinates
                    .into_iter()
                    .map(|[lon, lat]| Coordinate::new(lat, lon))
                    .collect(),
            })
            .collect();

        Ok(routes)
    }
}

// OSRM response structures (geojson geometry)
#[derive(Debug, Deserialize)]
struct OsrmRouteResponse {
    code: String,
    #[serde(default)]
    routes: Vec<OsrmRoute>,
}

#[derive(Debug, Deserialize)]
struct OsrmRoute {
    distance: f64,
    duration: f64,
    geometry: OsrmGeometry,
}

#[derive(Debug, Deserialize)]
struct OsrmGeometry {
    coordinates: Vec<[f64; 2]>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path_regex};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn osrm_body() -> serde_json::Value {
        serde_json::json!({
            "code": "Ok",
            "routes": [
                {
                    "distance": 321_868.8,
                    "duration": 11_520.0,
                    "geometry": { "coordinates": [[-104.9903, 39.7392], [-105.5, 39.9], [-106.8175, 39.1911]] }
                },
                {
                    "distance": 338_000.0,
                    "duration": 12_400.0,
                    "geometry": { "coordinates": [[-104.9903, 39.7392], [-106.8175, 39.1911]] }
                }
            ]
        })
    }

    #[tokio::test]
    async fn test_route_parses_alternatives() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path_regex(r"^/route/v1/driving/.*"))
            .respond_with(ResponseTemplate::new(200).set_body_json(osrm_body()))
            .mount(&server)
            .await;

        let provider = OsrmRouteProvider::new(server.uri(), 3).unwrap();
        let routes = provider
            .route(
                Coordinate::new(39.7392, -104.9903),
                Coordinate::new(39.1911, -106.8175),
            )
            .await
            .unwrap();

        assert_eq!(routes.len(), 2);
        assert_eq!(routes[0].points.len(), 3);
        // geojson pairs come back lon-first and must be flipped
        assert_eq!(routes[0].points[0].lat, 39.7392);
        assert_eq!(routes[0].points[0].lon, -104.9903);
    }

    #[tokio::test]
    async fn test_no_route_code_maps_to_no_route() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "code": "NoRoute", "routes": []
            })))
            .mount(&server)
            .await;

        let provider = OsrmRouteProvider::new(server.uri(), 3).unwrap();
        let err = provider
            .route(Coordinate::new(0.0, 0.0), Coordinate::new(1.0, 1.0))
            .await
            .unwrap_err();
        assert!(matches!(err, RouteError::NoRoute));
    }
}
