//! Charging-station lookups (NREL Alternative Fuel Stations API).
//!
//! The real client needs an API key; without one the planner runs in demo
//! mode and wires [`DemoStationProvider`] instead, which synthesizes a
//! deterministic station grid. The grid is keyed by spatial cell, not by
//! query, so overlapping queries see the same stations under the same
//! provider ids and the aggregator's dedup path behaves as it does against
//! the live API.

use anyhow::{Context, Result};
use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use serde::Deserialize;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::time::Duration;
use tracing::debug;

use crate::domain::{Coordinate, RawStation};

/// Station collaborator boundary
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StationProvider: Send + Sync {
    async fn query(
        &self,
        lat: f64,
        lon: f64,
        radius_miles: f64,
        max_results: usize,
    ) -> Result<Vec<RawStation>>;
}

/// NREL Alternative Fuel Stations client
pub struct NrelStationClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl NrelStationClient {
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
impl StationProvider for NrelStationClient {
    async fn query(
        &self,
        lat: f64,
        lon: f64,
        radius_miles: f64,
        max_results: usize,
    ) -> Result<Vec<RawStation>> {
        let url = format!(
            "{}/api/alt-fuel-stations/v1/nearest.json",
            self.base_url.trim_end_matches('/')
        );

        debug!(lat, lon, radius_miles, "querying charging stations");

        let resp = self
            .client
            .get(&url)
            .query(&[
                ("api_key", self.api_key.clone()),
                ("latitude", format!("{lat:.6}")),
                ("longitude", format!("{lon:.6}")),
                ("radius", format!("{radius_miles:.1}")),
                ("fuel_type", "ELEC".to_string()),
                ("limit", max_results.to_string()),
            ])
            .send()
            .await
            .context("station GET failed")?;
        let status = resp.status();
        if !status.is_success() {
            anyhow::bail!("station API error: HTTP {status}");
        }

        let raw: NrelResponse = resp.json().await.context("station JSON parse failed")?;

        Ok(raw.fuel_stations.into_iter().map(translate).collect())
    }
}

fn translate(s: NrelStation) -> RawStation {
    let power_kw = if s.ev_dc_fast_num.unwrap_or(0) > 0 {
        Some(150.0)
    } else if s.ev_level2_evse_num.unwrap_or(0) > 0 {
        Some(19.2)
    } else {
        None
    };

    let address = [
        s.street_address.as_deref(),
        s.city.as_deref(),
        s.state.as_deref(),
    ]
    .into_iter()
    .flatten()
    .collect::<Vec<_>>()
    .join(", ");

    RawStation {
        id: format!("nrel-{}", s.id),
        name: s.station_name,
        coord: Coordinate::new(s.latitude, s.longitude),
        address,
        power_kw,
        connector_label: s.ev_connector_types.and_then(|c| c.into_iter().next()),
        network: s.ev_network,
        // "E" = open, "P" = planned, "T" = temporarily unavailable
        operational: s.status_code.as_deref() == Some("E"),
    }
}

// NREL response structures
#[derive(Debug, Deserialize)]
struct NrelResponse {
    #[serde(default)]
    fuel_stations: Vec<NrelStation>,
}

#[derive(Debug, Deserialize)]
struct NrelStation {
    id: i64,
    station_name: String,
    latitude: f64,
    longitude: f64,
    street_address: Option<String>,
    city: Option<String>,
    state: Option<String>,
    status_code: Option<String>,
    ev_dc_fast_num: Option<u32>,
    ev_level2_evse_num: Option<u32>,
    ev_connector_types: Option<Vec<String>>,
    ev_network: Option<String>,
}

/// Synthetic provider used when no station API key is configured.
///
/// Stations live on a fixed 0.1-degree grid; each cell derives its own RNG
/// stream from the configured seed, so station positions, names and ids are
/// stable across queries and across process restarts with the same seed.
pub struct DemoStationProvider {
    seed: u64,
}

const CELL_DEG: f64 = 0.1;
const NETWORKS: [&str; 5] = [
    "Electrify America",
    "EVgo",
    "ChargePoint",
    "Tesla Supercharger",
    "Blink",
];
const SITE_NAMES: [&str; 6] = [
    "Supercharger Plaza",
    "Fast Charge Hub",
    "Town Center Charging",
    "Highway Rest Stop",
    "Retail Park Chargers",
    "Transit Lot Charging",
];

impl DemoStationProvider {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    fn cell_seed(&self, cell_x: i64, cell_y: i64) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.seed.hash(&mut hasher);
        cell_x.hash(&mut hasher);
        cell_y.hash(&mut hasher);
        hasher.finish()
    }

    fn stations_in_cell(&self, cell_x: i64, cell_y: i64) -> Vec<RawStation> {
        let mut rng = StdRng::seed_from_u64(self.cell_seed(cell_x, cell_y));
        let count = rng.gen_range(1..=3);
        (0..count)
            .map(|i| {
                let lat = (cell_x as f64 + rng.gen::<f64>()) * CELL_DEG;
                let lon = (cell_y as f64 + rng.gen::<f64>()) * CELL_DEG;
                let dc_fast = rng.gen_bool(0.6);
                RawStation {
                    id: format!("demo-{cell_x}-{cell_y}-{i}"),
                    name: SITE_NAMES[rng.gen_range(0..SITE_NAMES.len())].to_string(),
                    coord: Coordinate::new(lat, lon),
                    address: format!(
                        "{} Demo Rd",
                        100 + rng.gen_range(0..890)
                    ),
                    power_kw: Some(if dc_fast { 150.0 } else { 19.2 }),
                    connector_label: Some(if dc_fast { "CCS" } else { "J1772" }.to_string()),
                    network: Some(NETWORKS[rng.gen_range(0..NETWORKS.len())].to_string()),
                    // roughly one station in twelve is down
                    operational: !rng.gen_bool(1.0 / 12.0),
                }
            })
            .collect()
    }
}

#[async_trait]
impl StationProvider for DemoStationProvider {
    async fn query(
        &self,
        lat: f64,
        lon: f64,
        radius_miles: f64,
        max_results: usize,
    ) -> Result<Vec<RawStation>> {
        let center = Coordinate::new(lat, lon);
        // bounding box of grid cells that can intersect the query circle
        let lat_margin = radius_miles / 69.0;
        let lon_margin = radius_miles / (69.0 * lat.to_radians().cos().abs().max(0.01));
        let x0 = ((lat - lat_margin) / CELL_DEG).floor() as i64;
        let x1 = ((lat + lat_margin) / CELL_DEG).floor() as i64;
        let y0 = ((lon - lon_margin) / CELL_DEG).floor() as i64;
        let y1 = ((lon + lon_margin) / CELL_DEG).floor() as i64;

        let mut found = Vec::new();
        for cell_x in x0..=x1 {
            for cell_y in y0..=y1 {
                for station in self.stations_in_cell(cell_x, cell_y) {
                    if station.coord.distance_miles(&center) <= radius_miles {
                        found.push(station);
                    }
                }
            }
        }

        found.sort_by(|a, b| {
            a.coord
                .distance_miles(&center)
                .total_cmp(&b.coord.distance_miles(&center))
        });
        found.truncate(max_results);
        Ok(found)
    }
}
