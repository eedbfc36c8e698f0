use anyhow::Result;
use figment::{providers::{Env, Format, Toml}, Figment};
use serde::Deserialize;
use std::net::SocketAddr;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub planner: PlannerTuning,
    pub weather: WeatherConfig,
    pub stations: StationsConfig,
    pub routing: RoutingConfig,
    pub geocoding: GeocodingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub request_timeout_secs: u64,
    pub enable_cors: bool,
}
impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        Ok(format!("{}:{}", self.host, self.port).parse()?)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlannerTuning {
    pub flat_rate_per_kwh: f64,
    /// Percentage points restored per planned charging stop
    pub top_up_step_percent: f64,
    pub max_route_alternatives: usize,
    /// Seed for synthetic weather and station annotations; None draws from
    /// system entropy
    #[serde(default)]
    pub random_seed: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WeatherConfig {
    pub base_url: String,
    #[serde(default)]
    pub api_key: Option<String>,
    pub cache_ttl_seconds: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StationsConfig {
    pub base_url: String,
    #[serde(default)]
    pub api_key: Option<String>,
    pub cache_ttl_seconds: u64,
    pub search_radius_miles: f64,
    pub max_results: usize,
    /// Sample points taken along a route polyline
    pub route_samples: usize,
    /// Concurrent station lookups during route sampling
    pub fan_out: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RoutingConfig { pub base_url: String }

#[derive(Debug, Clone, Deserialize)]
pub struct GeocodingConfig { pub base_url: String }

impl Config {
    pub fn load() -> Result<Self> {
        let figment = Figment::new()
            .merge(Toml::file("config/default.toml"))
            .merge(Env::prefixed("EVTP__").split("__"));
        Ok(figment.extract()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_file_parses() {
        let cfg: Config = Figment::new()
            .merge(Toml::file(concat!(
                env!("CARGO_MANIFEST_DIR"),
                "/config/default.toml"
            )))
            .extract()
            .expect("default config must parse");
        assert_eq!(cfg.stations.max_results, 50);
        assert!((cfg.stations.search_radius_miles - 6.2).abs() < 1e-9);
        assert_eq!(cfg.weather.cache_ttl_seconds, 900);
        assert_eq!(cfg.stations.cache_ttl_seconds, 300);
    }
}
