//! Service wiring: build provider clients and planner services from config.

use anyhow::Result;
use chrono::Duration;
use std::sync::Arc;
use tracing::info;

use crate::config::Config;
use crate::planner::{
    Clock, ConditionService, EnergyParams, PlannerSettings, StationAggregator,
    StationAggregatorConfig, SystemClock, TripPlanner,
};
use crate::providers::{
    DemoStationProvider, NominatimGeocoder, NrelStationClient, OpenWeatherClient, OsrmRouteProvider,
    StationProvider, WeatherProvider,
};
use crate::store::InMemoryTripStore;

#[derive(Clone)]
pub struct AppState {
    pub cfg: Config,
    pub planner: Arc<TripPlanner>,
    pub stations: Arc<StationAggregator>,
    pub store: Arc<InMemoryTripStore>,
}

impl AppState {
    pub fn new(cfg: Config) -> Result<Self> {
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);
        let seed = cfg.planner.random_seed;
        let annotation_seed = seed.unwrap_or_else(rand::random);

        let weather: Option<Arc<dyn WeatherProvider>> = match &cfg.weather.api_key {
            Some(key) if !key.is_empty() => Some(Arc::new(OpenWeatherClient::new(
                cfg.weather.base_url.clone(),
                key.clone(),
            )?)),
            _ => {
                info!("no weather API key configured, using synthetic conditions");
                None
            }
        };

        let station_provider: Arc<dyn StationProvider> = match &cfg.stations.api_key {
            Some(key) if !key.is_empty() => Arc::new(NrelStationClient::new(
                cfg.stations.base_url.clone(),
                key.clone(),
            )?),
            _ => {
                info!("no station API key configured, station discovery runs in demo mode");
                Arc::new(DemoStationProvider::new(annotation_seed))
            }
        };

        let conditions = Arc::new(ConditionService::new(
            weather,
            clock.clone(),
            Duration::seconds(cfg.weather.cache_ttl_seconds as i64),
            seed,
        ));

        let stations = Arc::new(StationAggregator::new(
            station_provider,
            clock.clone(),
            StationAggregatorConfig {
                cache_ttl: Duration::seconds(cfg.stations.cache_ttl_seconds as i64),
                route_samples: cfg.stations.route_samples,
                fan_out: cfg.stations.fan_out,
                annotation_seed,
            },
        ));

        let geocoder = Arc::new(NominatimGeocoder::new(cfg.geocoding.base_url.clone())?);
        let router = Arc::new(OsrmRouteProvider::new(
            cfg.routing.base_url.clone(),
            cfg.planner.max_route_alternatives as u8,
        )?);
        let store = Arc::new(InMemoryTripStore::new());

        let planner = Arc::new(TripPlanner::new(
            geocoder,
            router,
            conditions,
            stations.clone(),
            store.clone(),
            clock,
            PlannerSettings {
                energy: EnergyParams {
                    flat_rate_per_kwh: cfg.planner.flat_rate_per_kwh,
                    top_up_step_percent: cfg.planner.top_up_step_percent,
                },
                station_radius_miles: cfg.stations.search_radius_miles,
                station_max_results: cfg.stations.max_results,
                max_route_alternatives: cfg.planner.max_route_alternatives,
            },
        ));

        Ok(Self {
            cfg,
            planner,
            stations,
            store,
        })
    }
}
