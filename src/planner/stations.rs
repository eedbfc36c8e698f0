//! Charging-station discovery along a trip.
//!
//! Wraps a [`StationProvider`] with a spatial result cache, operational and
//! amenity filtering, and dedup across the overlapping queries issued for a
//! route polyline. Provider failures degrade to empty results; nothing in
//! this module surfaces an error to the orchestrator.

use chrono::{DateTime, Duration, FixedOffset};
use futures::stream::{self, StreamExt};
use itertools::Itertools;
use ordered_float::OrderedFloat;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::domain::{
    Amenity, ConnectorType, Coordinate, RawStation, StationAccess, StationRecord,
};
use crate::planner::clock::Clock;
use crate::providers::StationProvider;

/// Query key: coordinates and radius exactly as given, no rounding
type QueryKey = (OrderedFloat<f64>, OrderedFloat<f64>, OrderedFloat<f64>);

struct CacheEntry {
    fetched_at: DateTime<FixedOffset>,
    stations: Vec<StationRecord>,
}

#[derive(Debug, Clone)]
pub struct StationAggregatorConfig {
    pub cache_ttl: Duration,
    /// Sample points taken along a route polyline
    pub route_samples: usize,
    /// Concurrent `find_near` calls during route sampling
    pub fan_out: usize,
    /// Seed for the synthetic annotation layer
    pub annotation_seed: u64,
}

impl Default for StationAggregatorConfig {
    fn default() -> Self {
        Self {
            cache_ttl: Duration::minutes(5),
            route_samples: 5,
            fan_out: 3,
            annotation_seed: 0,
        }
    }
}

pub struct StationAggregator {
    provider: Arc<dyn StationProvider>,
    clock: Arc<dyn Clock>,
    config: StationAggregatorConfig,
    cache: RwLock<HashMap<QueryKey, CacheEntry>>,
}

impl StationAggregator {
    pub fn new(
        provider: Arc<dyn StationProvider>,
        clock: Arc<dyn Clock>,
        config: StationAggregatorConfig,
    ) -> Self {
        Self {
            provider,
            clock,
            config,
            cache: RwLock::new(HashMap::new()),
        }
    }

    /// Stations near a point, filtered and sorted by ascending distance.
    ///
    /// Results are cached for the configured TTL under the exact
    /// `(lat, lon, radius)` key; the cache holds the already-filtered,
    /// already-sorted list. Transport errors degrade to an empty result.
    pub async fn find_near(
        &self,
        lat: f64,
        lon: f64,
        radius_miles: f64,
        max_results: usize,
        preferred_amenities: &[Amenity],
    ) -> Vec<StationRecord> {
        let key: QueryKey = (
            OrderedFloat(lat),
            OrderedFloat(lon),
            OrderedFloat(radius_miles),
        );
        let now = self.clock.now();

        {
            let cache = self.cache.read().await;
            if let Some(entry) = cache.get(&key) {
                if now - entry.fetched_at < self.config.cache_ttl {
                    debug!(lat, lon, radius_miles, "station cache hit");
                    return entry.stations.clone();
                }
            }
        }

        let raw = match self
            .provider
            .query(lat, lon, radius_miles, max_results)
            .await
        {
            Ok(raw) => raw,
            Err(e) => {
                warn!(lat, lon, error = %e, "station provider failed, returning no stations");
                return Vec::new();
            }
        };

        let origin = Coordinate::new(lat, lon);
        let stations: Vec<StationRecord> = raw
            .into_iter()
            .map(|r| self.enrich(r, &origin))
            .filter(|s| s.operational)
            .filter(|s| s.matches_amenities(preferred_amenities))
            .sorted_by(|a, b| a.distance_miles.total_cmp(&b.distance_miles))
            .take(max_results)
            .collect();

        let mut cache = self.cache.write().await;
        cache.insert(
            key,
            CacheEntry {
                fetched_at: now,
                stations: stations.clone(),
            },
        );
        stations
    }

    /// Stations along a route polyline.
    ///
    /// Samples at most `route_samples` evenly spaced points, queries each
    /// with a bounded-concurrency fan-out, and merges the results into a
    /// dedup set keyed by provider id, so a station visible from two sample
    /// points appears once. Partial failures yield whatever was collected.
    pub async fn find_along_route(
        &self,
        polyline: &[Coordinate],
        radius_miles: f64,
        max_results: usize,
        preferred_amenities: &[Amenity],
    ) -> Vec<StationRecord> {
        if polyline.is_empty() {
            return Vec::new();
        }

        let stride = (polyline.len() / self.config.route_samples).max(1);
        let sample_points: Vec<Coordinate> = polyline
            .iter()
            .step_by(stride)
            .take(self.config.route_samples)
            .copied()
            .collect();

        debug!(
            points = sample_points.len(),
            radius_miles, "sampling stations along route"
        );

        let batches = stream::iter(sample_points)
            .map(|p| self.find_near(p.lat, p.lon, radius_miles, max_results, preferred_amenities))
            .buffer_unordered(self.config.fan_out.max(1))
            .collect::<Vec<_>>()
            .await;

        let mut merged: HashMap<String, StationRecord> = HashMap::new();
        for station in batches.into_iter().flatten() {
            merged
                .entry(station.provider_id.clone())
                .and_modify(|existing| {
                    // keep the sighting closest to its query point
                    if station.distance_miles < existing.distance_miles {
                        *existing = station.clone();
                    }
                })
                .or_insert(station);
        }

        merged
            .into_values()
            .sorted_by(|a, b| a.distance_miles.total_cmp(&b.distance_miles))
            .collect()
    }

    /// Layer synthetic amenity/access/pricing/review annotations onto
    /// provider metadata. The per-station RNG stream is derived from the
    /// configured seed and the provider id, so annotations are stable
    /// across queries and dedup-equal records stay identical.
    fn enrich(&self, raw: RawStation, origin: &Coordinate) -> StationRecord {
        let mut hasher = DefaultHasher::new();
        self.config.annotation_seed.hash(&mut hasher);
        raw.id.hash(&mut hasher);
        let mut rng = StdRng::seed_from_u64(hasher.finish());

        let mut amenities: Vec<Amenity> = Amenity::ALL
            .into_iter()
            .filter(|_| rng.gen_bool(0.4))
            .collect();
        if amenities.is_empty() {
            amenities.push(Amenity::Restrooms);
        }

        let access = if rng.gen_bool(0.85) {
            StationAccess::Public
        } else {
            StationAccess::Restricted
        };

        StationRecord {
            distance_miles: raw.coord.distance_miles(origin),
            provider_id: raw.id,
            name: raw.name,
            coord: raw.coord,
            address: raw.address,
            power_kw: raw.power_kw.unwrap_or(50.0),
            connector: raw
                .connector_label
                .as_deref()
                .map(ConnectorType::from_label)
                .unwrap_or(ConnectorType::J1772),
            network: raw.network.unwrap_or_else(|| "Independent".to_string()),
            operational: raw.operational,
            amenities,
            access,
            price_per_kwh: (30.0 + rng.gen::<f64>() * 25.0).round() / 100.0,
            rating: (30.0 + rng.gen::<f64>() * 20.0).round() / 10.0,
        }
    }
}
