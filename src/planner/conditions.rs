//! Ambient-condition sampling with a coordinate-keyed TTL cache.
//!
//! `sample` never fails: a configured live provider is tried first and any
//! error drops to the synthetic generator. Samples are cached by coordinate
//! rounded to two decimals (~1.1 km grid) and recomputed after the TTL.

use chrono::{DateTime, Datelike, Duration, FixedOffset};
use ordered_float::OrderedFloat;
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::domain::{Coordinate, ConditionSample, SkyCondition, WeatherObservation};
use crate::planner::clock::Clock;
use crate::providers::WeatherProvider;

type CacheKey = (OrderedFloat<f64>, OrderedFloat<f64>);

struct CachedSample {
    fetched_at: DateTime<FixedOffset>,
    sample: ConditionSample,
}

pub struct ConditionService {
    provider: Option<Arc<dyn WeatherProvider>>,
    clock: Arc<dyn Clock>,
    ttl: Duration,
    rng: Mutex<StdRng>,
    cache: RwLock<HashMap<CacheKey, CachedSample>>,
}

impl ConditionService {
    pub fn new(
        provider: Option<Arc<dyn WeatherProvider>>,
        clock: Arc<dyn Clock>,
        ttl: Duration,
        seed: Option<u64>,
    ) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            provider,
            clock,
            ttl,
            rng: Mutex::new(rng),
            cache: RwLock::new(HashMap::new()),
        }
    }

    /// Resolve the ambient condition at a coordinate. Infallible: provider
    /// errors are absorbed and the synthetic path is used instead. Callers
    /// receive an owned sample; mutating it cannot touch the cache.
    pub async fn sample(&self, coord: Coordinate) -> ConditionSample {
        let rounded = coord.rounded();
        let key = (OrderedFloat(rounded.lat), OrderedFloat(rounded.lon));
        let now = self.clock.now();

        {
            let cache = self.cache.read().await;
            if let Some(entry) = cache.get(&key) {
                if now - entry.fetched_at < self.ttl {
                    return entry.sample.clone();
                }
            }
        }

        let sample = match &self.provider {
            Some(provider) => match provider.fetch(rounded.lat, rounded.lon).await {
                Ok(observation) => Self::from_observation(rounded, observation),
                Err(e) => {
                    warn!(%coord, error = %e, "weather provider failed, using synthetic conditions");
                    self.synthetic(rounded, now)
                }
            },
            None => self.synthetic(rounded, now),
        };

        let mut cache = self.cache.write().await;
        cache.insert(
            key,
            CachedSample {
                fetched_at: now,
                sample: sample.clone(),
            },
        );
        sample
    }

    fn from_observation(coord: Coordinate, obs: WeatherObservation) -> ConditionSample {
        let sky = SkyCondition::from_label(&obs.condition_label);
        debug!(%coord, temp_f = obs.temperature_f, %sky, "live condition sample");
        ConditionSample::new(coord, obs.temperature_f, sky)
    }

    /// Latitude/season model with bounded jitter. Deterministic apart from
    /// the injected RNG, so a seeded service reproduces exact samples.
    fn synthetic(&self, coord: Coordinate, now: DateTime<FixedOffset>) -> ConditionSample {
        let mut rng = self.rng.lock();

        // ~90F at the equator falling toward the poles, with a longitude
        // ripple so neighboring meridians differ
        let baseline = 90.0 - coord.lat.abs() * 0.9 + (coord.lon / 30.0).sin() * 5.0;

        let seasonal = match now.month() {
            12 | 1 | 2 => -20.0,
            6..=8 => 20.0,
            _ => 0.0,
        };
        // southern hemisphere seasons are inverted
        let seasonal = if coord.lat < 0.0 { -seasonal } else { seasonal };

        let jitter = Normal::new(0.0, 4.0)
            .map(|n| n.sample(&mut *rng))
            .unwrap_or(0.0f64)
            .clamp(-10.0, 10.0);

        let temperature_f = baseline + seasonal + jitter;

        let roll = rng.gen_range(0..100);
        let sky = if temperature_f < 32.0 {
            match roll {
                0..=54 => SkyCondition::Snow,
                55..=79 => SkyCondition::Clouds,
                _ => SkyCondition::Clear,
            }
        } else {
            match roll {
                0..=19 => SkyCondition::Rain,
                20..=49 => SkyCondition::Clouds,
                _ => SkyCondition::Clear,
            }
        };

        debug!(%coord, temp_f = temperature_f, %sky, "synthetic condition sample");
        ConditionSample::new(coord, temperature_f, sky)
    }
}
