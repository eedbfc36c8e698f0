//! Trip planning pipeline.
//!
//! The planner sequences geocoding, routing, per-route energy evaluation
//! and station discovery, and owns the error contract the caller sees:
//! geocoding and routing failures are fatal, evaluation never fails for
//! valid inputs, and station lookup degrades to an empty list.

pub mod clock;
pub mod conditions;
pub mod energy;
pub mod error;
pub mod stations;
pub mod variants;

pub use clock::{Clock, ManualClock, SystemClock};
pub use conditions::ConditionService;
pub use energy::{EnergyEstimate, EnergyParams};
pub use error::PlanError;
pub use stations::{StationAggregator, StationAggregatorConfig};

use std::sync::Arc;

use futures::future::try_join_all;
use strum::Display;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::domain::{
    find_vehicle, meters_to_miles, seconds_to_minutes, ConditionSample, Coordinate,
    RouteCandidate, RouteGeometry, TripPlan, TripRecord, TripRequest, VehicleProfile,
};
use crate::providers::{Geocoder, RouteProvider};
use crate::store::TripStore;

/// Pipeline stages, in order. `Failed` is reachable only from the two
/// fatal stages; evaluation and station lookup degrade instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum PlanStage {
    Idle,
    Geocoding,
    Routing,
    Evaluating,
    StationLookup,
    Complete,
    Failed,
}

#[derive(Debug, Clone)]
pub struct PlannerSettings {
    pub energy: EnergyParams,
    pub station_radius_miles: f64,
    pub station_max_results: usize,
    pub max_route_alternatives: usize,
}

impl Default for PlannerSettings {
    fn default() -> Self {
        Self {
            energy: EnergyParams::default(),
            station_radius_miles: 6.2,
            station_max_results: 50,
            max_route_alternatives: 3,
        }
    }
}

pub struct TripPlanner {
    geocoder: Arc<dyn Geocoder>,
    router: Arc<dyn RouteProvider>,
    conditions: Arc<ConditionService>,
    stations: Arc<StationAggregator>,
    store: Arc<dyn TripStore>,
    clock: Arc<dyn Clock>,
    settings: PlannerSettings,
}

impl TripPlanner {
    pub fn new(
        geocoder: Arc<dyn Geocoder>,
        router: Arc<dyn RouteProvider>,
        conditions: Arc<ConditionService>,
        stations: Arc<StationAggregator>,
        store: Arc<dyn TripStore>,
        clock: Arc<dyn Clock>,
        settings: PlannerSettings,
    ) -> Self {
        Self {
            geocoder,
            router,
            conditions,
            stations,
            store,
            clock,
            settings,
        }
    }

    /// Run the full pipeline for one request. Stateless per invocation;
    /// never retries.
    pub async fn plan(&self, request: TripRequest) -> Result<TripPlan, PlanError> {
        validate_request(&request)?;

        let vehicle = find_vehicle(&request.vehicle_id)
            .ok_or_else(|| PlanError::UnknownVehicle(request.vehicle_id.clone()))?
            .clone();

        debug!(stage = %PlanStage::Geocoding, origin = %request.origin, destination = %request.destination, "resolving addresses");
        let (origin, destination) = match tokio::join!(
            self.geocoder.resolve(&request.origin),
            self.geocoder.resolve(&request.destination),
        ) {
            (Ok(o), Ok(d)) => (o, d),
            (Err(e), _) | (_, Err(e)) => {
                warn!(stage = %PlanStage::Failed, error = %e, "geocoding failed");
                return Err(e.into());
            }
        };

        debug!(stage = %PlanStage::Routing, %origin.coord, %destination.coord, "requesting routes");
        let mut geometries = self
            .router
            .route(origin.coord, destination.coord)
            .await
            .map_err(|e| {
                warn!(stage = %PlanStage::Failed, error = %e, "routing failed");
                PlanError::from_route_error(e, &request.origin, &request.destination)
            })?;
        if geometries.is_empty() {
            warn!(stage = %PlanStage::Failed, "router returned zero geometries");
            return Err(PlanError::NoRoute {
                origin: request.origin.clone(),
                destination: request.destination.clone(),
            });
        }
        geometries.truncate(self.settings.max_route_alternatives);

        debug!(stage = %PlanStage::Evaluating, alternatives = geometries.len(), "evaluating routes");
        let routes = if let [geometry] = geometries.as_slice() {
            self.synthesize_variants(&vehicle, &request, geometry.clone())
                .await?
        } else {
            let evaluations = geometries.into_iter().enumerate().map(|(i, geometry)| {
                self.evaluate_route(
                    &vehicle,
                    &request,
                    (i + 1) as u32,
                    variants::alternative_label(i),
                    geometry,
                )
            });
            try_join_all(evaluations).await?
        };

        debug!(stage = %PlanStage::StationLookup, "discovering stations along primary route");
        let stations = self
            .stations
            .find_along_route(
                &routes[0].geometry,
                self.settings.station_radius_miles,
                self.settings.station_max_results,
                &request.preferred_amenities,
            )
            .await;

        let plan = TripPlan {
            routes,
            vehicle,
            origin: request.origin.clone(),
            destination: request.destination.clone(),
            origin_coord: origin.coord,
            destination_coord: destination.coord,
            starting_charge_percent: request.starting_charge_percent,
            stations,
        };

        if let Some(user_id) = &request.user_id {
            self.persist(user_id, &request, &plan).await;
        }

        info!(
            stage = %PlanStage::Complete,
            routes = plan.routes.len(),
            stations = plan.stations.len(),
            "trip plan assembled"
        );
        Ok(plan)
    }

    /// Evaluate one geometry: sample conditions at start/mid/end as a
    /// concurrent group, then run the energy model.
    async fn evaluate_route(
        &self,
        vehicle: &VehicleProfile,
        request: &TripRequest,
        id: u32,
        label: String,
        geometry: RouteGeometry,
    ) -> Result<RouteCandidate, PlanError> {
        let (start, mid, end) = representative_points(&geometry.points).ok_or_else(|| {
            PlanError::InvalidRequest("route geometry has no points".to_string())
        })?;

        let (s, m, e) = tokio::join!(
            self.conditions.sample(start),
            self.conditions.sample(mid),
            self.conditions.sample(end),
        );
        let samples = vec![s, m, e];

        let distance_miles = meters_to_miles(geometry.distance_meters);
        let estimate = energy::estimate(
            vehicle,
            request.starting_charge_percent,
            request.battery_health_percent,
            distance_miles,
            &samples,
            &self.settings.energy,
        )?;

        Ok(candidate(
            id,
            label,
            distance_miles,
            seconds_to_minutes(geometry.duration_seconds),
            geometry.points,
            samples,
            estimate,
        ))
    }

    /// Single-geometry case: evaluate once, then derive labeled display
    /// variants from the primary estimate.
    async fn synthesize_variants(
        &self,
        vehicle: &VehicleProfile,
        request: &TripRequest,
        geometry: RouteGeometry,
    ) -> Result<Vec<RouteCandidate>, PlanError> {
        let primary = self
            .evaluate_route(vehicle, request, 1, "Fastest".to_string(), geometry)
            .await?;

        let estimate = EnergyEstimate {
            battery_usage_percent: primary.battery_usage_percent,
            charging_stops: primary.charging_stops,
            energy_efficiency_kwh_per_mile: primary.energy_efficiency_kwh_per_mile,
            energy_used_kwh: primary.distance_miles * primary.energy_efficiency_kwh_per_mile,
            estimated_cost: primary.estimated_cost,
        };

        Ok(variants::SyntheticVariant::ORDER
            .iter()
            .enumerate()
            .map(|(i, variant)| {
                let adjusted = variant.apply(
                    &estimate,
                    request.starting_charge_percent,
                    &self.settings.energy,
                );
                candidate(
                    (i + 1) as u32,
                    variant.label().to_string(),
                    primary.distance_miles,
                    primary.duration_minutes,
                    primary.geometry.clone(),
                    primary.conditions.clone(),
                    adjusted,
                )
            })
            .collect())
    }

    /// Hand the assembled plan to the external store. Failure here is
    /// degraded, not fatal: the caller still gets the plan.
    async fn persist(&self, user_id: &str, request: &TripRequest, plan: &TripPlan) {
        let payload = match serde_json::to_value(plan) {
            Ok(payload) => payload,
            Err(e) => {
                warn!(error = %e, "could not serialize trip payload, skipping persistence");
                return;
            }
        };

        let record = TripRecord {
            id: Uuid::new_v4(),
            user_id: user_id.to_string(),
            origin: request.origin.clone(),
            destination: request.destination.clone(),
            origin_coord: plan.origin_coord,
            destination_coord: plan.destination_coord,
            starting_charge_percent: request.starting_charge_percent,
            vehicle_id: request.vehicle_id.clone(),
            payload,
            created_at: self.clock.now(),
        };

        if let Err(e) = self.store.save(record).await {
            warn!(error = %e, "trip store rejected record");
        }
    }
}

fn candidate(
    id: u32,
    label: String,
    distance_miles: f64,
    duration_minutes: f64,
    geometry: Vec<Coordinate>,
    conditions: Vec<ConditionSample>,
    estimate: EnergyEstimate,
) -> RouteCandidate {
    RouteCandidate {
        id,
        label,
        distance_miles,
        duration_minutes,
        battery_usage_percent: estimate.battery_usage_percent,
        charging_stops: estimate.charging_stops,
        energy_efficiency_kwh_per_mile: estimate.energy_efficiency_kwh_per_mile,
        estimated_cost: estimate.estimated_cost,
        geometry,
        conditions,
    }
}

fn representative_points(points: &[Coordinate]) -> Option<(Coordinate, Coordinate, Coordinate)> {
    let first = *points.first()?;
    let last = *points.last()?;
    let mid = points[points.len() / 2];
    Some((first, mid, last))
}

fn validate_request(request: &TripRequest) -> Result<(), PlanError> {
    if request.origin.trim().is_empty() || request.destination.trim().is_empty() {
        return Err(PlanError::InvalidRequest(
            "origin and destination are required".to_string(),
        ));
    }
    if !(10.0..=100.0).contains(&request.starting_charge_percent) {
        return Err(PlanError::InvalidRequest(format!(
            "starting charge must be between 10 and 100, got {}",
            request.starting_charge_percent
        )));
    }
    if !(70.0..=100.0).contains(&request.battery_health_percent) {
        return Err(PlanError::InvalidRequest(format!(
            "battery health must be between 70 and 100, got {}",
            request.battery_health_percent
        )));
    }
    Ok(())
}
