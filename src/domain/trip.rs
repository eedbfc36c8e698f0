use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::geo::Coordinate;
use super::station::{Amenity, StationRecord};
use super::vehicle::VehicleProfile;
use super::weather::ConditionSample;

/// A geocoded address
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeocodedPlace {
    pub coord: Coordinate,
    pub display_name: String,
}

/// Raw route geometry from the routing collaborator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteGeometry {
    pub distance_meters: f64,
    pub duration_seconds: f64,
    pub points: Vec<Coordinate>,
}

/// One trip-planning invocation. Not persisted by the engine.
#[derive(Debug, Clone)]
pub struct TripRequest {
    pub origin: String,
    pub destination: String,
    /// 10-100
    pub starting_charge_percent: f64,
    /// 70-100, degrades effective capacity
    pub battery_health_percent: f64,
    pub vehicle_id: String,
    /// Caller identity; when present the assembled plan is handed to the
    /// trip store
    pub user_id: Option<String>,
    pub preferred_amenities: Vec<Amenity>,
}

/// A fully evaluated route alternative, immutable after construction
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteCandidate {
    pub id: u32,
    pub label: String,
    pub distance_miles: f64,
    pub duration_minutes: f64,
    /// Clamped to [0, 100]
    pub battery_usage_percent: u32,
    pub charging_stops: u32,
    /// Weather-adjusted consumption in kWh per mile
    pub energy_efficiency_kwh_per_mile: f64,
    pub estimated_cost: f64,
    pub geometry: Vec<Coordinate>,
    /// Representative samples at route start, midpoint and end
    pub conditions: Vec<ConditionSample>,
}

/// Assembled planning result handed back to the caller
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TripPlan {
    pub routes: Vec<RouteCandidate>,
    pub vehicle: VehicleProfile,
    pub origin: String,
    pub destination: String,
    pub origin_coord: Coordinate,
    pub destination_coord: Coordinate,
    pub starting_charge_percent: f64,
    pub stations: Vec<StationRecord>,
}

/// Persisted trip record handed to the external store
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TripRecord {
    pub id: Uuid,
    pub user_id: String,
    pub origin: String,
    pub destination: String,
    pub origin_coord: Coordinate,
    pub destination_coord: Coordinate,
    pub starting_charge_percent: f64,
    pub vehicle_id: String,
    /// Full assembled result as an opaque payload
    pub payload: serde_json::Value,
    pub created_at: DateTime<FixedOffset>,
}
