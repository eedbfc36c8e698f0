//! Trip planning endpoint.

use axum::{extract::State, Json};
use serde::Deserialize;
use validator::Validate;

use crate::api::error::ApiError;
use crate::app::AppState;
use crate::domain::{Amenity, TripPlan, TripRequest};

fn default_battery_health() -> f64 {
    100.0
}

#[derive(Debug, Deserialize, Validate)]
pub struct PlanTripPayload {
    #[validate(length(min = 1, message = "origin is required"))]
    pub origin: String,
    #[validate(length(min = 1, message = "destination is required"))]
    pub destination: String,
    #[validate(range(min = 10.0, max = 100.0, message = "starting charge must be 10-100"))]
    pub starting_charge_percent: f64,
    #[serde(default = "default_battery_health")]
    #[validate(range(min = 70.0, max = 100.0, message = "battery health must be 70-100"))]
    pub battery_health_percent: f64,
    pub vehicle_id: String,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub preferred_amenities: Vec<Amenity>,
}

impl From<PlanTripPayload> for TripRequest {
    fn from(p: PlanTripPayload) -> Self {
        TripRequest {
            origin: p.origin,
            destination: p.destination,
            starting_charge_percent: p.starting_charge_percent,
            battery_health_percent: p.battery_health_percent,
            vehicle_id: p.vehicle_id,
            user_id: p.user_id,
            preferred_amenities: p.preferred_amenities,
        }
    }
}

/// POST /api/v1/trips/plan
pub async fn plan_trip(
    State(st): State<AppState>,
    Json(payload): Json<PlanTripPayload>,
) -> Result<Json<TripPlan>, ApiError> {
    payload.validate()?;
    let plan = st.planner.plan(payload.into()).await?;
    Ok(Json(plan))
}
