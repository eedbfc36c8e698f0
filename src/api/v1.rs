use axum::{
    routing::{get, post},
    Router,
};

use crate::api::{health, plan, stations, vehicles};
use crate::app::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/trips/plan", post(plan::plan_trip))
        .route("/vehicles", get(vehicles::list_vehicles))
        .route("/stations", get(stations::find_stations))
        .route("/healthz", get(health::healthz))
        .with_state(state)
}
