//! Vehicle catalog endpoint.

use axum::Json;

use crate::domain::{catalog, VehicleProfile};

/// GET /api/v1/vehicles
pub async fn list_vehicles() -> Json<Vec<VehicleProfile>> {
    Json(catalog().to_vec())
}
