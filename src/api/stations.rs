//! Nearby-station lookup endpoint.

use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;
use std::str::FromStr;

use crate::api::error::ApiError;
use crate::app::AppState;
use crate::domain::{Amenity, StationRecord};

#[derive(Debug, Deserialize)]
pub struct StationQuery {
    pub lat: f64,
    pub lon: f64,
    pub radius_miles: Option<f64>,
    pub max_results: Option<usize>,
    /// Comma-separated amenity names, e.g. `coffee,food`
    pub amenities: Option<String>,
}

/// GET /api/v1/stations
pub async fn find_stations(
    State(st): State<AppState>,
    Query(q): Query<StationQuery>,
) -> Result<Json<Vec<StationRecord>>, ApiError> {
    if !q.lat.is_finite() || !q.lon.is_finite() {
        return Err(ApiError::ValidationError(
            "lat and lon must be numbers".to_string(),
        ));
    }

    let amenities = parse_amenities(q.amenities.as_deref())?;
    let radius = q
        .radius_miles
        .unwrap_or(st.cfg.stations.search_radius_miles);
    let max_results = q.max_results.unwrap_or(st.cfg.stations.max_results);

    let stations = st
        .stations
        .find_near(q.lat, q.lon, radius, max_results, &amenities)
        .await;
    Ok(Json(stations))
}

fn parse_amenities(raw: Option<&str>) -> Result<Vec<Amenity>, ApiError> {
    let Some(raw) = raw else {
        return Ok(Vec::new());
    };
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            Amenity::from_str(s)
                .map_err(|_| ApiError::ValidationError(format!("unknown amenity: {s}")))
        })
        .collect()
}
