use thiserror::Error;

use crate::providers::{GeocodeError, RouteError};

/// Fatal planning errors surfaced to the caller.
///
/// Degraded conditions (weather provider down, station provider down, cache
/// misses) never appear here; they are absorbed inside the condition
/// service and the station aggregator.
#[derive(Debug, Error)]
pub enum PlanError {
    #[error("unknown vehicle: {0}")]
    UnknownVehicle(String),

    #[error("could not locate address: {0}")]
    AddressNotFound(String),

    #[error("no drivable route from '{origin}' to '{destination}'")]
    NoRoute { origin: String, destination: String },

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("upstream service error: {0}")]
    Upstream(#[from] anyhow::Error),
}

impl From<GeocodeError> for PlanError {
    fn from(err: GeocodeError) -> Self {
        match err {
            GeocodeError::NotFound(address) => PlanError::AddressNotFound(address),
            GeocodeError::Upstream(e) => PlanError::Upstream(e),
        }
    }
}

impl PlanError {
    pub(crate) fn from_route_error(err: RouteError, origin: &str, destination: &str) -> Self {
        match err {
            RouteError::NoRoute => PlanError::NoRoute {
                origin: origin.to_string(),
                destination: destination.to_string(),
            },
            RouteError::Upstream(e) => PlanError::Upstream(e),
        }
    }
}
