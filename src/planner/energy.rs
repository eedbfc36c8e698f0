//! Battery-usage estimation.
//!
//! Pure functions: no I/O, no clock, no RNG. Validation happens at this
//! boundary so NaN or negative inputs are rejected instead of propagating
//! through the arithmetic.

use serde::{Deserialize, Serialize};

use crate::domain::{ConditionSample, VehicleProfile};
use crate::planner::error::PlanError;

/// Tunables for the cost/stop formulas
#[derive(Debug, Clone)]
pub struct EnergyParams {
    pub flat_rate_per_kwh: f64,
    /// Percentage points restored per planned charging stop
    pub top_up_step_percent: f64,
}

impl Default for EnergyParams {
    fn default() -> Self {
        Self {
            flat_rate_per_kwh: 0.36,
            top_up_step_percent: 40.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnergyEstimate {
    /// Rounded, clamped to [0, 100]
    pub battery_usage_percent: u32,
    pub charging_stops: u32,
    /// Weather-adjusted consumption in kWh per mile
    pub energy_efficiency_kwh_per_mile: f64,
    pub energy_used_kwh: f64,
    pub estimated_cost: f64,
}

/// Estimate energy use for one route.
///
/// The three samples are the representative start/mid/end conditions; their
/// efficiency multipliers are averaged, and a multiplier below 1.0 raises
/// consumption (adverse weather means more energy per mile).
pub fn estimate(
    vehicle: &VehicleProfile,
    starting_charge_percent: f64,
    battery_health_percent: f64,
    distance_miles: f64,
    samples: &[ConditionSample],
    params: &EnergyParams,
) -> Result<EnergyEstimate, PlanError> {
    if !distance_miles.is_finite() || distance_miles < 0.0 {
        return Err(PlanError::InvalidRequest(format!(
            "route distance must be a non-negative number, got {distance_miles}"
        )));
    }
    if !starting_charge_percent.is_finite() || !battery_health_percent.is_finite() {
        return Err(PlanError::InvalidRequest(
            "starting charge and battery health must be numbers".to_string(),
        ));
    }
    if samples.is_empty() {
        return Err(PlanError::InvalidRequest(
            "at least one condition sample is required".to_string(),
        ));
    }
    if samples.iter().any(|s| !s.coord.is_finite()) {
        return Err(PlanError::InvalidRequest(
            "condition sample has a non-finite coordinate".to_string(),
        ));
    }

    let avg_impact =
        samples.iter().map(|s| s.impact.efficiency).sum::<f64>() / samples.len() as f64;

    let adjusted_kwh_per_mile = vehicle.efficiency_kwh_per_mile / avg_impact;
    let effective_capacity_kwh = vehicle.battery_capacity_kwh * (battery_health_percent / 100.0);
    let energy_used_kwh = distance_miles * adjusted_kwh_per_mile;

    let usage_percent = (energy_used_kwh / effective_capacity_kwh * 100.0)
        .round()
        .clamp(0.0, 100.0) as u32;

    let charging_stops = charging_stops_for(usage_percent, starting_charge_percent, params);

    Ok(EnergyEstimate {
        battery_usage_percent: usage_percent,
        charging_stops,
        energy_efficiency_kwh_per_mile: adjusted_kwh_per_mile,
        energy_used_kwh,
        estimated_cost: round2(energy_used_kwh * params.flat_rate_per_kwh),
    })
}

/// Each stop models a fixed top-up of `top_up_step_percent` points.
pub fn charging_stops_for(
    battery_usage_percent: u32,
    starting_charge_percent: f64,
    params: &EnergyParams,
) -> u32 {
    let usage = battery_usage_percent as f64;
    if usage <= starting_charge_percent {
        0
    } else {
        ((usage - starting_charge_percent) / params.top_up_step_percent).ceil() as u32
    }
}

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
