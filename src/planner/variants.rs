//! Presentation-layer route variants.
//!
//! When the router returns real alternatives, each geometry is evaluated
//! from its own distance and duration and only labeled here. When it
//! returns a single geometry, display variants are synthesized from the
//! primary estimate with fixed scalar adjustments. The adjustments are a
//! presentation heuristic layered on top of the energy model's output, not
//! a physical recalculation, and they stay in this module so the numeric
//! model remains testable in isolation.

use crate::planner::energy::{round2, EnergyEstimate, EnergyParams};

/// Label for the n-th real route alternative returned by the router
pub fn alternative_label(index: usize) -> String {
    match index {
        0 => "Recommended".to_string(),
        n => format!("Alternative {n}"),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyntheticVariant {
    /// The unmodified primary estimate
    Fastest,
    /// Scales usage down ~10% and cost down ~15%
    Efficient,
    /// Drops one planned stop where more than one remains
    FewerStops,
}

impl SyntheticVariant {
    pub const ORDER: [SyntheticVariant; 3] = [
        SyntheticVariant::Fastest,
        SyntheticVariant::Efficient,
        SyntheticVariant::FewerStops,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            SyntheticVariant::Fastest => "Fastest",
            SyntheticVariant::Efficient => "Most Efficient",
            SyntheticVariant::FewerStops => "Fewer Stops",
        }
    }

    /// Apply the variant's scalar adjustment to the primary estimate.
    ///
    /// Stops never drop below what the usage/charge relation requires, so
    /// the stops-iff-usage-exceeds-charge invariant holds for every
    /// variant.
    pub fn apply(
        &self,
        primary: &EnergyEstimate,
        starting_charge_percent: f64,
        params: &EnergyParams,
    ) -> EnergyEstimate {
        match self {
            SyntheticVariant::Fastest => primary.clone(),
            SyntheticVariant::Efficient => {
                let usage = ((primary.battery_usage_percent as f64) * 0.9).round() as u32;
                EnergyEstimate {
                    battery_usage_percent: usage,
                    charging_stops: crate::planner::energy::charging_stops_for(
                        usage,
                        starting_charge_percent,
                        params,
                    ),
                    estimated_cost: round2(primary.estimated_cost * 0.85),
                    ..primary.clone()
                }
            }
            SyntheticVariant::FewerStops => {
                let floor = if (primary.battery_usage_percent as f64) > starting_charge_percent {
                    1
                } else {
                    0
                };
                EnergyEstimate {
                    charging_stops: primary.charging_stops.saturating_sub(1).max(floor),
                    ..primary.clone()
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn primary(usage: u32, stops: u32) -> EnergyEstimate {
        EnergyEstimate {
            battery_usage_percent: usage,
            charging_stops: stops,
            energy_efficiency_kwh_per_mile: 0.3,
            energy_used_kwh: 50.0,
            estimated_cost: 18.0,
        }
    }

    #[test]
    fn test_fastest_is_identity() {
        let p = primary(90, 2);
        assert_eq!(
            SyntheticVariant::Fastest.apply(&p, 20.0, &EnergyParams::default()),
            p
        );
    }

    #[test]
    fn test_efficient_scales_usage_and_cost() {
        let p = primary(90, 2);
        let adjusted = SyntheticVariant::Efficient.apply(&p, 20.0, &EnergyParams::default());
        assert_eq!(adjusted.battery_usage_percent, 81);
        assert_eq!(adjusted.estimated_cost, 15.3);
        // stops re-derived from the adjusted usage
        assert_eq!(adjusted.charging_stops, 2);
    }

    #[test]
    fn test_fewer_stops_keeps_invariant() {
        let p = primary(90, 2);
        let adjusted = SyntheticVariant::FewerStops.apply(&p, 20.0, &EnergyParams::default());
        assert_eq!(adjusted.charging_stops, 1);

        // usage exceeds charge, so a single stop cannot be removed
        let single = primary(55, 1);
        let adjusted = SyntheticVariant::FewerStops.apply(&single, 50.0, &EnergyParams::default());
        assert_eq!(adjusted.charging_stops, 1);

        // no stops to remove
        let none = primary(30, 0);
        let adjusted = SyntheticVariant::FewerStops.apply(&none, 50.0, &EnergyParams::default());
        assert_eq!(adjusted.charging_stops, 0);
    }

    #[test]
    fn test_alternative_labels() {
        assert_eq!(alternative_label(0), "Recommended");
        assert_eq!(alternative_label(2), "Alternative 2");
    }
}
