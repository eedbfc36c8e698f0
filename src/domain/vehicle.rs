use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

/// Immutable vehicle reference data
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VehicleProfile {
    pub id: String,
    /// Manufacturer + model label shown to users
    pub label: String,
    pub battery_capacity_kwh: f64,
    /// Rated consumption in kWh per mile
    pub efficiency_kwh_per_mile: f64,
    pub rated_range_miles: f64,
}

static CATALOG: Lazy<Vec<VehicleProfile>> = Lazy::new(|| {
    vec![
        profile("tesla-model-3", "Tesla Model 3 Long Range", 75.0, 0.25, 333.0),
        profile("tesla-model-y", "Tesla Model Y Long Range", 75.0, 0.27, 310.0),
        profile("chevy-bolt-euv", "Chevrolet Bolt EUV", 65.0, 0.29, 247.0),
        profile("ford-mach-e", "Ford Mustang Mach-E", 88.0, 0.32, 290.0),
        profile("hyundai-ioniq-5", "Hyundai Ioniq 5 AWD", 77.4, 0.30, 266.0),
        profile("nissan-leaf-plus", "Nissan Leaf Plus", 62.0, 0.30, 212.0),
        profile("rivian-r1t", "Rivian R1T", 135.0, 0.48, 314.0),
    ]
});

fn profile(id: &str, label: &str, capacity: f64, efficiency: f64, range: f64) -> VehicleProfile {
    VehicleProfile {
        id: id.to_string(),
        label: label.to_string(),
        battery_capacity_kwh: capacity,
        efficiency_kwh_per_mile: efficiency,
        rated_range_miles: range,
    }
}

/// All vehicles known to the planner
pub fn catalog() -> &'static [VehicleProfile] {
    &CATALOG
}

/// Look up a vehicle by identifier
pub fn find_vehicle(id: &str) -> Option<&'static VehicleProfile> {
    CATALOG.iter().find(|v| v.id == id)
}
