use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use super::geo::Coordinate;

/// Charging connector standard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(ascii_case_insensitive)]
pub enum ConnectorType {
    Ccs,
    Chademo,
    J1772,
    Tesla,
    Type2,
}

impl ConnectorType {
    /// Best-effort mapping from provider connector labels
    pub fn from_label(label: &str) -> Self {
        let lower = label.to_lowercase();
        if lower.contains("ccs") || lower.contains("combo") {
            ConnectorType::Ccs
        } else if lower.contains("chademo") {
            ConnectorType::Chademo
        } else if lower.contains("tesla") || lower.contains("nacs") {
            ConnectorType::Tesla
        } else if lower.contains("type2") || lower.contains("type 2") || lower.contains("mennekes")
        {
            ConnectorType::Type2
        } else {
            ConnectorType::J1772
        }
    }
}

/// On-site amenity used for preference filtering (OR semantics)
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Amenity {
    Restrooms,
    Food,
    Coffee,
    Shopping,
    Wifi,
    Lounge,
}

impl Amenity {
    pub const ALL: [Amenity; 6] = [
        Amenity::Restrooms,
        Amenity::Food,
        Amenity::Coffee,
        Amenity::Shopping,
        Amenity::Wifi,
        Amenity::Lounge,
    ];
}

/// Site accessibility
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum StationAccess {
    Public,
    Restricted,
}

/// A charging station as returned by the aggregator.
///
/// `provider_id` is the dedup key: the same physical station surfaced by two
/// overlapping queries collapses to one record. Amenities, access, pricing
/// and rating are synthetic placeholders layered onto provider metadata;
/// they are stable per station for a given RNG seed but carry no real-world
/// occupancy meaning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StationRecord {
    pub provider_id: String,
    pub name: String,
    pub coord: Coordinate,
    pub address: String,
    pub power_kw: f64,
    pub connector: ConnectorType,
    pub network: String,
    pub operational: bool,
    /// Distance from the query point the record was fetched for
    pub distance_miles: f64,
    pub amenities: Vec<Amenity>,
    pub access: StationAccess,
    pub price_per_kwh: f64,
    pub rating: f64,
}

impl StationRecord {
    /// OR semantics: keep the station if it offers any preferred amenity.
    /// An empty preference list disables amenity filtering.
    pub fn matches_amenities(&self, preferred: &[Amenity]) -> bool {
        preferred.is_empty() || preferred.iter().any(|a| self.amenities.contains(a))
    }
}

/// Station as returned by a provider, before enrichment and filtering
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawStation {
    pub id: String,
    pub name: String,
    pub coord: Coordinate,
    pub address: String,
    pub power_kw: Option<f64>,
    pub connector_label: Option<String>,
    pub network: Option<String>,
    pub operational: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn station(amenities: Vec<Amenity>) -> StationRecord {
        StationRecord {
            provider_id: "p-1".to_string(),
            name: "Test Station".to_string(),
            coord: Coordinate::new(37.0, -122.0),
            address: "1 Main St".to_string(),
            power_kw: 150.0,
            connector: ConnectorType::Ccs,
            network: "Electrify America".to_string(),
            operational: true,
            distance_miles: 0.5,
            amenities,
            access: StationAccess::Public,
            price_per_kwh: 0.43,
            rating: 4.2,
        }
    }

    #[test]
    fn test_amenity_filter_is_or_semantics() {
        let s = station(vec![Amenity::Coffee]);
        // satisfying only one of two requested amenities retains the station
        assert!(s.matches_amenities(&[Amenity::Coffee, Amenity::Food]));
        assert!(!s.matches_amenities(&[Amenity::Food, Amenity::Wifi]));
    }

    #[test]
    fn test_empty_preference_list_matches_everything() {
        assert!(station(vec![]).matches_amenities(&[]));
    }

    #[test]
    fn test_connector_label_mapping() {
        assert_eq!(ConnectorType::from_label("CCS Combo"), ConnectorType::Ccs);
        assert_eq!(ConnectorType::from_label("CHAdeMO"), ConnectorType::Chademo);
        assert_eq!(ConnectorType::from_label("Tesla NACS"), ConnectorType::Tesla);
        assert_eq!(ConnectorType::from_label("J1772"), ConnectorType::J1772);
    }
}
