//! Station cache behavior against a mocked NREL backend.

use chrono::{Duration, Local, TimeZone};
use std::sync::Arc;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use ev_trip_planner::planner::{ManualClock, StationAggregator, StationAggregatorConfig};
use ev_trip_planner::providers::NrelStationClient;

fn nrel_body() -> serde_json::Value {
    serde_json::json!({
        "fuel_stations": [
            {
                "id": 1001,
                "station_name": "Downtown Garage",
                "latitude": 39.745,
                "longitude": -104.99,
                "street_address": "1701 Wynkoop St",
                "city": "Denver",
                "state": "CO",
                "status_code": "E",
                "ev_dc_fast_num": 4,
                "ev_connector_types": ["CCS"],
                "ev_network": "EVgo"
            },
            {
                "id": 1002,
                "station_name": "Union Station Plaza",
                "latitude": 39.753,
                "longitude": -105.0,
                "status_code": "E",
                "ev_level2_evse_num": 6,
                "ev_connector_types": ["J1772"],
                "ev_network": "ChargePoint"
            }
        ]
    })
}

fn aggregator(base_url: String, clock: ManualClock) -> StationAggregator {
    let provider = NrelStationClient::new(base_url, "test-key".to_string()).unwrap();
    StationAggregator::new(
        Arc::new(provider),
        Arc::new(clock),
        StationAggregatorConfig {
            annotation_seed: 42,
            ..Default::default()
        },
    )
}

fn clock() -> ManualClock {
    ManualClock::new(
        Local
            .with_ymd_and_hms(2024, 5, 1, 9, 0, 0)
            .unwrap()
            .fixed_offset(),
    )
}

#[tokio::test]
async fn test_repeat_query_within_ttl_hits_upstream_once() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/alt-fuel-stations/v1/nearest.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(nrel_body()))
        .expect(1)
        .mount(&server)
        .await;

    let agg = aggregator(server.uri(), clock());

    let first = agg.find_near(39.7392, -104.9903, 6.2, 50, &[]).await;
    let second = agg.find_near(39.7392, -104.9903, 6.2, 50, &[]).await;

    assert_eq!(first, second);
    assert_eq!(first.len(), 2);
    // mock expectation (exactly one upstream call) verified on server drop
}

#[tokio::test]
async fn test_query_after_ttl_hits_upstream_again() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/alt-fuel-stations/v1/nearest.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(nrel_body()))
        .expect(2)
        .mount(&server)
        .await;

    let manual_clock = clock();
    let agg = aggregator(server.uri(), manual_clock.clone());

    agg.find_near(39.7392, -104.9903, 6.2, 50, &[]).await;
    manual_clock.advance(Duration::minutes(6));
    let refreshed = agg.find_near(39.7392, -104.9903, 6.2, 50, &[]).await;

    assert_eq!(refreshed.len(), 2);
}

#[tokio::test]
async fn test_upstream_failure_yields_empty_not_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let agg = aggregator(server.uri(), clock());
    let found = agg.find_near(39.7392, -104.9903, 6.2, 50, &[]).await;
    assert!(found.is_empty());
}

#[tokio::test]
async fn test_results_ordered_by_distance_from_query_point() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(nrel_body()))
        .mount(&server)
        .await;

    let agg = aggregator(server.uri(), clock());
    let found = agg.find_near(39.7392, -104.9903, 6.2, 50, &[]).await;

    assert_eq!(found.len(), 2);
    assert!(found[0].distance_miles <= found[1].distance_miles);
    // station 1001 sits closer to the query point than 1002
    assert_eq!(found[0].provider_id, "nrel-1001");
}
