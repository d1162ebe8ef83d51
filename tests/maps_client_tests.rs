use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use runroute::models::{Coordinate, TravelMode};
use runroute::services::maps::{GoogleMapsClient, MapsGateway};
use runroute::AppError;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

mod common;

type Captured = Arc<Mutex<Vec<(String, HashMap<String, String>)>>>;

/// Canned provider replies keyed by endpoint
#[derive(Clone)]
struct MockProvider {
    captured: Captured,
    directions: Value,
    elevation: Value,
    nearest_roads: Value,
    fail_with: Option<StatusCode>,
}

impl MockProvider {
    fn new() -> Self {
        MockProvider {
            captured: Arc::new(Mutex::new(Vec::new())),
            directions: json!({
                "status": "OK",
                "routes": [{
                    "overview_polyline": {"points": common::TEST_PATH},
                    "legs": [
                        {"distance": {"value": 1200.0, "text": "1.2 km"}},
                        {"distance": {"value": 800.0, "text": "0.8 km"}}
                    ]
                }]
            }),
            elevation: json!({
                "status": "OK",
                "results": [
                    {"elevation": 12.5, "location": {"lat": 38.5, "lng": -120.2}},
                    {"elevation": 20.0, "location": {"lat": 40.7, "lng": -120.95}},
                    {"elevation": 18.0, "location": {"lat": 43.252, "lng": -126.453}}
                ]
            }),
            nearest_roads: json!({
                "snappedPoints": [{
                    "location": {"latitude": 37.77501, "longitude": -122.41935},
                    "originalIndex": 0,
                    "placeId": "test-place"
                }]
            }),
            fail_with: None,
        }
    }

    fn captured(&self) -> Vec<(String, HashMap<String, String>)> {
        self.captured.lock().unwrap().clone()
    }
}

fn reply(
    provider: &MockProvider,
    endpoint: &str,
    params: HashMap<String, String>,
    body: &Value,
) -> (StatusCode, Json<Value>) {
    provider
        .captured
        .lock()
        .unwrap()
        .push((endpoint.to_string(), params));
    match provider.fail_with {
        Some(status) => (status, Json(json!({"error": "unavailable"}))),
        None => (StatusCode::OK, Json(body.clone())),
    }
}

/// Serve `provider` on an ephemeral port and return a client pointed at it
async fn spawn_provider(provider: MockProvider) -> GoogleMapsClient {
    let app = Router::new()
        .route(
            "/maps/api/directions/json",
            get(
                |State(p): State<MockProvider>, Query(q): Query<HashMap<String, String>>| async move {
                    reply(&p, "directions", q, &p.directions)
                },
            ),
        )
        .route(
            "/maps/api/elevation/json",
            get(
                |State(p): State<MockProvider>, Query(q): Query<HashMap<String, String>>| async move {
                    reply(&p, "elevation", q, &p.elevation)
                },
            ),
        )
        .route(
            "/roads/nearestRoads",
            get(
                |State(p): State<MockProvider>, Query(q): Query<HashMap<String, String>>| async move {
                    reply(&p, "nearestRoads", q, &p.nearest_roads)
                },
            ),
        )
        .with_state(provider);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    GoogleMapsClient::with_config(
        "test-key".to_string(),
        format!("http://{}/maps/api/", addr),
        format!("http://{}/roads", addr),
    )
}

fn sf() -> Coordinate {
    common::san_francisco()
}

#[tokio::test]
async fn test_directions_request_parameters() {
    let provider = MockProvider::new();
    let client = spawn_provider(provider.clone()).await;

    let first = Coordinate::new(-122.41, 37.78).unwrap();
    let second = Coordinate::new(-122.43, 37.78).unwrap();
    let routes = client
        .directions(&[sf(), first, second, sf()], &TravelMode::bicycling())
        .await
        .unwrap();

    assert_eq!(routes.len(), 1);
    assert_eq!(routes[0].encoded_path, common::TEST_PATH);
    assert!((routes[0].distance_km() - 2.0).abs() < 1e-9);

    let captured = provider.captured();
    assert_eq!(captured.len(), 1);
    let (endpoint, params) = &captured[0];
    assert_eq!(endpoint, "directions");
    assert_eq!(params["mode"], "bicycling");
    assert_eq!(params["origin"], "37.7749,-122.4194");
    assert_eq!(params["destination"], "37.7749,-122.4194");
    assert_eq!(params["waypoints"], "37.78,-122.41|37.78,-122.43");
    assert_eq!(params["key"], "test-key");
}

#[tokio::test]
async fn test_directions_without_intermediates_omits_waypoints() {
    let provider = MockProvider::new();
    let client = spawn_provider(provider.clone()).await;

    let end = common::ferry_building();
    client
        .directions(&[sf(), end], &TravelMode::walking())
        .await
        .unwrap();

    let (_, params) = &provider.captured()[0];
    assert!(!params.contains_key("waypoints"));
    assert_eq!(params["mode"], "walking");
}

#[tokio::test]
async fn test_directions_zero_results_is_empty() {
    let mut provider = MockProvider::new();
    provider.directions = json!({"status": "ZERO_RESULTS", "routes": []});
    let client = spawn_provider(provider).await;

    let routes = client
        .directions(&[sf(), common::ferry_building()], &TravelMode::walking())
        .await
        .unwrap();
    assert!(routes.is_empty());
}

#[tokio::test]
async fn test_directions_denied_is_error() {
    let mut provider = MockProvider::new();
    provider.directions = json!({
        "status": "REQUEST_DENIED",
        "error_message": "The provided API key is invalid."
    });
    let client = spawn_provider(provider).await;

    let err = client
        .directions(&[sf(), common::ferry_building()], &TravelMode::walking())
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::MapsApi(_)));
    assert!(err.to_string().contains("REQUEST_DENIED"));
}

#[tokio::test]
async fn test_http_failure_is_maps_error() {
    let mut provider = MockProvider::new();
    provider.fail_with = Some(StatusCode::INTERNAL_SERVER_ERROR);
    let client = spawn_provider(provider).await;

    let err = client
        .directions(&[sf(), common::ferry_building()], &TravelMode::walking())
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::MapsApi(_)));
    assert!(err.to_string().contains("500"));
}

#[tokio::test]
async fn test_elevations_single_batched_call() {
    let provider = MockProvider::new();
    let client = spawn_provider(provider.clone()).await;

    let points = vec![
        Coordinate::new(-120.2, 38.5).unwrap(),
        Coordinate::new(-120.95, 40.7).unwrap(),
        Coordinate::new(-126.453, 43.252).unwrap(),
    ];
    let elevations = client.elevations(&points).await.unwrap();
    assert_eq!(elevations, vec![12.5, 20.0, 18.0]);

    let captured = provider.captured();
    assert_eq!(captured.len(), 1);
    assert_eq!(
        captured[0].1["locations"],
        "38.5,-120.2|40.7,-120.95|43.252,-126.453"
    );
}

#[tokio::test]
async fn test_elevations_of_nothing_skips_provider() {
    let provider = MockProvider::new();
    let client = spawn_provider(provider.clone()).await;

    assert!(client.elevations(&[]).await.unwrap().is_empty());
    assert!(provider.captured().is_empty());
}

#[tokio::test]
async fn test_snap_to_road_uses_first_snapped_point() {
    let provider = MockProvider::new();
    let client = spawn_provider(provider.clone()).await;

    let snapped = client.snap_to_road(&sf()).await.unwrap();
    assert!((snapped.lat - 37.77501).abs() < 1e-9);
    assert!((snapped.lng + 122.41935).abs() < 1e-9);

    let (endpoint, params) = &provider.captured()[0];
    assert_eq!(endpoint, "nearestRoads");
    assert_eq!(params["points"], "37.7749,-122.4194");
}

#[tokio::test]
async fn test_snap_to_road_without_match_keeps_point() {
    let mut provider = MockProvider::new();
    provider.nearest_roads = json!({});
    let client = spawn_provider(provider).await;

    let snapped = client.snap_to_road(&sf()).await.unwrap();
    assert_eq!(snapped, sf());
}

#[tokio::test]
async fn test_real_directions_api() {
    if common::should_skip_real_api_tests() {
        println!("Skipping real API test");
        return;
    }

    let api_key = std::env::var("GOOGLE_MAPS_API_KEY").unwrap();
    let client = GoogleMapsClient::new(api_key);

    let routes = client
        .directions(&[sf(), common::ferry_building()], &TravelMode::walking())
        .await
        .unwrap();

    assert!(!routes.is_empty(), "Should find a walking route");
    let route = &routes[0];
    assert!(route.distance_km() > 2.0);
    assert!(!route.encoded_path.is_empty());

    let estimator = runroute::services::elevation::ElevationGainEstimator::new(Arc::new(client));
    let gain = estimator.estimate(&route.encoded_path).await.unwrap();
    assert!(gain >= 0.0);
}
