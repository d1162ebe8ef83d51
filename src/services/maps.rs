use crate::constants::{DEFAULT_MAPS_BASE_URL, DEFAULT_ROADS_BASE_URL};
use crate::error::{AppError, Result};
use crate::models::{Coordinate, TravelMode};
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// The three provider operations route generation depends on.
///
/// Calls are stateless request/response; implementations do not retry.
#[async_trait]
pub trait MapsGateway: Send + Sync {
    /// Nearest point on the road network, or `point` itself when the
    /// provider has nothing nearby.
    async fn snap_to_road(&self, point: &Coordinate) -> Result<Coordinate>;

    /// Routes through `waypoints` in order (origin, intermediates, destination).
    /// An empty list means the provider found no route.
    async fn directions(
        &self,
        waypoints: &[Coordinate],
        mode: &TravelMode,
    ) -> Result<Vec<DirectionsRoute>>;

    /// Elevation in meters for each point, in input order.
    async fn elevations(&self, points: &[Coordinate]) -> Result<Vec<f64>>;
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DirectionsRoute {
    /// Polyline (precision 5) of the whole path
    pub encoded_path: String,
    /// Distance of each leg in meters
    pub leg_distances_m: Vec<f64>,
}

impl DirectionsRoute {
    pub fn distance_km(&self) -> f64 {
        self.leg_distances_m.iter().sum::<f64>() / 1000.0
    }
}

/// Google Maps web services client (Directions, Elevation, Roads).
#[derive(Clone)]
pub struct GoogleMapsClient {
    client: Client,
    api_key: String,
    maps_base_url: String,
    roads_base_url: String,
}

impl GoogleMapsClient {
    pub fn new(api_key: String) -> Self {
        GoogleMapsClient {
            client: Client::new(),
            api_key,
            maps_base_url: DEFAULT_MAPS_BASE_URL.to_string(),
            roads_base_url: DEFAULT_ROADS_BASE_URL.to_string(),
        }
    }

    pub fn with_config(api_key: String, maps_base_url: String, roads_base_url: String) -> Self {
        GoogleMapsClient {
            client: Client::new(),
            api_key,
            maps_base_url: maps_base_url.trim_end_matches('/').to_string(),
            roads_base_url: roads_base_url.trim_end_matches('/').to_string(),
        }
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        params: &[(&str, String)],
    ) -> Result<T> {
        let response = self
            .client
            .get(url)
            .query(params)
            .query(&[("key", &self.api_key)])
            .send()
            .await
            .map_err(|e| AppError::MapsApi(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            tracing::warn!(status = %status, url = url, "Maps API HTTP error {}: {}", status, error_text);
            return Err(AppError::MapsApi(format!("HTTP {}: {}", status, error_text)));
        }

        response
            .json()
            .await
            .map_err(|e| AppError::MapsApi(format!("Failed to parse response: {}", e)))
    }
}

#[async_trait]
impl MapsGateway for GoogleMapsClient {
    async fn snap_to_road(&self, point: &Coordinate) -> Result<Coordinate> {
        let url = format!("{}/nearestRoads", self.roads_base_url);
        let response: NearestRoadsApiResponse = self
            .get_json(&url, &[("points", point.to_query_param())])
            .await?;

        Ok(response.first_location().unwrap_or(*point))
    }

    async fn directions(
        &self,
        waypoints: &[Coordinate],
        mode: &TravelMode,
    ) -> Result<Vec<DirectionsRoute>> {
        let (origin, destination) = match waypoints {
            [origin, .., destination] => (origin, destination),
            _ => {
                return Err(AppError::InvalidRequest(
                    "At least 2 waypoints required".to_string(),
                ))
            }
        };

        let mut params = vec![
            ("origin", origin.to_query_param()),
            ("destination", destination.to_query_param()),
            ("mode", mode.as_str().to_string()),
        ];
        let intermediates = &waypoints[1..waypoints.len() - 1];
        if !intermediates.is_empty() {
            params.push(("waypoints", join_locations(intermediates)));
        }

        tracing::debug!(
            waypoints = waypoints.len(),
            mode = %mode,
            "Directions request: {} waypoints, mode {}",
            waypoints.len(),
            mode
        );

        let url = format!("{}/directions/json", self.maps_base_url);
        let response: DirectionsApiResponse = self.get_json(&url, &params).await?;
        let routes = response.into_routes()?;

        if let Some(route) = routes.first() {
            tracing::debug!(
                distance_km = %format!("{:.2}", route.distance_km()),
                legs = route.leg_distances_m.len(),
                "Directions response: {} routes, first {:.2}km",
                routes.len(),
                route.distance_km()
            );
        }
        Ok(routes)
    }

    async fn elevations(&self, points: &[Coordinate]) -> Result<Vec<f64>> {
        if points.is_empty() {
            return Ok(Vec::new());
        }

        let url = format!("{}/elevation/json", self.maps_base_url);
        let response: ElevationApiResponse = self
            .get_json(&url, &[("locations", join_locations(points))])
            .await?;
        response.into_elevations()
    }
}

/// "lat,lng|lat,lng|..." as the provider expects for multi-point parameters
fn join_locations(points: &[Coordinate]) -> String {
    points
        .iter()
        .map(Coordinate::to_query_param)
        .collect::<Vec<_>>()
        .join("|")
}

// Google API response types

#[derive(Debug, Deserialize)]
struct DirectionsApiResponse {
    status: String,
    #[serde(default)]
    routes: Vec<ApiRoute>,
    #[serde(default)]
    error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiRoute {
    overview_polyline: ApiPolyline,
    #[serde(default)]
    legs: Vec<ApiLeg>,
}

#[derive(Debug, Deserialize)]
struct ApiPolyline {
    points: String,
}

#[derive(Debug, Deserialize)]
struct ApiLeg {
    #[serde(default)]
    distance: Option<ApiValue>,
}

#[derive(Debug, Deserialize)]
struct ApiValue {
    value: f64,
}

impl DirectionsApiResponse {
    fn into_routes(self) -> Result<Vec<DirectionsRoute>> {
        match self.status.as_str() {
            "OK" => Ok(self
                .routes
                .into_iter()
                .map(|route| DirectionsRoute {
                    encoded_path: route.overview_polyline.points,
                    leg_distances_m: route
                        .legs
                        .iter()
                        .map(|leg| leg.distance.as_ref().map_or(0.0, |d| d.value))
                        .collect(),
                })
                .collect()),
            "ZERO_RESULTS" | "NOT_FOUND" => {
                tracing::warn!(status = %self.status, "Directions provider returned no routes");
                Ok(Vec::new())
            }
            other => Err(AppError::MapsApi(format!(
                "Directions status {}: {}",
                other,
                self.error_message.unwrap_or_default()
            ))),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ElevationApiResponse {
    status: String,
    #[serde(default)]
    results: Vec<ElevationResult>,
    #[serde(default)]
    error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ElevationResult {
    elevation: f64,
}

impl ElevationApiResponse {
    fn into_elevations(self) -> Result<Vec<f64>> {
        match self.status.as_str() {
            "OK" | "ZERO_RESULTS" => Ok(self.results.into_iter().map(|r| r.elevation).collect()),
            other => Err(AppError::MapsApi(format!(
                "Elevation status {}: {}",
                other,
                self.error_message.unwrap_or_default()
            ))),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NearestRoadsApiResponse {
    #[serde(default)]
    snapped_points: Vec<SnappedPoint>,
}

#[derive(Debug, Deserialize)]
struct SnappedPoint {
    location: SnappedLocation,
}

#[derive(Debug, Deserialize)]
struct SnappedLocation {
    latitude: f64,
    longitude: f64,
}

impl NearestRoadsApiResponse {
    fn first_location(&self) -> Option<Coordinate> {
        self.snapped_points
            .first()
            .and_then(|p| Coordinate::new(p.location.longitude, p.location.latitude).ok())
    }
}
