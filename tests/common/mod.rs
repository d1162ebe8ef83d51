use async_trait::async_trait;
use runroute::config::GeneratorConfig;
use runroute::error::{AppError, Result};
use runroute::models::{Coordinate, TravelMode};
use runroute::services::elevation::ElevationGainEstimator;
use runroute::services::maps::{DirectionsRoute, MapsGateway};
use runroute::services::route_generator::RouteGenerator;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Three-point reference polyline; decodes to a non-empty path
#[allow(dead_code)]
pub const TEST_PATH: &str = "_p~iF~ps|U_ulLnnqC_mqNvxq`@";

/// Prefixes of `TEST_PATH`: one and two points
#[allow(dead_code)]
pub const SHORT_PATHS: [&str; 2] = ["_p~iF~ps|U", "_p~iF~ps|U_ulLnnqC"];

/// Scripted outcome of one directions call
#[allow(dead_code)]
#[derive(Debug, Clone)]
pub enum DirectionsReply {
    Route {
        encoded_path: String,
        leg_distances_m: Vec<f64>,
    },
    Empty,
    Error,
}

#[allow(dead_code)]
impl DirectionsReply {
    pub fn route(leg_distances_m: &[f64]) -> Self {
        DirectionsReply::route_with_path(TEST_PATH, leg_distances_m)
    }

    /// A route with its own encoded path, so gain memoization keys differ
    pub fn route_with_path(encoded_path: &str, leg_distances_m: &[f64]) -> Self {
        DirectionsReply::Route {
            encoded_path: encoded_path.to_string(),
            leg_distances_m: leg_distances_m.to_vec(),
        }
    }
}

#[derive(Debug, Clone)]
#[allow(dead_code)]
pub struct DirectionsCall {
    pub waypoints: Vec<Coordinate>,
    pub mode: String,
}

/// In-process stand-in for the maps provider.
///
/// Scripted replies are consumed in order; once a script runs out the
/// default reply is used.
#[allow(dead_code)]
pub struct FakeGateway {
    directions_script: Mutex<VecDeque<DirectionsReply>>,
    default_directions: DirectionsReply,
    elevation_script: Mutex<VecDeque<Vec<f64>>>,
    default_elevations: Vec<f64>,
    snap_fails: bool,
    snap_offset_deg: f64,
    pub directions_calls: Mutex<Vec<DirectionsCall>>,
    pub elevation_calls: AtomicUsize,
    pub snap_calls: AtomicUsize,
}

#[allow(dead_code)]
impl FakeGateway {
    /// Every directions call returns a 3-leg 5 km route; elevations [10, 15, 12]
    pub fn new() -> Self {
        FakeGateway {
            directions_script: Mutex::new(VecDeque::new()),
            default_directions: DirectionsReply::route(&[1500.0, 2000.0, 1500.0]),
            elevation_script: Mutex::new(VecDeque::new()),
            default_elevations: vec![10.0, 15.0, 12.0],
            snap_fails: false,
            snap_offset_deg: 0.0,
            directions_calls: Mutex::new(Vec::new()),
            elevation_calls: AtomicUsize::new(0),
            snap_calls: AtomicUsize::new(0),
        }
    }

    pub fn with_default_directions(mut self, reply: DirectionsReply) -> Self {
        self.default_directions = reply;
        self
    }

    pub fn with_directions_script(self, replies: Vec<DirectionsReply>) -> Self {
        *self.directions_script.lock().unwrap() = replies.into();
        self
    }

    pub fn with_elevation_script(self, series: Vec<Vec<f64>>) -> Self {
        *self.elevation_script.lock().unwrap() = series.into();
        self
    }

    pub fn with_default_elevations(mut self, series: Vec<f64>) -> Self {
        self.default_elevations = series;
        self
    }

    pub fn with_failing_snap(mut self) -> Self {
        self.snap_fails = true;
        self
    }

    /// Snapped points are moved north by `offset_deg`
    pub fn with_snap_offset(mut self, offset_deg: f64) -> Self {
        self.snap_offset_deg = offset_deg;
        self
    }

    pub fn directions_calls(&self) -> Vec<DirectionsCall> {
        self.directions_calls.lock().unwrap().clone()
    }

    pub fn directions_call_count(&self) -> usize {
        self.directions_calls.lock().unwrap().len()
    }
}

#[async_trait]
impl MapsGateway for FakeGateway {
    async fn snap_to_road(&self, point: &Coordinate) -> Result<Coordinate> {
        self.snap_calls.fetch_add(1, Ordering::SeqCst);
        if self.snap_fails {
            return Err(AppError::MapsApi("snap unavailable".to_string()));
        }
        Ok(Coordinate {
            lng: point.lng,
            lat: point.lat + self.snap_offset_deg,
        })
    }

    async fn directions(
        &self,
        waypoints: &[Coordinate],
        mode: &TravelMode,
    ) -> Result<Vec<DirectionsRoute>> {
        self.directions_calls.lock().unwrap().push(DirectionsCall {
            waypoints: waypoints.to_vec(),
            mode: mode.as_str().to_string(),
        });

        let reply = self
            .directions_script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| self.default_directions.clone());

        match reply {
            DirectionsReply::Route {
                encoded_path,
                leg_distances_m,
            } => Ok(vec![DirectionsRoute {
                encoded_path,
                leg_distances_m,
            }]),
            DirectionsReply::Empty => Ok(Vec::new()),
            DirectionsReply::Error => Err(AppError::MapsApi("HTTP 503: unavailable".to_string())),
        }
    }

    async fn elevations(&self, _points: &[Coordinate]) -> Result<Vec<f64>> {
        self.elevation_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .elevation_script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| self.default_elevations.clone()))
    }
}

/// Generator over `gateway` with no gain cache
#[allow(dead_code)]
pub fn generator_with(gateway: Arc<FakeGateway>, config: GeneratorConfig) -> RouteGenerator {
    let gateway: Arc<dyn MapsGateway> = gateway;
    let estimator = ElevationGainEstimator::new(gateway.clone());
    RouteGenerator::new(gateway, estimator, config)
}

#[allow(dead_code)]
pub fn san_francisco() -> Coordinate {
    Coordinate::new(-122.4194, 37.7749).unwrap()
}

/// Ferry Building, ~3.2 km from `san_francisco()`
#[allow(dead_code)]
pub fn ferry_building() -> Coordinate {
    Coordinate::new(-122.3937, 37.7955).unwrap()
}

/// Check if we should skip real API tests
#[allow(dead_code)]
pub fn should_skip_real_api_tests() -> bool {
    std::env::var("SKIP_REAL_API_TESTS").is_ok() || std::env::var("GOOGLE_MAPS_API_KEY").is_err()
}
