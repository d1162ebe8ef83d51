use crate::models::{Coordinate, LatLng};
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use uuid::Uuid;

/// Provider travel mode, passed through verbatim (e.g. "walking", "bicycling").
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct TravelMode(String);

impl TravelMode {
    pub fn new(mode: impl Into<String>) -> Self {
        TravelMode(mode.into())
    }

    pub fn walking() -> Self {
        TravelMode::new("walking")
    }

    pub fn bicycling() -> Self {
        TravelMode::new("bicycling")
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for TravelMode {
    fn default() -> Self {
        TravelMode::walking()
    }
}

impl fmt::Display for TravelMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Relative difficulty within one generated batch, by elevation gain.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    /// Label for the route at `rank` (0 = least climbing).
    pub fn for_rank(rank: usize) -> Self {
        match rank {
            0 => Difficulty::Easy,
            1 => Difficulty::Medium,
            _ => Difficulty::Hard,
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Difficulty::Easy => write!(f, "easy"),
            Difficulty::Medium => write!(f, "medium"),
            Difficulty::Hard => write!(f, "hard"),
        }
    }
}

/// One successfully generated route. Built once, never mutated.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RouteCandidate {
    id: Uuid,
    /// Requested start first, requested end last (loops repeat the start)
    #[serde(serialize_with = "serialize_lat_lng")]
    waypoints: Vec<Coordinate>,
    /// Provider polyline of the full turn-by-turn path
    encoded_path: String,
    elevation_gain_m: f64,
    /// Provider-measured path length
    length_km: f64,
}

impl RouteCandidate {
    pub fn new(
        waypoints: Vec<Coordinate>,
        encoded_path: String,
        elevation_gain_m: f64,
        length_km: f64,
    ) -> Self {
        RouteCandidate {
            id: Uuid::new_v4(),
            waypoints,
            encoded_path,
            elevation_gain_m: elevation_gain_m.max(0.0),
            length_km: length_km.max(0.0),
        }
    }

    pub fn waypoints(&self) -> &[Coordinate] {
        &self.waypoints
    }

    pub fn encoded_path(&self) -> &str {
        &self.encoded_path
    }

    pub fn elevation_gain_m(&self) -> f64 {
        self.elevation_gain_m
    }

    pub fn length_km(&self) -> f64 {
        self.length_km
    }

    pub fn is_loop(&self) -> bool {
        self.waypoints.len() >= 2 && self.waypoints.first() == self.waypoints.last()
    }
}

/// Waypoints leave the service in the same `LatLng` form requests arrive in.
fn serialize_lat_lng<S>(waypoints: &[Coordinate], serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.collect_seq(waypoints.iter().copied().map(LatLng::from))
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RankedRoute {
    #[serde(flatten)]
    pub route: RouteCandidate,
    pub difficulty: Difficulty,
}

/// Input contract of a generation call.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub requested_length_km: f64,
    pub start_point: Coordinate,
    pub end_point: Option<Coordinate>,
    pub travel_mode: TravelMode,
}

impl GenerationRequest {
    /// A line route is wanted only when an end point differs from the start.
    pub fn is_line(&self) -> bool {
        matches!(self.end_point, Some(end) if end != self.start_point)
    }
}

// Request/Response types for API endpoints

#[derive(Debug, Deserialize)]
pub struct RouteRequest {
    pub start_point: LatLng,
    #[serde(default)]
    pub end_point: Option<LatLng>,
    pub distance_km: f64,
    #[serde(default)]
    pub mode: TravelMode,
}

impl RouteRequest {
    pub fn validate(&self) -> Result<(), String> {
        if !self.distance_km.is_finite() {
            return Err("distance_km must be a finite number".to_string());
        }
        if self.mode.as_str().trim().is_empty() {
            return Err("mode must not be empty".to_string());
        }
        Coordinate::try_from(self.start_point).map_err(|e| format!("start_point: {}", e))?;
        if let Some(end) = self.end_point {
            Coordinate::try_from(end).map_err(|e| format!("end_point: {}", e))?;
        }
        Ok(())
    }

    pub fn into_generation_request(self) -> Result<GenerationRequest, String> {
        self.validate()?;
        Ok(GenerationRequest {
            requested_length_km: self.distance_km,
            start_point: Coordinate::try_from(self.start_point)?,
            end_point: self.end_point.map(Coordinate::try_from).transpose()?,
            travel_mode: self.mode,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct RouteResponse {
    pub routes: Vec<RankedRoute>,
}
