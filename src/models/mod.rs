pub mod coordinates;
pub mod route;

pub use coordinates::{Coordinate, LatLng};
pub use route::{Difficulty, GenerationRequest, RankedRoute, RouteCandidate, TravelMode};
