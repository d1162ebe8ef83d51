use serde::{Deserialize, Serialize};

/// A point in decimal degrees, longitude first.
///
/// This ordering is used for all geometric math; [`LatLng`] is the form
/// exchanged with clients and storage.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Coordinate {
    pub lng: f64,
    pub lat: f64,
}

impl Coordinate {
    pub fn new(lng: f64, lat: f64) -> Result<Self, String> {
        if !(-180.0..=180.0).contains(&lng) {
            return Err(format!(
                "Invalid longitude: {} (must be between -180 and 180)",
                lng
            ));
        }
        if !(-90.0..=90.0).contains(&lat) {
            return Err(format!(
                "Invalid latitude: {} (must be between -90 and 90)",
                lat
            ));
        }
        Ok(Coordinate { lng, lat })
    }

    /// "lat,lng" as expected by the provider's query strings
    pub fn to_query_param(&self) -> String {
        format!("{},{}", self.lat, self.lng)
    }
}

impl From<Coordinate> for geo::Point<f64> {
    fn from(c: Coordinate) -> Self {
        geo::Point::new(c.lng, c.lat)
    }
}

/// Latitude-first record used at the client/storage boundary.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct LatLng {
    pub latitude: f64,
    pub longitude: f64,
}

impl TryFrom<LatLng> for Coordinate {
    type Error = String;

    fn try_from(value: LatLng) -> Result<Self, Self::Error> {
        Coordinate::new(value.longitude, value.latitude)
    }
}

impl From<Coordinate> for LatLng {
    fn from(c: Coordinate) -> Self {
        LatLng {
            latitude: c.lat,
            longitude: c.lng,
        }
    }
}
