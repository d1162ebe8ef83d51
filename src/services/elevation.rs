use crate::cache::{gain_cache_key, GainCache};
use crate::error::{AppError, Result};
use crate::models::Coordinate;
use crate::services::maps::MapsGateway;
use std::sync::Arc;

/// Precision of the provider's encoded paths (1e-5 degrees).
const POLYLINE_PRECISION: u32 = 5;

/// Reduces an encoded path to its total ascent in meters.
#[derive(Clone)]
pub struct ElevationGainEstimator {
    gateway: Arc<dyn MapsGateway>,
    cache: Option<Arc<dyn GainCache>>,
}

impl ElevationGainEstimator {
    pub fn new(gateway: Arc<dyn MapsGateway>) -> Self {
        ElevationGainEstimator {
            gateway,
            cache: None,
        }
    }

    pub fn with_cache(mut self, cache: Arc<dyn GainCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Total ascent along `encoded_path`. A path with no samples climbs 0 m.
    pub async fn estimate(&self, encoded_path: &str) -> Result<f64> {
        let samples = decode_path(encoded_path)?;
        if samples.is_empty() {
            return Ok(0.0);
        }

        let key = gain_cache_key(encoded_path);
        if let Some(ref cache) = self.cache {
            if let Some(gain) = cache.get_gain(&key).await {
                return Ok(gain);
            }
        }

        let elevations = self.gateway.elevations(&samples).await?;
        if elevations.len() != samples.len() {
            tracing::warn!(
                samples = samples.len(),
                elevations = elevations.len(),
                "Elevation provider returned {} values for {} samples",
                elevations.len(),
                samples.len()
            );
        }

        let gain = total_ascent(&elevations);
        tracing::debug!(
            samples = samples.len(),
            gain_m = %format!("{:.1}", gain),
            "Elevation gain {:.1}m over {} samples",
            gain,
            samples.len()
        );

        if let Some(ref cache) = self.cache {
            cache.store_gain(&key, gain).await;
        }
        Ok(gain)
    }
}

/// Decode a precision-5 polyline into coordinates, in path order.
pub fn decode_path(encoded_path: &str) -> Result<Vec<Coordinate>> {
    let line = polyline::decode_polyline(encoded_path, POLYLINE_PRECISION)
        .map_err(|e| AppError::Polyline(e.to_string()))?;

    Ok(line
        .coords()
        .map(|c| Coordinate { lng: c.x, lat: c.y })
        .collect())
}

/// Sum of the rises between consecutive elevations; descents count as 0.
pub fn total_ascent(elevations: &[f64]) -> f64 {
    elevations
        .windows(2)
        .map(|pair| (pair[1] - pair[0]).max(0.0))
        .sum()
}
