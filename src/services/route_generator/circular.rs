use super::geometry::{circle_boundary, haversine_distance, intersect, project};
use super::RouteGenerator;
use crate::config::GeneratorConfig;
use crate::error::{AppError, Result};
use crate::models::{Coordinate, RouteCandidate, TravelMode};
use rand::rngs::StdRng;
use rand::Rng;

/// The two turning points of a triangular loop.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(super) struct LoopPlan {
    pub first_stop: Coordinate,
    pub second_stop: Coordinate,
    pub segment_km: f64,
}

/// Out-of-range loop lengths (non-positive, NaN, above the maximum) fall back
/// to the configured default.
pub(super) fn clamp_loop_length(length_km: f64, config: &GeneratorConfig) -> f64 {
    if length_km > 0.0 && length_km <= config.max_length_km {
        length_km
    } else {
        config.default_length_km
    }
}

/// Lay out three equal legs: start, a stop on a random bearing, then the
/// crossing of the two one-leg circles that best closes the triangle.
pub(super) fn plan_loop(
    start: &Coordinate,
    loop_length_km: f64,
    config: &GeneratorConfig,
    rng: &mut StdRng,
) -> Result<LoopPlan> {
    let segment_km = clamp_loop_length(loop_length_km, config) / 3.0;
    let bearing_deg = rng.random_range(0.0..360.0);
    let first_stop = project(start, segment_km, bearing_deg);

    let crossings = intersect(
        &circle_boundary(start, segment_km, config.circle_steps),
        &circle_boundary(&first_stop, segment_km, config.circle_steps),
    );

    let second_stop = crossings
        .into_iter()
        .min_by(|a, b| {
            let da = (haversine_distance(&first_stop, a) - segment_km).abs();
            let db = (haversine_distance(&first_stop, b) - segment_km).abs();
            da.total_cmp(&db)
        })
        .ok_or(AppError::NoIntersection)?;

    Ok(LoopPlan {
        first_stop,
        second_stop,
        segment_km,
    })
}

impl RouteGenerator {
    /// One closed-loop attempt. Any error discards the attempt.
    pub(super) async fn try_circular_candidate(
        &self,
        start: Coordinate,
        loop_length_km: f64,
        mode: &TravelMode,
        rng: &mut StdRng,
    ) -> Result<RouteCandidate> {
        let plan = plan_loop(&start, loop_length_km, &self.config, rng)?;

        tracing::debug!(
            segment_km = %format!("{:.2}", plan.segment_km),
            "Loop plan: start -> ({:.5}, {:.5}) -> ({:.5}, {:.5}) -> start",
            plan.first_stop.lng,
            plan.first_stop.lat,
            plan.second_stop.lng,
            plan.second_stop.lat
        );

        // The start is snapped once so the loop closes on the same point
        let snapped = self
            .snap_all(&[start, plan.first_stop, plan.second_stop])
            .await;
        let route_waypoints = [snapped[0], snapped[1], snapped[2], snapped[0]];
        let recorded_waypoints = vec![start, snapped[1], snapped[2], start];

        self.build_candidate(&route_waypoints, recorded_waypoints, mode)
            .await
    }
}
