use super::geometry::{bearing, haversine_distance, midpoint, project};
use super::RouteGenerator;
use crate::config::GeneratorConfig;
use crate::error::Result;
use crate::models::{Coordinate, RouteCandidate, TravelMode};
use rand::rngs::StdRng;
use rand::Rng;

/// Perpendicular distance from the midpoint at which start -> detour -> end
/// is two equal legs of `detour_factor * requested / 2`. Zero when the
/// direct distance already covers that.
pub(super) fn detour_offset_km(direct_km: f64, requested_km: f64, detour_factor: f64) -> f64 {
    let half_leg = detour_factor * requested_km / 2.0;
    let half_direct = direct_km / 2.0;
    if half_leg <= half_direct {
        return 0.0;
    }
    (half_leg * half_leg - half_direct * half_direct).sqrt()
}

/// Random detour waypoint to one side of the start-end segment.
pub(super) fn plan_detour(
    start: &Coordinate,
    end: &Coordinate,
    requested_km: f64,
    config: &GeneratorConfig,
    rng: &mut StdRng,
) -> Coordinate {
    let direct_km = haversine_distance(start, end);
    let center = midpoint(start, end);

    let nominal = detour_offset_km(direct_km, requested_km, config.line_detour_factor);
    let offset_km =
        nominal * rng.random_range(config.offset_jitter_min..=config.offset_jitter_max);

    let jitter = config.bearing_jitter_deg;
    let side = if rng.random_bool(0.5) { 90.0 } else { -90.0 };
    let detour_bearing =
        (bearing(start, end) + rng.random_range(-jitter..=jitter) + side).rem_euclid(360.0);

    tracing::debug!(
        offset_km = %format!("{:.2}", offset_km),
        bearing = %format!("{:.1}", detour_bearing),
        "Detour {:.2}km from midpoint on bearing {:.1}",
        offset_km,
        detour_bearing
    );

    project(&center, offset_km, detour_bearing)
}

impl RouteGenerator {
    /// Straight start-to-end directions, no detour.
    pub(super) async fn direct_line_candidate(
        &self,
        start: Coordinate,
        end: Coordinate,
        mode: &TravelMode,
    ) -> Result<RouteCandidate> {
        let waypoints = [start, end];
        self.build_candidate(&waypoints, waypoints.to_vec(), mode)
            .await
    }

    /// One detour attempt: start -> detour -> end.
    pub(super) async fn try_line_candidate(
        &self,
        start: Coordinate,
        end: Coordinate,
        requested_length_km: f64,
        mode: &TravelMode,
        rng: &mut StdRng,
    ) -> Result<RouteCandidate> {
        let detour = plan_detour(&start, &end, requested_length_km, &self.config, rng);
        let waypoints = [start, detour, end];
        self.build_candidate(&waypoints, waypoints.to_vec(), mode)
            .await
    }
}
