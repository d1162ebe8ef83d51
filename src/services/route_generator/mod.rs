mod circular;
pub mod geometry;
mod line;
pub mod ranking;

use crate::config::GeneratorConfig;
use crate::error::{AppError, Result};
use crate::models::{Coordinate, GenerationRequest, RankedRoute, RouteCandidate, TravelMode};
use crate::services::elevation::ElevationGainEstimator;
use crate::services::maps::MapsGateway;

use futures::future::join_all;
use rand::rngs::StdRng;
use std::sync::Arc;

use ranking::rank_candidates;

/// Which per-attempt routine a batch runs.
#[derive(Debug, Clone, Copy)]
enum CandidateKind {
    Circular {
        start: Coordinate,
        loop_length_km: f64,
    },
    Line {
        start: Coordinate,
        end: Coordinate,
        requested_length_km: f64,
    },
}

pub struct RouteGenerator {
    gateway: Arc<dyn MapsGateway>,
    estimator: ElevationGainEstimator,
    config: GeneratorConfig,
}

impl RouteGenerator {
    pub fn new(
        gateway: Arc<dyn MapsGateway>,
        estimator: ElevationGainEstimator,
        config: GeneratorConfig,
    ) -> Self {
        RouteGenerator {
            gateway,
            estimator,
            config,
        }
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Run the line generator when the request has an end point distinct from
    /// its start, the circular generator otherwise.
    pub async fn generate(
        &self,
        request: &GenerationRequest,
        rng: &mut StdRng,
    ) -> Result<Vec<RankedRoute>> {
        match request.end_point {
            Some(end) if request.is_line() => {
                self.generate_line_routes(
                    request.requested_length_km,
                    request.start_point,
                    end,
                    &request.travel_mode,
                    rng,
                )
                .await
            }
            _ => {
                self.generate_circular_routes(
                    request.requested_length_km,
                    request.start_point,
                    &request.travel_mode,
                    rng,
                )
                .await
            }
        }
    }

    /// Closed loops from `start`, ranked easy to hard.
    /// Fails with `GenerationExhausted` rather than returning a short list.
    pub async fn generate_circular_routes(
        &self,
        requested_length_km: f64,
        start: Coordinate,
        mode: &TravelMode,
        rng: &mut StdRng,
    ) -> Result<Vec<RankedRoute>> {
        tracing::info!(
            lng = start.lng,
            lat = start.lat,
            requested_km = requested_length_km,
            mode = %mode,
            "Generating circular routes from ({:.4}, {:.4}), {:.1}km, mode={}",
            start.lng, start.lat, requested_length_km, mode
        );

        let kind = CandidateKind::Circular {
            start,
            loop_length_km: requested_length_km * self.config.circular_length_discount,
        };
        let candidates = self.collect_candidates(kind, mode, rng).await?;
        Ok(self.finish(candidates))
    }

    /// Routes from `start` to `end`. A single direct route when the request is
    /// no longer than the straight-line distance (or the points coincide),
    /// otherwise a ranked batch detouring to one side.
    pub async fn generate_line_routes(
        &self,
        requested_length_km: f64,
        start: Coordinate,
        end: Coordinate,
        mode: &TravelMode,
        rng: &mut StdRng,
    ) -> Result<Vec<RankedRoute>> {
        let direct_km = geometry::haversine_distance(&start, &end);
        tracing::info!(
            requested_km = requested_length_km,
            direct_km = %format!("{:.2}", direct_km),
            mode = %mode,
            "Generating line routes: {:.1}km requested, {:.2}km direct, mode={}",
            requested_length_km, direct_km, mode
        );

        // Coincident endpoints have no bearing to detour from
        if requested_length_km <= direct_km || start == end {
            let candidate = self.direct_line_candidate(start, end, mode).await?;
            return Ok(self.finish(vec![candidate]));
        }

        let kind = CandidateKind::Line {
            start,
            end,
            requested_length_km,
        };
        let candidates = self.collect_candidates(kind, mode, rng).await?;
        Ok(self.finish(candidates))
    }

    /// Run attempts until `candidate_count` succeed or
    /// `max_consecutive_failures` fail in a row.
    async fn collect_candidates(
        &self,
        kind: CandidateKind,
        mode: &TravelMode,
        rng: &mut StdRng,
    ) -> Result<Vec<RouteCandidate>> {
        let wanted = self.config.candidate_count;
        let budget = self.config.max_consecutive_failures;
        let mut candidates = Vec::with_capacity(wanted);
        let mut consecutive_failures = 0;

        while candidates.len() < wanted {
            let attempt = match kind {
                CandidateKind::Circular {
                    start,
                    loop_length_km,
                } => {
                    self.try_circular_candidate(start, loop_length_km, mode, rng)
                        .await
                }
                CandidateKind::Line {
                    start,
                    end,
                    requested_length_km,
                } => {
                    self.try_line_candidate(start, end, requested_length_km, mode, rng)
                        .await
                }
            };

            match attempt {
                Ok(candidate) => {
                    tracing::debug!(
                        index = candidates.len(),
                        length_km = %format!("{:.2}", candidate.length_km()),
                        gain_m = %format!("{:.1}", candidate.elevation_gain_m()),
                        "Candidate {} accepted: {:.2}km, {:.1}m gain",
                        candidates.len() + 1,
                        candidate.length_km(),
                        candidate.elevation_gain_m()
                    );
                    candidates.push(candidate);
                    consecutive_failures = 0;
                }
                Err(e) => {
                    consecutive_failures += 1;
                    tracing::warn!(
                        error = %e,
                        consecutive_failures = consecutive_failures,
                        budget = budget,
                        "Route attempt failed ({}/{}): {}",
                        consecutive_failures,
                        budget,
                        e
                    );
                    if consecutive_failures >= budget {
                        return Err(AppError::GenerationExhausted {
                            requested: wanted,
                            failures: consecutive_failures,
                        });
                    }
                }
            }
        }

        Ok(candidates)
    }

    /// Directions through `route_waypoints`, measured and climbed.
    /// `recorded_waypoints` is what the candidate reports to callers.
    async fn build_candidate(
        &self,
        route_waypoints: &[Coordinate],
        recorded_waypoints: Vec<Coordinate>,
        mode: &TravelMode,
    ) -> Result<RouteCandidate> {
        let routes = self.gateway.directions(route_waypoints, mode).await?;
        let route = routes.into_iter().next().ok_or_else(|| {
            AppError::NoRoutesFound(format!(
                "no {} route through {} waypoints",
                mode,
                route_waypoints.len()
            ))
        })?;

        let length_km = route.distance_km();
        let elevation_gain_m = self.estimator.estimate(&route.encoded_path).await?;

        Ok(RouteCandidate::new(
            recorded_waypoints,
            route.encoded_path,
            elevation_gain_m,
            length_km,
        ))
    }

    /// Snap every point concurrently; a failed snap keeps the original point.
    async fn snap_all(&self, points: &[Coordinate]) -> Vec<Coordinate> {
        let snaps = join_all(points.iter().map(|p| self.gateway.snap_to_road(p))).await;

        snaps
            .into_iter()
            .zip(points)
            .map(|(snapped, original)| match snapped {
                Ok(point) => point,
                Err(e) => {
                    tracing::warn!(
                        error = %e,
                        lng = original.lng,
                        lat = original.lat,
                        "Snap to road failed, keeping original point"
                    );
                    *original
                }
            })
            .collect()
    }

    fn finish(&self, candidates: Vec<RouteCandidate>) -> Vec<RankedRoute> {
        let ranked = rank_candidates(candidates);
        tracing::info!(
            count = ranked.len(),
            "Generated {} ranked routes: {}",
            ranked.len(),
            ranked
                .iter()
                .map(|r| format!(
                    "{} {:.2}km/{:.0}m",
                    r.difficulty,
                    r.route.length_km(),
                    r.route.elevation_gain_m()
                ))
                .collect::<Vec<_>>()
                .join(", ")
        );
        ranked
    }
}
