use crate::models::{Difficulty, RankedRoute, RouteCandidate};

/// Sort by elevation gain (ties keep generation order) and label
/// easy, medium, hard in that order.
pub fn rank_candidates(mut candidates: Vec<RouteCandidate>) -> Vec<RankedRoute> {
    candidates.sort_by(|a, b| a.elevation_gain_m().total_cmp(&b.elevation_gain_m()));

    candidates
        .into_iter()
        .enumerate()
        .map(|(rank, route)| RankedRoute {
            route,
            difficulty: Difficulty::for_rank(rank),
        })
        .collect()
}
