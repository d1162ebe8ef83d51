//! Geodesic helpers shared by the circular and line generators.
//!
//! Distances are kilometres and bearings are degrees clockwise from north.
//! Projection and distance are great-circle; boundary crossings are found
//! segment by segment in lng/lat space, which is accurate at route scale.
//! Returned longitudes are always in [-180, 180).

use crate::models::Coordinate;
use geo::algorithm::line_intersection::{line_intersection, LineIntersection};
use geo::{Bearing, Coord, Destination, Distance, Haversine, Line, Point};

/// Two crossings closer than this (degrees) are the same point.
const INTERSECTION_DEDUP_EPSILON_DEG: f64 = 1e-9;

/// Point reached by travelling `distance_km` from `origin` on `bearing_deg`.
pub fn project(origin: &Coordinate, distance_km: f64, bearing_deg: f64) -> Coordinate {
    let destination = Haversine.destination(
        Point::from(*origin),
        bearing_deg,
        distance_km * 1000.0,
    );
    Coordinate {
        lng: normalize_lng(destination.x()),
        lat: destination.y(),
    }
}

/// Longitude folded into [-180, 180).
fn normalize_lng(lng: f64) -> f64 {
    if (-180.0..180.0).contains(&lng) {
        return lng;
    }
    (lng + 180.0).rem_euclid(360.0) - 180.0
}

/// `lng` shifted by whole turns into `reference ± 180`.
fn unwrap_lng(lng: f64, reference: f64) -> f64 {
    reference + normalize_lng(lng - reference)
}

/// Great-circle distance in kilometres.
pub fn haversine_distance(a: &Coordinate, b: &Coordinate) -> f64 {
    Haversine.distance(Point::from(*a), Point::from(*b)) / 1000.0
}

/// Initial bearing from `from` to `to`, in [0, 360).
pub fn bearing(from: &Coordinate, to: &Coordinate) -> f64 {
    Haversine.bearing(Point::from(*from), Point::from(*to))
}

/// Point halfway along the great circle between `a` and `b`.
pub fn midpoint(a: &Coordinate, b: &Coordinate) -> Coordinate {
    let half = haversine_distance(a, b) / 2.0;
    if half == 0.0 {
        return *a;
    }
    project(a, half, bearing(a, b))
}

/// Closed polygon approximating a circle: `steps` points plus the first
/// point repeated at the end.
pub fn circle_boundary(center: &Coordinate, radius_km: f64, steps: usize) -> Vec<Coordinate> {
    let steps = steps.max(3);
    let mut boundary: Vec<Coordinate> = (0..steps)
        .map(|i| {
            let bearing_deg = -360.0 * i as f64 / steps as f64;
            project(center, radius_km, bearing_deg)
        })
        .collect();
    boundary.push(boundary[0]);
    boundary
}

/// Every point where two closed boundaries cross. An empty result is a
/// normal outcome (disjoint or nested circles).
///
/// Segments are built in a longitude frame centred on the first point of
/// `boundary_a`, so boundaries straddling the antimeridian stay contiguous.
pub fn intersect(boundary_a: &[Coordinate], boundary_b: &[Coordinate]) -> Vec<Coordinate> {
    let reference = match boundary_a.first() {
        Some(first) => first.lng,
        None => return Vec::new(),
    };
    let mut crossings: Vec<Coordinate> = Vec::new();

    for a in boundary_a.windows(2) {
        let seg_a = to_line(&a[0], &a[1], reference);
        for b in boundary_b.windows(2) {
            let seg_b = to_line(&b[0], &b[1], reference);
            match line_intersection(seg_a, seg_b) {
                Some(LineIntersection::SinglePoint { intersection, .. }) => {
                    push_unique(&mut crossings, intersection);
                }
                Some(LineIntersection::Collinear { intersection }) => {
                    push_unique(&mut crossings, intersection.start);
                    push_unique(&mut crossings, intersection.end);
                }
                None => {}
            }
        }
    }

    crossings
}

fn to_line(start: &Coordinate, end: &Coordinate, reference: f64) -> Line<f64> {
    Line::new(
        Coord {
            x: unwrap_lng(start.lng, reference),
            y: start.lat,
        },
        Coord {
            x: unwrap_lng(end.lng, reference),
            y: end.lat,
        },
    )
}

fn push_unique(points: &mut Vec<Coordinate>, c: Coord<f64>) {
    let lng = normalize_lng(c.x);
    let duplicate = points.iter().any(|p| {
        normalize_lng(p.lng - lng).abs() < INTERSECTION_DEDUP_EPSILON_DEG
            && (p.lat - c.y).abs() < INTERSECTION_DEDUP_EPSILON_DEG
    });
    if !duplicate {
        points.push(Coordinate { lng, lat: c.y });
    }
}
