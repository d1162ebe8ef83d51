//! Stable application-wide constants.
//!
//! Values here are default fallbacks for env-var-based configuration.
//! Generator tuning knobs live in
//! [`GeneratorConfig`](crate::config::GeneratorConfig) so they can be
//! overridden per deployment.

// --- Server defaults (used when HOST / PORT env vars are absent) ---

/// Default bind address for the HTTP server.
pub const DEFAULT_HOST: &str = "0.0.0.0";
/// Default port for the HTTP server.
pub const DEFAULT_PORT: &str = "3000";

// --- Provider endpoints ---

/// Google Maps web services root (directions, elevation).
pub const DEFAULT_MAPS_BASE_URL: &str = "https://maps.googleapis.com/maps/api";
/// Google Roads API root (nearest-road snapping).
pub const DEFAULT_ROADS_BASE_URL: &str = "https://roads.googleapis.com/v1";

// --- Elevation gain cache defaults ---

/// Default elevation-gain cache TTL: 24 hours. Overridden by `GAIN_CACHE_TTL`.
pub const DEFAULT_GAIN_CACHE_TTL_SECONDS: u64 = 86_400;
/// Default capacity of the elevation-gain cache. Overridden by `GAIN_CACHE_MAX_ENTRIES`.
pub const DEFAULT_GAIN_CACHE_MAX_ENTRIES: u64 = 1_000;

// --- Generator defaults ---
// Empirical corrections for the gap between the geometric estimate and the
// distance measured along the road network.

/// Fraction of the requested length handed to the circular attempt.
pub const DEFAULT_CIRCULAR_LENGTH_DISCOUNT: f64 = 0.6;
/// Fraction of the requested length the line detour triangle aims for.
pub const DEFAULT_LINE_DETOUR_FACTOR: f64 = 0.7;
/// Substitute length when the circular input is non-positive or too large.
pub const DEFAULT_ROUTE_LENGTH_KM: f64 = 5.0;
/// Upper bound on the circular input before it is replaced by the default.
pub const DEFAULT_MAX_ROUTE_LENGTH_KM: f64 = 100.0;
/// Sampling fidelity of circle boundaries.
pub const DEFAULT_CIRCLE_STEPS: usize = 64;
/// Candidates produced per generation call.
pub const DEFAULT_CANDIDATE_COUNT: usize = 3;
/// Consecutive failed attempts tolerated before a call gives up.
pub const DEFAULT_MAX_CONSECUTIVE_FAILURES: usize = 10;
/// Lower bound of the random scale applied to the line detour offset.
pub const DEFAULT_OFFSET_JITTER_MIN: f64 = 0.7;
/// Upper bound of the random scale applied to the line detour offset.
pub const DEFAULT_OFFSET_JITTER_MAX: f64 = 1.3;
/// Maximum random perturbation (degrees, either side) of the detour bearing.
pub const DEFAULT_BEARING_JITTER_DEG: f64 = 15.0;
