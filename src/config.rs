use crate::constants::*;
use std::env;
use std::str::FromStr;

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub google_maps_api_key: String,
    /// Override for the directions/elevation endpoint root (proxy or test server)
    pub maps_base_url: Option<String>,
    /// Override for the nearest-road endpoint root
    pub roads_base_url: Option<String>,
    pub gain_cache_ttl: u64,
    pub gain_cache_max_entries: u64,
    pub generator: GeneratorConfig,
}

#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    /// Multiplier applied to the requested length before building a loop.
    /// Road-measured perimeters run longer than the geometric triangle.
    pub circular_length_discount: f64,

    /// Fraction of the requested length the detour triangle of a line route aims for
    pub line_detour_factor: f64,

    /// Length (km) substituted when the circular input is out of range
    pub default_length_km: f64,

    /// Circular inputs above this length (km) are replaced by the default
    pub max_length_km: f64,

    /// Points sampled per circle boundary
    pub circle_steps: usize,

    /// Candidates produced per generation call
    pub candidate_count: usize,

    /// Consecutive failed attempts tolerated before a call gives up
    pub max_consecutive_failures: usize,

    /// Lower bound of the random scale applied to the detour offset
    pub offset_jitter_min: f64,

    /// Upper bound of the random scale applied to the detour offset
    pub offset_jitter_max: f64,

    /// Maximum perturbation (degrees, either side) of the detour bearing
    pub bearing_jitter_deg: f64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            circular_length_discount: DEFAULT_CIRCULAR_LENGTH_DISCOUNT,
            line_detour_factor: DEFAULT_LINE_DETOUR_FACTOR,
            default_length_km: DEFAULT_ROUTE_LENGTH_KM,
            max_length_km: DEFAULT_MAX_ROUTE_LENGTH_KM,
            circle_steps: DEFAULT_CIRCLE_STEPS,
            candidate_count: DEFAULT_CANDIDATE_COUNT,
            max_consecutive_failures: DEFAULT_MAX_CONSECUTIVE_FAILURES,
            offset_jitter_min: DEFAULT_OFFSET_JITTER_MIN,
            offset_jitter_max: DEFAULT_OFFSET_JITTER_MAX,
            bearing_jitter_deg: DEFAULT_BEARING_JITTER_DEG,
        }
    }
}

/// Read `key`, falling back to `default`, and parse it.
fn env_or<T>(key: &str, default: T) -> Result<T, String>
where
    T: FromStr + ToString,
{
    env::var(key)
        .unwrap_or_else(|_| default.to_string())
        .parse()
        .map_err(|_| format!("Invalid {}", key))
}

impl GeneratorConfig {
    pub fn from_env() -> Result<Self, String> {
        let defaults = Self::default();

        let config = Self {
            circular_length_discount: env_or(
                "ROUTE_CIRCULAR_LENGTH_DISCOUNT",
                defaults.circular_length_discount,
            )?,
            line_detour_factor: env_or("ROUTE_LINE_DETOUR_FACTOR", defaults.line_detour_factor)?,
            default_length_km: env_or("ROUTE_DEFAULT_LENGTH_KM", defaults.default_length_km)?,
            max_length_km: env_or("ROUTE_MAX_LENGTH_KM", defaults.max_length_km)?,
            circle_steps: env_or("ROUTE_CIRCLE_STEPS", defaults.circle_steps)?,
            candidate_count: env_or("ROUTE_CANDIDATE_COUNT", defaults.candidate_count)?,
            max_consecutive_failures: env_or(
                "ROUTE_MAX_CONSECUTIVE_FAILURES",
                defaults.max_consecutive_failures,
            )?,
            offset_jitter_min: env_or("ROUTE_OFFSET_JITTER_MIN", defaults.offset_jitter_min)?,
            offset_jitter_max: env_or("ROUTE_OFFSET_JITTER_MAX", defaults.offset_jitter_max)?,
            bearing_jitter_deg: env_or("ROUTE_BEARING_JITTER_DEG", defaults.bearing_jitter_deg)?,
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), String> {
        if !(self.circular_length_discount > 0.0 && self.circular_length_discount <= 1.0) {
            return Err("ROUTE_CIRCULAR_LENGTH_DISCOUNT must be in (0, 1]".to_string());
        }
        if !(self.line_detour_factor > 0.0 && self.line_detour_factor <= 1.0) {
            return Err("ROUTE_LINE_DETOUR_FACTOR must be in (0, 1]".to_string());
        }
        if self.default_length_km <= 0.0 || self.default_length_km > self.max_length_km {
            return Err(
                "ROUTE_DEFAULT_LENGTH_KM must be positive and not above ROUTE_MAX_LENGTH_KM"
                    .to_string(),
            );
        }
        if self.circle_steps < 3 {
            return Err("ROUTE_CIRCLE_STEPS must be at least 3".to_string());
        }
        if self.candidate_count == 0 {
            return Err("ROUTE_CANDIDATE_COUNT must be at least 1".to_string());
        }
        if self.max_consecutive_failures == 0 {
            return Err("ROUTE_MAX_CONSECUTIVE_FAILURES must be at least 1".to_string());
        }
        if self.offset_jitter_min <= 0.0 || self.offset_jitter_min > self.offset_jitter_max {
            return Err(
                "ROUTE_OFFSET_JITTER_MIN must be positive and not above ROUTE_OFFSET_JITTER_MAX"
                    .to_string(),
            );
        }
        if !(0.0..90.0).contains(&self.bearing_jitter_deg) {
            return Err("ROUTE_BEARING_JITTER_DEG must be in [0, 90)".to_string());
        }
        Ok(())
    }
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        dotenv::dotenv().ok();

        Ok(Config {
            host: env::var("HOST").unwrap_or_else(|_| DEFAULT_HOST.to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| DEFAULT_PORT.to_string())
                .parse()
                .map_err(|_| "Invalid PORT")?,
            google_maps_api_key: env::var("GOOGLE_MAPS_API_KEY")
                .map_err(|_| "GOOGLE_MAPS_API_KEY must be set")?,
            maps_base_url: env::var("MAPS_BASE_URL").ok(),
            roads_base_url: env::var("ROADS_BASE_URL").ok(),
            gain_cache_ttl: env_or("GAIN_CACHE_TTL", DEFAULT_GAIN_CACHE_TTL_SECONDS)?,
            gain_cache_max_entries: env_or(
                "GAIN_CACHE_MAX_ENTRIES",
                DEFAULT_GAIN_CACHE_MAX_ENTRIES,
            )?,
            generator: GeneratorConfig::from_env()?,
        })
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
