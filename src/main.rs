use axum::Router;
use runroute::cache::{GainCache, MemoryGainCache};
use runroute::config::Config;
use runroute::constants::{DEFAULT_MAPS_BASE_URL, DEFAULT_ROADS_BASE_URL};
use runroute::services::elevation::ElevationGainEstimator;
use runroute::services::maps::{GoogleMapsClient, MapsGateway};
use runroute::services::route_generator::RouteGenerator;
use runroute::AppState;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "runroute=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env().map_err(|e| format!("Failed to load configuration: {}", e))?;

    tracing::info!("Starting RunRoute API server");
    tracing::info!(
        discount = config.generator.circular_length_discount,
        detour_factor = config.generator.line_detour_factor,
        candidates = config.generator.candidate_count,
        "Configuration loaded successfully"
    );

    // Provider client; endpoint overrides point at a proxy or test server
    let gateway: Arc<dyn MapsGateway> =
        if config.maps_base_url.is_some() || config.roads_base_url.is_some() {
            Arc::new(GoogleMapsClient::with_config(
                config.google_maps_api_key.clone(),
                config
                    .maps_base_url
                    .clone()
                    .unwrap_or_else(|| DEFAULT_MAPS_BASE_URL.to_string()),
                config
                    .roads_base_url
                    .clone()
                    .unwrap_or_else(|| DEFAULT_ROADS_BASE_URL.to_string()),
            ))
        } else {
            Arc::new(GoogleMapsClient::new(config.google_maps_api_key.clone()))
        };

    let gain_cache: Arc<dyn GainCache> = Arc::new(MemoryGainCache::new(
        config.gain_cache_ttl,
        config.gain_cache_max_entries,
    ));
    tracing::info!(
        ttl_seconds = config.gain_cache_ttl,
        max_entries = config.gain_cache_max_entries,
        "Using in-memory elevation gain cache"
    );

    let estimator = ElevationGainEstimator::new(gateway.clone()).with_cache(gain_cache.clone());
    let route_generator = RouteGenerator::new(gateway, estimator, config.generator.clone());

    // Create application state
    let state = Arc::new(AppState {
        route_generator,
        gain_cache: Some(gain_cache),
    });

    // Build router with CORS and tracing
    let app = Router::new()
        .nest("/api/v1", runroute::routes::create_router(state))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http());

    // Start server
    let addr = config.server_address();
    tracing::info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
