use crate::error::{AppError, Result};
use crate::models::route::{RouteRequest, RouteResponse};
use crate::AppState;
use axum::{extract::State, Json};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;

/// POST /routes/generate
/// Line routes when a distinct end point is given, loops otherwise
pub async fn generate_routes(
    State(state): State<Arc<AppState>>,
    Json(request): Json<RouteRequest>,
) -> Result<Json<RouteResponse>> {
    let request = request
        .into_generation_request()
        .map_err(AppError::InvalidRequest)?;

    let mut rng = StdRng::from_os_rng();
    let routes = state.route_generator.generate(&request, &mut rng).await?;

    Ok(Json(RouteResponse { routes }))
}

/// POST /routes/circular
/// Three loops starting and ending at `start_point`; any `end_point` is ignored
pub async fn create_circular_routes(
    State(state): State<Arc<AppState>>,
    Json(request): Json<RouteRequest>,
) -> Result<Json<RouteResponse>> {
    let request = request
        .into_generation_request()
        .map_err(AppError::InvalidRequest)?;

    let mut rng = StdRng::from_os_rng();
    let routes = state
        .route_generator
        .generate_circular_routes(
            request.requested_length_km,
            request.start_point,
            &request.travel_mode,
            &mut rng,
        )
        .await?;

    Ok(Json(RouteResponse { routes }))
}

/// POST /routes/line
/// One direct route or three detours from `start_point` to `end_point`
pub async fn create_line_routes(
    State(state): State<Arc<AppState>>,
    Json(request): Json<RouteRequest>,
) -> Result<Json<RouteResponse>> {
    let request = request
        .into_generation_request()
        .map_err(AppError::InvalidRequest)?;
    let end = request
        .end_point
        .ok_or_else(|| AppError::InvalidRequest("end_point is required".to_string()))?;

    let mut rng = StdRng::from_os_rng();
    let routes = state
        .route_generator
        .generate_line_routes(
            request.requested_length_km,
            request.start_point,
            end,
            &request.travel_mode,
            &mut rng,
        )
        .await?;

    Ok(Json(RouteResponse { routes }))
}
