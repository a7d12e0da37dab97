//! Request handlers for the API endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use tracing::warn;

use super::AppState;
use super::types::{ErrorResponse, HealthResponse, SizeResponse};
use crate::assessment::assess;
use crate::compare::SizeComparison;
use crate::config::PolicyConfig;
use crate::error::SizingError;
use crate::finance::lifecycle::BatteryComparison;
use crate::request::SizingRequest;

type Rejection = (StatusCode, Json<ErrorResponse>);

fn reject(e: &SizingError) -> Rejection {
    warn!(field = e.field(), error = %e, "request rejected");
    (StatusCode::UNPROCESSABLE_ENTITY, Json(ErrorResponse::from(e)))
}

/// `GET /health` → 200
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

/// `GET /policy` → 200 + `PolicyConfig` JSON
pub async fn get_policy(State(state): State<Arc<AppState>>) -> Json<PolicyConfig> {
    Json(state.engine.policy().clone())
}

/// Sizes one request.
///
/// `POST /size` → 200 + `SizeResponse`, or 422 + `ErrorResponse`
pub async fn size(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SizingRequest>,
) -> Result<Json<SizeResponse>, Rejection> {
    let report = state.engine.run(&request).map_err(|e| reject(&e))?;
    let assessment = assess(&report, &state.engine.policy().assessment);
    Ok(Json(SizeResponse { report, assessment }))
}

/// `POST /compare` → 200 + `SizeComparison`, or 422 + `ErrorResponse`
pub async fn compare(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SizingRequest>,
) -> Result<Json<SizeComparison>, Rejection> {
    state.engine.compare(&request).map(Json).map_err(|e| reject(&e))
}

/// `POST /compare/batteries` → 200 + `BatteryComparison`, or 422 + `ErrorResponse`
pub async fn compare_batteries(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SizingRequest>,
) -> Result<Json<BatteryComparison>, Rejection> {
    state
        .engine
        .compare_batteries(&request)
        .map(Json)
        .map_err(|e| reject(&e))
}
