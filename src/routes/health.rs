use axum::{Json, extract::State};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    error::{AppError, AppResult},
    response::{ApiResponse, Meta},
    state::AppState,
};

#[derive(Serialize, ToSchema)]
pub struct HealthData {
    pub status: String,
}

#[derive(Serialize, ToSchema)]
pub struct ReadinessData {
    pub status: String,
    pub database: String,
    pub variants: Vec<String>,
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "OK", body = ApiResponse<HealthData>),
    ),
    tag = "Health"
)]
pub async fn health_check() -> Json<ApiResponse<HealthData>> {
    let data = HealthData {
        status: "ok".to_string(),
    };

    Json(ApiResponse::success(
        "Health check",
        data,
        Some(Meta::empty()),
    ))
}

#[utoipa::path(
    get,
    path = "/health/ready",
    responses(
        (status = 200, description = "Database reachable", body = ApiResponse<ReadinessData>),
        (status = 500, description = "Database unreachable"),
    ),
    tag = "Health"
)]
pub async fn readiness(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<ReadinessData>>> {
    state
        .orm
        .ping()
        .await
        .map_err(|err| AppError::Internal(anyhow::anyhow!("database ping failed: {err}")))?;

    let data = ReadinessData {
        status: "ok".to_string(),
        database: "ok".to_string(),
        variants: state.catalog.tags().map(str::to_string).collect(),
    };
    Ok(Json(ApiResponse::success(
        "Ready",
        data,
        Some(Meta::empty()),
    )))
}
