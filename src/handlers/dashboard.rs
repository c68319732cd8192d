// src/handlers/dashboard.rs

use axum::{Json, extract::State, response::IntoResponse};

use crate::{
    common::{error::AppError, response::ApiResponse},
    config::AppState,
    middleware::auth::CurrentUser,
    models::dashboard::DashboardSummary,
};

// GET /api/v1/dashboard/summary
#[utoipa::path(
    get,
    path = "/api/v1/dashboard/summary",
    tag = "Dashboard",
    responses((status = 200, description = "Indicadores do dia", body = DashboardSummary)),
    security(("api_jwt" = []))
)]
pub async fn summary(
    State(app_state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<impl IntoResponse, AppError> {
    let summary = app_state.dashboard_service.summary(user.organization_id).await?;

    Ok(Json(ApiResponse::ok(summary)))
}
