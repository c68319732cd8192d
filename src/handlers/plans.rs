// src/handlers/plans.rs

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use serde_json::json;
use utoipa::IntoParams;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::{error::AppError, response::ApiResponse},
    config::AppState,
    middleware::auth::CurrentUser,
    models::plan::{CreatePlanPayload, PlanWithDurations, UpdatePlanPayload},
    services::plan_service::PlanDeletion,
};

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct ListPlansQuery {
    pub include_inactive: Option<bool>,
}

// GET /api/v1/plans
#[utoipa::path(
    get,
    path = "/api/v1/plans",
    tag = "Plans",
    params(ListPlansQuery),
    responses((status = 200, description = "Planos da organização", body = Vec<PlanWithDurations>)),
    security(("api_jwt" = []))
)]
pub async fn list_plans(
    State(app_state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Query(query): Query<ListPlansQuery>,
) -> Result<impl IntoResponse, AppError> {
    let plans = app_state
        .plan_service
        .list(user.organization_id, query.include_inactive.unwrap_or(false))
        .await?;

    Ok(Json(ApiResponse::ok(plans)))
}

// GET /api/v1/plans/public/{organizationSlug}
// Vitrine pública, sem autenticação.
#[utoipa::path(
    get,
    path = "/api/v1/plans/public/{organizationSlug}",
    tag = "Plans",
    params(("organizationSlug" = String, Path, description = "Slug da organização")),
    responses(
        (status = 200, description = "Planos ativos da organização", body = Vec<PlanWithDurations>),
        (status = 404, description = "Organização não encontrada")
    )
)]
pub async fn public_plans(
    State(app_state): State<AppState>,
    Path(organization_slug): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let plans = app_state.plan_service.list_public(&organization_slug).await?;

    Ok(Json(ApiResponse::ok(plans)))
}

// GET /api/v1/plans/{id}
#[utoipa::path(
    get,
    path = "/api/v1/plans/{id}",
    tag = "Plans",
    params(("id" = Uuid, Path, description = "ID do plano")),
    responses(
        (status = 200, description = "Plano com durações", body = PlanWithDurations),
        (status = 404, description = "Plano não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_plan(
    State(app_state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let plan = app_state
        .plan_service
        .get(&app_state.db_pool, user.organization_id, id)
        .await?;

    Ok(Json(ApiResponse::ok(plan)))
}

// POST /api/v1/plans
#[utoipa::path(
    post,
    path = "/api/v1/plans",
    tag = "Plans",
    request_body = CreatePlanPayload,
    responses(
        (status = 201, description = "Plano criado", body = PlanWithDurations),
        (status = 400, description = "Dados inválidos")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_plan(
    State(app_state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(payload): Json<CreatePlanPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let plan = app_state
        .plan_service
        .create(&app_state.db_pool, user.organization_id, &payload)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message(plan, "Plano criado com sucesso")),
    ))
}

// PATCH /api/v1/plans/{id}
#[utoipa::path(
    patch,
    path = "/api/v1/plans/{id}",
    tag = "Plans",
    params(("id" = Uuid, Path, description = "ID do plano")),
    request_body = UpdatePlanPayload,
    responses(
        (status = 200, description = "Plano atualizado", body = PlanWithDurations),
        (status = 404, description = "Plano não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_plan(
    State(app_state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdatePlanPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let plan = app_state
        .plan_service
        .update(&app_state.db_pool, user.organization_id, id, &payload)
        .await?;

    Ok(Json(ApiResponse::with_message(plan, "Plano atualizado com sucesso")))
}

// DELETE /api/v1/plans/{id}
#[utoipa::path(
    delete,
    path = "/api/v1/plans/{id}",
    tag = "Plans",
    params(("id" = Uuid, Path, description = "ID do plano")),
    responses(
        (status = 200, description = "Plano excluído ou desativado"),
        (status = 404, description = "Plano não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_plan(
    State(app_state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let outcome = app_state
        .plan_service
        .delete(&app_state.db_pool, user.organization_id, id)
        .await?;

    let message = match outcome {
        PlanDeletion::Deleted => "Plano excluído com sucesso",
        PlanDeletion::Deactivated => "Plano desativado (possui matrículas vinculadas)",
    };

    Ok(Json(json!({ "success": true, "message": message })))
}
