// src/handlers/leads.rs

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
    common::{error::AppError, response::{ApiResponse, PagedResponse}},
    config::AppState,
    middleware::auth::CurrentUser,
    models::lead::{
        AddLeadActivityPayload, ConvertedLead, CreateLeadPayload, Lead, LeadSource, LeadStats,
        LeadStatus, UpdateLeadPayload,
    },
};

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct ListLeadsQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub status: Option<LeadStatus>,
    pub source: Option<LeadSource>,
    pub assigned_to: Option<Uuid>,
}

// GET /api/v1/leads
#[utoipa::path(
    get,
    path = "/api/v1/leads",
    tag = "Leads",
    params(ListLeadsQuery),
    responses((status = 200, description = "Lista paginada de leads", body = Vec<Lead>)),
    security(("api_jwt" = []))
)]
pub async fn list_leads(
    State(app_state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Query(query): Query<ListLeadsQuery>,
) -> Result<impl IntoResponse, AppError> {
    let page = query.page.unwrap_or(1).max(1);
    let limit = query.limit.unwrap_or(50).clamp(1, 100);

    let (leads, total) = app_state
        .lead_service
        .list(
            user.organization_id,
            query.status,
            query.source,
            query.assigned_to,
            page,
            limit,
        )
        .await?;

    Ok(Json(PagedResponse::new(leads, page, limit, total)))
}

// GET /api/v1/leads/stats
#[utoipa::path(
    get,
    path = "/api/v1/leads/stats",
    tag = "Leads",
    responses((status = 200, description = "Funil de leads e taxa de conversão", body = LeadStats)),
    security(("api_jwt" = []))
)]
pub async fn lead_stats(
    State(app_state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<impl IntoResponse, AppError> {
    let stats = app_state.lead_service.stats(user.organization_id).await?;

    Ok(Json(ApiResponse::ok(stats)))
}

// GET /api/v1/leads/{id}
#[utoipa::path(
    get,
    path = "/api/v1/leads/{id}",
    tag = "Leads",
    params(("id" = Uuid, Path, description = "ID do lead")),
    responses(
        (status = 200, description = "Lead com trilha de atividades"),
        (status = 404, description = "Lead não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_lead(
    State(app_state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let (lead, activities) = app_state
        .lead_service
        .get(&app_state.db_pool, user.organization_id, id)
        .await?;

    Ok(Json(json!({
        "success": true,
        "data": { "lead": lead, "activities": activities },
    })))
}

// POST /api/v1/leads
#[utoipa::path(
    post,
    path = "/api/v1/leads",
    tag = "Leads",
    request_body = CreateLeadPayload,
    responses((status = 201, description = "Lead cadastrado", body = Lead)),
    security(("api_jwt" = []))
)]
pub async fn create_lead(
    State(app_state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(payload): Json<CreateLeadPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let lead = app_state
        .lead_service
        .create(&app_state.db_pool, user.organization_id, user.id, &payload)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message(lead, "Lead cadastrado com sucesso")),
    ))
}

// PATCH /api/v1/leads/{id}
#[utoipa::path(
    patch,
    path = "/api/v1/leads/{id}",
    tag = "Leads",
    params(("id" = Uuid, Path, description = "ID do lead")),
    request_body = UpdateLeadPayload,
    responses(
        (status = 200, description = "Lead atualizado", body = Lead),
        (status = 404, description = "Lead não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_lead(
    State(app_state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateLeadPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let lead = app_state
        .lead_service
        .update(&app_state.db_pool, user.organization_id, id, user.id, &payload)
        .await?;

    Ok(Json(ApiResponse::with_message(lead, "Lead atualizado com sucesso")))
}

// DELETE /api/v1/leads/{id}
#[utoipa::path(
    delete,
    path = "/api/v1/leads/{id}",
    tag = "Leads",
    params(("id" = Uuid, Path, description = "ID do lead")),
    responses(
        (status = 200, description = "Lead removido"),
        (status = 404, description = "Lead não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_lead(
    State(app_state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state
        .lead_service
        .delete(&app_state.db_pool, user.organization_id, id)
        .await?;

    Ok(Json(json!({ "success": true, "message": "Lead removido com sucesso" })))
}

// POST /api/v1/leads/{id}/activities
#[utoipa::path(
    post,
    path = "/api/v1/leads/{id}/activities",
    tag = "Leads",
    params(("id" = Uuid, Path, description = "ID do lead")),
    request_body = AddLeadActivityPayload,
    responses(
        (status = 201, description = "Atividade registrada"),
        (status = 404, description = "Lead não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn add_lead_activity(
    State(app_state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<AddLeadActivityPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let activity = app_state
        .lead_service
        .add_activity(&app_state.db_pool, user.organization_id, id, user.id, &payload)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message(activity, "Atividade registrada com sucesso")),
    ))
}

// POST /api/v1/leads/{id}/convert
// Cria só a "casca" do membro; o plano é atribuído depois em /memberships.
#[utoipa::path(
    post,
    path = "/api/v1/leads/{id}/convert",
    tag = "Leads",
    params(("id" = Uuid, Path, description = "ID do lead")),
    responses(
        (status = 200, description = "Lead convertido em membro", body = ConvertedLead),
        (status = 400, description = "Lead já convertido"),
        (status = 404, description = "Lead não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn convert_lead(
    State(app_state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let converted = app_state
        .lead_service
        .convert(&app_state.db_pool, user.organization_id, id, user.id)
        .await?;

    Ok(Json(ApiResponse::with_message(converted, "Lead convertido em membro com sucesso")))
}
