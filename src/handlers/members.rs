// src/handlers/members.rs

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
    models::member::{
        CreateMemberPayload, Member, MemberListItem, MemberStatus, UpdateMemberPayload,
    },
};

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct ListMembersQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub status: Option<MemberStatus>,
    pub search: Option<String>,
}

// GET /api/v1/members
#[utoipa::path(
    get,
    path = "/api/v1/members",
    tag = "Members",
    params(ListMembersQuery),
    responses((status = 200, description = "Lista paginada de membros", body = Vec<MemberListItem>)),
    security(("api_jwt" = []))
)]
pub async fn list_members(
    State(app_state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Query(query): Query<ListMembersQuery>,
) -> Result<impl IntoResponse, AppError> {
    let page = query.page.unwrap_or(1).max(1);
    let limit = query.limit.unwrap_or(20).clamp(1, 100);

    let (members, total) = app_state
        .member_service
        .list(
            user.organization_id,
            query.status,
            query.search.as_deref(),
            page,
            limit,
        )
        .await?;

    Ok(Json(PagedResponse::new(members, page, limit, total)))
}

// GET /api/v1/members/{id}
#[utoipa::path(
    get,
    path = "/api/v1/members/{id}",
    tag = "Members",
    params(("id" = Uuid, Path, description = "ID do membro")),
    responses(
        (status = 200, description = "Membro com histórico de matrículas"),
        (status = 404, description = "Membro não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_member(
    State(app_state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let (member, memberships) = app_state
        .member_service
        .get(&app_state.db_pool, user.organization_id, id)
        .await?;

    Ok(Json(json!({
        "success": true,
        "data": { "member": member, "memberships": memberships },
    })))
}

// POST /api/v1/members
#[utoipa::path(
    post,
    path = "/api/v1/members",
    tag = "Members",
    request_body = CreateMemberPayload,
    responses(
        (status = 201, description = "Membro cadastrado", body = Member),
        (status = 400, description = "Dados inválidos")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_member(
    State(app_state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(payload): Json<CreateMemberPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let member = app_state
        .member_service
        .create(&app_state.db_pool, user.organization_id, &payload)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message(member, "Membro cadastrado com sucesso")),
    ))
}

// PATCH /api/v1/members/{id}
#[utoipa::path(
    patch,
    path = "/api/v1/members/{id}",
    tag = "Members",
    params(("id" = Uuid, Path, description = "ID do membro")),
    request_body = UpdateMemberPayload,
    responses(
        (status = 200, description = "Membro atualizado", body = Member),
        (status = 404, description = "Membro não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_member(
    State(app_state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateMemberPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let member = app_state
        .member_service
        .update(&app_state.db_pool, user.organization_id, id, &payload)
        .await?;

    Ok(Json(ApiResponse::with_message(member, "Membro atualizado com sucesso")))
}

// DELETE /api/v1/members/{id}
// Exclusão lógica: o membro vira INACTIVE.
#[utoipa::path(
    delete,
    path = "/api/v1/members/{id}",
    tag = "Members",
    params(("id" = Uuid, Path, description = "ID do membro")),
    responses(
        (status = 200, description = "Membro desativado"),
        (status = 404, description = "Membro não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_member(
    State(app_state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state
        .member_service
        .deactivate(&app_state.db_pool, user.organization_id, id)
        .await?;

    Ok(Json(json!({ "success": true, "message": "Membro desativado com sucesso" })))
}
