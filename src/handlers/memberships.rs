// src/handlers/memberships.rs

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use utoipa::IntoParams;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::{error::AppError, response::{ApiResponse, PagedResponse}},
    config::AppState,
    middleware::auth::CurrentUser,
    models::membership::{
        AssignMembershipPayload, FreezeMembershipPayload, MembershipDetail, MembershipStatus,
        RenewMembershipPayload, UpgradeMembershipPayload,
    },
};

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct ListMembershipsQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub member_id: Option<Uuid>,
    pub status: Option<MembershipStatus>,
}

// GET /api/v1/memberships
#[utoipa::path(
    get,
    path = "/api/v1/memberships",
    tag = "Memberships",
    params(ListMembershipsQuery),
    responses((status = 200, description = "Lista paginada de matrículas", body = Vec<MembershipDetail>)),
    security(("api_jwt" = []))
)]
pub async fn list_memberships(
    State(app_state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Query(query): Query<ListMembershipsQuery>,
) -> Result<impl IntoResponse, AppError> {
    let page = query.page.unwrap_or(1).max(1);
    let limit = query.limit.unwrap_or(20).clamp(1, 100);

    let (memberships, total) = app_state
        .membership_service
        .list(user.organization_id, query.member_id, query.status, page, limit)
        .await?;

    Ok(Json(PagedResponse::new(memberships, page, limit, total)))
}

// GET /api/v1/memberships/{id}
#[utoipa::path(
    get,
    path = "/api/v1/memberships/{id}",
    tag = "Memberships",
    params(("id" = Uuid, Path, description = "ID da matrícula")),
    responses(
        (status = 200, description = "Matrícula", body = MembershipDetail),
        (status = 404, description = "Matrícula não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_membership(
    State(app_state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let membership = app_state
        .membership_service
        .get(&app_state.db_pool, user.organization_id, id)
        .await?;

    Ok(Json(ApiResponse::ok(membership)))
}

// POST /api/v1/memberships
#[utoipa::path(
    post,
    path = "/api/v1/memberships",
    tag = "Memberships",
    request_body = AssignMembershipPayload,
    responses(
        (status = 201, description = "Matrícula atribuída", body = MembershipDetail),
        (status = 400, description = "Duração inválida"),
        (status = 404, description = "Membro ou plano não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn assign_membership(
    State(app_state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(payload): Json<AssignMembershipPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let membership = app_state
        .membership_service
        .assign(
            &app_state.db_pool,
            user.organization_id,
            payload.member_id,
            payload.plan_id,
            payload.duration_id,
            payload.start_date,
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message(membership, "Matrícula atribuída com sucesso")),
    ))
}

// POST /api/v1/memberships/{id}/renew
#[utoipa::path(
    post,
    path = "/api/v1/memberships/{id}/renew",
    tag = "Memberships",
    params(("id" = Uuid, Path, description = "ID da matrícula")),
    request_body = RenewMembershipPayload,
    responses(
        (status = 200, description = "Matrícula renovada", body = MembershipDetail),
        (status = 400, description = "Duração inválida")
    ),
    security(("api_jwt" = []))
)]
pub async fn renew_membership(
    State(app_state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<RenewMembershipPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let membership = app_state
        .membership_service
        .renew(
            &app_state.db_pool,
            user.organization_id,
            id,
            payload.duration_id,
            payload.start_from_current,
        )
        .await?;

    Ok(Json(ApiResponse::with_message(membership, "Matrícula renovada com sucesso")))
}

// POST /api/v1/memberships/{id}/freeze
#[utoipa::path(
    post,
    path = "/api/v1/memberships/{id}/freeze",
    tag = "Memberships",
    params(("id" = Uuid, Path, description = "ID da matrícula")),
    request_body = FreezeMembershipPayload,
    responses(
        (status = 200, description = "Matrícula congelada", body = MembershipDetail),
        (status = 400, description = "Violação da política de congelamento")
    ),
    security(("api_jwt" = []))
)]
pub async fn freeze_membership(
    State(app_state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<FreezeMembershipPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let membership = app_state
        .membership_service
        .freeze(&app_state.db_pool, user.organization_id, id, payload.freeze_days)
        .await?;

    Ok(Json(ApiResponse::with_message(
        membership,
        format!("Matrícula congelada por {} dias", payload.freeze_days),
    )))
}

// POST /api/v1/memberships/{id}/unfreeze
#[utoipa::path(
    post,
    path = "/api/v1/memberships/{id}/unfreeze",
    tag = "Memberships",
    params(("id" = Uuid, Path, description = "ID da matrícula")),
    responses(
        (status = 200, description = "Matrícula descongelada", body = MembershipDetail),
        (status = 400, description = "Matrícula não está congelada")
    ),
    security(("api_jwt" = []))
)]
pub async fn unfreeze_membership(
    State(app_state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let membership = app_state
        .membership_service
        .unfreeze(&app_state.db_pool, user.organization_id, id)
        .await?;

    Ok(Json(ApiResponse::with_message(membership, "Matrícula descongelada com sucesso")))
}

// POST /api/v1/memberships/{id}/cancel
#[utoipa::path(
    post,
    path = "/api/v1/memberships/{id}/cancel",
    tag = "Memberships",
    params(("id" = Uuid, Path, description = "ID da matrícula")),
    responses(
        (status = 200, description = "Matrícula cancelada", body = MembershipDetail),
        (status = 404, description = "Matrícula não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn cancel_membership(
    State(app_state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let membership = app_state
        .membership_service
        .cancel(&app_state.db_pool, user.organization_id, id)
        .await?;

    Ok(Json(ApiResponse::with_message(membership, "Matrícula cancelada")))
}

// POST /api/v1/memberships/{id}/upgrade
#[utoipa::path(
    post,
    path = "/api/v1/memberships/{id}/upgrade",
    tag = "Memberships",
    params(("id" = Uuid, Path, description = "ID da matrícula")),
    request_body = UpgradeMembershipPayload,
    responses(
        (status = 200, description = "Plano da matrícula trocado", body = MembershipDetail),
        (status = 400, description = "Duração inválida"),
        (status = 404, description = "Plano não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn upgrade_membership(
    State(app_state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpgradeMembershipPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let membership = app_state
        .membership_service
        .upgrade(
            &app_state.db_pool,
            user.organization_id,
            id,
            payload.new_plan_id,
            payload.new_duration_id,
        )
        .await?;

    Ok(Json(ApiResponse::with_message(membership, "Plano da matrícula atualizado com sucesso")))
}
