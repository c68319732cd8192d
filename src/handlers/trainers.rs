// src/handlers/trainers.rs

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde_json::json;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::{error::AppError, response::ApiResponse},
    config::AppState,
    middleware::auth::CurrentUser,
    models::auth::{CreateTrainerPayload, UpdateTrainerPayload, User},
};

// GET /api/v1/trainers
#[utoipa::path(
    get,
    path = "/api/v1/trainers",
    tag = "Trainers",
    responses((status = 200, description = "Professores da organização", body = Vec<User>)),
    security(("api_jwt" = []))
)]
pub async fn list_trainers(
    State(app_state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<impl IntoResponse, AppError> {
    let trainers = app_state.trainer_service.list(user.organization_id).await?;

    Ok(Json(ApiResponse::ok(trainers)))
}

// GET /api/v1/trainers/{id}
#[utoipa::path(
    get,
    path = "/api/v1/trainers/{id}",
    tag = "Trainers",
    params(("id" = Uuid, Path, description = "ID do professor")),
    responses(
        (status = 200, description = "Professor", body = User),
        (status = 404, description = "Professor não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_trainer(
    State(app_state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let trainer = app_state.trainer_service.get(user.organization_id, id).await?;

    Ok(Json(ApiResponse::ok(trainer)))
}

// POST /api/v1/trainers
#[utoipa::path(
    post,
    path = "/api/v1/trainers",
    tag = "Trainers",
    request_body = CreateTrainerPayload,
    responses(
        (status = 201, description = "Professor cadastrado", body = User),
        (status = 409, description = "E-mail já em uso")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_trainer(
    State(app_state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(payload): Json<CreateTrainerPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let trainer = app_state
        .trainer_service
        .create(&app_state.db_pool, user.organization_id, &payload)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message(trainer, "Professor cadastrado com sucesso")),
    ))
}

// PATCH /api/v1/trainers/{id}
// A lista de campos do payload é fechada: senha, papel e organização
// nunca passam por aqui.
#[utoipa::path(
    patch,
    path = "/api/v1/trainers/{id}",
    tag = "Trainers",
    params(("id" = Uuid, Path, description = "ID do professor")),
    request_body = UpdateTrainerPayload,
    responses(
        (status = 200, description = "Professor atualizado", body = User),
        (status = 404, description = "Professor não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_trainer(
    State(app_state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateTrainerPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let trainer = app_state
        .trainer_service
        .update(&app_state.db_pool, user.organization_id, id, &payload)
        .await?;

    Ok(Json(ApiResponse::with_message(trainer, "Professor atualizado com sucesso")))
}

// DELETE /api/v1/trainers/{id}
#[utoipa::path(
    delete,
    path = "/api/v1/trainers/{id}",
    tag = "Trainers",
    params(("id" = Uuid, Path, description = "ID do professor")),
    responses(
        (status = 200, description = "Professor desativado"),
        (status = 404, description = "Professor não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_trainer(
    State(app_state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state
        .trainer_service
        .deactivate(&app_state.db_pool, user.organization_id, id)
        .await?;

    Ok(Json(json!({ "success": true, "message": "Professor desativado com sucesso" })))
}
