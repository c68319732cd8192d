// src/handlers/auth.rs

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde_json::json;
use validator::Validate;

use crate::{
    common::{error::AppError, response::ApiResponse},
    config::AppState,
    middleware::auth::CurrentUser,
    models::auth::{AuthResponse, LoginUserPayload, RefreshTokenPayload, RegisterUserPayload},
};

// POST /api/v1/auth/register
#[utoipa::path(
    post,
    path = "/api/v1/auth/register",
    tag = "Auth",
    request_body = RegisterUserPayload,
    responses(
        (status = 201, description = "Usuário registrado", body = AuthResponse),
        (status = 409, description = "E-mail já em uso")
    )
)]
pub async fn register(
    State(app_state): State<AppState>,
    Json(payload): Json<RegisterUserPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let auth = app_state.auth_service.register_user(&payload).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message(auth, "Usuário registrado com sucesso")),
    ))
}

// POST /api/v1/auth/login
#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    tag = "Auth",
    request_body = LoginUserPayload,
    responses(
        (status = 200, description = "Login efetuado", body = AuthResponse),
        (status = 401, description = "Credenciais inválidas")
    )
)]
pub async fn login(
    State(app_state): State<AppState>,
    Json(payload): Json<LoginUserPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let auth = app_state
        .auth_service
        .login_user(&payload.email, &payload.password)
        .await?;

    Ok(Json(ApiResponse::ok(auth)))
}

// POST /api/v1/auth/refresh
#[utoipa::path(
    post,
    path = "/api/v1/auth/refresh",
    tag = "Auth",
    request_body = RefreshTokenPayload,
    responses(
        (status = 200, description = "Novo par de tokens"),
        (status = 401, description = "Refresh token inválido")
    )
)]
pub async fn refresh(
    State(app_state): State<AppState>,
    Json(payload): Json<RefreshTokenPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let tokens = app_state.auth_service.refresh_tokens(&payload.refresh_token).await?;

    Ok(Json(ApiResponse::ok(tokens)))
}

// POST /api/v1/auth/logout
// Sem estado no servidor: o cliente descarta os tokens.
#[utoipa::path(
    post,
    path = "/api/v1/auth/logout",
    tag = "Auth",
    responses((status = 200, description = "Sessão encerrada"))
)]
pub async fn logout() -> impl IntoResponse {
    Json(json!({ "success": true, "message": "Sessão encerrada com sucesso" }))
}

// GET /api/v1/auth/me
#[utoipa::path(
    get,
    path = "/api/v1/auth/me",
    tag = "Auth",
    responses((status = 200, description = "Usuário autenticado")),
    security(("api_jwt" = []))
)]
pub async fn me(CurrentUser(user): CurrentUser) -> impl IntoResponse {
    Json(ApiResponse::ok(user))
}
