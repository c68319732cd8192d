// src/handlers/classes.rs

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
    common::{error::AppError, response::ApiResponse},
    config::AppState,
    middleware::auth::CurrentUser,
    models::class::{
        BookClassPayload, ClassBooking, ClassSchedule, CreateClassPayload, CreateSchedulePayload,
        GymClass,
    },
};

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct ListSchedulesQuery {
    pub class_id: Option<Uuid>,
}

// GET /api/v1/classes
#[utoipa::path(
    get,
    path = "/api/v1/classes",
    tag = "Classes",
    responses((status = 200, description = "Aulas ativas da organização", body = Vec<GymClass>)),
    security(("api_jwt" = []))
)]
pub async fn list_classes(
    State(app_state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<impl IntoResponse, AppError> {
    let classes = app_state.class_service.list(user.organization_id).await?;

    Ok(Json(ApiResponse::ok(classes)))
}

// POST /api/v1/classes
#[utoipa::path(
    post,
    path = "/api/v1/classes",
    tag = "Classes",
    request_body = CreateClassPayload,
    responses((status = 201, description = "Aula criada", body = GymClass)),
    security(("api_jwt" = []))
)]
pub async fn create_class(
    State(app_state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(payload): Json<CreateClassPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let class = app_state
        .class_service
        .create(&app_state.db_pool, user.organization_id, &payload)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message(class, "Aula criada com sucesso")),
    ))
}

// GET /api/v1/classes/schedules
#[utoipa::path(
    get,
    path = "/api/v1/classes/schedules",
    tag = "Classes",
    params(ListSchedulesQuery),
    responses((status = 200, description = "Grade de horários", body = Vec<ClassSchedule>)),
    security(("api_jwt" = []))
)]
pub async fn list_schedules(
    State(app_state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Query(query): Query<ListSchedulesQuery>,
) -> Result<impl IntoResponse, AppError> {
    let schedules = app_state
        .class_service
        .list_schedules(user.organization_id, query.class_id)
        .await?;

    Ok(Json(ApiResponse::ok(schedules)))
}

// POST /api/v1/classes/schedules
#[utoipa::path(
    post,
    path = "/api/v1/classes/schedules",
    tag = "Classes",
    request_body = CreateSchedulePayload,
    responses(
        (status = 201, description = "Horário criado", body = ClassSchedule),
        (status = 404, description = "Aula não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_schedule(
    State(app_state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(payload): Json<CreateSchedulePayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let schedule = app_state
        .class_service
        .create_schedule(&app_state.db_pool, user.organization_id, &payload)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message(schedule, "Horário criado com sucesso")),
    ))
}

// POST /api/v1/classes/bookings
#[utoipa::path(
    post,
    path = "/api/v1/classes/bookings",
    tag = "Classes",
    request_body = BookClassPayload,
    responses(
        (status = 201, description = "Reserva confirmada", body = ClassBooking),
        (status = 400, description = "Turma lotada ou reserva duplicada"),
        (status = 403, description = "Membro sem matrícula ativa")
    ),
    security(("api_jwt" = []))
)]
pub async fn book_class(
    State(app_state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(payload): Json<BookClassPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let booking = app_state
        .class_service
        .book(&app_state.db_pool, user.organization_id, &payload)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message(booking, "Reserva confirmada com sucesso")),
    ))
}

// POST /api/v1/classes/bookings/{id}/cancel
#[utoipa::path(
    post,
    path = "/api/v1/classes/bookings/{id}/cancel",
    tag = "Classes",
    params(("id" = Uuid, Path, description = "ID da reserva")),
    responses(
        (status = 200, description = "Reserva cancelada", body = ClassBooking),
        (status = 400, description = "Reserva já cancelada")
    ),
    security(("api_jwt" = []))
)]
pub async fn cancel_booking(
    State(app_state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let booking = app_state
        .class_service
        .cancel_booking(&app_state.db_pool, user.organization_id, id)
        .await?;

    Ok(Json(ApiResponse::with_message(booking, "Reserva cancelada")))
}
