// src/handlers/attendance.rs

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use utoipa::IntoParams;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::{error::AppError, response::{ApiResponse, PagedResponse}},
    config::AppState,
    middleware::auth::CurrentUser,
    models::attendance::{
        AttendanceDetail, CheckInByCodePayload, CheckInMethod, CheckInPayload, CheckOutPayload,
        MemberAttendance, TodayAttendance,
    },
};

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceHistoryQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub member_id: Option<Uuid>,
    pub branch_id: Option<Uuid>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct TodayAttendanceQuery {
    pub branch_id: Option<Uuid>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct MemberAttendanceQuery {
    // Janela de análise em dias (padrão: 30)
    pub days: Option<i64>,
}

// POST /api/v1/attendance/check-in
#[utoipa::path(
    post,
    path = "/api/v1/attendance/check-in",
    tag = "Attendance",
    request_body = CheckInPayload,
    responses(
        (status = 201, description = "Check-in registrado", body = AttendanceDetail),
        (status = 400, description = "Check-in já registrado hoje"),
        (status = 403, description = "Membro bloqueado, congelado ou sem matrícula ativa")
    ),
    security(("api_jwt" = []))
)]
pub async fn check_in(
    State(app_state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(payload): Json<CheckInPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let (attendance, member) = app_state
        .attendance_service
        .check_in(
            &app_state.db_pool,
            user.organization_id,
            payload.member_id,
            payload.branch_id,
            payload.method.unwrap_or(CheckInMethod::Manual),
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message(
            attendance,
            format!("Bem-vindo(a), {}!", member.first_name),
        )),
    ))
}

// POST /api/v1/attendance/check-in/member-id
// Check-in digitando o código GYMxxxx na recepção.
#[utoipa::path(
    post,
    path = "/api/v1/attendance/check-in/member-id",
    tag = "Attendance",
    request_body = CheckInByCodePayload,
    responses(
        (status = 201, description = "Check-in registrado", body = AttendanceDetail),
        (status = 404, description = "Código de membro desconhecido")
    ),
    security(("api_jwt" = []))
)]
pub async fn check_in_by_code(
    State(app_state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(payload): Json<CheckInByCodePayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let (attendance, member) = app_state
        .attendance_service
        .check_in_by_code(
            &app_state.db_pool,
            user.organization_id,
            &payload.member_code,
            payload.branch_id,
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message(
            attendance,
            format!("Bem-vindo(a), {}!", member.first_name),
        )),
    ))
}

// POST /api/v1/attendance/check-out
#[utoipa::path(
    post,
    path = "/api/v1/attendance/check-out",
    tag = "Attendance",
    request_body = CheckOutPayload,
    responses(
        (status = 200, description = "Check-out registrado", body = AttendanceDetail),
        (status = 404, description = "Nenhum check-in em aberto")
    ),
    security(("api_jwt" = []))
)]
pub async fn check_out(
    State(app_state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(payload): Json<CheckOutPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let attendance = app_state
        .attendance_service
        .check_out(
            &app_state.db_pool,
            user.organization_id,
            payload.attendance_id,
            payload.member_id,
        )
        .await?;

    Ok(Json(ApiResponse::with_message(attendance, "Check-out registrado com sucesso")))
}

// GET /api/v1/attendance/today
#[utoipa::path(
    get,
    path = "/api/v1/attendance/today",
    tag = "Attendance",
    params(TodayAttendanceQuery),
    responses((status = 200, description = "Movimento do dia", body = TodayAttendance)),
    security(("api_jwt" = []))
)]
pub async fn today_attendance(
    State(app_state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Query(query): Query<TodayAttendanceQuery>,
) -> Result<impl IntoResponse, AppError> {
    let today = app_state
        .attendance_service
        .today(user.organization_id, query.branch_id)
        .await?;

    Ok(Json(ApiResponse::ok(today)))
}

// GET /api/v1/attendance
#[utoipa::path(
    get,
    path = "/api/v1/attendance",
    tag = "Attendance",
    params(AttendanceHistoryQuery),
    responses((status = 200, description = "Histórico paginado de presenças", body = Vec<AttendanceDetail>)),
    security(("api_jwt" = []))
)]
pub async fn attendance_history(
    State(app_state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Query(query): Query<AttendanceHistoryQuery>,
) -> Result<impl IntoResponse, AppError> {
    let page = query.page.unwrap_or(1).max(1);
    let limit = query.limit.unwrap_or(50).clamp(1, 200);

    let (rows, total) = app_state
        .attendance_service
        .history(
            user.organization_id,
            query.member_id,
            query.branch_id,
            query.start_date,
            query.end_date,
            page,
            limit,
        )
        .await?;

    Ok(Json(PagedResponse::new(rows, page, limit, total)))
}

// GET /api/v1/attendance/member/{memberId}
#[utoipa::path(
    get,
    path = "/api/v1/attendance/member/{memberId}",
    tag = "Attendance",
    params(
        ("memberId" = Uuid, Path, description = "ID do membro"),
        MemberAttendanceQuery
    ),
    responses(
        (status = 200, description = "Presenças e estatísticas do membro", body = MemberAttendance),
        (status = 404, description = "Membro não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn member_attendance(
    State(app_state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(member_id): Path<Uuid>,
    Query(query): Query<MemberAttendanceQuery>,
) -> Result<impl IntoResponse, AppError> {
    let history = app_state
        .attendance_service
        .member_history(
            &app_state.db_pool,
            user.organization_id,
            member_id,
            query.days.unwrap_or(30).clamp(1, 365),
        )
        .await?;

    Ok(Json(ApiResponse::ok(history)))
}
