// src/handlers/payments.rs

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
    models::payment::{
        CreatePaymentPayload, Payment, PaymentStats, PaymentStatus, PaymentType,
        RefundPaymentPayload,
    },
};

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct ListPaymentsQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub member_id: Option<Uuid>,
    pub status: Option<PaymentStatus>,

    // O dashboard envia este filtro como ?type=
    #[serde(rename = "type")]
    pub payment_type: Option<PaymentType>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct PaymentStatsQuery {
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
}

// GET /api/v1/payments
#[utoipa::path(
    get,
    path = "/api/v1/payments",
    tag = "Payments",
    params(ListPaymentsQuery),
    responses((status = 200, description = "Lista paginada de pagamentos", body = Vec<Payment>)),
    security(("api_jwt" = []))
)]
pub async fn list_payments(
    State(app_state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Query(query): Query<ListPaymentsQuery>,
) -> Result<impl IntoResponse, AppError> {
    let page = query.page.unwrap_or(1).max(1);
    let limit = query.limit.unwrap_or(20).clamp(1, 100);

    let (payments, total) = app_state
        .payment_service
        .list(
            user.organization_id,
            query.member_id,
            query.status,
            query.payment_type,
            page,
            limit,
        )
        .await?;

    Ok(Json(PagedResponse::new(payments, page, limit, total)))
}

// GET /api/v1/payments/stats
#[utoipa::path(
    get,
    path = "/api/v1/payments/stats",
    tag = "Payments",
    params(PaymentStatsQuery),
    responses((status = 200, description = "Receita por método e por tipo", body = PaymentStats)),
    security(("api_jwt" = []))
)]
pub async fn payment_stats(
    State(app_state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Query(query): Query<PaymentStatsQuery>,
) -> Result<impl IntoResponse, AppError> {
    let stats = app_state
        .payment_service
        .stats(user.organization_id, query.start_date, query.end_date)
        .await?;

    Ok(Json(ApiResponse::ok(stats)))
}

// GET /api/v1/payments/{id}
#[utoipa::path(
    get,
    path = "/api/v1/payments/{id}",
    tag = "Payments",
    params(("id" = Uuid, Path, description = "ID do pagamento")),
    responses(
        (status = 200, description = "Pagamento", body = Payment),
        (status = 404, description = "Pagamento não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_payment(
    State(app_state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let payment = app_state
        .payment_service
        .get(&app_state.db_pool, user.organization_id, id)
        .await?;

    Ok(Json(ApiResponse::ok(payment)))
}

// POST /api/v1/payments
#[utoipa::path(
    post,
    path = "/api/v1/payments",
    tag = "Payments",
    request_body = CreatePaymentPayload,
    responses(
        (status = 201, description = "Pagamento registrado com total calculado no servidor", body = Payment),
        (status = 404, description = "Membro não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_payment(
    State(app_state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(payload): Json<CreatePaymentPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let payment = app_state
        .payment_service
        .create(&app_state.db_pool, user.organization_id, user.id, &payload)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message(payment, "Pagamento registrado com sucesso")),
    ))
}

// POST /api/v1/payments/{id}/refund
#[utoipa::path(
    post,
    path = "/api/v1/payments/{id}/refund",
    tag = "Payments",
    params(("id" = Uuid, Path, description = "ID do pagamento")),
    request_body = RefundPaymentPayload,
    responses(
        (status = 200, description = "Pagamento estornado", body = Payment),
        (status = 400, description = "Pagamento já estornado")
    ),
    security(("api_jwt" = []))
)]
pub async fn refund_payment(
    State(app_state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<RefundPaymentPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let payment = app_state
        .payment_service
        .refund(
            &app_state.db_pool,
            user.organization_id,
            id,
            payload.reason.as_deref(),
            payload.refund_amount,
        )
        .await?;

    Ok(Json(ApiResponse::with_message(payment, "Pagamento estornado com sucesso")))
}

// GET /api/v1/payments/member/{memberId}
#[utoipa::path(
    get,
    path = "/api/v1/payments/member/{memberId}",
    tag = "Payments",
    params(("memberId" = Uuid, Path, description = "ID do membro")),
    responses(
        (status = 200, description = "Histórico de pagamentos do membro"),
        (status = 404, description = "Membro não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn member_payments(
    State(app_state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(member_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let summary = app_state
        .payment_service
        .member_history(&app_state.db_pool, user.organization_id, member_id)
        .await?;

    Ok(Json(ApiResponse::ok(summary)))
}
