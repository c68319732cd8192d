// src/models/payment.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "payment_type", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentType {
    Membership,
    Renewal,
    Registration,
    PtSession,
    Addon,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "payment_method", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethod {
    Cash,
    Card,
    Upi,
    BankTransfer,
    Online,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "payment_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    Completed,
    Pending,
    Refunded,
}

// Registro financeiro append-only. O estorno é uma transição de status
// com metadados adicionais — o valor original nunca é alterado.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    pub id: Uuid,

    pub member_id: Uuid,
    pub membership_id: Option<Uuid>,

    #[schema(example = "INV250800042")]
    pub invoice_number: String,

    // Total cobrado (subtotal - desconto + imposto)
    #[schema(example = "1062.00")]
    pub amount: Decimal,
    #[schema(example = "1000.00")]
    pub subtotal: Decimal,
    // Valores ABSOLUTOS já calculados, não percentuais
    #[schema(example = "100.00")]
    pub discount: Decimal,
    #[schema(example = "162.00")]
    pub tax: Decimal,

    pub payment_type: PaymentType,
    pub payment_method: PaymentMethod,
    pub status: PaymentStatus,

    pub payment_date: DateTime<Utc>,
    pub notes: Option<String>,
    pub collected_by_id: Option<Uuid>,

    pub refunded_amount: Option<Decimal>,
    pub refund_reason: Option<String>,
    pub refund_date: Option<DateTime<Utc>>,

    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, validator::Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatePaymentPayload {
    pub member_id: Uuid,
    pub membership_id: Option<Uuid>,

    // Tratado como subtotal; desconto e imposto são calculados em cima
    #[schema(example = "1000.00")]
    pub amount: Decimal,

    pub payment_type: Option<PaymentType>,
    pub payment_method: Option<PaymentMethod>,

    // Percentuais (0-100), não valores absolutos
    #[serde(default)]
    #[schema(example = "10")]
    pub discount: Decimal,
    #[serde(default)]
    #[schema(example = "18")]
    pub tax: Decimal,

    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, validator::Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RefundPaymentPayload {
    pub reason: Option<String>,

    // Quando omitido, estorna o valor total original
    pub refund_amount: Option<Decimal>,
}

// Histórico de pagamentos de um membro + resumo.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MemberPaymentsSummary {
    pub payments: Vec<Payment>,
    pub total_paid: Decimal,
    pub transaction_count: i64,
}

#[derive(Debug, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RevenueByMethod {
    pub payment_method: PaymentMethod,
    pub total: Decimal,
    pub count: i64,
}

#[derive(Debug, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RevenueByType {
    pub payment_type: PaymentType,
    pub total: Decimal,
    pub count: i64,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaymentStats {
    pub total_revenue: Decimal,
    pub total_transactions: i64,
    pub by_method: Vec<RevenueByMethod>,
    pub by_type: Vec<RevenueByType>,
}
