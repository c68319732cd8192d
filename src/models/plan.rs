// src/models/plan.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::json;
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

// Um plano do catálogo: flags de capacidade + política de congelamento.
// Os "SKUs" compráveis ficam em PlanDuration.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Plan {
    pub id: Uuid,

    #[schema(ignore)]
    pub organization_id: Uuid,

    #[schema(example = "Premium")]
    pub name: String,

    pub description: Option<String>,

    #[schema(example = json!(["Acesso à musculação", "Aulas coletivas"]))]
    pub features: Vec<String>,

    pub access_all_branches: bool,
    pub access_all_days: bool,
    pub access_all_hours: bool,

    #[schema(example = "06:00")]
    pub allowed_start_time: Option<String>,
    #[schema(example = "22:00")]
    pub allowed_end_time: Option<String>,

    pub includes_classes: bool,
    pub includes_pt: bool,
    pub class_credits: i32,
    pub pt_sessions: i32,

    // Política de congelamento: o teto é por VIDA da matrícula,
    // total_freeze_days nunca é zerado.
    pub freeze_allowed: bool,
    #[schema(example = 30)]
    pub max_freeze_days: i32,

    pub is_active: bool,
    pub is_popular: bool,
    pub display_order: i32,

    #[schema(example = "#10B981")]
    pub color: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PlanDuration {
    pub id: Uuid,

    pub plan_id: Uuid,

    #[schema(example = 3)]
    pub duration_months: i32,

    #[schema(example = "4000.00")]
    pub price: Decimal,

    #[schema(example = "11.00")]
    pub discount_percent: Decimal,

    #[schema(example = "500.00")]
    pub registration_fee: Decimal,

    pub is_active: bool,
}

// Entrada de duração usada na criação e na substituição em bloco.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PlanDurationInput {
    #[schema(example = 3)]
    pub duration_months: i32,

    #[schema(example = "4000.00")]
    pub price: Decimal,

    #[serde(default)]
    pub discount_percent: Decimal,

    #[serde(default)]
    pub registration_fee: Decimal,

    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Deserialize, validator::Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatePlanPayload {
    #[validate(length(min = 1, message = "O nome do plano é obrigatório."))]
    pub name: String,

    pub description: Option<String>,

    #[serde(default)]
    pub features: Vec<String>,

    #[serde(default)]
    pub access_all_branches: bool,
    #[serde(default = "default_true")]
    pub access_all_days: bool,
    #[serde(default = "default_true")]
    pub access_all_hours: bool,

    pub allowed_start_time: Option<String>,
    pub allowed_end_time: Option<String>,

    #[serde(default)]
    pub includes_classes: bool,
    #[serde(default)]
    pub includes_pt: bool,
    #[serde(default)]
    pub class_credits: i32,
    #[serde(default)]
    pub pt_sessions: i32,

    #[serde(default)]
    pub freeze_allowed: bool,
    #[serde(default)]
    pub max_freeze_days: i32,

    #[serde(default)]
    pub is_popular: bool,
    #[serde(default)]
    pub display_order: i32,
    pub color: Option<String>,

    #[serde(default)]
    pub durations: Vec<PlanDurationInput>,
}

// Atualização de plano. Quando `durations` vem preenchido, as durações
// atuais são substituídas em bloco dentro da mesma transação.
#[derive(Debug, Deserialize, validator::Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePlanPayload {
    pub name: Option<String>,
    pub description: Option<String>,
    pub features: Option<Vec<String>>,

    pub access_all_branches: Option<bool>,
    pub access_all_days: Option<bool>,
    pub access_all_hours: Option<bool>,

    pub allowed_start_time: Option<String>,
    pub allowed_end_time: Option<String>,

    pub includes_classes: Option<bool>,
    pub includes_pt: Option<bool>,
    pub class_credits: Option<i32>,
    pub pt_sessions: Option<i32>,

    pub freeze_allowed: Option<bool>,
    pub max_freeze_days: Option<i32>,

    pub is_active: Option<bool>,
    pub is_popular: Option<bool>,
    pub display_order: Option<i32>,
    pub color: Option<String>,

    pub durations: Option<Vec<PlanDurationInput>>,
}

// Plano com suas durações, como o dashboard consome.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PlanWithDurations {
    #[serde(flatten)]
    pub plan: Plan,
    pub durations: Vec<PlanDuration>,
}
