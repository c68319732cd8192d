// src/models/membership.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "membership_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MembershipStatus {
    Active,
    Expired,
    Frozen,
    Cancelled,
}

// A matrícula: vínculo com estado entre Member e Plan.
// Invariante central: no máximo UMA matrícula ACTIVE por membro —
// atribuir uma nova expira as ativas antes, na mesma transação.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Membership {
    pub id: Uuid,

    pub member_id: Uuid,
    pub plan_id: Uuid,

    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,

    pub status: MembershipStatus,

    pub is_frozen: bool,
    pub freeze_start_date: Option<DateTime<Utc>>,
    pub freeze_end_date: Option<DateTime<Utc>>,

    // Acumulado de vida inteira; renovação NÃO zera.
    pub total_freeze_days: i32,

    pub remaining_class_credits: i32,
    pub remaining_pt_sessions: i32,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, validator::Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AssignMembershipPayload {
    pub member_id: Uuid,
    pub plan_id: Uuid,

    // Precisa ser uma das durações do próprio plano
    pub duration_id: Uuid,

    // Quando omitida, a vigência começa agora
    pub start_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize, validator::Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RenewMembershipPayload {
    pub duration_id: Uuid,

    // true: emenda no fim da vigência atual (sem lacuna nem sobreposição);
    // false/omitido, ou matrícula vencida: recomeça agora
    #[serde(default)]
    pub start_from_current: bool,
}

#[derive(Debug, Deserialize, validator::Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FreezeMembershipPayload {
    #[validate(range(min = 1, message = "O número de dias deve ser maior que zero."))]
    #[schema(example = 10)]
    pub freeze_days: i32,

    pub reason: Option<String>,
}

#[derive(Debug, Deserialize, validator::Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpgradeMembershipPayload {
    pub new_plan_id: Uuid,
    pub new_duration_id: Uuid,
}

// Matrícula com os resumos de plano e membro que o dashboard exibe.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MembershipDetail {
    pub id: Uuid,
    pub member_id: Uuid,
    pub plan_id: Uuid,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub status: MembershipStatus,
    pub is_frozen: bool,
    pub freeze_start_date: Option<DateTime<Utc>>,
    pub freeze_end_date: Option<DateTime<Utc>>,
    pub total_freeze_days: i32,
    pub remaining_class_credits: i32,
    pub remaining_pt_sessions: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,

    #[schema(example = "Premium")]
    pub plan_name: String,

    #[schema(example = "GYM0042")]
    pub member_code: String,
    pub member_first_name: String,
    pub member_last_name: String,
}
