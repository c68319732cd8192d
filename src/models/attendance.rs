// src/models/attendance.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "check_in_method", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CheckInMethod {
    Manual,
    QrCode,
    MemberId,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Attendance {
    pub id: Uuid,

    pub member_id: Uuid,
    pub branch_id: Uuid,

    pub check_in_time: DateTime<Utc>,
    pub check_out_time: Option<DateTime<Utc>>,

    // Duração em minutos, preenchida no check-out
    pub duration_minutes: Option<i32>,

    pub check_in_method: CheckInMethod,

    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, validator::Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CheckInPayload {
    pub member_id: Uuid,

    // Quando omitida, usa a filial do próprio membro
    pub branch_id: Option<Uuid>,

    pub method: Option<CheckInMethod>,
}

#[derive(Debug, Deserialize, validator::Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CheckInByCodePayload {
    #[validate(length(min = 1, message = "O código do membro é obrigatório."))]
    #[schema(example = "GYM0042")]
    pub member_code: String,

    pub branch_id: Option<Uuid>,
}

// Check-out por id da presença ou pelo membro (fecha o check-in aberto
// mais recente).
#[derive(Debug, Deserialize, validator::Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CheckOutPayload {
    pub attendance_id: Option<Uuid>,
    pub member_id: Option<Uuid>,
}

// Linha de presença com a identificação do membro, para as telas de recepção.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceDetail {
    pub id: Uuid,
    pub member_id: Uuid,
    pub branch_id: Uuid,
    pub check_in_time: DateTime<Utc>,
    pub check_out_time: Option<DateTime<Utc>>,
    pub duration_minutes: Option<i32>,
    pub check_in_method: CheckInMethod,
    pub created_at: DateTime<Utc>,

    #[schema(example = "GYM0042")]
    pub member_code: String,
    pub member_first_name: String,
    pub member_last_name: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TodayAttendanceStats {
    pub total_check_ins: i64,
    pub currently_in: i64,
    pub checked_out: i64,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TodayAttendance {
    pub attendance: Vec<AttendanceDetail>,
    pub stats: TodayAttendanceStats,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MemberAttendanceStats {
    pub total_visits: i64,
    pub total_duration_minutes: i64,
    pub avg_duration_minutes: i64,
    #[schema(example = "30 dias")]
    pub period: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MemberAttendance {
    pub attendance: Vec<Attendance>,
    pub stats: MemberAttendanceStats,
}
