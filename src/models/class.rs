// src/models/class.rs

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "booking_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BookingStatus {
    Confirmed,
    Cancelled,
    Attended,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GymClass {
    pub id: Uuid,

    #[schema(ignore)]
    pub organization_id: Uuid,

    pub branch_id: Option<Uuid>,

    #[schema(example = "Yoga")]
    pub name: String,

    pub description: Option<String>,
    pub trainer_id: Option<Uuid>,

    #[schema(example = 60)]
    pub duration_minutes: i32,
    pub default_capacity: i32,

    pub is_active: bool,
    pub color: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClassSchedule {
    pub id: Uuid,
    pub class_id: Uuid,

    // 0 = domingo ... 6 = sábado
    #[schema(example = 1)]
    pub day_of_week: i32,

    #[schema(example = "07:00")]
    pub start_time: String,
    #[schema(example = "08:00")]
    pub end_time: String,

    pub max_capacity: i32,
    pub trainer_id: Option<Uuid>,
    pub is_active: bool,

    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, validator::Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateClassPayload {
    pub branch_id: Option<Uuid>,

    #[validate(length(min = 1, message = "O nome da aula é obrigatório."))]
    pub name: String,

    pub description: Option<String>,
    pub trainer_id: Option<Uuid>,

    #[serde(default = "default_duration")]
    pub duration_minutes: i32,

    #[serde(default = "default_capacity")]
    pub default_capacity: i32,

    pub color: Option<String>,
}

fn default_duration() -> i32 {
    60
}

fn default_capacity() -> i32 {
    20
}

#[derive(Debug, Deserialize, validator::Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateSchedulePayload {
    pub class_id: Uuid,

    #[validate(range(min = 0, max = 6, message = "O dia da semana deve estar entre 0 e 6."))]
    pub day_of_week: i32,

    #[validate(length(min = 1, message = "O horário de início é obrigatório."))]
    pub start_time: String,

    #[validate(length(min = 1, message = "O horário de término é obrigatório."))]
    pub end_time: String,

    // Quando omitida, herda a capacidade padrão da aula
    pub max_capacity: Option<i32>,
    pub trainer_id: Option<Uuid>,
}

#[derive(Debug, Deserialize, validator::Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookClassPayload {
    pub schedule_id: Uuid,
    pub member_id: Uuid,

    // Quando omitida, reserva para o dia corrente
    #[schema(value_type = Option<String>, format = Date)]
    pub booking_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClassBooking {
    pub id: Uuid,
    pub schedule_id: Uuid,
    pub member_id: Uuid,

    #[schema(value_type = String, format = Date, example = "2025-07-14")]
    pub booking_date: NaiveDate,

    pub status: BookingStatus,
    pub checked_in_at: Option<DateTime<Utc>>,

    pub created_at: DateTime<Utc>,
}
