// src/models/member.rs

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::lead::LeadSource;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "member_gender", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MemberGender {
    Male,
    Female,
    Other,
}

// O status do membro é um ESPELHO da última transição de matrícula:
// o motor de ciclo de vida grava este campo em toda transição, e
// nenhuma leitura tenta recalculá-lo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "member_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MemberStatus {
    Active,
    Inactive,
    Frozen,
    Expired,
    Blocked,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    pub id: Uuid,

    #[schema(ignore)]
    pub organization_id: Uuid,

    pub branch_id: Uuid,

    // Código sequencial legível, único dentro da organização
    #[schema(example = "GYM0042")]
    pub member_code: String,

    #[schema(example = "João")]
    pub first_name: String,

    #[schema(example = "Silva")]
    pub last_name: String,

    pub email: Option<String>,
    pub phone: Option<String>,
    pub gender: Option<MemberGender>,

    #[schema(value_type = Option<String>, format = Date, example = "1990-05-20")]
    pub date_of_birth: Option<NaiveDate>,

    pub address: Option<String>,

    pub status: MemberStatus,

    pub source: Option<LeadSource>,
    pub trainer_id: Option<Uuid>,

    pub join_date: DateTime<Utc>,
    pub notes: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// Dados para cadastro de um novo membro. O código sequencial (GYMxxxx)
// é gerado pelo servidor, nunca vem do cliente.
#[derive(Debug, Deserialize, validator::Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateMemberPayload {
    // Quando omitida, usa a filial principal da organização
    pub branch_id: Option<Uuid>,

    #[validate(length(min = 1, message = "O nome é obrigatório."))]
    pub first_name: String,

    #[validate(length(min = 1, message = "O sobrenome é obrigatório."))]
    pub last_name: String,

    #[validate(email(message = "O e-mail fornecido é inválido."))]
    pub email: Option<String>,
    pub phone: Option<String>,
    pub gender: Option<MemberGender>,

    #[schema(value_type = Option<String>, format = Date)]
    pub date_of_birth: Option<NaiveDate>,

    pub address: Option<String>,
    pub source: Option<LeadSource>,
    pub trainer_id: Option<Uuid>,
    pub notes: Option<String>,
}

// Atualização com lista fixa de campos por operação: nada além do que
// está aqui chega ao banco.
#[derive(Debug, Deserialize, validator::Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMemberPayload {
    pub branch_id: Option<Uuid>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,

    #[validate(email(message = "O e-mail fornecido é inválido."))]
    pub email: Option<String>,
    pub phone: Option<String>,
    pub gender: Option<MemberGender>,

    #[schema(value_type = Option<String>, format = Date)]
    pub date_of_birth: Option<NaiveDate>,

    pub address: Option<String>,
    pub status: Option<MemberStatus>,
    pub trainer_id: Option<Uuid>,
    pub notes: Option<String>,
}

// Item da listagem: o membro mais um resumo da matrícula ativa atual.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MemberListItem {
    pub id: Uuid,

    #[schema(ignore)]
    pub organization_id: Uuid,

    pub branch_id: Uuid,
    pub member_code: String,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub status: MemberStatus,
    pub join_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,

    // Resumo da matrícula ativa (quando existir)
    pub current_plan_name: Option<String>,
    pub current_end_date: Option<DateTime<Utc>>,
}
