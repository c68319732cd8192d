// src/models/lead.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "lead_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LeadStatus {
    New,
    Contacted,
    Qualified,
    Negotiation,
    Converted,
    Lost,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "lead_source", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LeadSource {
    WalkIn,
    Referral,
    Website,
    SocialMedia,
    Phone,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "lead_activity_type", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LeadActivityType {
    Created,
    Call,
    Email,
    Meeting,
    Tour,
    Note,
    StatusChange,
    Converted,
}

impl LeadActivityType {
    // Atividades de contato direto atualizam last_contacted_at do lead.
    pub fn is_contact(&self) -> bool {
        matches!(
            self,
            LeadActivityType::Call
                | LeadActivityType::Email
                | LeadActivityType::Meeting
                | LeadActivityType::Tour
        )
    }
}

// Prospecto do funil de vendas. Estados terminais: CONVERTED (gera um
// Member e fecha o lead) e LOST.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Lead {
    pub id: Uuid,

    #[schema(ignore)]
    pub organization_id: Uuid,

    pub branch_id: Option<Uuid>,

    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,

    pub source: LeadSource,
    pub status: LeadStatus,

    #[schema(example = "Plano Premium")]
    pub interested_in: Option<String>,
    pub notes: Option<String>,

    pub assigned_to_id: Option<Uuid>,
    pub last_contacted_at: Option<DateTime<Utc>>,

    // Preenchidos uma única vez, na conversão
    pub converted_at: Option<DateTime<Utc>>,
    pub converted_member_id: Option<Uuid>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// Trilha de auditoria imutável do lead.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LeadActivity {
    pub id: Uuid,
    pub lead_id: Uuid,
    pub activity_type: LeadActivityType,
    pub description: String,
    pub scheduled_at: Option<DateTime<Utc>>,
    pub performed_by_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, validator::Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateLeadPayload {
    pub branch_id: Option<Uuid>,

    #[validate(length(min = 1, message = "O nome é obrigatório."))]
    pub first_name: String,

    #[validate(length(min = 1, message = "O sobrenome é obrigatório."))]
    pub last_name: String,

    #[validate(email(message = "O e-mail fornecido é inválido."))]
    pub email: Option<String>,
    pub phone: Option<String>,

    pub source: Option<LeadSource>,
    pub interested_in: Option<String>,
    pub notes: Option<String>,

    // Quando omitido, o lead fica com quem o cadastrou
    pub assigned_to_id: Option<Uuid>,
}

// Atualização com lista fixa de campos; os campos de conversão
// (converted_at, converted_member_id) só mudam pela rota de conversão.
#[derive(Debug, Deserialize, validator::Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateLeadPayload {
    pub branch_id: Option<Uuid>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,

    #[validate(email(message = "O e-mail fornecido é inválido."))]
    pub email: Option<String>,
    pub phone: Option<String>,

    pub source: Option<LeadSource>,
    pub status: Option<LeadStatus>,
    pub interested_in: Option<String>,
    pub notes: Option<String>,
    pub assigned_to_id: Option<Uuid>,
}

#[derive(Debug, Deserialize, validator::Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddLeadActivityPayload {
    pub activity_type: LeadActivityType,

    #[validate(length(min = 1, message = "A descrição é obrigatória."))]
    pub description: String,

    pub scheduled_at: Option<DateTime<Utc>>,
}

// Resposta da conversão: o lead fechado e o membro recém-criado.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ConvertedLead {
    pub lead: Lead,
    pub member: crate::models::member::Member,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LeadStatusCounts {
    pub new: i64,
    pub contacted: i64,
    pub qualified: i64,
    pub negotiation: i64,
    pub converted: i64,
    pub lost: i64,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LeadStats {
    pub total_leads: i64,
    pub by_status: LeadStatusCounts,
    #[schema(example = "12.5")]
    pub conversion_rate: String,
}
