// src/models/organization.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

// A organização é o tenant: todo o resto do banco é escopado por ela.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Organization {
    pub id: Uuid,

    #[schema(example = "GymPro Demo")]
    pub name: String,

    #[schema(example = "gympro-demo")]
    pub slug: String,

    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
    pub zip_code: Option<String>,
    pub logo: Option<String>,

    // Configuração fiscal usada como padrão nos pagamentos
    pub tax_enabled: bool,
    #[schema(example = "GST")]
    pub tax_name: Option<String>,
    #[schema(example = "18.00")]
    pub tax_percentage: Decimal,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Branch {
    pub id: Uuid,

    #[schema(ignore)]
    pub organization_id: Uuid,

    #[schema(example = "Unidade Centro")]
    pub name: String,

    #[schema(example = "MAIN")]
    pub code: Option<String>,

    pub address: Option<String>,
    pub city: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,

    pub is_main: bool,

    pub created_at: DateTime<Utc>,
}
