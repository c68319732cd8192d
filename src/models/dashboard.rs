// src/models/dashboard.rs

use rust_decimal::Decimal;
use serde::Serialize;
use utoipa::ToSchema;

// Indicadores exibidos na tela inicial do dashboard.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub total_members: i64,
    pub active_members: i64,
    pub today_check_ins: i64,

    // Matrículas que vencem nos próximos 7 dias
    pub expiring_memberships: i64,

    #[schema(example = "4500.00")]
    pub today_revenue: Decimal,

    pub new_members_this_month: i64,
}
