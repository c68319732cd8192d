// src/db/dashboard_repo.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::common::error::AppError;

#[derive(Clone)]
pub struct DashboardRepository {
    pool: PgPool,
}

impl DashboardRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn member_counts(&self, organization_id: Uuid) -> Result<(i64, i64), AppError> {
        let row = sqlx::query_as::<_, (i64, i64)>(
            r#"
            SELECT COUNT(*), COUNT(*) FILTER (WHERE status = 'ACTIVE')
            FROM members WHERE organization_id = $1
            "#,
        )
        .bind(organization_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    pub async fn check_ins_between(
        &self,
        organization_id: Uuid,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<i64, AppError> {
        let count = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*) FROM attendance a
            JOIN members m ON m.id = a.member_id
            WHERE m.organization_id = $1 AND a.check_in_time >= $2 AND a.check_in_time < $3
            "#,
        )
        .bind(organization_id)
        .bind(from)
        .bind(to)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    pub async fn expiring_memberships(
        &self,
        organization_id: Uuid,
        until: DateTime<Utc>,
    ) -> Result<i64, AppError> {
        let count = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*) FROM memberships ms
            JOIN members m ON m.id = ms.member_id
            WHERE m.organization_id = $1 AND ms.status = 'ACTIVE'
              AND ms.end_date <= $2
            "#,
        )
        .bind(organization_id)
        .bind(until)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    pub async fn revenue_between(
        &self,
        organization_id: Uuid,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Decimal, AppError> {
        let total = sqlx::query_scalar::<_, Decimal>(
            r#"
            SELECT COALESCE(SUM(p.amount), 0) FROM payments p
            JOIN members m ON m.id = p.member_id
            WHERE m.organization_id = $1 AND p.status = 'COMPLETED'
              AND p.payment_date >= $2 AND p.payment_date < $3
            "#,
        )
        .bind(organization_id)
        .bind(from)
        .bind(to)
        .fetch_one(&self.pool)
        .await?;

        Ok(total)
    }

    pub async fn members_joined_since(
        &self,
        organization_id: Uuid,
        since: DateTime<Utc>,
    ) -> Result<i64, AppError> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM members WHERE organization_id = $1 AND created_at >= $2",
        )
        .bind(organization_id)
        .bind(since)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }
}
