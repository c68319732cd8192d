// src/db/payment_repo.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::payment::{
        Payment, PaymentMethod, PaymentStatus, PaymentType, RevenueByMethod, RevenueByType,
    },
};

#[derive(Clone)]
pub struct PaymentRepository {
    pool: PgPool,
}

impl PaymentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id<'e, E>(
        &self,
        executor: E,
        organization_id: Uuid,
        id: Uuid,
    ) -> Result<Option<Payment>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let payment = sqlx::query_as::<_, Payment>(
            r#"
            SELECT p.* FROM payments p
            JOIN members m ON m.id = p.member_id
            WHERE p.id = $1 AND m.organization_id = $2
            "#,
        )
        .bind(id)
        .bind(organization_id)
        .fetch_optional(executor)
        .await?;

        Ok(payment)
    }

    // Mesma busca, com trava de linha: o estorno checa-e-grava e não pode
    // correr contra outro estorno do mesmo pagamento.
    pub async fn find_by_id_for_update<'e, E>(
        &self,
        executor: E,
        organization_id: Uuid,
        id: Uuid,
    ) -> Result<Option<Payment>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let payment = sqlx::query_as::<_, Payment>(
            r#"
            SELECT p.* FROM payments p
            JOIN members m ON m.id = p.member_id
            WHERE p.id = $1 AND m.organization_id = $2
            FOR UPDATE OF p
            "#,
        )
        .bind(id)
        .bind(organization_id)
        .fetch_optional(executor)
        .await?;

        Ok(payment)
    }

    pub async fn list(
        &self,
        organization_id: Uuid,
        member_id: Option<Uuid>,
        status: Option<PaymentStatus>,
        payment_type: Option<PaymentType>,
        page: i64,
        limit: i64,
    ) -> Result<Vec<Payment>, AppError> {
        let payments = sqlx::query_as::<_, Payment>(
            r#"
            SELECT p.* FROM payments p
            JOIN members m ON m.id = p.member_id
            WHERE m.organization_id = $1
              AND ($2::uuid IS NULL OR p.member_id = $2)
              AND ($3::payment_status IS NULL OR p.status = $3)
              AND ($4::payment_type IS NULL OR p.payment_type = $4)
            ORDER BY p.created_at DESC
            LIMIT $5 OFFSET $6
            "#,
        )
        .bind(organization_id)
        .bind(member_id)
        .bind(status)
        .bind(payment_type)
        .bind(limit)
        .bind((page - 1) * limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(payments)
    }

    pub async fn count(
        &self,
        organization_id: Uuid,
        member_id: Option<Uuid>,
        status: Option<PaymentStatus>,
        payment_type: Option<PaymentType>,
    ) -> Result<i64, AppError> {
        let total = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*) FROM payments p
            JOIN members m ON m.id = p.member_id
            WHERE m.organization_id = $1
              AND ($2::uuid IS NULL OR p.member_id = $2)
              AND ($3::payment_status IS NULL OR p.status = $3)
              AND ($4::payment_type IS NULL OR p.payment_type = $4)
            "#,
        )
        .bind(organization_id)
        .bind(member_id)
        .bind(status)
        .bind(payment_type)
        .fetch_one(&self.pool)
        .await?;

        Ok(total)
    }

    pub async fn create<'e, E>(
        &self,
        executor: E,
        member_id: Uuid,
        membership_id: Option<Uuid>,
        invoice_number: &str,
        amount: Decimal,
        subtotal: Decimal,
        discount: Decimal,
        tax: Decimal,
        payment_type: PaymentType,
        payment_method: PaymentMethod,
        notes: Option<&str>,
        collected_by_id: Uuid,
    ) -> Result<Payment, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let payment = sqlx::query_as::<_, Payment>(
            r#"
            INSERT INTO payments (
                member_id, membership_id, invoice_number,
                amount, subtotal, discount, tax,
                payment_type, payment_method, status, notes, collected_by_id
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, 'COMPLETED', $10, $11)
            RETURNING *
            "#,
        )
        .bind(member_id)
        .bind(membership_id)
        .bind(invoice_number)
        .bind(amount)
        .bind(subtotal)
        .bind(discount)
        .bind(tax)
        .bind(payment_type)
        .bind(payment_method)
        .bind(notes)
        .bind(collected_by_id)
        .fetch_one(executor)
        .await?;

        Ok(payment)
    }

    // Estorno: só o status e os metadados de estorno mudam; o valor
    // original do registro histórico permanece intacto.
    pub async fn refund<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        refunded_amount: Decimal,
        reason: Option<&str>,
        refund_date: DateTime<Utc>,
    ) -> Result<Payment, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let payment = sqlx::query_as::<_, Payment>(
            r#"
            UPDATE payments SET
                status = 'REFUNDED',
                refunded_amount = $2,
                refund_reason = $3,
                refund_date = $4
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(refunded_amount)
        .bind(reason)
        .bind(refund_date)
        .fetch_one(executor)
        .await?;

        Ok(payment)
    }

    pub async fn list_for_member(&self, member_id: Uuid) -> Result<Vec<Payment>, AppError> {
        let payments = sqlx::query_as::<_, Payment>(
            "SELECT * FROM payments WHERE member_id = $1 ORDER BY created_at DESC",
        )
        .bind(member_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(payments)
    }

    pub async fn completed_total_for_member(&self, member_id: Uuid) -> Result<Decimal, AppError> {
        let total = sqlx::query_scalar::<_, Decimal>(
            r#"
            SELECT COALESCE(SUM(amount), 0) FROM payments
            WHERE member_id = $1 AND status = 'COMPLETED'
            "#,
        )
        .bind(member_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(total)
    }

    pub async fn revenue_summary(
        &self,
        organization_id: Uuid,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    ) -> Result<(Decimal, i64), AppError> {
        let row = sqlx::query_as::<_, (Decimal, i64)>(
            r#"
            SELECT COALESCE(SUM(p.amount), 0), COUNT(*)
            FROM payments p
            JOIN members m ON m.id = p.member_id
            WHERE m.organization_id = $1 AND p.status = 'COMPLETED'
              AND ($2::timestamptz IS NULL OR p.payment_date >= $2)
              AND ($3::timestamptz IS NULL OR p.payment_date <= $3)
            "#,
        )
        .bind(organization_id)
        .bind(from)
        .bind(to)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    pub async fn revenue_by_method(
        &self,
        organization_id: Uuid,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    ) -> Result<Vec<RevenueByMethod>, AppError> {
        let rows = sqlx::query_as::<_, RevenueByMethod>(
            r#"
            SELECT p.payment_method, COALESCE(SUM(p.amount), 0) AS total, COUNT(*) AS count
            FROM payments p
            JOIN members m ON m.id = p.member_id
            WHERE m.organization_id = $1 AND p.status = 'COMPLETED'
              AND ($2::timestamptz IS NULL OR p.payment_date >= $2)
              AND ($3::timestamptz IS NULL OR p.payment_date <= $3)
            GROUP BY p.payment_method
            "#,
        )
        .bind(organization_id)
        .bind(from)
        .bind(to)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    pub async fn revenue_by_type(
        &self,
        organization_id: Uuid,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    ) -> Result<Vec<RevenueByType>, AppError> {
        let rows = sqlx::query_as::<_, RevenueByType>(
            r#"
            SELECT p.payment_type, COALESCE(SUM(p.amount), 0) AS total, COUNT(*) AS count
            FROM payments p
            JOIN members m ON m.id = p.member_id
            WHERE m.organization_id = $1 AND p.status = 'COMPLETED'
              AND ($2::timestamptz IS NULL OR p.payment_date >= $2)
              AND ($3::timestamptz IS NULL OR p.payment_date <= $3)
            GROUP BY p.payment_type
            "#,
        )
        .bind(organization_id)
        .bind(from)
        .bind(to)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }
}
