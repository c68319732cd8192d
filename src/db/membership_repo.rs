// src/db/membership_repo.rs

use chrono::{DateTime, Utc};
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::membership::{Membership, MembershipDetail, MembershipStatus},
};

const DETAIL_COLUMNS: &str = r#"
    ms.id, ms.member_id, ms.plan_id, ms.start_date, ms.end_date,
    ms.status, ms.is_frozen, ms.freeze_start_date, ms.freeze_end_date,
    ms.total_freeze_days, ms.remaining_class_credits, ms.remaining_pt_sessions,
    ms.created_at, ms.updated_at,
    p.name AS plan_name,
    m.member_code, m.first_name AS member_first_name, m.last_name AS member_last_name
"#;

#[derive(Clone)]
pub struct MembershipRepository {
    pool: PgPool,
}

impl MembershipRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // O escopo de organização entra pelo JOIN com members: matrícula de
    // outro tenant simplesmente não é encontrada.
    pub async fn find_by_id<'e, E>(
        &self,
        executor: E,
        organization_id: Uuid,
        id: Uuid,
    ) -> Result<Option<Membership>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let membership = sqlx::query_as::<_, Membership>(
            r#"
            SELECT ms.* FROM memberships ms
            JOIN members m ON m.id = ms.member_id
            WHERE ms.id = $1 AND m.organization_id = $2
            "#,
        )
        .bind(id)
        .bind(organization_id)
        .fetch_optional(executor)
        .await?;

        Ok(membership)
    }

    // Trava a linha da matrícula durante a transação para evitar updates
    // perdidos entre transições concorrentes (freeze x renew).
    pub async fn find_by_id_for_update<'e, E>(
        &self,
        executor: E,
        organization_id: Uuid,
        id: Uuid,
    ) -> Result<Option<Membership>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let membership = sqlx::query_as::<_, Membership>(
            r#"
            SELECT ms.* FROM memberships ms
            JOIN members m ON m.id = ms.member_id
            WHERE ms.id = $1 AND m.organization_id = $2
            FOR UPDATE OF ms
            "#,
        )
        .bind(id)
        .bind(organization_id)
        .fetch_optional(executor)
        .await?;

        Ok(membership)
    }

    pub async fn detail<'e, E>(&self, executor: E, id: Uuid) -> Result<MembershipDetail, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            r#"
            SELECT {DETAIL_COLUMNS} FROM memberships ms
            JOIN members m ON m.id = ms.member_id
            JOIN plans p ON p.id = ms.plan_id
            WHERE ms.id = $1
            "#
        );

        let detail = sqlx::query_as::<_, MembershipDetail>(&sql)
            .bind(id)
            .fetch_one(executor)
            .await?;

        Ok(detail)
    }

    pub async fn list(
        &self,
        organization_id: Uuid,
        member_id: Option<Uuid>,
        status: Option<MembershipStatus>,
        page: i64,
        limit: i64,
    ) -> Result<Vec<MembershipDetail>, AppError> {
        let sql = format!(
            r#"
            SELECT {DETAIL_COLUMNS} FROM memberships ms
            JOIN members m ON m.id = ms.member_id
            JOIN plans p ON p.id = ms.plan_id
            WHERE m.organization_id = $1
              AND ($2::uuid IS NULL OR ms.member_id = $2)
              AND ($3::membership_status IS NULL OR ms.status = $3)
            ORDER BY ms.created_at DESC
            LIMIT $4 OFFSET $5
            "#
        );

        let memberships = sqlx::query_as::<_, MembershipDetail>(&sql)
            .bind(organization_id)
            .bind(member_id)
            .bind(status)
            .bind(limit)
            .bind((page - 1) * limit)
            .fetch_all(&self.pool)
            .await?;

        Ok(memberships)
    }

    pub async fn count(
        &self,
        organization_id: Uuid,
        member_id: Option<Uuid>,
        status: Option<MembershipStatus>,
    ) -> Result<i64, AppError> {
        let total = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*) FROM memberships ms
            JOIN members m ON m.id = ms.member_id
            WHERE m.organization_id = $1
              AND ($2::uuid IS NULL OR ms.member_id = $2)
              AND ($3::membership_status IS NULL OR ms.status = $3)
            "#,
        )
        .bind(organization_id)
        .bind(member_id)
        .bind(status)
        .fetch_one(&self.pool)
        .await?;

        Ok(total)
    }

    // Passo 1 da atribuição: expira TODAS as matrículas ativas do membro.
    // Precisa rodar na mesma transação do INSERT que vem em seguida.
    pub async fn expire_active_for_member<'e, E>(
        &self,
        executor: E,
        member_id: Uuid,
    ) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query(
            r#"
            UPDATE memberships SET status = 'EXPIRED', updated_at = now()
            WHERE member_id = $1 AND status = 'ACTIVE'
            "#,
        )
        .bind(member_id)
        .execute(executor)
        .await?;

        Ok(result.rows_affected())
    }

    pub async fn create<'e, E>(
        &self,
        executor: E,
        member_id: Uuid,
        plan_id: Uuid,
        start_date: DateTime<Utc>,
        end_date: DateTime<Utc>,
        class_credits: i32,
        pt_sessions: i32,
    ) -> Result<Membership, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let membership = sqlx::query_as::<_, Membership>(
            r#"
            INSERT INTO memberships (
                member_id, plan_id, start_date, end_date, status,
                remaining_class_credits, remaining_pt_sessions
            )
            VALUES ($1, $2, $3, $4, 'ACTIVE', $5, $6)
            RETURNING *
            "#,
        )
        .bind(member_id)
        .bind(plan_id)
        .bind(start_date)
        .bind(end_date)
        .bind(class_credits)
        .bind(pt_sessions)
        .fetch_one(executor)
        .await?;

        Ok(membership)
    }

    // Renovação: novo período, volta a ACTIVE e limpa o congelamento.
    // total_freeze_days fica como está — o acumulado é vitalício.
    pub async fn renew<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        start_date: DateTime<Utc>,
        end_date: DateTime<Utc>,
    ) -> Result<Membership, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let membership = sqlx::query_as::<_, Membership>(
            r#"
            UPDATE memberships SET
                start_date = $2,
                end_date = $3,
                status = 'ACTIVE',
                is_frozen = FALSE,
                freeze_start_date = NULL,
                freeze_end_date = NULL,
                updated_at = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(start_date)
        .bind(end_date)
        .fetch_one(executor)
        .await?;

        Ok(membership)
    }

    pub async fn freeze<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        freeze_start: DateTime<Utc>,
        freeze_end: DateTime<Utc>,
        total_freeze_days: i32,
        new_end_date: DateTime<Utc>,
    ) -> Result<Membership, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let membership = sqlx::query_as::<_, Membership>(
            r#"
            UPDATE memberships SET
                status = 'FROZEN',
                is_frozen = TRUE,
                freeze_start_date = $2,
                freeze_end_date = $3,
                total_freeze_days = $4,
                end_date = $5,
                updated_at = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(freeze_start)
        .bind(freeze_end)
        .bind(total_freeze_days)
        .bind(new_end_date)
        .fetch_one(executor)
        .await?;

        Ok(membership)
    }

    // O end_date não muda aqui: a extensão já foi aplicada no congelamento.
    pub async fn unfreeze<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        unfrozen_at: DateTime<Utc>,
    ) -> Result<Membership, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let membership = sqlx::query_as::<_, Membership>(
            r#"
            UPDATE memberships SET
                status = 'ACTIVE',
                is_frozen = FALSE,
                freeze_end_date = $2,
                updated_at = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(unfrozen_at)
        .fetch_one(executor)
        .await?;

        Ok(membership)
    }

    pub async fn cancel<'e, E>(&self, executor: E, id: Uuid) -> Result<Membership, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let membership = sqlx::query_as::<_, Membership>(
            r#"
            UPDATE memberships SET
                status = 'CANCELLED',
                is_frozen = FALSE,
                updated_at = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .fetch_one(executor)
        .await?;

        Ok(membership)
    }

    // Upgrade troca o plano NA MESMA linha (não cria histórico novo) e
    // zera os créditos para os valores do plano de destino.
    pub async fn upgrade<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        new_plan_id: Uuid,
        start_date: DateTime<Utc>,
        end_date: DateTime<Utc>,
        class_credits: i32,
        pt_sessions: i32,
    ) -> Result<Membership, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let membership = sqlx::query_as::<_, Membership>(
            r#"
            UPDATE memberships SET
                plan_id = $2,
                start_date = $3,
                end_date = $4,
                status = 'ACTIVE',
                is_frozen = FALSE,
                remaining_class_credits = $5,
                remaining_pt_sessions = $6,
                updated_at = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(new_plan_id)
        .bind(start_date)
        .bind(end_date)
        .bind(class_credits)
        .bind(pt_sessions)
        .fetch_one(executor)
        .await?;

        Ok(membership)
    }

    pub async fn has_active_for_member<'e, E>(
        &self,
        executor: E,
        member_id: Uuid,
    ) -> Result<bool, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM memberships WHERE member_id = $1 AND status = 'ACTIVE')",
        )
        .bind(member_id)
        .fetch_one(executor)
        .await?;

        Ok(exists)
    }
}
