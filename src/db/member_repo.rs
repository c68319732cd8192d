// src/db/member_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::member::{CreateMemberPayload, Member, MemberListItem, MemberStatus, UpdateMemberPayload},
};

#[derive(Clone)]
pub struct MemberRepository {
    pool: PgPool,
}

impl MemberRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id<'e, E>(
        &self,
        executor: E,
        organization_id: Uuid,
        id: Uuid,
    ) -> Result<Option<Member>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let member =
            sqlx::query_as::<_, Member>("SELECT * FROM members WHERE id = $1 AND organization_id = $2")
                .bind(id)
                .bind(organization_id)
                .fetch_optional(executor)
                .await?;

        Ok(member)
    }

    // Trava a linha do membro para serializar transições concorrentes
    // (duas atribuições simultâneas não podem passar ambas pela checagem).
    pub async fn find_by_id_for_update<'e, E>(
        &self,
        executor: E,
        organization_id: Uuid,
        id: Uuid,
    ) -> Result<Option<Member>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let member = sqlx::query_as::<_, Member>(
            "SELECT * FROM members WHERE id = $1 AND organization_id = $2 FOR UPDATE",
        )
        .bind(id)
        .bind(organization_id)
        .fetch_optional(executor)
        .await?;

        Ok(member)
    }

    pub async fn find_by_code(
        &self,
        organization_id: Uuid,
        member_code: &str,
    ) -> Result<Option<Member>, AppError> {
        let member = sqlx::query_as::<_, Member>(
            "SELECT * FROM members WHERE organization_id = $1 AND member_code = $2",
        )
        .bind(organization_id)
        .bind(member_code)
        .fetch_optional(&self.pool)
        .await?;

        Ok(member)
    }

    pub async fn list(
        &self,
        organization_id: Uuid,
        status: Option<MemberStatus>,
        search: Option<&str>,
        page: i64,
        limit: i64,
    ) -> Result<Vec<MemberListItem>, AppError> {
        let members = sqlx::query_as::<_, MemberListItem>(
            r#"
            SELECT
                m.id, m.organization_id, m.branch_id, m.member_code,
                m.first_name, m.last_name, m.email, m.phone, m.status,
                m.join_date, m.created_at,
                p.name AS current_plan_name,
                ms.end_date AS current_end_date
            FROM members m
            LEFT JOIN LATERAL (
                SELECT plan_id, end_date FROM memberships
                WHERE member_id = m.id AND status = 'ACTIVE'
                ORDER BY end_date DESC
                LIMIT 1
            ) ms ON TRUE
            LEFT JOIN plans p ON p.id = ms.plan_id
            WHERE m.organization_id = $1
              AND ($2::member_status IS NULL OR m.status = $2)
              AND ($3::text IS NULL OR
                   m.first_name ILIKE '%' || $3 || '%' OR
                   m.last_name  ILIKE '%' || $3 || '%' OR
                   m.email      ILIKE '%' || $3 || '%' OR
                   m.phone      LIKE '%' || $3 || '%' OR
                   m.member_code ILIKE '%' || $3 || '%')
            ORDER BY m.created_at DESC
            LIMIT $4 OFFSET $5
            "#,
        )
        .bind(organization_id)
        .bind(status)
        .bind(search)
        .bind(limit)
        .bind((page - 1) * limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(members)
    }

    pub async fn count(
        &self,
        organization_id: Uuid,
        status: Option<MemberStatus>,
        search: Option<&str>,
    ) -> Result<i64, AppError> {
        let total = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*) FROM members m
            WHERE m.organization_id = $1
              AND ($2::member_status IS NULL OR m.status = $2)
              AND ($3::text IS NULL OR
                   m.first_name ILIKE '%' || $3 || '%' OR
                   m.last_name  ILIKE '%' || $3 || '%' OR
                   m.email      ILIKE '%' || $3 || '%' OR
                   m.phone      LIKE '%' || $3 || '%' OR
                   m.member_code ILIKE '%' || $3 || '%')
            "#,
        )
        .bind(organization_id)
        .bind(status)
        .bind(search)
        .fetch_one(&self.pool)
        .await?;

        Ok(total)
    }

    pub async fn create<'e, E>(
        &self,
        executor: E,
        organization_id: Uuid,
        branch_id: Uuid,
        member_code: &str,
        payload: &CreateMemberPayload,
    ) -> Result<Member, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let member = sqlx::query_as::<_, Member>(
            r#"
            INSERT INTO members (
                organization_id, branch_id, member_code,
                first_name, last_name, email, phone, gender,
                date_of_birth, address, source, trainer_id, notes
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            RETURNING *
            "#,
        )
        .bind(organization_id)
        .bind(branch_id)
        .bind(member_code)
        .bind(&payload.first_name)
        .bind(&payload.last_name)
        .bind(payload.email.as_deref())
        .bind(payload.phone.as_deref())
        .bind(payload.gender)
        .bind(payload.date_of_birth)
        .bind(payload.address.as_deref())
        .bind(payload.source)
        .bind(payload.trainer_id)
        .bind(payload.notes.as_deref())
        .fetch_one(executor)
        .await?;

        Ok(member)
    }

    // Variante usada pela conversão de leads: os dados vêm do próprio lead.
    pub async fn create_from_lead<'e, E>(
        &self,
        executor: E,
        organization_id: Uuid,
        branch_id: Uuid,
        member_code: &str,
        first_name: &str,
        last_name: &str,
        email: Option<&str>,
        phone: Option<&str>,
        source: crate::models::lead::LeadSource,
    ) -> Result<Member, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let member = sqlx::query_as::<_, Member>(
            r#"
            INSERT INTO members (
                organization_id, branch_id, member_code,
                first_name, last_name, email, phone, source, status
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, 'ACTIVE')
            RETURNING *
            "#,
        )
        .bind(organization_id)
        .bind(branch_id)
        .bind(member_code)
        .bind(first_name)
        .bind(last_name)
        .bind(email)
        .bind(phone)
        .bind(source)
        .fetch_one(executor)
        .await?;

        Ok(member)
    }

    pub async fn update<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        payload: &UpdateMemberPayload,
    ) -> Result<Member, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let member = sqlx::query_as::<_, Member>(
            r#"
            UPDATE members SET
                branch_id     = COALESCE($2, branch_id),
                first_name    = COALESCE($3, first_name),
                last_name     = COALESCE($4, last_name),
                email         = COALESCE($5, email),
                phone         = COALESCE($6, phone),
                gender        = COALESCE($7, gender),
                date_of_birth = COALESCE($8, date_of_birth),
                address       = COALESCE($9, address),
                status        = COALESCE($10, status),
                trainer_id    = COALESCE($11, trainer_id),
                notes         = COALESCE($12, notes),
                updated_at    = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(payload.branch_id)
        .bind(payload.first_name.as_deref())
        .bind(payload.last_name.as_deref())
        .bind(payload.email.as_deref())
        .bind(payload.phone.as_deref())
        .bind(payload.gender)
        .bind(payload.date_of_birth)
        .bind(payload.address.as_deref())
        .bind(payload.status)
        .bind(payload.trainer_id)
        .bind(payload.notes.as_deref())
        .fetch_one(executor)
        .await?;

        Ok(member)
    }

    // O status do membro é gravado explicitamente pelo motor de ciclo de
    // vida a cada transição; nunca é derivado na leitura.
    pub async fn set_status<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        status: MemberStatus,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query("UPDATE members SET status = $2, updated_at = now() WHERE id = $1")
            .bind(id)
            .bind(status)
            .execute(executor)
            .await?;

        Ok(())
    }
}
