// src/db/lead_repo.rs

use chrono::{DateTime, Utc};
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::lead::{
        CreateLeadPayload, Lead, LeadActivity, LeadActivityType, LeadSource, LeadStatus,
        UpdateLeadPayload,
    },
};

#[derive(Clone)]
pub struct LeadRepository {
    pool: PgPool,
}

impl LeadRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id<'e, E>(
        &self,
        executor: E,
        organization_id: Uuid,
        id: Uuid,
    ) -> Result<Option<Lead>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let lead =
            sqlx::query_as::<_, Lead>("SELECT * FROM leads WHERE id = $1 AND organization_id = $2")
                .bind(id)
                .bind(organization_id)
                .fetch_optional(executor)
                .await?;

        Ok(lead)
    }

    // Trava a linha do lead: duas conversões simultâneas não podem ambas
    // passar pela checagem de "ainda não convertido".
    pub async fn find_by_id_for_update<'e, E>(
        &self,
        executor: E,
        organization_id: Uuid,
        id: Uuid,
    ) -> Result<Option<Lead>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let lead = sqlx::query_as::<_, Lead>(
            "SELECT * FROM leads WHERE id = $1 AND organization_id = $2 FOR UPDATE",
        )
        .bind(id)
        .bind(organization_id)
        .fetch_optional(executor)
        .await?;

        Ok(lead)
    }

    pub async fn list(
        &self,
        organization_id: Uuid,
        status: Option<LeadStatus>,
        source: Option<LeadSource>,
        assigned_to: Option<Uuid>,
        page: i64,
        limit: i64,
    ) -> Result<Vec<Lead>, AppError> {
        let leads = sqlx::query_as::<_, Lead>(
            r#"
            SELECT * FROM leads
            WHERE organization_id = $1
              AND ($2::lead_status IS NULL OR status = $2)
              AND ($3::lead_source IS NULL OR source = $3)
              AND ($4::uuid IS NULL OR assigned_to_id = $4)
            ORDER BY created_at DESC
            LIMIT $5 OFFSET $6
            "#,
        )
        .bind(organization_id)
        .bind(status)
        .bind(source)
        .bind(assigned_to)
        .bind(limit)
        .bind((page - 1) * limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(leads)
    }

    pub async fn count(
        &self,
        organization_id: Uuid,
        status: Option<LeadStatus>,
        source: Option<LeadSource>,
        assigned_to: Option<Uuid>,
    ) -> Result<i64, AppError> {
        let total = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*) FROM leads
            WHERE organization_id = $1
              AND ($2::lead_status IS NULL OR status = $2)
              AND ($3::lead_source IS NULL OR source = $3)
              AND ($4::uuid IS NULL OR assigned_to_id = $4)
            "#,
        )
        .bind(organization_id)
        .bind(status)
        .bind(source)
        .bind(assigned_to)
        .fetch_one(&self.pool)
        .await?;

        Ok(total)
    }

    pub async fn create<'e, E>(
        &self,
        executor: E,
        organization_id: Uuid,
        payload: &CreateLeadPayload,
        assigned_to_id: Uuid,
    ) -> Result<Lead, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let lead = sqlx::query_as::<_, Lead>(
            r#"
            INSERT INTO leads (
                organization_id, branch_id, first_name, last_name, email, phone,
                source, status, interested_in, notes, assigned_to_id
            )
            VALUES ($1, $2, $3, $4, $5, $6, COALESCE($7, 'WALK_IN'), 'NEW', $8, $9, $10)
            RETURNING *
            "#,
        )
        .bind(organization_id)
        .bind(payload.branch_id)
        .bind(&payload.first_name)
        .bind(&payload.last_name)
        .bind(payload.email.as_deref())
        .bind(payload.phone.as_deref())
        .bind(payload.source)
        .bind(payload.interested_in.as_deref())
        .bind(payload.notes.as_deref())
        .bind(assigned_to_id)
        .fetch_one(executor)
        .await?;

        Ok(lead)
    }

    pub async fn update<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        payload: &UpdateLeadPayload,
    ) -> Result<Lead, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let lead = sqlx::query_as::<_, Lead>(
            r#"
            UPDATE leads SET
                branch_id      = COALESCE($2, branch_id),
                first_name     = COALESCE($3, first_name),
                last_name      = COALESCE($4, last_name),
                email          = COALESCE($5, email),
                phone          = COALESCE($6, phone),
                source         = COALESCE($7, source),
                status         = COALESCE($8, status),
                interested_in  = COALESCE($9, interested_in),
                notes          = COALESCE($10, notes),
                assigned_to_id = COALESCE($11, assigned_to_id),
                updated_at     = now()
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
        .bind(payload.source)
        .bind(payload.status)
        .bind(payload.interested_in.as_deref())
        .bind(payload.notes.as_deref())
        .bind(payload.assigned_to_id)
        .fetch_one(executor)
        .await?;

        Ok(lead)
    }

    pub async fn delete<'e, E>(&self, executor: E, id: Uuid) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query("DELETE FROM leads WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;

        Ok(())
    }

    pub async fn add_activity<'e, E>(
        &self,
        executor: E,
        lead_id: Uuid,
        activity_type: LeadActivityType,
        description: &str,
        scheduled_at: Option<DateTime<Utc>>,
        performed_by_id: Uuid,
    ) -> Result<LeadActivity, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let activity = sqlx::query_as::<_, LeadActivity>(
            r#"
            INSERT INTO lead_activities (lead_id, activity_type, description, scheduled_at, performed_by_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(lead_id)
        .bind(activity_type)
        .bind(description)
        .bind(scheduled_at)
        .bind(performed_by_id)
        .fetch_one(executor)
        .await?;

        Ok(activity)
    }

    pub async fn activities(&self, lead_id: Uuid) -> Result<Vec<LeadActivity>, AppError> {
        let activities = sqlx::query_as::<_, LeadActivity>(
            "SELECT * FROM lead_activities WHERE lead_id = $1 ORDER BY created_at DESC",
        )
        .bind(lead_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(activities)
    }

    pub async fn touch_last_contacted<'e, E>(&self, executor: E, id: Uuid) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query("UPDATE leads SET last_contacted_at = now(), updated_at = now() WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;

        Ok(())
    }

    pub async fn mark_converted<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        converted_member_id: Uuid,
        converted_at: DateTime<Utc>,
    ) -> Result<Lead, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let lead = sqlx::query_as::<_, Lead>(
            r#"
            UPDATE leads SET
                status = 'CONVERTED',
                converted_at = $2,
                converted_member_id = $3,
                updated_at = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(converted_at)
        .bind(converted_member_id)
        .fetch_one(executor)
        .await?;

        Ok(lead)
    }

    // Contagem por status para o funil do dashboard.
    pub async fn status_counts(
        &self,
        organization_id: Uuid,
    ) -> Result<Vec<(LeadStatus, i64)>, AppError> {
        let rows = sqlx::query_as::<_, (LeadStatus, i64)>(
            "SELECT status, COUNT(*) FROM leads WHERE organization_id = $1 GROUP BY status",
        )
        .bind(organization_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }
}
