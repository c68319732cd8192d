// src/db/plan_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::plan::{CreatePlanPayload, Plan, PlanDuration, PlanDurationInput, UpdatePlanPayload},
};

#[derive(Clone)]
pub struct PlanRepository {
    pool: PgPool,
}

impl PlanRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(
        &self,
        organization_id: Uuid,
        include_inactive: bool,
    ) -> Result<Vec<Plan>, AppError> {
        let plans = sqlx::query_as::<_, Plan>(
            r#"
            SELECT * FROM plans
            WHERE organization_id = $1 AND (is_active OR $2)
            ORDER BY display_order ASC
            "#,
        )
        .bind(organization_id)
        .bind(include_inactive)
        .fetch_all(&self.pool)
        .await?;

        Ok(plans)
    }

    pub async fn find_by_id<'e, E>(
        &self,
        executor: E,
        organization_id: Uuid,
        id: Uuid,
    ) -> Result<Option<Plan>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let plan =
            sqlx::query_as::<_, Plan>("SELECT * FROM plans WHERE id = $1 AND organization_id = $2")
                .bind(id)
                .bind(organization_id)
                .fetch_optional(executor)
                .await?;

        Ok(plan)
    }

    pub async fn durations<'e, E>(
        &self,
        executor: E,
        plan_id: Uuid,
        only_active: bool,
    ) -> Result<Vec<PlanDuration>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let durations = sqlx::query_as::<_, PlanDuration>(
            r#"
            SELECT * FROM plan_durations
            WHERE plan_id = $1 AND (is_active OR NOT $2)
            ORDER BY duration_months ASC
            "#,
        )
        .bind(plan_id)
        .bind(only_active)
        .fetch_all(executor)
        .await?;

        Ok(durations)
    }

    // Busca as durações de vários planos de uma vez (evita N+1 na listagem).
    pub async fn durations_for_plans(
        &self,
        plan_ids: &[Uuid],
        only_active: bool,
    ) -> Result<Vec<PlanDuration>, AppError> {
        let durations = sqlx::query_as::<_, PlanDuration>(
            r#"
            SELECT * FROM plan_durations
            WHERE plan_id = ANY($1) AND (is_active OR NOT $2)
            ORDER BY duration_months ASC
            "#,
        )
        .bind(plan_ids)
        .bind(only_active)
        .fetch_all(&self.pool)
        .await?;

        Ok(durations)
    }

    pub async fn create<'e, E>(
        &self,
        executor: E,
        organization_id: Uuid,
        payload: &CreatePlanPayload,
    ) -> Result<Plan, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let plan = sqlx::query_as::<_, Plan>(
            r#"
            INSERT INTO plans (
                organization_id, name, description, features,
                access_all_branches, access_all_days, access_all_hours,
                allowed_start_time, allowed_end_time,
                includes_classes, includes_pt, class_credits, pt_sessions,
                freeze_allowed, max_freeze_days,
                is_popular, display_order, color
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18)
            RETURNING *
            "#,
        )
        .bind(organization_id)
        .bind(&payload.name)
        .bind(payload.description.as_deref())
        .bind(&payload.features)
        .bind(payload.access_all_branches)
        .bind(payload.access_all_days)
        .bind(payload.access_all_hours)
        .bind(payload.allowed_start_time.as_deref())
        .bind(payload.allowed_end_time.as_deref())
        .bind(payload.includes_classes)
        .bind(payload.includes_pt)
        .bind(payload.class_credits)
        .bind(payload.pt_sessions)
        .bind(payload.freeze_allowed)
        .bind(payload.max_freeze_days)
        .bind(payload.is_popular)
        .bind(payload.display_order)
        .bind(payload.color.as_deref())
        .fetch_one(executor)
        .await?;

        Ok(plan)
    }

    pub async fn update<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        payload: &UpdatePlanPayload,
    ) -> Result<Plan, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let plan = sqlx::query_as::<_, Plan>(
            r#"
            UPDATE plans SET
                name                = COALESCE($2, name),
                description         = COALESCE($3, description),
                features            = COALESCE($4, features),
                access_all_branches = COALESCE($5, access_all_branches),
                access_all_days     = COALESCE($6, access_all_days),
                access_all_hours    = COALESCE($7, access_all_hours),
                allowed_start_time  = COALESCE($8, allowed_start_time),
                allowed_end_time    = COALESCE($9, allowed_end_time),
                includes_classes    = COALESCE($10, includes_classes),
                includes_pt         = COALESCE($11, includes_pt),
                class_credits       = COALESCE($12, class_credits),
                pt_sessions         = COALESCE($13, pt_sessions),
                freeze_allowed      = COALESCE($14, freeze_allowed),
                max_freeze_days     = COALESCE($15, max_freeze_days),
                is_active           = COALESCE($16, is_active),
                is_popular          = COALESCE($17, is_popular),
                display_order       = COALESCE($18, display_order),
                color               = COALESCE($19, color),
                updated_at          = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(payload.name.as_deref())
        .bind(payload.description.as_deref())
        .bind(payload.features.as_deref())
        .bind(payload.access_all_branches)
        .bind(payload.access_all_days)
        .bind(payload.access_all_hours)
        .bind(payload.allowed_start_time.as_deref())
        .bind(payload.allowed_end_time.as_deref())
        .bind(payload.includes_classes)
        .bind(payload.includes_pt)
        .bind(payload.class_credits)
        .bind(payload.pt_sessions)
        .bind(payload.freeze_allowed)
        .bind(payload.max_freeze_days)
        .bind(payload.is_active)
        .bind(payload.is_popular)
        .bind(payload.display_order)
        .bind(payload.color.as_deref())
        .fetch_one(executor)
        .await?;

        Ok(plan)
    }

    pub async fn insert_duration<'e, E>(
        &self,
        executor: E,
        plan_id: Uuid,
        duration: &PlanDurationInput,
    ) -> Result<PlanDuration, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let row = sqlx::query_as::<_, PlanDuration>(
            r#"
            INSERT INTO plan_durations (plan_id, duration_months, price, discount_percent, registration_fee, is_active)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(plan_id)
        .bind(duration.duration_months)
        .bind(duration.price)
        .bind(duration.discount_percent)
        .bind(duration.registration_fee)
        .bind(duration.is_active)
        .fetch_one(executor)
        .await?;

        Ok(row)
    }

    pub async fn delete_durations<'e, E>(&self, executor: E, plan_id: Uuid) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query("DELETE FROM plan_durations WHERE plan_id = $1")
            .bind(plan_id)
            .execute(executor)
            .await?;

        Ok(())
    }

    pub async fn membership_count<'e, E>(&self, executor: E, plan_id: Uuid) -> Result<i64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let count =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM memberships WHERE plan_id = $1")
                .bind(plan_id)
                .fetch_one(executor)
                .await?;

        Ok(count)
    }

    pub async fn deactivate<'e, E>(&self, executor: E, id: Uuid) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query("UPDATE plans SET is_active = FALSE, updated_at = now() WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;

        Ok(())
    }

    pub async fn delete<'e, E>(&self, executor: E, id: Uuid) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query("DELETE FROM plans WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;

        Ok(())
    }
}
