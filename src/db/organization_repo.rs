// src/db/organization_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::organization::{Branch, Organization},
};

// Tipos de sequência mantidos em organization_counters.
pub const COUNTER_MEMBER_CODE: &str = "member_code";
pub const COUNTER_INVOICE: &str = "invoice";

#[derive(Clone)]
pub struct OrganizationRepository {
    pool: PgPool,
}

impl OrganizationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Organization>, AppError> {
        let org = sqlx::query_as::<_, Organization>("SELECT * FROM organizations WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(org)
    }

    pub async fn find_by_slug(&self, slug: &str) -> Result<Option<Organization>, AppError> {
        let org = sqlx::query_as::<_, Organization>("SELECT * FROM organizations WHERE slug = $1")
            .bind(slug)
            .fetch_optional(&self.pool)
            .await?;

        Ok(org)
    }

    // Filial padrão: a principal, ou a mais antiga na falta de uma.
    pub async fn default_branch<'e, E>(
        &self,
        executor: E,
        organization_id: Uuid,
    ) -> Result<Option<Branch>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let branch = sqlx::query_as::<_, Branch>(
            r#"
            SELECT * FROM branches
            WHERE organization_id = $1
            ORDER BY is_main DESC, created_at ASC
            LIMIT 1
            "#,
        )
        .bind(organization_id)
        .fetch_optional(executor)
        .await?;

        Ok(branch)
    }

    // Próximo valor da sequência por organização. O upsert incrementa de
    // forma atômica: dois pedidos simultâneos nunca recebem o mesmo número.
    pub async fn next_sequence<'e, E>(
        &self,
        executor: E,
        organization_id: Uuid,
        counter_kind: &str,
    ) -> Result<i64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let value = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO organization_counters (organization_id, counter_kind, current_value)
            VALUES ($1, $2, 1)
            ON CONFLICT (organization_id, counter_kind)
            DO UPDATE SET current_value = organization_counters.current_value + 1
            RETURNING current_value
            "#,
        )
        .bind(organization_id)
        .bind(counter_kind)
        .fetch_one(executor)
        .await?;

        Ok(value)
    }
}
