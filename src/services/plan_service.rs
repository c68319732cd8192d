// src/services/plan_service.rs

use sqlx::{Acquire, Executor, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{OrganizationRepository, PlanRepository},
    models::plan::{CreatePlanPayload, PlanWithDurations, UpdatePlanPayload},
};

// Resultado da exclusão: um plano já referenciado por matrículas nunca é
// apagado de verdade, só desativado.
pub enum PlanDeletion {
    Deleted,
    Deactivated,
}

#[derive(Clone)]
pub struct PlanService {
    plan_repo: PlanRepository,
    organization_repo: OrganizationRepository,
}

impl PlanService {
    pub fn new(plan_repo: PlanRepository, organization_repo: OrganizationRepository) -> Self {
        Self { plan_repo, organization_repo }
    }

    async fn attach_durations(
        &self,
        plans: Vec<crate::models::plan::Plan>,
        only_active: bool,
    ) -> Result<Vec<PlanWithDurations>, AppError> {
        let ids: Vec<Uuid> = plans.iter().map(|p| p.id).collect();
        let mut durations = self.plan_repo.durations_for_plans(&ids, only_active).await?;

        let mut result: Vec<PlanWithDurations> = plans
            .into_iter()
            .map(|plan| PlanWithDurations { plan, durations: Vec::new() })
            .collect();

        // Distribui as durações pelos planos correspondentes
        for duration in durations.drain(..) {
            if let Some(entry) = result.iter_mut().find(|p| p.plan.id == duration.plan_id) {
                entry.durations.push(duration);
            }
        }

        Ok(result)
    }

    pub async fn list(
        &self,
        organization_id: Uuid,
        include_inactive: bool,
    ) -> Result<Vec<PlanWithDurations>, AppError> {
        let plans = self.plan_repo.list(organization_id, include_inactive).await?;
        self.attach_durations(plans, true).await
    }

    // Vitrine pública: resolve a organização pelo slug, sem autenticação.
    pub async fn list_public(&self, organization_slug: &str) -> Result<Vec<PlanWithDurations>, AppError> {
        let organization = self
            .organization_repo
            .find_by_slug(organization_slug)
            .await?
            .ok_or(AppError::OrganizationNotFound)?;

        let plans = self.plan_repo.list(organization.id, false).await?;
        self.attach_durations(plans, true).await
    }

    pub async fn get<'e, E>(
        &self,
        executor: E,
        organization_id: Uuid,
        plan_id: Uuid,
    ) -> Result<PlanWithDurations, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut conn = executor.acquire().await?;

        let plan = self
            .plan_repo
            .find_by_id(&mut *conn, organization_id, plan_id)
            .await?
            .ok_or(AppError::PlanNotFound)?;

        let durations = self.plan_repo.durations(&mut *conn, plan.id, false).await?;

        Ok(PlanWithDurations { plan, durations })
    }

    pub async fn create<'e, E>(
        &self,
        executor: E,
        organization_id: Uuid,
        payload: &CreatePlanPayload,
    ) -> Result<PlanWithDurations, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        let plan = self.plan_repo.create(&mut *tx, organization_id, payload).await?;

        let mut durations = Vec::with_capacity(payload.durations.len());
        for input in &payload.durations {
            durations.push(self.plan_repo.insert_duration(&mut *tx, plan.id, input).await?);
        }

        tx.commit().await?;

        Ok(PlanWithDurations { plan, durations })
    }

    // A troca de durações é apagar-e-recriar DENTRO da transação: em
    // nenhum momento um plano fica visível com zero durações.
    pub async fn update<'e, E>(
        &self,
        executor: E,
        organization_id: Uuid,
        plan_id: Uuid,
        payload: &UpdatePlanPayload,
    ) -> Result<PlanWithDurations, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        let existing = self
            .plan_repo
            .find_by_id(&mut *tx, organization_id, plan_id)
            .await?
            .ok_or(AppError::PlanNotFound)?;

        let plan = self.plan_repo.update(&mut *tx, existing.id, payload).await?;

        if let Some(inputs) = &payload.durations {
            self.plan_repo.delete_durations(&mut *tx, plan.id).await?;
            for input in inputs {
                self.plan_repo.insert_duration(&mut *tx, plan.id, input).await?;
            }
        }

        let durations = self.plan_repo.durations(&mut *tx, plan.id, false).await?;

        tx.commit().await?;

        Ok(PlanWithDurations { plan, durations })
    }

    pub async fn delete<'e, E>(
        &self,
        executor: E,
        organization_id: Uuid,
        plan_id: Uuid,
    ) -> Result<PlanDeletion, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        let plan = self
            .plan_repo
            .find_by_id(&mut *tx, organization_id, plan_id)
            .await?
            .ok_or(AppError::PlanNotFound)?;

        let references = self.plan_repo.membership_count(&mut *tx, plan.id).await?;

        let outcome = if references > 0 {
            self.plan_repo.deactivate(&mut *tx, plan.id).await?;
            PlanDeletion::Deactivated
        } else {
            self.plan_repo.delete(&mut *tx, plan.id).await?;
            PlanDeletion::Deleted
        };

        tx.commit().await?;

        Ok(outcome)
    }
}
