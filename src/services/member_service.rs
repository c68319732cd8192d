// src/services/member_service.rs

use sqlx::{Acquire, Executor, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{
        MemberRepository, MembershipRepository, OrganizationRepository,
        organization_repo::COUNTER_MEMBER_CODE,
    },
    models::{
        member::{CreateMemberPayload, Member, MemberListItem, MemberStatus, UpdateMemberPayload},
        membership::MembershipDetail,
    },
    services::lead_service::format_member_code,
};

#[derive(Clone)]
pub struct MemberService {
    member_repo: MemberRepository,
    membership_repo: MembershipRepository,
    organization_repo: OrganizationRepository,
}

impl MemberService {
    pub fn new(
        member_repo: MemberRepository,
        membership_repo: MembershipRepository,
        organization_repo: OrganizationRepository,
    ) -> Self {
        Self { member_repo, membership_repo, organization_repo }
    }

    pub async fn create<'e, E>(
        &self,
        executor: E,
        organization_id: Uuid,
        payload: &CreateMemberPayload,
    ) -> Result<Member, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        // Filial explícita ou a padrão da organização
        let branch_id = match payload.branch_id {
            Some(id) => id,
            None => self
                .organization_repo
                .default_branch(&mut *tx, organization_id)
                .await?
                .ok_or(AppError::OrganizationNotFound)?
                .id,
        };

        // O código vem da sequência atômica da organização: dois cadastros
        // simultâneos nunca recebem o mesmo GYMxxxx.
        let sequence = self
            .organization_repo
            .next_sequence(&mut *tx, organization_id, COUNTER_MEMBER_CODE)
            .await?;
        let member_code = format_member_code(sequence);

        let member = self
            .member_repo
            .create(&mut *tx, organization_id, branch_id, &member_code, payload)
            .await?;

        tx.commit().await?;

        tracing::info!("✅ Membro {} cadastrado", member.member_code);

        Ok(member)
    }

    pub async fn update<'e, E>(
        &self,
        executor: E,
        organization_id: Uuid,
        member_id: Uuid,
        payload: &UpdateMemberPayload,
    ) -> Result<Member, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        let member = self
            .member_repo
            .find_by_id(&mut *tx, organization_id, member_id)
            .await?
            .ok_or(AppError::MemberNotFound)?;

        let updated = self.member_repo.update(&mut *tx, member.id, payload).await?;

        tx.commit().await?;

        Ok(updated)
    }

    // Exclusão lógica: o membro vira INACTIVE e o histórico permanece.
    pub async fn deactivate<'e, E>(
        &self,
        executor: E,
        organization_id: Uuid,
        member_id: Uuid,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        let member = self
            .member_repo
            .find_by_id(&mut *tx, organization_id, member_id)
            .await?
            .ok_or(AppError::MemberNotFound)?;

        self.member_repo
            .set_status(&mut *tx, member.id, MemberStatus::Inactive)
            .await?;

        tx.commit().await?;

        Ok(())
    }

    pub async fn get<'e, E>(
        &self,
        executor: E,
        organization_id: Uuid,
        member_id: Uuid,
    ) -> Result<(Member, Vec<MembershipDetail>), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let member = self
            .member_repo
            .find_by_id(executor, organization_id, member_id)
            .await?
            .ok_or(AppError::MemberNotFound)?;

        // Histórico completo de matrículas, da mais recente para a mais antiga
        let memberships = self
            .membership_repo
            .list(organization_id, Some(member.id), None, 1, 100)
            .await?;

        Ok((member, memberships))
    }

    pub async fn list(
        &self,
        organization_id: Uuid,
        status: Option<MemberStatus>,
        search: Option<&str>,
        page: i64,
        limit: i64,
    ) -> Result<(Vec<MemberListItem>, i64), AppError> {
        let members = self
            .member_repo
            .list(organization_id, status, search, page, limit)
            .await?;
        let total = self.member_repo.count(organization_id, status, search).await?;

        Ok((members, total))
    }
}
