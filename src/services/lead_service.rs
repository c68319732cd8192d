// src/services/lead_service.rs

use chrono::Utc;
use sqlx::{Acquire, Executor, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{
        LeadRepository, MemberRepository, OrganizationRepository,
        organization_repo::COUNTER_MEMBER_CODE,
    },
    models::lead::{
        AddLeadActivityPayload, ConvertedLead, CreateLeadPayload, Lead, LeadActivity,
        LeadActivityType, LeadSource, LeadStats, LeadStatus, LeadStatusCounts, UpdateLeadPayload,
    },
};

#[derive(Clone)]
pub struct LeadService {
    lead_repo: LeadRepository,
    member_repo: MemberRepository,
    organization_repo: OrganizationRepository,
}

// Código legível do membro, sequencial por organização.
pub(crate) fn format_member_code(sequence: i64) -> String {
    format!("GYM{sequence:04}")
}

impl LeadService {
    pub fn new(
        lead_repo: LeadRepository,
        member_repo: MemberRepository,
        organization_repo: OrganizationRepository,
    ) -> Self {
        Self { lead_repo, member_repo, organization_repo }
    }

    pub async fn create<'e, E>(
        &self,
        executor: E,
        organization_id: Uuid,
        acting_user_id: Uuid,
        payload: &CreateLeadPayload,
    ) -> Result<Lead, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        // Lead sem responsável fica com quem o cadastrou
        let assigned_to = payload.assigned_to_id.unwrap_or(acting_user_id);

        let lead = self
            .lead_repo
            .create(&mut *tx, organization_id, payload, assigned_to)
            .await?;

        self.lead_repo
            .add_activity(
                &mut *tx,
                lead.id,
                LeadActivityType::Created,
                "Lead cadastrado",
                None,
                acting_user_id,
            )
            .await?;

        tx.commit().await?;

        Ok(lead)
    }

    pub async fn update<'e, E>(
        &self,
        executor: E,
        organization_id: Uuid,
        lead_id: Uuid,
        acting_user_id: Uuid,
        payload: &UpdateLeadPayload,
    ) -> Result<Lead, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        let lead = self
            .lead_repo
            .find_by_id(&mut *tx, organization_id, lead_id)
            .await?
            .ok_or(AppError::LeadNotFound)?;

        let updated = self.lead_repo.update(&mut *tx, lead.id, payload).await?;

        // Mudança de status vira registro na trilha de atividades
        if let Some(new_status) = payload.status {
            if new_status != lead.status {
                self.lead_repo
                    .add_activity(
                        &mut *tx,
                        lead.id,
                        LeadActivityType::StatusChange,
                        &format!("Status alterado de {:?} para {:?}", lead.status, new_status),
                        None,
                        acting_user_id,
                    )
                    .await?;
            }
        }

        tx.commit().await?;

        Ok(updated)
    }

    pub async fn delete<'e, E>(
        &self,
        executor: E,
        organization_id: Uuid,
        lead_id: Uuid,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        let lead = self
            .lead_repo
            .find_by_id(&mut *tx, organization_id, lead_id)
            .await?
            .ok_or(AppError::LeadNotFound)?;

        self.lead_repo.delete(&mut *tx, lead.id).await?;

        tx.commit().await?;

        Ok(())
    }

    pub async fn add_activity<'e, E>(
        &self,
        executor: E,
        organization_id: Uuid,
        lead_id: Uuid,
        acting_user_id: Uuid,
        payload: &AddLeadActivityPayload,
    ) -> Result<LeadActivity, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        let lead = self
            .lead_repo
            .find_by_id(&mut *tx, organization_id, lead_id)
            .await?
            .ok_or(AppError::LeadNotFound)?;

        let activity = self
            .lead_repo
            .add_activity(
                &mut *tx,
                lead.id,
                payload.activity_type,
                &payload.description,
                payload.scheduled_at,
                acting_user_id,
            )
            .await?;

        // Contato direto atualiza o "último contato" do lead
        if payload.activity_type.is_contact() {
            self.lead_repo.touch_last_contacted(&mut *tx, lead.id).await?;
        }

        tx.commit().await?;

        Ok(activity)
    }

    // =====================================================================
    //  CONVERSÃO EM MEMBRO
    // =====================================================================

    // Atômico: cria o membro, fecha o lead e registra a atividade na mesma
    // transação. A conversão produz só a "casca" do membro — o plano é
    // atribuído depois, pela rota de matrículas.
    pub async fn convert<'e, E>(
        &self,
        executor: E,
        organization_id: Uuid,
        lead_id: Uuid,
        acting_user_id: Uuid,
    ) -> Result<ConvertedLead, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        let lead = self
            .lead_repo
            .find_by_id_for_update(&mut *tx, organization_id, lead_id)
            .await?
            .ok_or(AppError::LeadNotFound)?;

        if lead.status == LeadStatus::Converted {
            return Err(AppError::AlreadyConverted);
        }

        // Filial do lead, ou a filial padrão da organização
        let branch_id = match lead.branch_id {
            Some(id) => id,
            None => self
                .organization_repo
                .default_branch(&mut *tx, organization_id)
                .await?
                .ok_or(AppError::OrganizationNotFound)?
                .id,
        };

        let sequence = self
            .organization_repo
            .next_sequence(&mut *tx, organization_id, COUNTER_MEMBER_CODE)
            .await?;
        let member_code = format_member_code(sequence);

        let member = self
            .member_repo
            .create_from_lead(
                &mut *tx,
                organization_id,
                branch_id,
                &member_code,
                &lead.first_name,
                &lead.last_name,
                lead.email.as_deref(),
                lead.phone.as_deref(),
                lead.source,
            )
            .await?;

        let converted = self
            .lead_repo
            .mark_converted(&mut *tx, lead.id, member.id, Utc::now())
            .await?;

        self.lead_repo
            .add_activity(
                &mut *tx,
                lead.id,
                LeadActivityType::Converted,
                &format!("Convertido em membro: {member_code}"),
                None,
                acting_user_id,
            )
            .await?;

        tx.commit().await?;

        tracing::info!("🔗 Lead {} convertido no membro {}", lead.id, member_code);

        Ok(ConvertedLead { lead: converted, member })
    }

    // =====================================================================
    //  CONSULTAS
    // =====================================================================

    pub async fn get<'e, E>(
        &self,
        executor: E,
        organization_id: Uuid,
        lead_id: Uuid,
    ) -> Result<(Lead, Vec<LeadActivity>), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let lead = self
            .lead_repo
            .find_by_id(executor, organization_id, lead_id)
            .await?
            .ok_or(AppError::LeadNotFound)?;

        let activities = self.lead_repo.activities(lead.id).await?;

        Ok((lead, activities))
    }

    pub async fn list(
        &self,
        organization_id: Uuid,
        status: Option<LeadStatus>,
        source: Option<LeadSource>,
        assigned_to: Option<Uuid>,
        page: i64,
        limit: i64,
    ) -> Result<(Vec<Lead>, i64), AppError> {
        let leads = self
            .lead_repo
            .list(organization_id, status, source, assigned_to, page, limit)
            .await?;
        let total = self.lead_repo.count(organization_id, status, source, assigned_to).await?;

        Ok((leads, total))
    }

    pub async fn stats(&self, organization_id: Uuid) -> Result<LeadStats, AppError> {
        let rows = self.lead_repo.status_counts(organization_id).await?;

        let mut counts = LeadStatusCounts {
            new: 0,
            contacted: 0,
            qualified: 0,
            negotiation: 0,
            converted: 0,
            lost: 0,
        };
        let mut total = 0i64;

        for (status, count) in rows {
            total += count;
            match status {
                LeadStatus::New => counts.new = count,
                LeadStatus::Contacted => counts.contacted = count,
                LeadStatus::Qualified => counts.qualified = count,
                LeadStatus::Negotiation => counts.negotiation = count,
                LeadStatus::Converted => counts.converted = count,
                LeadStatus::Lost => counts.lost = count,
            }
        }

        let conversion_rate = if total > 0 {
            format!("{:.1}", counts.converted as f64 / total as f64 * 100.0)
        } else {
            "0.0".to_string()
        };

        Ok(LeadStats { total_leads: total, by_status: counts, conversion_rate })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn member_code_is_zero_padded() {
        assert_eq!(format_member_code(1), "GYM0001");
        assert_eq!(format_member_code(42), "GYM0042");
        assert_eq!(format_member_code(9999), "GYM9999");

        // Acima de quatro dígitos o código simplesmente cresce
        assert_eq!(format_member_code(12345), "GYM12345");
    }
}
