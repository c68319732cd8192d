// src/services/membership_service.rs

use chrono::{DateTime, Duration, Months, Utc};
use sqlx::{Acquire, Executor, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{MemberRepository, MembershipRepository, PlanRepository},
    models::{
        member::MemberStatus,
        membership::{Membership, MembershipDetail, MembershipStatus},
        plan::{Plan, PlanDuration},
    },
};

// O motor de ciclo de vida das matrículas.
//
// Todas as operações rodam em UMA transação e seguem a mesma disciplina:
// checa todas as precondições antes de qualquer escrita, e grava o status
// do membro como último passo. A invariante protegida aqui é "no máximo
// uma matrícula ACTIVE por membro".
#[derive(Clone)]
pub struct MembershipService {
    membership_repo: MembershipRepository,
    member_repo: MemberRepository,
    plan_repo: PlanRepository,
}

// =========================================================================
//  REGRAS PURAS (datas e limites, sem banco)
// =========================================================================

// Soma meses de calendário. O fim do mês é "grampeado": 31/01 + 1 mês cai
// em 28/02 (ou 29/02 em ano bissexto), nunca transborda para março.
pub(crate) fn add_calendar_months(
    start: DateTime<Utc>,
    months: i32,
) -> Result<DateTime<Utc>, AppError> {
    start
        .checked_add_months(Months::new(months as u32))
        .ok_or_else(|| AppError::from(anyhow::anyhow!("período fora do intervalo de datas suportado")))
}

// Início da renovação: emenda no fim da vigência atual apenas se a
// matrícula ainda está ativa E o fim está no futuro; caso contrário
// (vencida, congelada, cancelada), o novo período começa agora.
pub(crate) fn renewal_start(
    membership: &Membership,
    start_from_current: bool,
    now: DateTime<Utc>,
) -> DateTime<Utc> {
    if start_from_current
        && membership.status == MembershipStatus::Active
        && membership.end_date > now
    {
        membership.end_date
    } else {
        now
    }
}

// Precondições do congelamento, na ordem: status, política do plano,
// teto acumulado. Devolve o novo total acumulado de dias.
pub(crate) fn check_freeze(
    membership: &Membership,
    plan: &Plan,
    freeze_days: i32,
) -> Result<i32, AppError> {
    if membership.status != MembershipStatus::Active {
        return Err(AppError::InvalidStatus(
            "Apenas matrículas ativas podem ser congeladas.".to_string(),
        ));
    }

    if !plan.freeze_allowed {
        return Err(AppError::FreezeNotAllowed);
    }

    let accumulated = membership.total_freeze_days + freeze_days;
    if accumulated > plan.max_freeze_days {
        return Err(AppError::MaxFreezeExceeded(plan.max_freeze_days));
    }

    Ok(accumulated)
}

impl MembershipService {
    pub fn new(
        membership_repo: MembershipRepository,
        member_repo: MemberRepository,
        plan_repo: PlanRepository,
    ) -> Self {
        Self { membership_repo, member_repo, plan_repo }
    }

    // A duração precisa pertencer ao plano resolvido; qualquer outra é
    // rejeitada antes de tocar no banco.
    fn resolve_duration(
        durations: Vec<PlanDuration>,
        duration_id: Uuid,
    ) -> Result<PlanDuration, AppError> {
        durations
            .into_iter()
            .find(|d| d.id == duration_id)
            .ok_or(AppError::InvalidDuration)
    }

    // =====================================================================
    //  ATRIBUIR (nova matrícula)
    // =====================================================================

    pub async fn assign<'e, E>(
        &self,
        executor: E,
        organization_id: Uuid,
        member_id: Uuid,
        plan_id: Uuid,
        duration_id: Uuid,
        start_date: Option<DateTime<Utc>>,
    ) -> Result<MembershipDetail, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        // A trava na linha do membro serializa atribuições concorrentes:
        // a segunda só enxerga o estado depois que a primeira commitar.
        let member = self
            .member_repo
            .find_by_id_for_update(&mut *tx, organization_id, member_id)
            .await?
            .ok_or(AppError::MemberNotFound)?;

        let plan = self
            .plan_repo
            .find_by_id(&mut *tx, organization_id, plan_id)
            .await?
            .ok_or(AppError::PlanNotFound)?;

        let durations = self.plan_repo.durations(&mut *tx, plan.id, false).await?;
        let duration = Self::resolve_duration(durations, duration_id)?;

        let start = start_date.unwrap_or_else(Utc::now);
        let end = add_calendar_months(start, duration.duration_months)?;

        // Ordem obrigatória: expirar as ativas ANTES de inserir a nova,
        // tudo na mesma transação — nunca existe janela com zero ou duas
        // matrículas ativas.
        let expired = self
            .membership_repo
            .expire_active_for_member(&mut *tx, member.id)
            .await?;
        if expired > 0 {
            tracing::info!("{} matrícula(s) ativa(s) expiradas para o membro {}", expired, member.member_code);
        }

        let membership = self
            .membership_repo
            .create(&mut *tx, member.id, plan.id, start, end, plan.class_credits, plan.pt_sessions)
            .await?;

        self.member_repo
            .set_status(&mut *tx, member.id, MemberStatus::Active)
            .await?;

        let detail = self.membership_repo.detail(&mut *tx, membership.id).await?;

        tx.commit().await?;

        Ok(detail)
    }

    // =====================================================================
    //  RENOVAR
    // =====================================================================

    pub async fn renew<'e, E>(
        &self,
        executor: E,
        organization_id: Uuid,
        membership_id: Uuid,
        duration_id: Uuid,
        start_from_current: bool,
    ) -> Result<MembershipDetail, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        let membership = self
            .membership_repo
            .find_by_id_for_update(&mut *tx, organization_id, membership_id)
            .await?
            .ok_or(AppError::MembershipNotFound)?;

        // A duração vem do plano DA PRÓPRIA matrícula, não de um plano
        // arbitrário — trocar de plano é o upgrade, não a renovação.
        let durations = self.plan_repo.durations(&mut *tx, membership.plan_id, false).await?;
        let duration = Self::resolve_duration(durations, duration_id)?;

        let start = renewal_start(&membership, start_from_current, Utc::now());
        let end = add_calendar_months(start, duration.duration_months)?;

        let renewed = self.membership_repo.renew(&mut *tx, membership.id, start, end).await?;

        self.member_repo
            .set_status(&mut *tx, membership.member_id, MemberStatus::Active)
            .await?;

        let detail = self.membership_repo.detail(&mut *tx, renewed.id).await?;

        tx.commit().await?;

        Ok(detail)
    }

    // =====================================================================
    //  CONGELAR / DESCONGELAR
    // =====================================================================

    pub async fn freeze<'e, E>(
        &self,
        executor: E,
        organization_id: Uuid,
        membership_id: Uuid,
        freeze_days: i32,
    ) -> Result<MembershipDetail, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        let membership = self
            .membership_repo
            .find_by_id_for_update(&mut *tx, organization_id, membership_id)
            .await?
            .ok_or(AppError::MembershipNotFound)?;

        let plan = self
            .plan_repo
            .find_by_id(&mut *tx, organization_id, membership.plan_id)
            .await?
            .ok_or(AppError::PlanNotFound)?;

        let total_freeze_days = check_freeze(&membership, &plan, freeze_days)?;

        let now = Utc::now();
        let freeze_end = now + Duration::days(freeze_days as i64);

        // O membro não perde tempo pago: o fim da vigência é empurrado
        // pela mesma quantidade de dias congelados.
        let new_end_date = membership.end_date + Duration::days(freeze_days as i64);

        let frozen = self
            .membership_repo
            .freeze(&mut *tx, membership.id, now, freeze_end, total_freeze_days, new_end_date)
            .await?;

        self.member_repo
            .set_status(&mut *tx, membership.member_id, MemberStatus::Frozen)
            .await?;

        let detail = self.membership_repo.detail(&mut *tx, frozen.id).await?;

        tx.commit().await?;

        Ok(detail)
    }

    pub async fn unfreeze<'e, E>(
        &self,
        executor: E,
        organization_id: Uuid,
        membership_id: Uuid,
    ) -> Result<MembershipDetail, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        let membership = self
            .membership_repo
            .find_by_id_for_update(&mut *tx, organization_id, membership_id)
            .await?
            .ok_or(AppError::MembershipNotFound)?;

        if membership.status != MembershipStatus::Frozen {
            return Err(AppError::InvalidStatus("A matrícula não está congelada.".to_string()));
        }

        // O end_date fica como está: a extensão já foi aplicada no
        // congelamento. Só marcamos quando o descongelamento aconteceu.
        let unfrozen = self
            .membership_repo
            .unfreeze(&mut *tx, membership.id, Utc::now())
            .await?;

        self.member_repo
            .set_status(&mut *tx, membership.member_id, MemberStatus::Active)
            .await?;

        let detail = self.membership_repo.detail(&mut *tx, unfrozen.id).await?;

        tx.commit().await?;

        Ok(detail)
    }

    // =====================================================================
    //  CANCELAR
    // =====================================================================

    // Sem precondição de status: qualquer matrícula pode ser cancelada.
    // O cancelamento é terminal para a linha, mas não impede uma nova
    // atribuição no futuro.
    pub async fn cancel<'e, E>(
        &self,
        executor: E,
        organization_id: Uuid,
        membership_id: Uuid,
    ) -> Result<MembershipDetail, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        let membership = self
            .membership_repo
            .find_by_id_for_update(&mut *tx, organization_id, membership_id)
            .await?
            .ok_or(AppError::MembershipNotFound)?;

        let cancelled = self.membership_repo.cancel(&mut *tx, membership.id).await?;

        self.member_repo
            .set_status(&mut *tx, membership.member_id, MemberStatus::Inactive)
            .await?;

        let detail = self.membership_repo.detail(&mut *tx, cancelled.id).await?;

        tx.commit().await?;

        Ok(detail)
    }

    // =====================================================================
    //  UPGRADE
    // =====================================================================

    // Troca o plano na MESMA linha (diferente de renovar/atribuir, que
    // preservam ou criam histórico). Datas recomeçam agora e os créditos
    // voltam aos valores do novo plano; os campos de congelamento não são
    // tocados.
    pub async fn upgrade<'e, E>(
        &self,
        executor: E,
        organization_id: Uuid,
        membership_id: Uuid,
        new_plan_id: Uuid,
        new_duration_id: Uuid,
    ) -> Result<MembershipDetail, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        let membership = self
            .membership_repo
            .find_by_id_for_update(&mut *tx, organization_id, membership_id)
            .await?
            .ok_or(AppError::MembershipNotFound)?;

        let new_plan = self
            .plan_repo
            .find_by_id(&mut *tx, organization_id, new_plan_id)
            .await?
            .ok_or(AppError::PlanNotFound)?;

        let durations = self.plan_repo.durations(&mut *tx, new_plan.id, false).await?;
        let duration = Self::resolve_duration(durations, new_duration_id)?;

        let start = Utc::now();
        let end = add_calendar_months(start, duration.duration_months)?;

        let upgraded = self
            .membership_repo
            .upgrade(
                &mut *tx,
                membership.id,
                new_plan.id,
                start,
                end,
                new_plan.class_credits,
                new_plan.pt_sessions,
            )
            .await?;

        let detail = self.membership_repo.detail(&mut *tx, upgraded.id).await?;

        tx.commit().await?;

        Ok(detail)
    }

    // =====================================================================
    //  CONSULTAS
    // =====================================================================

    pub async fn get<'e, E>(
        &self,
        executor: E,
        organization_id: Uuid,
        membership_id: Uuid,
    ) -> Result<MembershipDetail, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut conn = executor.acquire().await?;

        let membership = self
            .membership_repo
            .find_by_id(&mut *conn, organization_id, membership_id)
            .await?
            .ok_or(AppError::MembershipNotFound)?;

        self.membership_repo.detail(&mut *conn, membership.id).await
    }

    pub async fn list(
        &self,
        organization_id: Uuid,
        member_id: Option<Uuid>,
        status: Option<MembershipStatus>,
        page: i64,
        limit: i64,
    ) -> Result<(Vec<MembershipDetail>, i64), AppError> {
        let memberships = self
            .membership_repo
            .list(organization_id, member_id, status, page, limit)
            .await?;
        let total = self.membership_repo.count(organization_id, member_id, status).await?;

        Ok((memberships, total))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn dt(y: i32, mo: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, 10, 0, 0).unwrap()
    }

    fn membership(status: MembershipStatus, end_date: DateTime<Utc>, total_freeze_days: i32) -> Membership {
        Membership {
            id: Uuid::new_v4(),
            member_id: Uuid::new_v4(),
            plan_id: Uuid::new_v4(),
            start_date: dt(2025, 1, 1),
            end_date,
            status,
            is_frozen: status == MembershipStatus::Frozen,
            freeze_start_date: None,
            freeze_end_date: None,
            total_freeze_days,
            remaining_class_credits: 0,
            remaining_pt_sessions: 0,
            created_at: dt(2025, 1, 1),
            updated_at: dt(2025, 1, 1),
        }
    }

    fn plan(freeze_allowed: bool, max_freeze_days: i32) -> Plan {
        Plan {
            id: Uuid::new_v4(),
            organization_id: Uuid::new_v4(),
            name: "Basic".to_string(),
            description: None,
            features: vec![],
            access_all_branches: false,
            access_all_days: true,
            access_all_hours: true,
            allowed_start_time: None,
            allowed_end_time: None,
            includes_classes: false,
            includes_pt: false,
            class_credits: 0,
            pt_sessions: 0,
            freeze_allowed,
            max_freeze_days,
            is_active: true,
            is_popular: false,
            display_order: 0,
            color: None,
            created_at: dt(2025, 1, 1),
            updated_at: dt(2025, 1, 1),
        }
    }

    #[test]
    fn month_addition_clamps_to_end_of_month() {
        // 31/01 + 1 mês não transborda para março
        let end = add_calendar_months(dt(2025, 1, 31), 1).unwrap();
        assert_eq!(end, dt(2025, 2, 28));

        // Ano bissexto ganha o dia 29
        let end = add_calendar_months(dt(2024, 1, 31), 1).unwrap();
        assert_eq!(end, dt(2024, 2, 29));

        // Quando o dia existe no mês de destino, nada muda
        let end = add_calendar_months(dt(2025, 1, 15), 3).unwrap();
        assert_eq!(end, dt(2025, 4, 15));

        // 12 meses preserva o dia
        let end = add_calendar_months(dt(2025, 1, 31), 12).unwrap();
        assert_eq!(end, dt(2026, 1, 31));
    }

    #[test]
    fn renewal_extends_active_membership_back_to_back() {
        let now = dt(2025, 6, 1);
        let ms = membership(MembershipStatus::Active, dt(2025, 7, 1), 0);

        // Ativa e com fim no futuro: emenda no fim da vigência
        assert_eq!(renewal_start(&ms, true, now), dt(2025, 7, 1));

        // Sem a flag, recomeça agora mesmo estando ativa
        assert_eq!(renewal_start(&ms, false, now), now);
    }

    #[test]
    fn renewal_of_lapsed_membership_starts_now() {
        let now = dt(2025, 6, 1);

        // Fim no passado: recomeça agora, mesmo com a flag
        let lapsed = membership(MembershipStatus::Active, dt(2025, 5, 1), 0);
        assert_eq!(renewal_start(&lapsed, true, now), now);

        // Status expirado idem
        let expired = membership(MembershipStatus::Expired, dt(2025, 7, 1), 0);
        assert_eq!(renewal_start(&expired, true, now), now);
    }

    #[test]
    fn freeze_accumulates_against_plan_limit() {
        let p = plan(true, 15);

        // Primeiro congelamento dentro do teto
        let ms = membership(MembershipStatus::Active, dt(2025, 7, 1), 0);
        assert_eq!(check_freeze(&ms, &p, 10).unwrap(), 10);

        // O acumulado de 10 + 6 estoura o teto de 15
        let ms = membership(MembershipStatus::Active, dt(2025, 7, 11), 10);
        match check_freeze(&ms, &p, 6) {
            Err(AppError::MaxFreezeExceeded(limit)) => assert_eq!(limit, 15),
            other => panic!("esperava MaxFreezeExceeded, veio {other:?}"),
        }

        // Exatamente no teto ainda passa
        assert_eq!(check_freeze(&ms, &p, 5).unwrap(), 15);
    }

    #[test]
    fn freeze_preconditions_are_checked_in_order() {
        // Status errado vem antes da política do plano
        let frozen = membership(MembershipStatus::Frozen, dt(2025, 7, 1), 0);
        let no_freeze_plan = plan(false, 0);
        assert!(matches!(
            check_freeze(&frozen, &no_freeze_plan, 5),
            Err(AppError::InvalidStatus(_))
        ));

        // Ativa, mas o plano não permite congelar
        let active = membership(MembershipStatus::Active, dt(2025, 7, 1), 0);
        assert!(matches!(
            check_freeze(&active, &no_freeze_plan, 5),
            Err(AppError::FreezeNotAllowed)
        ));
    }

    #[test]
    fn assign_freeze_renew_date_chain() {
        // Atribuição de 1 mês a partir de 15/01
        let assign_start = dt(2025, 1, 15);
        let assign_end = add_calendar_months(assign_start, 1).unwrap();
        assert_eq!(assign_end, dt(2025, 2, 15));

        // Congelar 10 dias empurra o fim pela mesma quantidade
        let frozen_end = assign_end + Duration::days(10);
        assert_eq!(frozen_end, dt(2025, 2, 25));

        // Renovação emendada: começa no fim estendido e soma 1 mês
        let ms = membership(MembershipStatus::Active, frozen_end, 10);
        let renew_start = renewal_start(&ms, true, dt(2025, 2, 20));
        let renew_end = add_calendar_months(renew_start, 1).unwrap();
        assert_eq!(renew_start, dt(2025, 2, 25));
        assert_eq!(renew_end, dt(2025, 3, 25));
    }
}
