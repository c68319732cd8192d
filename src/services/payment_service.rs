// src/services/payment_service.rs

use chrono::{DateTime, Datelike, Utc};
use rust_decimal::Decimal;
use sqlx::{Acquire, Executor, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{
        MemberRepository, OrganizationRepository, PaymentRepository,
        organization_repo::COUNTER_INVOICE,
    },
    models::payment::{
        CreatePaymentPayload, MemberPaymentsSummary, Payment, PaymentMethod, PaymentStats,
        PaymentStatus, PaymentType,
    },
};

// Total determinístico de um pagamento: desconto sobre o subtotal,
// imposto sobre o que sobrou DEPOIS do desconto.
#[derive(Debug, PartialEq)]
pub(crate) struct PaymentTotals {
    pub discount_amount: Decimal,
    pub tax_amount: Decimal,
    pub total: Decimal,
}

pub(crate) fn compute_totals(
    subtotal: Decimal,
    discount_percent: Decimal,
    tax_percent: Decimal,
) -> PaymentTotals {
    let discount_amount = subtotal * discount_percent / Decimal::ONE_HUNDRED;
    let tax_amount = (subtotal - discount_amount) * tax_percent / Decimal::ONE_HUNDRED;
    let total = subtotal - discount_amount + tax_amount;

    // Precisão integral do Decimal, sem arredondamento
    PaymentTotals { discount_amount, tax_amount, total }
}

// Número de fatura: prefixo INV + ano/mês de emissão + sequência da
// organização. A sequência é vitalícia (não zera a cada mês), então os
// números não são contíguos dentro de um mês exibido.
pub(crate) fn format_invoice_number(issued_at: DateTime<Utc>, sequence: i64) -> String {
    format!(
        "INV{:02}{:02}{:05}",
        issued_at.year() % 100,
        issued_at.month(),
        sequence
    )
}

#[derive(Clone)]
pub struct PaymentService {
    payment_repo: PaymentRepository,
    member_repo: MemberRepository,
    organization_repo: OrganizationRepository,
}

impl PaymentService {
    pub fn new(
        payment_repo: PaymentRepository,
        member_repo: MemberRepository,
        organization_repo: OrganizationRepository,
    ) -> Self {
        Self { payment_repo, member_repo, organization_repo }
    }

    // =====================================================================
    //  REGISTRAR PAGAMENTO
    // =====================================================================

    // O registro nasce COMPLETED: o caixa só lança o que já recebeu.
    pub async fn create<'e, E>(
        &self,
        executor: E,
        organization_id: Uuid,
        collected_by_id: Uuid,
        payload: &CreatePaymentPayload,
    ) -> Result<Payment, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        let member = self
            .member_repo
            .find_by_id(&mut *tx, organization_id, payload.member_id)
            .await?
            .ok_or(AppError::MemberNotFound)?;

        let totals = compute_totals(payload.amount, payload.discount, payload.tax);

        let sequence = self
            .organization_repo
            .next_sequence(&mut *tx, organization_id, COUNTER_INVOICE)
            .await?;
        let invoice_number = format_invoice_number(Utc::now(), sequence);

        let payment = self
            .payment_repo
            .create(
                &mut *tx,
                member.id,
                payload.membership_id,
                &invoice_number,
                totals.total,
                payload.amount,
                totals.discount_amount,
                totals.tax_amount,
                payload.payment_type.unwrap_or(PaymentType::Membership),
                payload.payment_method.unwrap_or(PaymentMethod::Cash),
                payload.notes.as_deref(),
                collected_by_id,
            )
            .await?;

        tx.commit().await?;

        tracing::info!("💰 Pagamento {} registrado para o membro {}", payment.invoice_number, member.member_code);

        Ok(payment)
    }

    // =====================================================================
    //  ESTORNO
    // =====================================================================

    // Transição COMPLETED -> REFUNDED, no máximo uma vez. O valor
    // estornado não é limitado ao valor original de propósito: créditos
    // de cortesia acima do cobrado continuam possíveis.
    pub async fn refund<'e, E>(
        &self,
        executor: E,
        organization_id: Uuid,
        payment_id: Uuid,
        reason: Option<&str>,
        refund_amount: Option<Decimal>,
    ) -> Result<Payment, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        let payment = self
            .payment_repo
            .find_by_id_for_update(&mut *tx, organization_id, payment_id)
            .await?
            .ok_or(AppError::PaymentNotFound)?;

        if payment.status == PaymentStatus::Refunded {
            return Err(AppError::AlreadyRefunded);
        }

        let actual_amount = refund_amount.unwrap_or(payment.amount);

        let refunded = self
            .payment_repo
            .refund(&mut *tx, payment.id, actual_amount, reason, Utc::now())
            .await?;

        tx.commit().await?;

        Ok(refunded)
    }

    // =====================================================================
    //  CONSULTAS
    // =====================================================================

    pub async fn get<'e, E>(
        &self,
        executor: E,
        organization_id: Uuid,
        payment_id: Uuid,
    ) -> Result<Payment, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        self.payment_repo
            .find_by_id(executor, organization_id, payment_id)
            .await?
            .ok_or(AppError::PaymentNotFound)
    }

    pub async fn list(
        &self,
        organization_id: Uuid,
        member_id: Option<Uuid>,
        status: Option<PaymentStatus>,
        payment_type: Option<PaymentType>,
        page: i64,
        limit: i64,
    ) -> Result<(Vec<Payment>, i64), AppError> {
        let payments = self
            .payment_repo
            .list(organization_id, member_id, status, payment_type, page, limit)
            .await?;
        let total = self
            .payment_repo
            .count(organization_id, member_id, status, payment_type)
            .await?;

        Ok((payments, total))
    }

    pub async fn member_history<'e, E>(
        &self,
        executor: E,
        organization_id: Uuid,
        member_id: Uuid,
    ) -> Result<MemberPaymentsSummary, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let member = self
            .member_repo
            .find_by_id(executor, organization_id, member_id)
            .await?
            .ok_or(AppError::MemberNotFound)?;

        let payments = self.payment_repo.list_for_member(member.id).await?;
        let total_paid = self.payment_repo.completed_total_for_member(member.id).await?;
        let transaction_count = payments.len() as i64;

        Ok(MemberPaymentsSummary { payments, total_paid, transaction_count })
    }

    pub async fn stats(
        &self,
        organization_id: Uuid,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    ) -> Result<PaymentStats, AppError> {
        let (total_revenue, total_transactions) =
            self.payment_repo.revenue_summary(organization_id, from, to).await?;
        let by_method = self.payment_repo.revenue_by_method(organization_id, from, to).await?;
        let by_type = self.payment_repo.revenue_by_type(organization_id, from, to).await?;

        Ok(PaymentStats { total_revenue, total_transactions, by_method, by_type })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal::prelude::FromPrimitive;

    fn dec(v: i64) -> Decimal {
        Decimal::from_i64(v).unwrap()
    }

    #[test]
    fn totals_apply_tax_after_discount() {
        // 1000 com 10% de desconto e 18% de imposto:
        // desconto 100, base tributável 900, imposto 162, total 1062
        let totals = compute_totals(dec(1000), dec(10), dec(18));
        assert_eq!(totals.discount_amount, dec(100));
        assert_eq!(totals.tax_amount, dec(162));
        assert_eq!(totals.total, dec(1062));
    }

    #[test]
    fn totals_with_no_discount_or_tax() {
        let totals = compute_totals(dec(1500), Decimal::ZERO, Decimal::ZERO);
        assert_eq!(totals.discount_amount, Decimal::ZERO);
        assert_eq!(totals.tax_amount, Decimal::ZERO);
        assert_eq!(totals.total, dec(1500));
    }

    #[test]
    fn totals_keep_full_decimal_precision() {
        // 999 com 7% de desconto: 69.93 de desconto, sem arredondar
        let totals = compute_totals(dec(999), dec(7), Decimal::ZERO);
        assert_eq!(totals.discount_amount, Decimal::new(6993, 2));
        assert_eq!(totals.total, Decimal::new(92907, 2));
    }

    #[test]
    fn invoice_number_carries_month_prefix_and_sequence() {
        let issued = Utc.with_ymd_and_hms(2025, 8, 6, 12, 0, 0).unwrap();
        assert_eq!(format_invoice_number(issued, 42), "INV250800042");

        // A sequência não zera na virada do mês: só o prefixo muda
        let next_month = Utc.with_ymd_and_hms(2025, 9, 1, 0, 0, 0).unwrap();
        assert_eq!(format_invoice_number(next_month, 43), "INV250900043");
    }

    #[test]
    fn invoice_sequence_pads_to_five_digits() {
        let issued = Utc.with_ymd_and_hms(2026, 1, 15, 12, 0, 0).unwrap();
        assert_eq!(format_invoice_number(issued, 1), "INV260100001");
        assert_eq!(format_invoice_number(issued, 123456), "INV2601123456");
    }
}
