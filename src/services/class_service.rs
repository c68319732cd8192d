// src/services/class_service.rs

use chrono::Utc;
use sqlx::{Acquire, Executor, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{ClassRepository, MemberRepository, MembershipRepository},
    models::class::{
        BookClassPayload, BookingStatus, ClassBooking, ClassSchedule, CreateClassPayload,
        CreateSchedulePayload, GymClass,
    },
};

#[derive(Clone)]
pub struct ClassService {
    class_repo: ClassRepository,
    member_repo: MemberRepository,
    membership_repo: MembershipRepository,
}

impl ClassService {
    pub fn new(
        class_repo: ClassRepository,
        member_repo: MemberRepository,
        membership_repo: MembershipRepository,
    ) -> Self {
        Self { class_repo, member_repo, membership_repo }
    }

    pub async fn list(&self, organization_id: Uuid) -> Result<Vec<GymClass>, AppError> {
        self.class_repo.list_classes(organization_id).await
    }

    pub async fn create<'e, E>(
        &self,
        executor: E,
        organization_id: Uuid,
        payload: &CreateClassPayload,
    ) -> Result<GymClass, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        self.class_repo.create_class(executor, organization_id, payload).await
    }

    pub async fn list_schedules(
        &self,
        organization_id: Uuid,
        class_id: Option<Uuid>,
    ) -> Result<Vec<ClassSchedule>, AppError> {
        self.class_repo.list_schedules(organization_id, class_id).await
    }

    pub async fn create_schedule<'e, E>(
        &self,
        executor: E,
        organization_id: Uuid,
        payload: &CreateSchedulePayload,
    ) -> Result<ClassSchedule, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        let class = self
            .class_repo
            .find_class(&mut *tx, organization_id, payload.class_id)
            .await?
            .ok_or(AppError::ClassNotFound)?;

        // Capacidade do horário, ou a padrão da aula
        let max_capacity = payload.max_capacity.unwrap_or(class.default_capacity);

        let schedule = self
            .class_repo
            .create_schedule(&mut *tx, payload, max_capacity)
            .await?;

        tx.commit().await?;

        Ok(schedule)
    }

    // Reserva: horário válido, membro com matrícula ativa, sem reserva
    // duplicada e com vaga na turma — tudo checado na mesma transação.
    pub async fn book<'e, E>(
        &self,
        executor: E,
        organization_id: Uuid,
        payload: &BookClassPayload,
    ) -> Result<ClassBooking, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        let schedule = self
            .class_repo
            .find_schedule(&mut *tx, organization_id, payload.schedule_id)
            .await?
            .ok_or(AppError::ScheduleNotFound)?;

        let member = self
            .member_repo
            .find_by_id(&mut *tx, organization_id, payload.member_id)
            .await?
            .ok_or(AppError::MemberNotFound)?;

        let has_active = self
            .membership_repo
            .has_active_for_member(&mut *tx, member.id)
            .await?;
        if !has_active {
            return Err(AppError::NoActiveMembership);
        }

        let booking_date = payload.booking_date.unwrap_or_else(|| Utc::now().date_naive());

        let existing = self
            .class_repo
            .find_booking(&mut *tx, schedule.id, member.id, booking_date)
            .await?;
        if existing.is_some() {
            return Err(AppError::AlreadyBooked);
        }

        let booked = self
            .class_repo
            .confirmed_count(&mut *tx, schedule.id, booking_date)
            .await?;
        if booked >= schedule.max_capacity as i64 {
            return Err(AppError::ClassFull);
        }

        let booking = self
            .class_repo
            .create_booking(&mut *tx, schedule.id, member.id, booking_date)
            .await?;

        tx.commit().await?;

        Ok(booking)
    }

    pub async fn cancel_booking<'e, E>(
        &self,
        executor: E,
        organization_id: Uuid,
        booking_id: Uuid,
    ) -> Result<ClassBooking, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        let booking = self
            .class_repo
            .find_booking_by_id(&mut *tx, organization_id, booking_id)
            .await?
            .ok_or(AppError::BookingNotFound)?;

        if booking.status == BookingStatus::Cancelled {
            return Err(AppError::AlreadyCancelled);
        }

        let cancelled = self.class_repo.cancel_booking(&mut *tx, booking.id).await?;

        tx.commit().await?;

        Ok(cancelled)
    }
}
