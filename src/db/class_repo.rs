// src/db/class_repo.rs

use chrono::NaiveDate;
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::class::{ClassBooking, ClassSchedule, CreateClassPayload, CreateSchedulePayload, GymClass},
};

#[derive(Clone)]
pub struct ClassRepository {
    pool: PgPool,
}

impl ClassRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list_classes(&self, organization_id: Uuid) -> Result<Vec<GymClass>, AppError> {
        let classes = sqlx::query_as::<_, GymClass>(
            "SELECT * FROM classes WHERE organization_id = $1 AND is_active ORDER BY name ASC",
        )
        .bind(organization_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(classes)
    }

    pub async fn find_class<'e, E>(
        &self,
        executor: E,
        organization_id: Uuid,
        id: Uuid,
    ) -> Result<Option<GymClass>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let class = sqlx::query_as::<_, GymClass>(
            "SELECT * FROM classes WHERE id = $1 AND organization_id = $2",
        )
        .bind(id)
        .bind(organization_id)
        .fetch_optional(executor)
        .await?;

        Ok(class)
    }

    pub async fn create_class<'e, E>(
        &self,
        executor: E,
        organization_id: Uuid,
        payload: &CreateClassPayload,
    ) -> Result<GymClass, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let class = sqlx::query_as::<_, GymClass>(
            r#"
            INSERT INTO classes (
                organization_id, branch_id, name, description, trainer_id,
                duration_minutes, default_capacity, color
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(organization_id)
        .bind(payload.branch_id)
        .bind(&payload.name)
        .bind(payload.description.as_deref())
        .bind(payload.trainer_id)
        .bind(payload.duration_minutes)
        .bind(payload.default_capacity)
        .bind(payload.color.as_deref())
        .fetch_one(executor)
        .await?;

        Ok(class)
    }

    pub async fn list_schedules(
        &self,
        organization_id: Uuid,
        class_id: Option<Uuid>,
    ) -> Result<Vec<ClassSchedule>, AppError> {
        let schedules = sqlx::query_as::<_, ClassSchedule>(
            r#"
            SELECT s.* FROM class_schedules s
            JOIN classes c ON c.id = s.class_id
            WHERE c.organization_id = $1
              AND ($2::uuid IS NULL OR s.class_id = $2)
              AND s.is_active
            ORDER BY s.day_of_week ASC, s.start_time ASC
            "#,
        )
        .bind(organization_id)
        .bind(class_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(schedules)
    }

    pub async fn find_schedule<'e, E>(
        &self,
        executor: E,
        organization_id: Uuid,
        id: Uuid,
    ) -> Result<Option<ClassSchedule>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let schedule = sqlx::query_as::<_, ClassSchedule>(
            r#"
            SELECT s.* FROM class_schedules s
            JOIN classes c ON c.id = s.class_id
            WHERE s.id = $1 AND c.organization_id = $2
            "#,
        )
        .bind(id)
        .bind(organization_id)
        .fetch_optional(executor)
        .await?;

        Ok(schedule)
    }

    pub async fn create_schedule<'e, E>(
        &self,
        executor: E,
        payload: &CreateSchedulePayload,
        max_capacity: i32,
    ) -> Result<ClassSchedule, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let schedule = sqlx::query_as::<_, ClassSchedule>(
            r#"
            INSERT INTO class_schedules (class_id, day_of_week, start_time, end_time, max_capacity, trainer_id)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(payload.class_id)
        .bind(payload.day_of_week)
        .bind(&payload.start_time)
        .bind(&payload.end_time)
        .bind(max_capacity)
        .bind(payload.trainer_id)
        .fetch_one(executor)
        .await?;

        Ok(schedule)
    }

    pub async fn find_booking<'e, E>(
        &self,
        executor: E,
        schedule_id: Uuid,
        member_id: Uuid,
        booking_date: NaiveDate,
    ) -> Result<Option<ClassBooking>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let booking = sqlx::query_as::<_, ClassBooking>(
            r#"
            SELECT * FROM class_bookings
            WHERE schedule_id = $1 AND member_id = $2 AND booking_date = $3
              AND status <> 'CANCELLED'
            "#,
        )
        .bind(schedule_id)
        .bind(member_id)
        .bind(booking_date)
        .fetch_optional(executor)
        .await?;

        Ok(booking)
    }

    pub async fn confirmed_count<'e, E>(
        &self,
        executor: E,
        schedule_id: Uuid,
        booking_date: NaiveDate,
    ) -> Result<i64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let count = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*) FROM class_bookings
            WHERE schedule_id = $1 AND booking_date = $2 AND status <> 'CANCELLED'
            "#,
        )
        .bind(schedule_id)
        .bind(booking_date)
        .fetch_one(executor)
        .await?;

        Ok(count)
    }

    pub async fn create_booking<'e, E>(
        &self,
        executor: E,
        schedule_id: Uuid,
        member_id: Uuid,
        booking_date: NaiveDate,
    ) -> Result<ClassBooking, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, ClassBooking>(
            r#"
            INSERT INTO class_bookings (schedule_id, member_id, booking_date)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(schedule_id)
        .bind(member_id)
        .bind(booking_date)
        .fetch_one(executor)
        .await
        .map_err(|e| {
            // O índice único é o guarda-costas da checagem feita na transação
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation() {
                    return AppError::AlreadyBooked;
                }
            }
            AppError::DatabaseError(e)
        })
    }

    pub async fn find_booking_by_id<'e, E>(
        &self,
        executor: E,
        organization_id: Uuid,
        id: Uuid,
    ) -> Result<Option<ClassBooking>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let booking = sqlx::query_as::<_, ClassBooking>(
            r#"
            SELECT b.* FROM class_bookings b
            JOIN class_schedules s ON s.id = b.schedule_id
            JOIN classes c ON c.id = s.class_id
            WHERE b.id = $1 AND c.organization_id = $2
            "#,
        )
        .bind(id)
        .bind(organization_id)
        .fetch_optional(executor)
        .await?;

        Ok(booking)
    }

    pub async fn cancel_booking<'e, E>(
        &self,
        executor: E,
        id: Uuid,
    ) -> Result<ClassBooking, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let booking = sqlx::query_as::<_, ClassBooking>(
            "UPDATE class_bookings SET status = 'CANCELLED' WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .fetch_one(executor)
        .await?;

        Ok(booking)
    }
}
