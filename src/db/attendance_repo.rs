// src/db/attendance_repo.rs

use chrono::{DateTime, Utc};
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::attendance::{Attendance, AttendanceDetail, CheckInMethod},
};

const DETAIL_COLUMNS: &str = r#"
    a.id, a.member_id, a.branch_id, a.check_in_time, a.check_out_time,
    a.duration_minutes, a.check_in_method, a.created_at,
    m.member_code, m.first_name AS member_first_name, m.last_name AS member_last_name
"#;

#[derive(Clone)]
pub struct AttendanceRepository {
    pool: PgPool,
}

impl AttendanceRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // Check-in em aberto do membro dentro da janela do dia corrente.
    pub async fn open_check_in_between<'e, E>(
        &self,
        executor: E,
        member_id: Uuid,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Option<Attendance>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let attendance = sqlx::query_as::<_, Attendance>(
            r#"
            SELECT * FROM attendance
            WHERE member_id = $1
              AND check_in_time >= $2 AND check_in_time < $3
              AND check_out_time IS NULL
            LIMIT 1
            "#,
        )
        .bind(member_id)
        .bind(from)
        .bind(to)
        .fetch_optional(executor)
        .await?;

        Ok(attendance)
    }

    pub async fn create<'e, E>(
        &self,
        executor: E,
        member_id: Uuid,
        branch_id: Uuid,
        method: CheckInMethod,
    ) -> Result<Attendance, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let attendance = sqlx::query_as::<_, Attendance>(
            r#"
            INSERT INTO attendance (member_id, branch_id, check_in_method)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(member_id)
        .bind(branch_id)
        .bind(method)
        .fetch_one(executor)
        .await?;

        Ok(attendance)
    }

    pub async fn find_open_by_id<'e, E>(
        &self,
        executor: E,
        organization_id: Uuid,
        id: Uuid,
    ) -> Result<Option<Attendance>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let attendance = sqlx::query_as::<_, Attendance>(
            r#"
            SELECT a.* FROM attendance a
            JOIN members m ON m.id = a.member_id
            WHERE a.id = $1 AND m.organization_id = $2 AND a.check_out_time IS NULL
            "#,
        )
        .bind(id)
        .bind(organization_id)
        .fetch_optional(executor)
        .await?;

        Ok(attendance)
    }

    // Check-in em aberto mais recente do membro (check-out sem id explícito).
    pub async fn latest_open_for_member<'e, E>(
        &self,
        executor: E,
        organization_id: Uuid,
        member_id: Uuid,
    ) -> Result<Option<Attendance>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let attendance = sqlx::query_as::<_, Attendance>(
            r#"
            SELECT a.* FROM attendance a
            JOIN members m ON m.id = a.member_id
            WHERE a.member_id = $1 AND m.organization_id = $2 AND a.check_out_time IS NULL
            ORDER BY a.check_in_time DESC
            LIMIT 1
            "#,
        )
        .bind(member_id)
        .bind(organization_id)
        .fetch_optional(executor)
        .await?;

        Ok(attendance)
    }

    pub async fn close<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        check_out_time: DateTime<Utc>,
        duration_minutes: i32,
    ) -> Result<Attendance, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let attendance = sqlx::query_as::<_, Attendance>(
            r#"
            UPDATE attendance SET check_out_time = $2, duration_minutes = $3
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(check_out_time)
        .bind(duration_minutes)
        .fetch_one(executor)
        .await?;

        Ok(attendance)
    }

    pub async fn detail<'e, E>(&self, executor: E, id: Uuid) -> Result<AttendanceDetail, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            r#"
            SELECT {DETAIL_COLUMNS} FROM attendance a
            JOIN members m ON m.id = a.member_id
            WHERE a.id = $1
            "#
        );

        let detail = sqlx::query_as::<_, AttendanceDetail>(&sql)
            .bind(id)
            .fetch_one(executor)
            .await?;

        Ok(detail)
    }

    pub async fn between(
        &self,
        organization_id: Uuid,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
        branch_id: Option<Uuid>,
    ) -> Result<Vec<AttendanceDetail>, AppError> {
        let sql = format!(
            r#"
            SELECT {DETAIL_COLUMNS} FROM attendance a
            JOIN members m ON m.id = a.member_id
            WHERE m.organization_id = $1
              AND a.check_in_time >= $2 AND a.check_in_time < $3
              AND ($4::uuid IS NULL OR a.branch_id = $4)
            ORDER BY a.check_in_time DESC
            "#
        );

        let rows = sqlx::query_as::<_, AttendanceDetail>(&sql)
            .bind(organization_id)
            .bind(from)
            .bind(to)
            .bind(branch_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows)
    }

    pub async fn history(
        &self,
        organization_id: Uuid,
        member_id: Option<Uuid>,
        branch_id: Option<Uuid>,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
        page: i64,
        limit: i64,
    ) -> Result<Vec<AttendanceDetail>, AppError> {
        let sql = format!(
            r#"
            SELECT {DETAIL_COLUMNS} FROM attendance a
            JOIN members m ON m.id = a.member_id
            WHERE m.organization_id = $1
              AND ($2::uuid IS NULL OR a.member_id = $2)
              AND ($3::uuid IS NULL OR a.branch_id = $3)
              AND ($4::timestamptz IS NULL OR a.check_in_time >= $4)
              AND ($5::timestamptz IS NULL OR a.check_in_time <= $5)
            ORDER BY a.check_in_time DESC
            LIMIT $6 OFFSET $7
            "#
        );

        let rows = sqlx::query_as::<_, AttendanceDetail>(&sql)
            .bind(organization_id)
            .bind(member_id)
            .bind(branch_id)
            .bind(from)
            .bind(to)
            .bind(limit)
            .bind((page - 1) * limit)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows)
    }

    pub async fn history_count(
        &self,
        organization_id: Uuid,
        member_id: Option<Uuid>,
        branch_id: Option<Uuid>,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    ) -> Result<i64, AppError> {
        let total = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*) FROM attendance a
            JOIN members m ON m.id = a.member_id
            WHERE m.organization_id = $1
              AND ($2::uuid IS NULL OR a.member_id = $2)
              AND ($3::uuid IS NULL OR a.branch_id = $3)
              AND ($4::timestamptz IS NULL OR a.check_in_time >= $4)
              AND ($5::timestamptz IS NULL OR a.check_in_time <= $5)
            "#,
        )
        .bind(organization_id)
        .bind(member_id)
        .bind(branch_id)
        .bind(from)
        .bind(to)
        .fetch_one(&self.pool)
        .await?;

        Ok(total)
    }

    pub async fn for_member_since(
        &self,
        member_id: Uuid,
        since: DateTime<Utc>,
    ) -> Result<Vec<Attendance>, AppError> {
        let rows = sqlx::query_as::<_, Attendance>(
            r#"
            SELECT * FROM attendance
            WHERE member_id = $1 AND check_in_time >= $2
            ORDER BY check_in_time DESC
            "#,
        )
        .bind(member_id)
        .bind(since)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }
}
