// src/services/attendance_service.rs

use chrono::{DateTime, Duration, Utc};
use sqlx::{Acquire, Executor, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{AttendanceRepository, MemberRepository, MembershipRepository},
    models::{
        attendance::{
            Attendance, AttendanceDetail, CheckInMethod, MemberAttendance, MemberAttendanceStats,
            TodayAttendance, TodayAttendanceStats,
        },
        member::{Member, MemberStatus},
    },
};

// Janela do "dia de hoje" em UTC, usada para a regra de um check-in
// aberto por dia e para as telas da recepção.
pub(crate) fn today_window(now: DateTime<Utc>) -> (DateTime<Utc>, DateTime<Utc>) {
    let start = now
        .date_naive()
        .and_hms_opt(0, 0, 0)
        .expect("meia-noite sempre existe")
        .and_utc();
    (start, start + Duration::days(1))
}

// Duração da visita em minutos inteiros, arredondada para baixo.
pub(crate) fn visit_minutes(check_in: DateTime<Utc>, check_out: DateTime<Utc>) -> i32 {
    ((check_out - check_in).num_seconds() / 60) as i32
}

#[derive(Clone)]
pub struct AttendanceService {
    attendance_repo: AttendanceRepository,
    member_repo: MemberRepository,
    membership_repo: MembershipRepository,
}

impl AttendanceService {
    pub fn new(
        attendance_repo: AttendanceRepository,
        member_repo: MemberRepository,
        membership_repo: MembershipRepository,
    ) -> Self {
        Self { attendance_repo, member_repo, membership_repo }
    }

    // Portaria: membro bloqueado ou congelado não entra; sem matrícula
    // ativa também não. Um check-in em aberto no dia impede outro.
    pub async fn check_in<'e, E>(
        &self,
        executor: E,
        organization_id: Uuid,
        member_id: Uuid,
        branch_id: Option<Uuid>,
        method: CheckInMethod,
    ) -> Result<(AttendanceDetail, Member), AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        let member = self
            .member_repo
            .find_by_id(&mut *tx, organization_id, member_id)
            .await?
            .ok_or(AppError::MemberNotFound)?;

        if member.status == MemberStatus::Blocked {
            return Err(AppError::MemberBlocked);
        }

        if member.status == MemberStatus::Frozen {
            return Err(AppError::MembershipFrozen);
        }

        let has_active = self
            .membership_repo
            .has_active_for_member(&mut *tx, member.id)
            .await?;
        if !has_active {
            return Err(AppError::NoActiveMembership);
        }

        let (day_start, day_end) = today_window(Utc::now());
        let open = self
            .attendance_repo
            .open_check_in_between(&mut *tx, member.id, day_start, day_end)
            .await?;
        if open.is_some() {
            return Err(AppError::AlreadyCheckedIn);
        }

        let attendance = self
            .attendance_repo
            .create(&mut *tx, member.id, branch_id.unwrap_or(member.branch_id), method)
            .await?;

        let detail = self.attendance_repo.detail(&mut *tx, attendance.id).await?;

        tx.commit().await?;

        Ok((detail, member))
    }

    // Check-in pelo código legível (GYMxxxx) digitado na recepção.
    pub async fn check_in_by_code<'e, E>(
        &self,
        executor: E,
        organization_id: Uuid,
        member_code: &str,
        branch_id: Option<Uuid>,
    ) -> Result<(AttendanceDetail, Member), AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let member = self
            .member_repo
            .find_by_code(organization_id, member_code)
            .await?
            .ok_or(AppError::MemberNotFound)?;

        self.check_in(executor, organization_id, member.id, branch_id, CheckInMethod::MemberId)
            .await
    }

    pub async fn check_out<'e, E>(
        &self,
        executor: E,
        organization_id: Uuid,
        attendance_id: Option<Uuid>,
        member_id: Option<Uuid>,
    ) -> Result<AttendanceDetail, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        // Por id explícito, ou o check-in aberto mais recente do membro
        let open = match (attendance_id, member_id) {
            (Some(id), _) => {
                self.attendance_repo
                    .find_open_by_id(&mut *tx, organization_id, id)
                    .await?
            }
            (None, Some(member_id)) => {
                self.attendance_repo
                    .latest_open_for_member(&mut *tx, organization_id, member_id)
                    .await?
            }
            (None, None) => None,
        };

        let attendance = open.ok_or(AppError::NoActiveCheckIn)?;

        let check_out_time = Utc::now();
        let duration = visit_minutes(attendance.check_in_time, check_out_time);

        let closed = self
            .attendance_repo
            .close(&mut *tx, attendance.id, check_out_time, duration)
            .await?;

        let detail = self.attendance_repo.detail(&mut *tx, closed.id).await?;

        tx.commit().await?;

        Ok(detail)
    }

    pub async fn today(
        &self,
        organization_id: Uuid,
        branch_id: Option<Uuid>,
    ) -> Result<TodayAttendance, AppError> {
        let (day_start, day_end) = today_window(Utc::now());
        let attendance = self
            .attendance_repo
            .between(organization_id, day_start, day_end, branch_id)
            .await?;

        let total_check_ins = attendance.len() as i64;
        let currently_in = attendance.iter().filter(|a| a.check_out_time.is_none()).count() as i64;

        Ok(TodayAttendance {
            attendance,
            stats: TodayAttendanceStats {
                total_check_ins,
                currently_in,
                checked_out: total_check_ins - currently_in,
            },
        })
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
    ) -> Result<(Vec<AttendanceDetail>, i64), AppError> {
        let rows = self
            .attendance_repo
            .history(organization_id, member_id, branch_id, from, to, page, limit)
            .await?;
        let total = self
            .attendance_repo
            .history_count(organization_id, member_id, branch_id, from, to)
            .await?;

        Ok((rows, total))
    }

    pub async fn member_history<'e, E>(
        &self,
        executor: E,
        organization_id: Uuid,
        member_id: Uuid,
        days: i64,
    ) -> Result<MemberAttendance, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let member = self
            .member_repo
            .find_by_id(executor, organization_id, member_id)
            .await?
            .ok_or(AppError::MemberNotFound)?;

        let since = Utc::now() - Duration::days(days);
        let attendance: Vec<Attendance> =
            self.attendance_repo.for_member_since(member.id, since).await?;

        let total_visits = attendance.len() as i64;
        let total_duration: i64 = attendance
            .iter()
            .filter_map(|a| a.duration_minutes)
            .map(i64::from)
            .sum();
        let avg_duration = if total_visits > 0 { total_duration / total_visits } else { 0 };

        Ok(MemberAttendance {
            attendance,
            stats: MemberAttendanceStats {
                total_visits,
                total_duration_minutes: total_duration,
                avg_duration_minutes: avg_duration,
                period: format!("{days} dias"),
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn today_window_covers_the_utc_day() {
        let now = Utc.with_ymd_and_hms(2025, 8, 6, 15, 30, 0).unwrap();
        let (start, end) = today_window(now);

        assert_eq!(start, Utc.with_ymd_and_hms(2025, 8, 6, 0, 0, 0).unwrap());
        assert_eq!(end, Utc.with_ymd_and_hms(2025, 8, 7, 0, 0, 0).unwrap());
        assert!(start <= now && now < end);
    }

    #[test]
    fn visit_minutes_rounds_down() {
        let check_in = Utc.with_ymd_and_hms(2025, 8, 6, 10, 0, 0).unwrap();

        let check_out = Utc.with_ymd_and_hms(2025, 8, 6, 11, 29, 59).unwrap();
        assert_eq!(visit_minutes(check_in, check_out), 89);

        let check_out = Utc.with_ymd_and_hms(2025, 8, 6, 10, 0, 30).unwrap();
        assert_eq!(visit_minutes(check_in, check_out), 0);
    }
}
