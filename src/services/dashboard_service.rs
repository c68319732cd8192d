// src/services/dashboard_service.rs

use chrono::{Datelike, Duration, Utc};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::DashboardRepository,
    models::dashboard::DashboardSummary,
    services::attendance_service::today_window,
};

#[derive(Clone)]
pub struct DashboardService {
    repo: DashboardRepository,
}

impl DashboardService {
    pub fn new(repo: DashboardRepository) -> Self {
        Self { repo }
    }

    pub async fn summary(&self, organization_id: Uuid) -> Result<DashboardSummary, AppError> {
        let now = Utc::now();
        let (day_start, day_end) = today_window(now);

        let month_start = now
            .date_naive()
            .with_day(1)
            .expect("dia 1 sempre existe")
            .and_hms_opt(0, 0, 0)
            .expect("meia-noite sempre existe")
            .and_utc();

        let (total_members, active_members) = self.repo.member_counts(organization_id).await?;
        let today_check_ins = self
            .repo
            .check_ins_between(organization_id, day_start, day_end)
            .await?;
        let expiring_memberships = self
            .repo
            .expiring_memberships(organization_id, now + Duration::days(7))
            .await?;
        let today_revenue = self
            .repo
            .revenue_between(organization_id, day_start, day_end)
            .await?;
        let new_members_this_month = self
            .repo
            .members_joined_since(organization_id, month_start)
            .await?;

        Ok(DashboardSummary {
            total_members,
            active_members,
            today_check_ins,
            expiring_memberships,
            today_revenue,
            new_members_this_month,
        })
    }
}
