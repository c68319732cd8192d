// src/docs.rs

use utoipa::OpenApi;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};

use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Auth ---
        handlers::auth::register,
        handlers::auth::login,
        handlers::auth::refresh,
        handlers::auth::logout,
        handlers::auth::me,

        // --- Members ---
        handlers::members::list_members,
        handlers::members::get_member,
        handlers::members::create_member,
        handlers::members::update_member,
        handlers::members::delete_member,

        // --- Plans ---
        handlers::plans::list_plans,
        handlers::plans::public_plans,
        handlers::plans::get_plan,
        handlers::plans::create_plan,
        handlers::plans::update_plan,
        handlers::plans::delete_plan,

        // --- Memberships ---
        handlers::memberships::list_memberships,
        handlers::memberships::get_membership,
        handlers::memberships::assign_membership,
        handlers::memberships::renew_membership,
        handlers::memberships::freeze_membership,
        handlers::memberships::unfreeze_membership,
        handlers::memberships::cancel_membership,
        handlers::memberships::upgrade_membership,

        // --- Payments ---
        handlers::payments::list_payments,
        handlers::payments::payment_stats,
        handlers::payments::get_payment,
        handlers::payments::create_payment,
        handlers::payments::refund_payment,
        handlers::payments::member_payments,

        // --- Leads ---
        handlers::leads::list_leads,
        handlers::leads::lead_stats,
        handlers::leads::get_lead,
        handlers::leads::create_lead,
        handlers::leads::update_lead,
        handlers::leads::delete_lead,
        handlers::leads::add_lead_activity,
        handlers::leads::convert_lead,

        // --- Attendance ---
        handlers::attendance::check_in,
        handlers::attendance::check_in_by_code,
        handlers::attendance::check_out,
        handlers::attendance::today_attendance,
        handlers::attendance::attendance_history,
        handlers::attendance::member_attendance,

        // --- Classes ---
        handlers::classes::list_classes,
        handlers::classes::create_class,
        handlers::classes::list_schedules,
        handlers::classes::create_schedule,
        handlers::classes::book_class,
        handlers::classes::cancel_booking,

        // --- Trainers ---
        handlers::trainers::list_trainers,
        handlers::trainers::get_trainer,
        handlers::trainers::create_trainer,
        handlers::trainers::update_trainer,
        handlers::trainers::delete_trainer,

        // --- Dashboard ---
        handlers::dashboard::summary,
    ),
    components(
        schemas(
            // --- Auth ---
            models::auth::UserRole,
            models::auth::User,
            models::auth::RegisterUserPayload,
            models::auth::LoginUserPayload,
            models::auth::RefreshTokenPayload,
            models::auth::AuthResponse,
            models::auth::TokenPairResponse,
            models::auth::CreateTrainerPayload,
            models::auth::UpdateTrainerPayload,

            // --- Organization ---
            models::organization::Organization,
            models::organization::Branch,

            // --- Members ---
            models::member::MemberGender,
            models::member::MemberStatus,
            models::member::Member,
            models::member::MemberListItem,
            models::member::CreateMemberPayload,
            models::member::UpdateMemberPayload,

            // --- Plans ---
            models::plan::Plan,
            models::plan::PlanDuration,
            models::plan::PlanDurationInput,
            models::plan::CreatePlanPayload,
            models::plan::UpdatePlanPayload,
            models::plan::PlanWithDurations,

            // --- Memberships ---
            models::membership::MembershipStatus,
            models::membership::Membership,
            models::membership::MembershipDetail,
            models::membership::AssignMembershipPayload,
            models::membership::RenewMembershipPayload,
            models::membership::FreezeMembershipPayload,
            models::membership::UpgradeMembershipPayload,

            // --- Payments ---
            models::payment::PaymentType,
            models::payment::PaymentMethod,
            models::payment::PaymentStatus,
            models::payment::Payment,
            models::payment::CreatePaymentPayload,
            models::payment::RefundPaymentPayload,
            models::payment::MemberPaymentsSummary,
            models::payment::RevenueByMethod,
            models::payment::RevenueByType,
            models::payment::PaymentStats,

            // --- Leads ---
            models::lead::LeadStatus,
            models::lead::LeadSource,
            models::lead::LeadActivityType,
            models::lead::Lead,
            models::lead::LeadActivity,
            models::lead::CreateLeadPayload,
            models::lead::UpdateLeadPayload,
            models::lead::AddLeadActivityPayload,
            models::lead::ConvertedLead,
            models::lead::LeadStatusCounts,
            models::lead::LeadStats,

            // --- Attendance ---
            models::attendance::CheckInMethod,
            models::attendance::Attendance,
            models::attendance::AttendanceDetail,
            models::attendance::CheckInPayload,
            models::attendance::CheckInByCodePayload,
            models::attendance::CheckOutPayload,
            models::attendance::TodayAttendanceStats,
            models::attendance::TodayAttendance,
            models::attendance::MemberAttendanceStats,
            models::attendance::MemberAttendance,

            // --- Classes ---
            models::class::BookingStatus,
            models::class::GymClass,
            models::class::ClassSchedule,
            models::class::ClassBooking,
            models::class::CreateClassPayload,
            models::class::CreateSchedulePayload,
            models::class::BookClassPayload,

            // --- Dashboard ---
            models::dashboard::DashboardSummary,
        )
    ),
    tags(
        (name = "Auth", description = "Autenticação e Registro"),
        (name = "Members", description = "Gestão de Membros"),
        (name = "Plans", description = "Catálogo de Planos e Durações"),
        (name = "Memberships", description = "Ciclo de Vida das Matrículas"),
        (name = "Payments", description = "Pagamentos e Estornos"),
        (name = "Leads", description = "Funil de Vendas"),
        (name = "Attendance", description = "Controle de Presença"),
        (name = "Classes", description = "Aulas Coletivas e Reservas"),
        (name = "Trainers", description = "Professores e Personal Trainers"),
        (name = "Dashboard", description = "Indicadores Gerenciais")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_jwt",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
        );
    }
}
