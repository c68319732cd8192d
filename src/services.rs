pub mod attendance_service;
pub use attendance_service::AttendanceService;
pub mod auth;
pub use auth::AuthService;
pub mod class_service;
pub use class_service::ClassService;
pub mod dashboard_service;
pub use dashboard_service::DashboardService;
pub mod lead_service;
pub use lead_service::LeadService;
pub mod member_service;
pub use member_service::MemberService;
pub mod membership_service;
pub use membership_service::MembershipService;
pub mod payment_service;
pub use payment_service::PaymentService;
pub mod plan_service;
pub use plan_service::PlanService;
pub mod trainer_service;
pub use trainer_service::TrainerService;
