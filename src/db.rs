pub mod attendance_repo;
pub use attendance_repo::AttendanceRepository;
pub mod class_repo;
pub use class_repo::ClassRepository;
pub mod dashboard_repo;
pub use dashboard_repo::DashboardRepository;
pub mod lead_repo;
pub use lead_repo::LeadRepository;
pub mod member_repo;
pub use member_repo::MemberRepository;
pub mod membership_repo;
pub use membership_repo::MembershipRepository;
pub mod organization_repo;
pub use organization_repo::OrganizationRepository;
pub mod payment_repo;
pub use payment_repo::PaymentRepository;
pub mod plan_repo;
pub use plan_repo::PlanRepository;
pub mod user_repo;
pub use user_repo::UserRepository;
