pub mod attendance;
pub mod auth;
pub mod class;
pub mod dashboard;
pub mod lead;
pub mod member;
pub mod membership;
pub mod organization;
pub mod payment;
pub mod plan;
