pub mod attendance;
pub mod auth;
pub mod classes;
pub mod dashboard;
pub mod leads;
pub mod members;
pub mod memberships;
pub mod payments;
pub mod plans;
pub mod trainers;
