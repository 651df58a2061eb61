pub mod auth;
pub mod caller;
pub mod context;
pub mod plan_status;
pub mod role;
