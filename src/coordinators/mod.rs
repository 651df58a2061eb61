// Coordinators layer - Workflow orchestration
//
// Coordinators handle workflow orchestration by composing provider and store
// operations for specific API endpoints. Every operation evaluates its access
// requirement before touching a store, and every mutating operation runs in
// one transaction.

pub mod auth_coordinator;
pub mod bootstrap_coordinator;
pub mod feedback_coordinator;
pub mod plan_coordinator;
pub mod user_coordinator;
pub mod validation;

pub use auth_coordinator::AuthCoordinator;
pub use bootstrap_coordinator::{AdminSeed, BootstrapCoordinator};
pub use feedback_coordinator::FeedbackCoordinator;
pub use plan_coordinator::PlanCoordinator;
pub use user_coordinator::UserCoordinator;
