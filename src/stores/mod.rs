// Stores layer - Data access and repository pattern
//
// Stores are stateless; every method takes the connection or transaction it
// runs on, so coordinators decide the transaction scope.
pub mod feedback_store;
pub mod plan_store;
pub mod role_store;
pub mod user_store;

use std::sync::Arc;

pub use feedback_store::FeedbackStore;
pub use plan_store::PlanStore;
pub use role_store::RoleStore;
pub use user_store::UserStore;

/// Shared store instances, created once in `AppData`
#[derive(Debug, Clone, Default)]
pub struct Stores {
    pub user_store: Arc<UserStore>,
    pub role_store: Arc<RoleStore>,
    pub feedback_store: Arc<FeedbackStore>,
    pub plan_store: Arc<PlanStore>,
}

impl Stores {
    pub fn new() -> Self {
        Self::default()
    }
}
