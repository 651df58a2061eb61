use thiserror::Error;

#[derive(Error, Debug)]
pub enum PlanError {
    #[error("Plan not found: {plan_id}")]
    PlanNotFound { plan_id: String },

    #[error("Plan owner not found: {owner_id}")]
    OwnerNotFound { owner_id: String },

    #[error("Goal {goal_id} does not belong to plan {plan_id}")]
    ForeignGoal { plan_id: String, goal_id: String },
}
