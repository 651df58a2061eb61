use chrono::NaiveDate;
use poem_openapi::{ApiResponse, Object, payload::Json};
use serde::{Deserialize, Serialize};

use crate::types::db::{goal, plan};
use crate::types::internal::plan_status::PlanStatus;

/// One goal inside a plan request
#[derive(Object, Debug, Clone, Serialize, Deserialize)]
pub struct GoalRequest {
    /// Existing goal to update; omitted for new goals
    pub id: Option<String>,
    pub description: String,
    pub required_actions: Option<String>,
    pub deadline: Option<NaiveDate>,
    #[oai(default)]
    #[serde(default)]
    pub completed: bool,
    pub required_resources: Option<String>,
    pub feedback: Option<String>,
}

#[derive(Object, Debug, Serialize, Deserialize)]
pub struct CreatePlanRequest {
    /// Plan owner; defaults to the caller
    pub owner_id: Option<String>,
    pub title: String,
    pub description: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub expected_completion_date: Option<NaiveDate>,
    pub actual_completion_date: Option<NaiveDate>,
    pub status: Option<PlanStatus>,
    #[oai(default)]
    #[serde(default)]
    pub goals: Vec<GoalRequest>,
}

/// Full replacement of a plan's fields
///
/// When `goals` is present it replaces the goal list: listed goals with an id
/// are updated, goals without an id are added, unlisted goals are removed.
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct UpdatePlanRequest {
    pub title: String,
    pub description: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub expected_completion_date: Option<NaiveDate>,
    pub actual_completion_date: Option<NaiveDate>,
    pub status: PlanStatus,
    pub goals: Option<Vec<GoalRequest>>,
}

#[derive(Object, Debug, Clone, Serialize, Deserialize)]
pub struct GoalResponse {
    pub id: String,
    pub position: i32,
    pub description: String,
    pub required_actions: Option<String>,
    pub deadline: Option<NaiveDate>,
    pub completed: bool,
    pub required_resources: Option<String>,
    pub feedback: Option<String>,
}

impl From<goal::Model> for GoalResponse {
    fn from(model: goal::Model) -> Self {
        Self {
            id: model.id,
            position: model.position,
            description: model.description,
            required_actions: model.required_actions,
            deadline: model.deadline,
            completed: model.completed,
            required_resources: model.required_resources,
            feedback: model.goal_feedback,
        }
    }
}

#[derive(Object, Debug, Clone, Serialize, Deserialize)]
pub struct PlanResponse {
    pub id: String,
    pub owner_id: String,
    pub title: String,
    pub description: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub expected_completion_date: Option<NaiveDate>,
    pub actual_completion_date: Option<NaiveDate>,
    pub status: PlanStatus,
    pub goals: Vec<GoalResponse>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl PlanResponse {
    pub fn from_parts(plan: plan::Model, goals: Vec<goal::Model>) -> Self {
        Self {
            id: plan.id,
            owner_id: plan.owner_id,
            title: plan.title,
            description: plan.description,
            start_date: plan.start_date,
            expected_completion_date: plan.expected_completion_date,
            actual_completion_date: plan.actual_completion_date,
            status: plan.status,
            goals: goals.into_iter().map(GoalResponse::from).collect(),
            created_at: plan.created_at,
            updated_at: plan.updated_at,
        }
    }
}

#[derive(ApiResponse)]
pub enum CreatePlanApiResponse {
    /// Plan created
    #[oai(status = 201)]
    Created(Json<PlanResponse>),
}

#[derive(ApiResponse)]
pub enum DeletePlanApiResponse {
    /// Plan and its goals removed
    #[oai(status = 204)]
    NoContent,
}
