use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::app_data::AppData;
use crate::config::database::{begin_transaction, commit_transaction};
use crate::coordinators::validation::{optional_text, require_text};
use crate::errors::InternalError;
use crate::errors::internal::PlanError;
use crate::providers::access_policy::{self, AccessRequirement, Target};
use crate::stores::plan_store::{GoalFields, PlanFields};
use crate::stores::{PlanStore, UserStore};
use crate::types::db::plan;
use crate::types::dto::plan::{CreatePlanRequest, GoalRequest, PlanResponse, UpdatePlanRequest};
use crate::types::internal::context::RequestContext;
use crate::types::internal::role::Role;

/// Orchestrates development plan (PDI) operations
///
/// Admins and managers act on any plan; everyone else only on their own.
pub struct PlanCoordinator {
    db: DatabaseConnection,
    user_store: Arc<UserStore>,
    plan_store: Arc<PlanStore>,
}

fn owner_requirement(owner_id: &str) -> AccessRequirement<'_> {
    AccessRequirement::SelfOrAnyRole(Target::UserId(owner_id), Role::READ_ANY)
}

fn goal_fields(goals: Vec<GoalRequest>) -> Result<Vec<GoalFields>, InternalError> {
    goals
        .into_iter()
        .map(|goal| {
            Ok(GoalFields {
                id: optional_text(goal.id),
                description: require_text("goals.description", &goal.description)?,
                required_actions: optional_text(goal.required_actions),
                deadline: goal.deadline,
                completed: goal.completed,
                required_resources: optional_text(goal.required_resources),
                feedback: optional_text(goal.feedback),
            })
        })
        .collect()
}

impl PlanCoordinator {
    pub fn new(app_data: Arc<AppData>) -> Self {
        Self {
            db: app_data.db.clone(),
            user_store: Arc::clone(&app_data.stores.user_store),
            plan_store: Arc::clone(&app_data.stores.plan_store),
        }
    }

    async fn with_goals(&self, plans: Vec<plan::Model>) -> Result<Vec<PlanResponse>, InternalError> {
        let ids: Vec<String> = plans.iter().map(|plan| plan.id.clone()).collect();
        let mut goals = self.plan_store.goals_for_plans(&self.db, &ids).await?;

        Ok(plans
            .into_iter()
            .map(|plan| {
                let plan_goals = goals.remove(&plan.id).unwrap_or_default();
                PlanResponse::from_parts(plan, plan_goals)
            })
            .collect())
    }

    /// All plans, optionally narrowed to one owner (admin or manager)
    pub async fn list_plans(&self, ctx: &RequestContext, owner_id: Option<&str>) -> Result<Vec<PlanResponse>, InternalError> {
        access_policy::authorize(ctx, AccessRequirement::HasAnyRole(Role::READ_ANY), "list plans")?;

        let plans = match owner_id {
            Some(owner_id) => self.plan_store.list_by_owner(&self.db, owner_id).await?,
            None => self.plan_store.list_all(&self.db).await?,
        };
        self.with_goals(plans).await
    }

    /// Plans owned by one user (admin, manager or the owner)
    pub async fn list_by_owner(&self, ctx: &RequestContext, owner_id: &str) -> Result<Vec<PlanResponse>, InternalError> {
        access_policy::authorize(ctx, owner_requirement(owner_id), "list plans")?;

        let plans = self.plan_store.list_by_owner(&self.db, owner_id).await?;
        self.with_goals(plans).await
    }

    pub async fn get_plan(&self, ctx: &RequestContext, plan_id: &str) -> Result<PlanResponse, InternalError> {
        access_policy::authorize(ctx, AccessRequirement::Authenticated, "read plan")?;

        let plan = self.plan_store.get(&self.db, plan_id).await?;
        access_policy::authorize(ctx, owner_requirement(&plan.owner_id), "read plan")?;

        let goals = self.plan_store.goals_for_plan(&self.db, &plan.id).await?;
        Ok(PlanResponse::from_parts(plan, goals))
    }

    /// Create a plan for the named owner, or for the caller when none is named
    pub async fn create_plan(&self, ctx: &RequestContext, request: CreatePlanRequest) -> Result<PlanResponse, InternalError> {
        let caller = access_policy::authorize(ctx, AccessRequirement::Authenticated, "create plan")?;
        let owner_id = optional_text(request.owner_id).unwrap_or_else(|| caller.user_id.clone());
        access_policy::authorize(ctx, owner_requirement(&owner_id), "create plan")?;

        let fields = PlanFields {
            title: require_text("title", &request.title)?,
            description: optional_text(request.description),
            start_date: request.start_date,
            expected_completion_date: request.expected_completion_date,
            actual_completion_date: request.actual_completion_date,
            status: request.status.unwrap_or_default(),
        };
        let goals = goal_fields(request.goals)?;

        if self.user_store.find_by_id(&self.db, &owner_id).await?.is_none() {
            return Err(PlanError::OwnerNotFound { owner_id }.into());
        }

        let txn = begin_transaction(&self.db).await?;
        let (plan, goals) = self.plan_store.insert(&txn, &owner_id, fields, goals).await?;
        commit_transaction(txn).await?;

        tracing::info!(request_id = %ctx.request_id, "Plan {} created for {} by {}", plan.id, owner_id, caller.user_id);
        Ok(PlanResponse::from_parts(plan, goals))
    }

    /// Replace the plan's fields and, when given, its goal list
    pub async fn update_plan(
        &self,
        ctx: &RequestContext,
        plan_id: &str,
        request: UpdatePlanRequest,
    ) -> Result<PlanResponse, InternalError> {
        access_policy::authorize(ctx, AccessRequirement::Authenticated, "update plan")?;

        let fields = PlanFields {
            title: require_text("title", &request.title)?,
            description: optional_text(request.description),
            start_date: request.start_date,
            expected_completion_date: request.expected_completion_date,
            actual_completion_date: request.actual_completion_date,
            status: request.status,
        };
        let goals = request.goals.map(goal_fields).transpose()?;

        let txn = begin_transaction(&self.db).await?;
        let existing = self.plan_store.get(&txn, plan_id).await?;
        access_policy::authorize(ctx, owner_requirement(&existing.owner_id), "update plan")?;

        let plan = self.plan_store.update(&txn, existing, fields).await?;
        let goals = match goals {
            Some(goals) => self.plan_store.replace_goals(&txn, &plan.id, goals).await?,
            None => self.plan_store.goals_for_plan(&txn, &plan.id).await?,
        };
        commit_transaction(txn).await?;

        tracing::info!(request_id = %ctx.request_id, "Plan {} updated", plan.id);
        Ok(PlanResponse::from_parts(plan, goals))
    }

    /// Delete a plan and its goals
    pub async fn delete_plan(&self, ctx: &RequestContext, plan_id: &str) -> Result<(), InternalError> {
        access_policy::authorize(ctx, AccessRequirement::Authenticated, "delete plan")?;

        let txn = begin_transaction(&self.db).await?;
        let existing = self.plan_store.get(&txn, plan_id).await?;
        access_policy::authorize(ctx, owner_requirement(&existing.owner_id), "delete plan")?;
        self.plan_store.delete(&txn, &existing.id).await?;
        commit_transaction(txn).await?;

        tracing::info!(request_id = %ctx.request_id, "Plan {} deleted", existing.id);
        Ok(())
    }
}
