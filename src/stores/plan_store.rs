use std::collections::{HashMap, HashSet};

use chrono::{NaiveDate, Utc};
use sea_orm::{ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use uuid::Uuid;

use crate::errors::InternalError;
use crate::errors::internal::PlanError;
use crate::types::db::goal::{self, Entity as Goal};
use crate::types::db::plan::{self, Entity as Plan};
use crate::types::internal::plan_status::PlanStatus;

/// Caller-settable plan columns
#[derive(Debug, Clone)]
pub struct PlanFields {
    pub title: String,
    pub description: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub expected_completion_date: Option<NaiveDate>,
    pub actual_completion_date: Option<NaiveDate>,
    pub status: PlanStatus,
}

/// One goal in a plan's ordered goal list
#[derive(Debug, Clone)]
pub struct GoalFields {
    /// Existing goal to update in place; `None` inserts a new goal
    pub id: Option<String>,
    pub description: String,
    pub required_actions: Option<String>,
    pub deadline: Option<NaiveDate>,
    pub completed: bool,
    pub required_resources: Option<String>,
    pub feedback: Option<String>,
}

/// Data access for `plans` and their owned `goals`
#[derive(Debug, Default)]
pub struct PlanStore;

impl PlanStore {
    pub fn new() -> Self {
        Self
    }

    /// Insert a plan together with its initial goals
    pub async fn insert(
        &self,
        conn: &impl ConnectionTrait,
        owner_id: &str,
        fields: PlanFields,
        goals: Vec<GoalFields>,
    ) -> Result<(plan::Model, Vec<goal::Model>), InternalError> {
        let now = Utc::now().timestamp();

        let plan = plan::ActiveModel {
            id: Set(Uuid::new_v4().to_string()),
            owner_id: Set(owner_id.to_string()),
            title: Set(fields.title),
            description: Set(fields.description),
            start_date: Set(fields.start_date),
            expected_completion_date: Set(fields.expected_completion_date),
            actual_completion_date: Set(fields.actual_completion_date),
            status: Set(fields.status),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(conn)
        .await
        .map_err(|e| InternalError::database("insert_plan", e))?;

        let mut inserted = Vec::with_capacity(goals.len());
        for (position, fields) in goals.into_iter().enumerate() {
            inserted.push(self.insert_goal(conn, &plan.id, position, fields).await?);
        }

        Ok((plan, inserted))
    }

    async fn insert_goal(
        &self,
        conn: &impl ConnectionTrait,
        plan_id: &str,
        position: usize,
        fields: GoalFields,
    ) -> Result<goal::Model, InternalError> {
        goal::ActiveModel {
            id: Set(Uuid::new_v4().to_string()),
            plan_id: Set(plan_id.to_string()),
            position: Set(goal_position(position)?),
            description: Set(fields.description),
            required_actions: Set(fields.required_actions),
            deadline: Set(fields.deadline),
            completed: Set(fields.completed),
            required_resources: Set(fields.required_resources),
            goal_feedback: Set(fields.feedback),
        }
        .insert(conn)
        .await
        .map_err(|e| InternalError::database("insert_goal", e))
    }

    pub async fn find(&self, conn: &impl ConnectionTrait, plan_id: &str) -> Result<Option<plan::Model>, InternalError> {
        Plan::find_by_id(plan_id.to_string())
            .one(conn)
            .await
            .map_err(|e| InternalError::database("find_plan", e))
    }

    pub async fn get(&self, conn: &impl ConnectionTrait, plan_id: &str) -> Result<plan::Model, InternalError> {
        self.find(conn, plan_id).await?.ok_or_else(|| {
            PlanError::PlanNotFound {
                plan_id: plan_id.to_string(),
            }
            .into()
        })
    }

    pub async fn list_all(&self, conn: &impl ConnectionTrait) -> Result<Vec<plan::Model>, InternalError> {
        Plan::find()
            .order_by_desc(plan::Column::CreatedAt)
            .all(conn)
            .await
            .map_err(|e| InternalError::database("list_plans", e))
    }

    pub async fn list_by_owner(&self, conn: &impl ConnectionTrait, owner_id: &str) -> Result<Vec<plan::Model>, InternalError> {
        Plan::find()
            .filter(plan::Column::OwnerId.eq(owner_id))
            .order_by_desc(plan::Column::CreatedAt)
            .all(conn)
            .await
            .map_err(|e| InternalError::database("list_plans_by_owner", e))
    }

    pub async fn goals_for_plan(&self, conn: &impl ConnectionTrait, plan_id: &str) -> Result<Vec<goal::Model>, InternalError> {
        Goal::find()
            .filter(goal::Column::PlanId.eq(plan_id))
            .order_by_asc(goal::Column::Position)
            .all(conn)
            .await
            .map_err(|e| InternalError::database("list_goals", e))
    }

    /// Goals for several plans at once, grouped by plan id
    pub async fn goals_for_plans(
        &self,
        conn: &impl ConnectionTrait,
        plan_ids: &[String],
    ) -> Result<HashMap<String, Vec<goal::Model>>, InternalError> {
        if plan_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let goals = Goal::find()
            .filter(goal::Column::PlanId.is_in(plan_ids.iter().cloned()))
            .order_by_asc(goal::Column::Position)
            .all(conn)
            .await
            .map_err(|e| InternalError::database("list_goals", e))?;

        let mut grouped: HashMap<String, Vec<goal::Model>> = HashMap::new();
        for goal in goals {
            grouped.entry(goal.plan_id.clone()).or_default().push(goal);
        }
        Ok(grouped)
    }

    /// Overwrite the plan's caller-settable columns
    pub async fn update(
        &self,
        conn: &impl ConnectionTrait,
        existing: plan::Model,
        fields: PlanFields,
    ) -> Result<plan::Model, InternalError> {
        let mut model: plan::ActiveModel = existing.into();
        model.title = Set(fields.title);
        model.description = Set(fields.description);
        model.start_date = Set(fields.start_date);
        model.expected_completion_date = Set(fields.expected_completion_date);
        model.actual_completion_date = Set(fields.actual_completion_date);
        model.status = Set(fields.status);
        model.updated_at = Set(Utc::now().timestamp());

        model
            .update(conn)
            .await
            .map_err(|e| InternalError::database("update_plan", e))
    }

    /// Make the plan's goal list match `goals`
    ///
    /// Goals with an id are updated, goals without one are inserted, and
    /// existing goals not listed are deleted. Positions follow list order.
    ///
    /// # Errors
    /// `PlanError::ForeignGoal` when a listed id is not one of this plan's goals
    pub async fn replace_goals(
        &self,
        conn: &impl ConnectionTrait,
        plan_id: &str,
        goals: Vec<GoalFields>,
    ) -> Result<Vec<goal::Model>, InternalError> {
        let mut existing: HashMap<String, goal::Model> = self
            .goals_for_plan(conn, plan_id)
            .await?
            .into_iter()
            .map(|goal| (goal.id.clone(), goal))
            .collect();

        let listed: HashSet<&str> = goals.iter().filter_map(|goal| goal.id.as_deref()).collect();
        let orphaned: Vec<String> = existing
            .keys()
            .filter(|id| !listed.contains(id.as_str()))
            .cloned()
            .collect();

        if !orphaned.is_empty() {
            Goal::delete_many()
                .filter(goal::Column::Id.is_in(orphaned.iter().cloned()))
                .exec(conn)
                .await
                .map_err(|e| InternalError::database("delete_goals", e))?;
        }

        let mut result = Vec::with_capacity(goals.len());
        for (position, fields) in goals.into_iter().enumerate() {
            let saved = match fields.id.clone() {
                None => self.insert_goal(conn, plan_id, position, fields).await?,
                Some(goal_id) => {
                    let current = existing.remove(&goal_id).ok_or_else(|| PlanError::ForeignGoal {
                        plan_id: plan_id.to_string(),
                        goal_id: goal_id.clone(),
                    })?;

                    let mut model: goal::ActiveModel = current.into();
                    model.position = Set(goal_position(position)?);
                    model.description = Set(fields.description);
                    model.required_actions = Set(fields.required_actions);
                    model.deadline = Set(fields.deadline);
                    model.completed = Set(fields.completed);
                    model.required_resources = Set(fields.required_resources);
                    model.goal_feedback = Set(fields.feedback);

                    model
                        .update(conn)
                        .await
                        .map_err(|e| InternalError::database("update_goal", e))?
                }
            };
            result.push(saved);
        }

        Ok(result)
    }

    /// Delete one plan and its goals
    pub async fn delete(&self, conn: &impl ConnectionTrait, plan_id: &str) -> Result<bool, InternalError> {
        Goal::delete_many()
            .filter(goal::Column::PlanId.eq(plan_id))
            .exec(conn)
            .await
            .map_err(|e| InternalError::database("delete_goals", e))?;

        let result = Plan::delete_by_id(plan_id.to_string())
            .exec(conn)
            .await
            .map_err(|e| InternalError::database("delete_plan", e))?;

        Ok(result.rows_affected > 0)
    }

    /// Delete every plan the user owns, goals included
    pub async fn delete_for_owner(&self, conn: &impl ConnectionTrait, owner_id: &str) -> Result<u64, InternalError> {
        let plan_ids: Vec<String> = self
            .list_by_owner(conn, owner_id)
            .await?
            .into_iter()
            .map(|plan| plan.id)
            .collect();

        if plan_ids.is_empty() {
            return Ok(0);
        }

        Goal::delete_many()
            .filter(goal::Column::PlanId.is_in(plan_ids.iter().cloned()))
            .exec(conn)
            .await
            .map_err(|e| InternalError::database("delete_goals", e))?;

        let result = Plan::delete_many()
            .filter(plan::Column::OwnerId.eq(owner_id))
            .exec(conn)
            .await
            .map_err(|e| InternalError::database("delete_plans_for_owner", e))?;

        Ok(result.rows_affected)
    }
}

fn goal_position(index: usize) -> Result<i32, InternalError> {
    i32::try_from(index).map_err(|e| InternalError::parse("goal position", e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::utils::{insert_test_user, setup_test_database};

    fn fields(title: &str) -> PlanFields {
        PlanFields {
            title: title.to_string(),
            description: None,
            start_date: NaiveDate::from_ymd_opt(2025, 1, 6),
            expected_completion_date: NaiveDate::from_ymd_opt(2025, 6, 30),
            actual_completion_date: None,
            status: PlanStatus::Planned,
        }
    }

    fn goal(id: Option<&str>, description: &str) -> GoalFields {
        GoalFields {
            id: id.map(str::to_string),
            description: description.to_string(),
            required_actions: None,
            deadline: None,
            completed: false,
            required_resources: None,
            feedback: None,
        }
    }

    #[tokio::test]
    async fn test_insert_orders_goals() {
        let db = setup_test_database().await;
        let store = PlanStore::new();
        let owner = insert_test_user(&db, "ana@example.com", &[]).await;

        let (plan, goals) = store
            .insert(&db, &owner.id, fields("Grow"), vec![goal(None, "first"), goal(None, "second")])
            .await
            .unwrap();

        assert_eq!(plan.status, PlanStatus::Planned);
        assert_eq!(goals.len(), 2);

        let loaded = store.goals_for_plan(&db, &plan.id).await.unwrap();
        assert_eq!(loaded.iter().map(|g| g.description.as_str()).collect::<Vec<_>>(), vec!["first", "second"]);
        assert_eq!(loaded[1].position, 1);
    }

    #[tokio::test]
    async fn test_replace_goals_updates_adds_and_removes() {
        let db = setup_test_database().await;
        let store = PlanStore::new();
        let owner = insert_test_user(&db, "ana@example.com", &[]).await;
        let (plan, goals) = store
            .insert(&db, &owner.id, fields("Grow"), vec![goal(None, "keep"), goal(None, "drop")])
            .await
            .unwrap();
        let keep_id = goals[0].id.clone();

        let mut kept = goal(Some(&keep_id), "keep, revised");
        kept.completed = true;
        let replaced = store
            .replace_goals(&db, &plan.id, vec![goal(None, "new"), kept])
            .await
            .unwrap();

        assert_eq!(replaced.len(), 2);
        let loaded = store.goals_for_plan(&db, &plan.id).await.unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[0].description, "new");
        assert_eq!(loaded[1].id, keep_id);
        assert!(loaded[1].completed);
    }

    #[tokio::test]
    async fn test_replace_goals_rejects_foreign_goal() {
        let db = setup_test_database().await;
        let store = PlanStore::new();
        let owner = insert_test_user(&db, "ana@example.com", &[]).await;
        let (first, _) = store.insert(&db, &owner.id, fields("A"), vec![]).await.unwrap();
        let (_, other_goals) = store
            .insert(&db, &owner.id, fields("B"), vec![goal(None, "theirs")])
            .await
            .unwrap();

        let err = store
            .replace_goals(&db, &first.id, vec![goal(Some(&other_goals[0].id), "steal")])
            .await
            .unwrap_err();
        assert!(matches!(err, InternalError::Plan(PlanError::ForeignGoal { .. })));
    }

    #[tokio::test]
    async fn test_delete_removes_goals() {
        let db = setup_test_database().await;
        let store = PlanStore::new();
        let owner = insert_test_user(&db, "ana@example.com", &[]).await;
        let (plan, _) = store
            .insert(&db, &owner.id, fields("Grow"), vec![goal(None, "g")])
            .await
            .unwrap();

        assert!(store.delete(&db, &plan.id).await.unwrap());
        assert!(store.find(&db, &plan.id).await.unwrap().is_none());
        assert!(store.goals_for_plan(&db, &plan.id).await.unwrap().is_empty());
        assert!(matches!(
            store.get(&db, &plan.id).await.unwrap_err(),
            InternalError::Plan(PlanError::PlanNotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_delete_for_owner_and_grouped_goals() {
        let db = setup_test_database().await;
        let store = PlanStore::new();
        let ana = insert_test_user(&db, "ana@example.com", &[]).await;
        let bob = insert_test_user(&db, "bob@example.com", &[]).await;
        let (a1, _) = store.insert(&db, &ana.id, fields("A1"), vec![goal(None, "x")]).await.unwrap();
        let (a2, _) = store.insert(&db, &ana.id, fields("A2"), vec![]).await.unwrap();
        store.insert(&db, &bob.id, fields("B1"), vec![goal(None, "y")]).await.unwrap();

        let grouped = store.goals_for_plans(&db, &[a1.id.clone(), a2.id.clone()]).await.unwrap();
        assert_eq!(grouped.get(&a1.id).map(Vec::len), Some(1));
        assert!(!grouped.contains_key(&a2.id));

        assert_eq!(store.delete_for_owner(&db, &ana.id).await.unwrap(), 2);
        assert!(store.list_by_owner(&db, &ana.id).await.unwrap().is_empty());
        assert_eq!(store.list_all(&db).await.unwrap().len(), 1);
    }
}
