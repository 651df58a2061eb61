use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use uuid::Uuid;

use crate::errors::InternalError;
use crate::providers::analysis_provider::AnalysisResult;
use crate::types::db::feedback::{self, ActiveModel, Entity as Feedback};

/// Feedback about to be recorded, with author already resolved
#[derive(Debug, Clone)]
pub struct NewFeedback {
    pub author_id: String,
    pub recipient_id: String,
    pub body: String,
    pub skills_used: Option<String>,
    pub difficulties: Option<String>,
    pub learning_interests: Option<String>,
}

/// Data access for the `feedbacks` table
#[derive(Debug, Default)]
pub struct FeedbackStore;

impl FeedbackStore {
    pub fn new() -> Self {
        Self
    }

    /// Insert with a server-assigned id and timestamp
    pub async fn insert(
        &self,
        conn: &impl ConnectionTrait,
        new_feedback: NewFeedback,
        annotations: Option<AnalysisResult>,
    ) -> Result<feedback::Model, InternalError> {
        let annotations = annotations.unwrap_or_default();

        let model = ActiveModel {
            id: Set(Uuid::new_v4().to_string()),
            author_id: Set(new_feedback.author_id),
            recipient_id: Set(new_feedback.recipient_id),
            body: Set(new_feedback.body),
            skills_used: Set(new_feedback.skills_used),
            difficulties: Set(new_feedback.difficulties),
            learning_interests: Set(new_feedback.learning_interests),
            created_at: Set(Utc::now().timestamp()),
            sentiment: Set(annotations.sentiment),
            difficulty_category: Set(annotations.difficulty_category),
            suggested_goal: Set(annotations.suggested_goal),
            recommended_course: Set(annotations.recommended_course),
            suggested_mentor: Set(annotations.suggested_mentor),
        };

        model
            .insert(conn)
            .await
            .map_err(|e| InternalError::database("insert_feedback", e))
    }

    pub async fn list_all(&self, conn: &impl ConnectionTrait) -> Result<Vec<feedback::Model>, InternalError> {
        Feedback::find()
            .order_by_desc(feedback::Column::CreatedAt)
            .all(conn)
            .await
            .map_err(|e| InternalError::database("list_feedback", e))
    }

    pub async fn list_by_recipient(
        &self,
        conn: &impl ConnectionTrait,
        recipient_id: &str,
    ) -> Result<Vec<feedback::Model>, InternalError> {
        Feedback::find()
            .filter(feedback::Column::RecipientId.eq(recipient_id))
            .order_by_desc(feedback::Column::CreatedAt)
            .all(conn)
            .await
            .map_err(|e| InternalError::database("list_feedback_by_recipient", e))
    }

    pub async fn list_by_author(
        &self,
        conn: &impl ConnectionTrait,
        author_id: &str,
    ) -> Result<Vec<feedback::Model>, InternalError> {
        Feedback::find()
            .filter(feedback::Column::AuthorId.eq(author_id))
            .order_by_desc(feedback::Column::CreatedAt)
            .all(conn)
            .await
            .map_err(|e| InternalError::database("list_feedback_by_author", e))
    }

    /// Remove every record the user authored or received
    pub async fn delete_for_user(&self, conn: &impl ConnectionTrait, user_id: &str) -> Result<u64, InternalError> {
        let result = Feedback::delete_many()
            .filter(
                Condition::any()
                    .add(feedback::Column::AuthorId.eq(user_id))
                    .add(feedback::Column::RecipientId.eq(user_id)),
            )
            .exec(conn)
            .await
            .map_err(|e| InternalError::database("delete_feedback_for_user", e))?;

        Ok(result.rows_affected)
    }
}
