use poem_openapi::{ApiResponse, Object, payload::Json};
use serde::{Deserialize, Serialize};

use crate::types::db::feedback;

/// Request model for feedback creation
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct CreateFeedbackRequest {
    /// Author to record; honoured only for administrators, otherwise the caller
    pub author_id: Option<String>,

    pub recipient_id: String,

    /// Free-text feedback body
    pub body: String,

    pub skills_used: Option<String>,
    pub difficulties: Option<String>,
    pub learning_interests: Option<String>,
}

/// Annotations produced by the analysis service
#[derive(Object, Debug, Clone, Default, Serialize, Deserialize)]
pub struct FeedbackAnnotations {
    pub sentiment: Option<String>,
    pub difficulty_category: Option<String>,
    pub suggested_goal: Option<String>,
    pub recommended_course: Option<String>,
    pub suggested_mentor: Option<String>,
}

#[derive(Object, Debug, Clone, Serialize, Deserialize)]
pub struct FeedbackResponse {
    pub id: String,
    pub author_id: String,
    pub recipient_id: String,
    pub body: String,
    pub skills_used: Option<String>,
    pub difficulties: Option<String>,
    pub learning_interests: Option<String>,
    /// Server-assigned creation time (Unix timestamp)
    pub created_at: i64,
    pub annotations: FeedbackAnnotations,
}

impl From<feedback::Model> for FeedbackResponse {
    fn from(model: feedback::Model) -> Self {
        Self {
            id: model.id,
            author_id: model.author_id,
            recipient_id: model.recipient_id,
            body: model.body,
            skills_used: model.skills_used,
            difficulties: model.difficulties,
            learning_interests: model.learning_interests,
            created_at: model.created_at,
            annotations: FeedbackAnnotations {
                sentiment: model.sentiment,
                difficulty_category: model.difficulty_category,
                suggested_goal: model.suggested_goal,
                recommended_course: model.recommended_course,
                suggested_mentor: model.suggested_mentor,
            },
        }
    }
}

#[derive(ApiResponse)]
pub enum CreateFeedbackApiResponse {
    /// Feedback recorded
    #[oai(status = 201)]
    Created(Json<FeedbackResponse>),
}
