use std::sync::Arc;

use poem::Request;
use poem_openapi::param::Path;
use poem_openapi::{OpenApi, Tags, payload::Json};

use crate::api::auth::BearerAuth;
use crate::api::helpers;
use crate::app_data::AppData;
use crate::coordinators::FeedbackCoordinator;
use crate::errors::ResourceError;
use crate::types::db::feedback;
use crate::types::dto::feedback::{CreateFeedbackApiResponse, CreateFeedbackRequest, FeedbackResponse};

#[derive(Tags)]
enum FeedbackTags {
    /// Peer feedback
    Feedback,
}

/// Feedback API endpoints
pub struct FeedbacksApi {
    app_data: Arc<AppData>,
    feedback_coordinator: Arc<FeedbackCoordinator>,
}

impl FeedbacksApi {
    pub fn new(app_data: Arc<AppData>) -> Self {
        Self {
            feedback_coordinator: Arc::new(FeedbackCoordinator::new(Arc::clone(&app_data))),
            app_data,
        }
    }
}

fn to_responses(records: Vec<feedback::Model>) -> Json<Vec<FeedbackResponse>> {
    Json(records.into_iter().map(FeedbackResponse::from).collect())
}

#[OpenApi]
impl FeedbacksApi {
    /// Record feedback; the author is the caller unless an admin names one
    #[oai(path = "/api/feedbacks", method = "post", tag = "FeedbackTags::Feedback")]
    async fn create(
        &self,
        req: &Request,
        auth: BearerAuth,
        body: Json<CreateFeedbackRequest>,
    ) -> Result<CreateFeedbackApiResponse, ResourceError> {
        let ctx = helpers::authenticated_context(&self.app_data, req, &auth).await?;
        let created = self.feedback_coordinator.create_feedback(&ctx, body.0).await?;
        Ok(CreateFeedbackApiResponse::Created(Json(created.into())))
    }

    /// List all feedback (admin)
    #[oai(path = "/api/feedbacks", method = "get", tag = "FeedbackTags::Feedback")]
    async fn list(&self, req: &Request, auth: BearerAuth) -> Result<Json<Vec<FeedbackResponse>>, ResourceError> {
        let ctx = helpers::authenticated_context(&self.app_data, req, &auth).await?;
        Ok(to_responses(self.feedback_coordinator.list_all(&ctx).await?))
    }

    /// Feedback received by a user (admin, manager or the recipient)
    #[oai(path = "/api/feedbacks/recipient/:id", method = "get", tag = "FeedbackTags::Feedback")]
    async fn by_recipient(
        &self,
        req: &Request,
        auth: BearerAuth,
        id: Path<String>,
    ) -> Result<Json<Vec<FeedbackResponse>>, ResourceError> {
        let ctx = helpers::authenticated_context(&self.app_data, req, &auth).await?;
        Ok(to_responses(self.feedback_coordinator.list_by_recipient(&ctx, &id.0).await?))
    }

    /// Feedback written by a user (admin, manager or the author)
    #[oai(path = "/api/feedbacks/author/:id", method = "get", tag = "FeedbackTags::Feedback")]
    async fn by_author(
        &self,
        req: &Request,
        auth: BearerAuth,
        id: Path<String>,
    ) -> Result<Json<Vec<FeedbackResponse>>, ResourceError> {
        let ctx = helpers::authenticated_context(&self.app_data, req, &auth).await?;
        Ok(to_responses(self.feedback_coordinator.list_by_author(&ctx, &id.0).await?))
    }
}
