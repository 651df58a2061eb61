use std::sync::Arc;

use sea_orm::{ConnectionTrait, DatabaseConnection};

use crate::app_data::AppData;
use crate::config::database::{begin_transaction, commit_transaction};
use crate::coordinators::validation::{optional_text, require_text};
use crate::errors::InternalError;
use crate::errors::internal::FeedbackError;
use crate::providers::AnalysisProvider;
use crate::providers::access_policy::{self, AccessRequirement, Target};
use crate::stores::feedback_store::NewFeedback;
use crate::stores::{FeedbackStore, UserStore};
use crate::types::db::{feedback, user};
use crate::types::dto::feedback::CreateFeedbackRequest;
use crate::types::internal::context::RequestContext;
use crate::types::internal::role::Role;

/// Orchestrates feedback authoring and the narrowed feedback listings
pub struct FeedbackCoordinator {
    db: DatabaseConnection,
    analysis_provider: Arc<AnalysisProvider>,
    user_store: Arc<UserStore>,
    feedback_store: Arc<FeedbackStore>,
}

impl FeedbackCoordinator {
    pub fn new(app_data: Arc<AppData>) -> Self {
        Self {
            db: app_data.db.clone(),
            analysis_provider: Arc::clone(&app_data.providers.analysis_provider),
            user_store: Arc::clone(&app_data.stores.user_store),
            feedback_store: Arc::clone(&app_data.stores.feedback_store),
        }
    }

    /// Record feedback from the effective author to the recipient
    ///
    /// Coordinates the sequence of operations:
    /// 1. Resolve the effective author from the caller's roles
    /// 2. Check that author and recipient exist
    /// 3. Run analysis (bounded, failures leave the record unannotated)
    /// 4. Insert in a transaction with the server timestamp
    pub async fn create_feedback(
        &self,
        ctx: &RequestContext,
        request: CreateFeedbackRequest,
    ) -> Result<feedback::Model, InternalError> {
        let caller = access_policy::authorize(ctx, AccessRequirement::Authenticated, "create feedback")?;
        let author_id = access_policy::effective_author(caller, request.author_id.as_deref());
        let body = require_text("body", &request.body)?;
        let recipient_id = require_text("recipient_id", &request.recipient_id)?;

        let recipient = self.resolve_participants(&self.db, &author_id, &recipient_id).await?;

        let annotations = self.analysis_provider.annotate(&recipient.name, &body).await;

        let new_feedback = NewFeedback {
            author_id,
            recipient_id: recipient.id,
            body,
            skills_used: optional_text(request.skills_used),
            difficulties: optional_text(request.difficulties),
            learning_interests: optional_text(request.learning_interests),
        };

        // Either user may have been deleted while analysis ran
        let txn = begin_transaction(&self.db).await?;
        self.resolve_participants(&txn, &new_feedback.author_id, &new_feedback.recipient_id)
            .await?;
        let created = self.feedback_store.insert(&txn, new_feedback, annotations).await?;
        commit_transaction(txn).await?;

        tracing::info!(
            request_id = %ctx.request_id,
            "Feedback {} recorded from {} to {} by {}",
            created.id,
            created.author_id,
            created.recipient_id,
            caller.user_id
        );
        Ok(created)
    }

    /// Check that author and recipient exist, returning the recipient
    async fn resolve_participants(
        &self,
        conn: &impl ConnectionTrait,
        author_id: &str,
        recipient_id: &str,
    ) -> Result<user::Model, InternalError> {
        if self.user_store.find_by_id(conn, author_id).await?.is_none() {
            return Err(FeedbackError::AuthorNotFound {
                user_id: author_id.to_string(),
            }
            .into());
        }
        self.user_store
            .find_by_id(conn, recipient_id)
            .await?
            .ok_or_else(|| {
                FeedbackError::RecipientNotFound {
                    user_id: recipient_id.to_string(),
                }
                .into()
            })
    }

    /// Every feedback record (admin only)
    pub async fn list_all(&self, ctx: &RequestContext) -> Result<Vec<feedback::Model>, InternalError> {
        access_policy::authorize(ctx, AccessRequirement::HasRole(Role::Admin), "list all feedback")?;
        self.feedback_store.list_all(&self.db).await
    }

    /// Feedback received by one user (admin, manager or the recipient)
    pub async fn list_by_recipient(
        &self,
        ctx: &RequestContext,
        recipient_id: &str,
    ) -> Result<Vec<feedback::Model>, InternalError> {
        access_policy::authorize(
            ctx,
            AccessRequirement::SelfOrAnyRole(Target::UserId(recipient_id), Role::READ_ANY),
            "list received feedback",
        )?;
        self.feedback_store.list_by_recipient(&self.db, recipient_id).await
    }

    /// Feedback written by one user (admin, manager or the author)
    pub async fn list_by_author(
        &self,
        ctx: &RequestContext,
        author_id: &str,
    ) -> Result<Vec<feedback::Model>, InternalError> {
        access_policy::authorize(
            ctx,
            AccessRequirement::SelfOrAnyRole(Target::UserId(author_id), Role::READ_ANY),
            "list authored feedback",
        )?;
        self.feedback_store.list_by_author(&self.db, author_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    use crate::errors::internal::AuthorizationError;
    use crate::providers::FeedbackAnalyzer;
    use crate::providers::analysis_provider::{AnalysisError, AnalysisRequest, AnalysisResult};
    use crate::stores::RoleStore;
    use crate::test::utils::{
        context_for, insert_test_user, setup_test_app_data, setup_test_database, test_app_data_with_analyzer,
    };

    /// Removes a user while the analysis call is in flight
    struct DeletingAnalyzer {
        db: DatabaseConnection,
        user_id: String,
    }

    #[async_trait]
    impl FeedbackAnalyzer for DeletingAnalyzer {
        async fn analyze(&self, _request: &AnalysisRequest) -> Result<AnalysisResult, AnalysisError> {
            RoleStore::new().clear_user_roles(&self.db, &self.user_id).await.unwrap();
            UserStore::new().delete(&self.db, &self.user_id).await.unwrap();
            Ok(AnalysisResult::default())
        }
    }

    fn request(author_id: Option<&str>, recipient_id: &str, body: &str) -> CreateFeedbackRequest {
        CreateFeedbackRequest {
            author_id: author_id.map(str::to_string),
            recipient_id: recipient_id.to_string(),
            body: body.to_string(),
            skills_used: Some("Rust".to_string()),
            difficulties: None,
            learning_interests: None,
        }
    }

    #[tokio::test]
    async fn test_collaborator_cannot_author_for_someone_else() {
        let app_data = setup_test_app_data().await;
        let ana = insert_test_user(&app_data.db, "ana@example.com", &[Role::Collaborator]).await;
        let bob = insert_test_user(&app_data.db, "bob@example.com", &[Role::Collaborator]).await;
        let cid = insert_test_user(&app_data.db, "cid@example.com", &[Role::Collaborator]).await;
        let coordinator = FeedbackCoordinator::new(app_data);

        let created = coordinator
            .create_feedback(
                &context_for(&ana, &[Role::Collaborator]),
                request(Some(&cid.id), &bob.id, "Clear code reviews"),
            )
            .await
            .unwrap();

        assert_eq!(created.author_id, ana.id);
        assert_eq!(created.recipient_id, bob.id);
        assert_eq!(created.sentiment.as_deref(), Some("POSITIVE"));
    }

    #[tokio::test]
    async fn test_manager_is_not_an_override_role() {
        let app_data = setup_test_app_data().await;
        let boss = insert_test_user(&app_data.db, "boss@example.com", &[Role::Manager]).await;
        let bob = insert_test_user(&app_data.db, "bob@example.com", &[Role::Collaborator]).await;
        let coordinator = FeedbackCoordinator::new(app_data);

        let created = coordinator
            .create_feedback(
                &context_for(&boss, &[Role::Manager]),
                request(Some(&bob.id), &bob.id, "Found the rollout difficult"),
            )
            .await
            .unwrap();

        assert_eq!(created.author_id, boss.id);
        assert_eq!(created.sentiment.as_deref(), Some("NEGATIVE"));
    }

    #[tokio::test]
    async fn test_admin_may_author_on_behalf() {
        let app_data = setup_test_app_data().await;
        let admin = insert_test_user(&app_data.db, "admin@example.com", &[Role::Admin]).await;
        let ana = insert_test_user(&app_data.db, "ana@example.com", &[Role::Collaborator]).await;
        let bob = insert_test_user(&app_data.db, "bob@example.com", &[Role::Collaborator]).await;
        let coordinator = FeedbackCoordinator::new(app_data);

        let created = coordinator
            .create_feedback(&context_for(&admin, &[Role::Admin]), request(Some(&ana.id), &bob.id, "ok"))
            .await
            .unwrap();
        assert_eq!(created.author_id, ana.id);
    }

    #[tokio::test]
    async fn test_missing_references_are_rejected() {
        let app_data = setup_test_app_data().await;
        let admin = insert_test_user(&app_data.db, "admin@example.com", &[Role::Admin]).await;
        let coordinator = FeedbackCoordinator::new(app_data);
        let ctx = context_for(&admin, &[Role::Admin]);

        let err = coordinator
            .create_feedback(&ctx, request(None, "ghost", "hi"))
            .await
            .unwrap_err();
        assert!(matches!(err, InternalError::Feedback(FeedbackError::RecipientNotFound { .. })));

        let err = coordinator
            .create_feedback(&ctx, request(Some("ghost"), &admin.id, "hi"))
            .await
            .unwrap_err();
        assert!(matches!(err, InternalError::Feedback(FeedbackError::AuthorNotFound { .. })));
    }

    #[tokio::test]
    async fn test_recipient_deleted_during_analysis_is_rejected() {
        let db = setup_test_database().await;
        let ana = insert_test_user(&db, "ana@example.com", &[Role::Collaborator]).await;
        let bob = insert_test_user(&db, "bob@example.com", &[Role::Collaborator]).await;
        let analyzer = DeletingAnalyzer {
            db: db.clone(),
            user_id: bob.id.clone(),
        };
        let app_data = test_app_data_with_analyzer(db, Arc::new(analyzer));
        let coordinator = FeedbackCoordinator::new(Arc::clone(&app_data));

        let err = coordinator
            .create_feedback(&context_for(&ana, &[Role::Collaborator]), request(None, &bob.id, "Nice work"))
            .await
            .unwrap_err();

        assert!(matches!(err, InternalError::Feedback(FeedbackError::RecipientNotFound { .. })));
        assert!(app_data.stores.feedback_store.list_all(&app_data.db).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unauthenticated_create_is_rejected() {
        let app_data = setup_test_app_data().await;
        let coordinator = FeedbackCoordinator::new(app_data);

        let err = coordinator
            .create_feedback(&RequestContext::new(), request(None, "x", "hi"))
            .await
            .unwrap_err();
        assert!(matches!(err, InternalError::Authorization(AuthorizationError::Unauthenticated)));
    }

    #[tokio::test]
    async fn test_listing_narrowing() {
        let app_data = setup_test_app_data().await;
        let admin = insert_test_user(&app_data.db, "admin@example.com", &[Role::Admin]).await;
        let boss = insert_test_user(&app_data.db, "boss@example.com", &[Role::Manager]).await;
        let ana = insert_test_user(&app_data.db, "ana@example.com", &[Role::Collaborator]).await;
        let bob = insert_test_user(&app_data.db, "bob@example.com", &[Role::Collaborator]).await;
        let coordinator = FeedbackCoordinator::new(app_data);
        let ana_ctx = context_for(&ana, &[Role::Collaborator]);

        coordinator.create_feedback(&ana_ctx, request(None, &bob.id, "one")).await.unwrap();
        coordinator.create_feedback(&ana_ctx, request(None, &bob.id, "two")).await.unwrap();

        assert_eq!(coordinator.list_all(&context_for(&admin, &[Role::Admin])).await.unwrap().len(), 2);
        assert!(matches!(
            coordinator.list_all(&ana_ctx).await.unwrap_err(),
            InternalError::Authorization(AuthorizationError::Forbidden { .. })
        ));
        assert!(coordinator.list_all(&context_for(&boss, &[Role::Manager])).await.is_err());

        assert_eq!(coordinator.list_by_author(&ana_ctx, &ana.id).await.unwrap().len(), 2);
        assert!(coordinator.list_by_recipient(&ana_ctx, &bob.id).await.is_err());

        let bob_ctx = context_for(&bob, &[Role::Collaborator]);
        assert_eq!(coordinator.list_by_recipient(&bob_ctx, &bob.id).await.unwrap().len(), 2);
        assert_eq!(
            coordinator
                .list_by_recipient(&context_for(&boss, &[Role::Manager]), &bob.id)
                .await
                .unwrap()
                .len(),
            2
        );
    }
}
