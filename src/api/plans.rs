use std::sync::Arc;

use poem::Request;
use poem_openapi::param::{Path, Query};
use poem_openapi::{OpenApi, Tags, payload::Json};

use crate::api::auth::BearerAuth;
use crate::api::helpers;
use crate::app_data::AppData;
use crate::coordinators::PlanCoordinator;
use crate::errors::ResourceError;
use crate::types::dto::plan::{
    CreatePlanApiResponse, CreatePlanRequest, DeletePlanApiResponse, PlanResponse, UpdatePlanRequest,
};

#[derive(Tags)]
enum PlanTags {
    /// Individual development plans and their goals
    Plans,
}

/// Development plan API endpoints
pub struct PlansApi {
    app_data: Arc<AppData>,
    plan_coordinator: Arc<PlanCoordinator>,
}

impl PlansApi {
    pub fn new(app_data: Arc<AppData>) -> Self {
        Self {
            plan_coordinator: Arc::new(PlanCoordinator::new(Arc::clone(&app_data))),
            app_data,
        }
    }
}

#[OpenApi]
impl PlansApi {
    /// List plans, optionally for one owner (admin or manager)
    #[oai(path = "/api/plans", method = "get", tag = "PlanTags::Plans")]
    async fn list(
        &self,
        req: &Request,
        auth: BearerAuth,
        owner_id: Query<Option<String>>,
    ) -> Result<Json<Vec<PlanResponse>>, ResourceError> {
        let ctx = helpers::authenticated_context(&self.app_data, req, &auth).await?;
        Ok(Json(self.plan_coordinator.list_plans(&ctx, owner_id.0.as_deref()).await?))
    }

    /// Create a plan, for the caller unless `owner_id` is given
    #[oai(path = "/api/plans", method = "post", tag = "PlanTags::Plans")]
    async fn create(
        &self,
        req: &Request,
        auth: BearerAuth,
        body: Json<CreatePlanRequest>,
    ) -> Result<CreatePlanApiResponse, ResourceError> {
        let ctx = helpers::authenticated_context(&self.app_data, req, &auth).await?;
        let plan = self.plan_coordinator.create_plan(&ctx, body.0).await?;
        Ok(CreatePlanApiResponse::Created(Json(plan)))
    }

    /// Plans owned by a user (admin, manager or the owner)
    #[oai(path = "/api/plans/owner/:id", method = "get", tag = "PlanTags::Plans")]
    async fn by_owner(
        &self,
        req: &Request,
        auth: BearerAuth,
        id: Path<String>,
    ) -> Result<Json<Vec<PlanResponse>>, ResourceError> {
        let ctx = helpers::authenticated_context(&self.app_data, req, &auth).await?;
        Ok(Json(self.plan_coordinator.list_by_owner(&ctx, &id.0).await?))
    }

    #[oai(path = "/api/plans/:id", method = "get", tag = "PlanTags::Plans")]
    async fn get(&self, req: &Request, auth: BearerAuth, id: Path<String>) -> Result<Json<PlanResponse>, ResourceError> {
        let ctx = helpers::authenticated_context(&self.app_data, req, &auth).await?;
        Ok(Json(self.plan_coordinator.get_plan(&ctx, &id.0).await?))
    }

    /// Replace a plan's fields and optionally its goals
    #[oai(path = "/api/plans/:id", method = "put", tag = "PlanTags::Plans")]
    async fn update(
        &self,
        req: &Request,
        auth: BearerAuth,
        id: Path<String>,
        body: Json<UpdatePlanRequest>,
    ) -> Result<Json<PlanResponse>, ResourceError> {
        let ctx = helpers::authenticated_context(&self.app_data, req, &auth).await?;
        Ok(Json(self.plan_coordinator.update_plan(&ctx, &id.0, body.0).await?))
    }

    #[oai(path = "/api/plans/:id", method = "delete", tag = "PlanTags::Plans")]
    async fn delete(&self, req: &Request, auth: BearerAuth, id: Path<String>) -> Result<DeletePlanApiResponse, ResourceError> {
        let ctx = helpers::authenticated_context(&self.app_data, req, &auth).await?;
        self.plan_coordinator.delete_plan(&ctx, &id.0).await?;
        Ok(DeletePlanApiResponse::NoContent)
    }
}
