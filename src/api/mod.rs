// API layer - HTTP endpoints
pub mod auth;
pub mod feedbacks;
pub mod health;
pub mod helpers;
pub mod plans;
pub mod users;

use std::sync::Arc;

use poem::{EndpointExt, Route};
use poem_openapi::OpenApiService;

pub use auth::{AuthApi, BearerAuth};
pub use feedbacks::FeedbacksApi;
pub use health::HealthApi;
pub use plans::PlansApi;
pub use users::UsersApi;

use crate::app_data::AppData;

/// Compose every API under `/`, with Swagger UI at `/swagger`
///
/// `server_url` is the base advertised in the OpenAPI document.
pub fn build_routes(app_data: Arc<AppData>, server_url: &str) -> impl poem::Endpoint + use<> {
    let api_service = OpenApiService::new(
        (
            HealthApi,
            AuthApi::new(Arc::clone(&app_data)),
            UsersApi::new(Arc::clone(&app_data)),
            FeedbacksApi::new(Arc::clone(&app_data)),
            PlansApi::new(app_data),
        ),
        "Progress API",
        env!("CARGO_PKG_VERSION"),
    )
    .server(server_url);

    let ui = api_service.swagger_ui();

    Route::new()
        .nest("/swagger", ui)
        .nest("/", api_service)
        .with(poem::middleware::Tracing)
}
