use std::sync::Arc;

use poem::Server;
use poem::listener::TcpListener;

use crate::api::build_routes;
use crate::app_data::AppData;
use crate::config::database::{init_database, migrate_database};
use crate::config::{SecretManager, ServerSettings};
use crate::coordinators::{AdminSeed, BootstrapCoordinator};
use crate::types::internal::context::RequestContext;

/// Start the HTTP server
///
/// Startup order: secrets (a weak signing key aborts here), database and
/// migrations, role registry check, initial administrator, then listen.
pub async fn run_server(settings: ServerSettings) -> Result<(), Box<dyn std::error::Error>> {
    let secret_manager = SecretManager::init().map_err(|e| {
        tracing::error!("Secret initialization failed: {}", e);
        e
    })?;

    let db = init_database(settings.database_url()).await?;
    migrate_database(&db).await?;

    let address = settings.server_address();
    let app_data = Arc::new(AppData::init(db, settings, secret_manager)?);

    let ctx = RequestContext::for_system("startup");
    let bootstrap = BootstrapCoordinator::new(Arc::clone(&app_data));
    bootstrap.seed_roles(&ctx).await?;
    if let AdminSeed::Created {
        email,
        generated_password: Some(password),
    } = bootstrap.seed_admin(&ctx).await?
    {
        println!("\n=== Initial administrator created ===");
        println!("Email:    {}", email);
        println!("Password: {}", password);
        println!("This password will not be shown again.\n");
    }

    let public_url = format!("http://{}", address);
    let app = build_routes(Arc::clone(&app_data), &public_url);

    tracing::info!("Starting server on {}", public_url);
    tracing::info!("Swagger UI available at {}/swagger", public_url);

    Server::new(TcpListener::bind(address)).run(app).await?;
    Ok(())
}
