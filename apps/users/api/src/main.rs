use axum_helpers::server::{create_app, create_router};
use core_config::tracing::{init_tracing, install_color_eyre};
use domain_users::{InMemoryUserRepository, TokenIssuer, UserService};
use tracing::info;

mod api;
mod config;
mod openapi;
mod state;

use config::Config;
use state::AppState;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    // Install color-eyre first for colored error output (before any fallible operations)
    install_color_eyre();

    // Load configuration from environment variables
    let config = Config::from_env()?;

    // Initialize tracing with ErrorLayer for span trace capture
    init_tracing(&config.environment);

    let users = UserService::new(
        InMemoryUserRepository::new(),
        TokenIssuer::new(&config.token),
    );

    if let Some(admin) = config.admin.clone() {
        let seeded = users
            .seed_admin(admin.into())
            .await
            .map_err(|e| eyre::eyre!("Failed to seed admin user: {}", e))?;
        info!(user_id = %seeded.id, name = %seeded.name, "Seeded admin user");
    }

    let state = AppState { config, users };

    // Build router with API routes (pass reference, not ownership!)
    let api_routes = api::routes(&state);

    // create_router adds docs/middleware to our composed routes
    let router = create_router::<openapi::ApiDoc>(api_routes, &state.config.server)?;

    info!("Starting users API");
    create_app(router, &state.config.server).await?;

    info!("Users API shutdown complete");
    Ok(())
}
