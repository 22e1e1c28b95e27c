use axum::{Router, routing::get};

pub mod health;
pub mod users;

/// Creates the API routes.
///
/// Returns a stateless Router (all sub-routers have state already applied).
pub fn routes(state: &crate::state::AppState) -> Router {
    Router::new()
        .merge(users::router(state))
        .merge(health_router(state.clone()))
}

/// Router with the `/healthz` endpoint probing the users store.
pub fn health_router(state: crate::state::AppState) -> Router {
    Router::new()
        .route("/healthz", get(health::healthz_handler))
        .with_state(state)
}
