//! Health check backed by the users store probe.

use crate::state::AppState;
use axum::{
    extract::State,
    response::{IntoResponse, Response},
};
use axum_helpers::server::{HealthCheckFuture, run_health_checks};
use domain_users::{IN_MEMORY_SERVICE_NAME, ServiceState};
#[allow(unused_imports)]
use serde_json::json;

/// Reports every backing service as `HEALTHY` or `UNHEALTHY`
#[utoipa::path(
    get,
    path = "/healthz",
    tag = "health",
    responses(
        (status = 200, description = "All services healthy", body = serde_json::Value,
            example = json!({ "InMemoryUserRepository": "HEALTHY" })),
        (status = 503, description = "At least one service unhealthy", body = serde_json::Value,
            example = json!({ "InMemoryUserRepository": "UNHEALTHY" }))
    )
)]
pub async fn healthz_handler(State(state): State<AppState>) -> Response {
    let checks: Vec<(&str, HealthCheckFuture<'_>)> = vec![(
        IN_MEMORY_SERVICE_NAME,
        Box::pin(async {
            match state.users.health_check().await.state {
                ServiceState::Healthy => Ok(()),
                ServiceState::Unhealthy => Err("Store probe failed".to_string()),
            }
        }),
    )];

    match run_health_checks(checks).await {
        Ok((status, json)) => (status, json).into_response(),
        Err((status, json)) => (status, json).into_response(),
    }
}
