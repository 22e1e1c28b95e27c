use axum::{Json, http::StatusCode};
use futures::future::join_all;
use serde_json::{Map, Value};
use std::future::Future;
use std::pin::Pin;

pub const HEALTHY: &str = "HEALTHY";
pub const UNHEALTHY: &str = "UNHEALTHY";

/// A boxed future for health checks with a string error
pub type HealthCheckFuture<'a> = Pin<Box<dyn Future<Output = Result<(), String>> + Send + 'a>>;

/// Runs health checks concurrently and reports each by name.
///
/// The body maps every check name to `"HEALTHY"` or `"UNHEALTHY"`:
///
/// ```json
/// { "InMemoryUserRepository": "HEALTHY" }
/// ```
///
/// `Ok` carries 200 when every check passed; `Err` carries 503 otherwise.
///
/// # Example
/// ```ignore
/// let checks: Vec<(&str, HealthCheckFuture<'_>)> = vec![
///     ("InMemoryUserRepository", Box::pin(async { store.probe().await })),
/// ];
/// match run_health_checks(checks).await {
///     Ok(ok) | Err(ok) => ok.into_response(),
/// }
/// ```
pub async fn run_health_checks(
    checks: Vec<(&str, HealthCheckFuture<'_>)>,
) -> Result<(StatusCode, Json<Value>), (StatusCode, Json<Value>)> {
    let names: Vec<_> = checks.iter().map(|(name, _)| *name).collect();
    let futures: Vec<_> = checks.into_iter().map(|(_, check)| check).collect();
    let results = join_all(futures).await;

    let mut body = Map::new();
    let mut all_healthy = true;

    for (name, result) in names.into_iter().zip(results) {
        match result {
            Ok(()) => {
                body.insert(name.to_string(), Value::from(HEALTHY));
            }
            Err(e) => {
                tracing::error!(service = name, "Health check failed: {}", e);
                body.insert(name.to_string(), Value::from(UNHEALTHY));
                all_healthy = false;
            }
        }
    }

    if all_healthy {
        Ok((StatusCode::OK, Json(Value::Object(body))))
    } else {
        Err((StatusCode::SERVICE_UNAVAILABLE, Json(Value::Object(body))))
    }
}
