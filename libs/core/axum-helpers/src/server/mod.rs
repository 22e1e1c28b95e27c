//! Server infrastructure module.
//!
//! - Router assembly with OpenAPI documentation
//! - Health aggregation
//! - Graceful shutdown
//!
//! # Example
//!
//! ```ignore
//! use axum_helpers::server::{create_app, create_router};
//! use core_config::server::ServerConfig;
//!
//! let config = ServerConfig::default();
//! let router = create_router::<ApiDoc>(api_routes, &config)?;
//! create_app(router, &config).await?;
//! ```

pub mod app;
pub mod health;
pub mod shutdown;

pub use app::{create_app, create_router};
pub use health::{HEALTHY, HealthCheckFuture, UNHEALTHY, run_health_checks};
pub use shutdown::shutdown_signal;
