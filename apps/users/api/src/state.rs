//! Application state shared by the route builders.

use domain_users::{InMemoryUserRepository, UserService};

/// Shared application state.
///
/// Cloning is cheap: the service holds its store behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration loaded from environment variables
    pub config: crate::config::Config,
    /// Users domain service over the in-memory store
    pub users: UserService<InMemoryUserRepository>,
}
