//! Users Domain
//!
//! User registration, lookup by id, name or email, login, and per-record
//! access control over an in-memory store.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │  Handlers   │  ← HTTP endpoints, CurrentUser extractor
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Service   │  ← Validation, login, authorization
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │ Repository  │  ← Multi-index store (trait + in-memory implementation)
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Models    │  ← Records, DTOs, enums
//! └─────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use domain_users::{
//!     handlers,
//!     repository::InMemoryUserRepository,
//!     service::UserService,
//!     token::{TokenConfig, TokenIssuer},
//! };
//!
//! let repository = InMemoryUserRepository::new();
//! let tokens = TokenIssuer::new(&TokenConfig::new("secret"));
//! let service = UserService::new(repository, tokens);
//!
//! let router = handlers::router(service);
//! ```

pub mod auth;
pub mod error;
pub mod handlers;
pub mod models;
pub mod repository;
pub mod selector;
pub mod service;
pub mod token;
pub mod validation;

// Re-export commonly used types
pub use auth::CurrentUser;
pub use error::{UserError, UserResult};
pub use models::{
    AccessToken, CreateUser, DeleteResponse, HealthCheckStatus, LoginRequest, Role,
    ServiceState, UpdateUserRequest, User, UserResponse,
};
pub use repository::{IN_MEMORY_SERVICE_NAME, InMemoryUserRepository, UserRepository};
pub use selector::{Operation, Selector};
pub use service::UserService;
pub use token::{TokenConfig, TokenIssuer};
