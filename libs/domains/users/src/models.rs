use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use utoipa::ToSchema;
use validator::Validate;

/// User roles
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    ToSchema,
)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
pub enum Role {
    /// Bypasses every ownership check
    Admin,
    /// May only see and change their own record
    #[default]
    User,
}

/// Persisted user (the "application user")
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    /// Sequential identifier, assigned by the store
    pub id: String,
    /// Unique name
    pub name: String,
    pub age: i64,
    /// Unique when present
    pub email: Option<String>,
    /// Stored as given
    pub password: String,
    pub role: Role,
}

impl User {
    /// Assemble a stored record from a validated user and its id.
    pub fn from_new(id: String, user: NewUser) -> Self {
        Self {
            id,
            name: user.name,
            age: user.age,
            email: user.email,
            password: user.password,
            role: user.role,
        }
    }
}

/// Validated user that has not been persisted yet (the "domain user").
///
/// Build it through [`crate::validation::create_user`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub name: String,
    pub age: i64,
    pub email: Option<String>,
    pub password: String,
    pub role: Role,
}

/// User as returned by the API (no password)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    #[schema(example = "0")]
    pub id: String,
    #[schema(example = "alice")]
    pub name: String,
    #[schema(example = 26)]
    pub age: i64,
    #[schema(example = "alice@example.com")]
    pub email: Option<String>,
    pub role: Role,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            age: user.age,
            email: user.email,
            role: user.role,
        }
    }
}

/// Body of `POST /users`, also the `updated_user` of `PUT /users`.
///
/// Only the shape is checked here; domain rules run in the service.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateUser {
    #[schema(example = "alice")]
    pub name: String,
    #[schema(example = 26)]
    pub age: i64,
    #[serde(default)]
    #[schema(example = "alice@example.com")]
    pub email: Option<String>,
    #[schema(example = "Str0ngPassword")]
    pub password: String,
}

/// Body of `PUT /users`
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateUserRequest {
    #[validate(nested)]
    pub updated_user: CreateUser,
    #[schema(example = "name")]
    pub update_by_selector: String,
    #[schema(example = "alice")]
    pub update_by_data: String,
}

/// Body of `POST /users/login`
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "can't be empty."))]
    #[schema(example = "alice")]
    pub username: String,
    #[schema(example = "Str0ngPassword")]
    pub password: String,
}

/// Opaque credential issued at login
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct AccessToken {
    pub token: String,
}

/// Body of a successful `DELETE /users`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct DeleteResponse {
    pub success: bool,
}

/// Liveness of a backing service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "UPPERCASE")]
pub enum ServiceState {
    Healthy,
    Unhealthy,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HealthCheckStatus {
    pub service_name: &'static str,
    pub state: ServiceState,
}
