//! Request authentication and per-record authorization.
//!
//! Protected routes take a [`CurrentUser`], which checks the `username` and
//! `access-token` headers against the stored token. Handlers then pass the
//! caller to the `*_as` service methods, which call [`authorize`] against the
//! resolved target record.

use axum::{extract::FromRequestParts, http::request::Parts};
use axum_helpers::http::cors::{ACCESS_TOKEN_HEADER, USERNAME_HEADER};
use std::sync::Arc;

use crate::error::{UserError, UserResult};
use crate::models::{Role, User};
use crate::repository::UserRepository;
use crate::service::UserService;

/// The authenticated caller of a request
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

impl<R> FromRequestParts<Arc<UserService<R>>> for CurrentUser
where
    R: UserRepository + 'static,
{
    type Rejection = UserError;

    async fn from_request_parts(
        parts: &mut Parts,
        service: &Arc<UserService<R>>,
    ) -> Result<Self, Self::Rejection> {
        let username = header(parts, USERNAME_HEADER);
        let token = header(parts, ACCESS_TOKEN_HEADER);

        let (Some(username), Some(token)) = (username, token) else {
            return Err(UserError::MissingCredentials);
        };

        service.authenticate(&username, &token).await.map(CurrentUser)
    }
}

fn header(parts: &Parts, name: &str) -> Option<String> {
    parts
        .headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

/// `ADMIN` may act on any record, `USER` only on its own.
pub fn authorize(caller: &User, target: &User) -> UserResult<()> {
    if caller.role == Role::Admin || caller.id == target.id {
        return Ok(());
    }

    tracing::warn!(
        caller_id = %caller.id,
        target_id = %target.id,
        "Permission denied"
    );
    Err(UserError::PermissionDenied)
}
