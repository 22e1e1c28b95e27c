use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_helpers::ErrorResponse;
use thiserror::Error;

use crate::selector::{Operation, Selector};

/// Every failure the users domain can report.
///
/// `Display` is the exact message returned to clients in `{"error": ...}`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UserError {
    /// One or more domain rules failed; messages are joined with `\n`
    #[error("{0}")]
    Validation(String),

    #[error("Username {0} is already exist, please use a different name.")]
    DuplicateName(String),

    #[error("Email {0} is already exist, please use a different email.")]
    DuplicateEmail(String),

    #[error("There is no user with {selector} {value} to be {}", .operation.past_tense())]
    NotFound {
        selector: Selector,
        value: String,
        operation: Operation,
    },

    #[error("{operation} selector should be within this list {}", Selector::allowed_list())]
    UnsupportedSelector { operation: Operation },

    #[error("You should provide params as one of these [id, name, email]")]
    MissingSelector,

    #[error("Invalid password for user {0}")]
    InvalidPassword(String),

    #[error("There is no access token for user {0}")]
    MissingAccessToken(String),

    #[error("Invalid access token for the user {0}")]
    InvalidAccessToken(String),

    /// The token matched but the caller's record is gone
    #[error("There is no user with name {0} to be fetched")]
    UnknownCaller(String),

    #[error("You should provide username and access-token into the headers.")]
    MissingCredentials,

    #[error("Your current user permission is not satisfying this operation.")]
    PermissionDenied,

    #[error("Token error: {0}")]
    Token(String),
}

pub type UserResult<T> = Result<T, UserError>;

impl UserError {
    /// Rephrases a lookup miss for the operation that triggered it.
    pub fn for_operation(self, operation: Operation) -> Self {
        match self {
            UserError::NotFound {
                selector, value, ..
            } => UserError::NotFound {
                selector,
                value,
                operation,
            },
            other => other,
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            UserError::Validation(_)
            | UserError::DuplicateName(_)
            | UserError::DuplicateEmail(_)
            | UserError::NotFound { .. }
            | UserError::UnsupportedSelector { .. }
            | UserError::MissingSelector
            | UserError::InvalidPassword(_) => StatusCode::BAD_REQUEST,
            UserError::MissingAccessToken(_)
            | UserError::InvalidAccessToken(_)
            | UserError::UnknownCaller(_)
            | UserError::MissingCredentials
            | UserError::PermissionDenied => StatusCode::UNAUTHORIZED,
            UserError::Token(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for UserError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            UserError::Token(msg) => {
                tracing::error!("Users service error: {}", msg);
                "An internal server error occurred".to_string()
            }
            other => other.to_string(),
        };

        (status, Json(ErrorResponse::new(message))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_message_uses_selector_and_operation() {
        let err = UserError::NotFound {
            selector: Selector::Email,
            value: "a@b.co".into(),
            operation: Operation::Fetch,
        };
        assert_eq!(
            err.to_string(),
            "There is no user with email a@b.co to be fetched"
        );

        let err = err.for_operation(Operation::Update);
        assert_eq!(
            err.to_string(),
            "There is no user with email a@b.co to be updated"
        );
    }

    #[test]
    fn for_operation_leaves_other_errors_alone() {
        let err = UserError::PermissionDenied.for_operation(Operation::Delete);
        assert_eq!(err, UserError::PermissionDenied);
    }

    #[test]
    fn duplicate_name_message() {
        assert_eq!(
            UserError::DuplicateName("alice".into()).to_string(),
            "Username alice is already exist, please use a different name."
        );
    }

    #[test]
    fn auth_failures_are_unauthorized() {
        assert_eq!(
            UserError::MissingCredentials.status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(UserError::PermissionDenied.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            UserError::InvalidAccessToken("bob".into()).status(),
            StatusCode::UNAUTHORIZED
        );
    }

    #[test]
    fn lookup_and_validation_failures_are_bad_request() {
        assert_eq!(UserError::MissingSelector.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            UserError::Validation("password should be stronger.".into()).status(),
            StatusCode::BAD_REQUEST
        );
    }
}
