use axum::{
    Json, Router,
    extract::{Query, State},
    routing::{get, post},
};
use axum_helpers::{
    ValidatedJson,
    errors::responses::{BadRequestResponse, InternalServerErrorResponse, UnauthorizedResponse},
};
use std::sync::Arc;
use utoipa::OpenApi;

use crate::auth::CurrentUser;
use crate::error::{UserError, UserResult};
use crate::models::{
    AccessToken, CreateUser, DeleteResponse, LoginRequest, Role, UpdateUserRequest, UserResponse,
};
use crate::repository::UserRepository;
use crate::selector::Selector;
use crate::service::UserService;

pub const TAG: &str = "users";

/// OpenAPI documentation for the Users API
#[derive(OpenApi)]
#[openapi(
    paths(fetch_user, create_user, update_user, delete_user, login),
    components(
        schemas(
            UserResponse,
            CreateUser,
            UpdateUserRequest,
            LoginRequest,
            AccessToken,
            DeleteResponse,
            Role,
            Selector
        ),
        responses(BadRequestResponse, UnauthorizedResponse, InternalServerErrorResponse)
    ),
    tags(
        (name = TAG, description = "User management and login")
    )
)]
pub struct ApiDoc;

/// Create the users router with all HTTP endpoints
pub fn router<R: UserRepository + 'static>(service: UserService<R>) -> Router {
    let shared_service = Arc::new(service);

    Router::new()
        .route(
            "/users",
            get(fetch_user)
                .post(create_user)
                .put(update_user)
                .delete(delete_user),
        )
        .route("/users/login", post(login))
        .with_state(shared_service)
}

/// First query pair as `(selector, value)`; the rest are ignored.
fn selector_param(params: Vec<(String, String)>) -> UserResult<(String, String)> {
    params.into_iter().next().ok_or(UserError::MissingSelector)
}

/// Fetch a user by id, name or email
#[utoipa::path(
    get,
    path = "/users",
    tag = TAG,
    params(
        ("id" = Option<String>, Query, description = "Look up by id"),
        ("name" = Option<String>, Query, description = "Look up by name"),
        ("email" = Option<String>, Query, description = "Look up by email"),
        ("username" = String, Header, description = "Caller name"),
        ("access-token" = String, Header, description = "Token returned by login")
    ),
    responses(
        (status = 200, description = "User found", body = UserResponse),
        (status = 400, response = BadRequestResponse),
        (status = 401, response = UnauthorizedResponse)
    )
)]
async fn fetch_user<R: UserRepository + 'static>(
    State(service): State<Arc<UserService<R>>>,
    CurrentUser(caller): CurrentUser,
    Query(params): Query<Vec<(String, String)>>,
) -> UserResult<Json<UserResponse>> {
    let (selector, value) = selector_param(params)?;
    let user = service.fetch_user_as(&caller, &selector, &value).await?;
    Ok(Json(user.into()))
}

/// Register a new user
#[utoipa::path(
    post,
    path = "/users",
    tag = TAG,
    request_body = CreateUser,
    responses(
        (status = 200, description = "User created", body = UserResponse),
        (status = 400, response = BadRequestResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn create_user<R: UserRepository + 'static>(
    State(service): State<Arc<UserService<R>>>,
    ValidatedJson(input): ValidatedJson<CreateUser>,
) -> UserResult<Json<UserResponse>> {
    let user = service.add_user(input).await?;
    Ok(Json(user.into()))
}

/// Replace a user found by id, name or email
#[utoipa::path(
    put,
    path = "/users",
    tag = TAG,
    request_body = UpdateUserRequest,
    params(
        ("username" = String, Header, description = "Caller name"),
        ("access-token" = String, Header, description = "Token returned by login")
    ),
    responses(
        (status = 200, description = "User updated", body = UserResponse),
        (status = 400, response = BadRequestResponse),
        (status = 401, response = UnauthorizedResponse)
    )
)]
async fn update_user<R: UserRepository + 'static>(
    State(service): State<Arc<UserService<R>>>,
    CurrentUser(caller): CurrentUser,
    ValidatedJson(input): ValidatedJson<UpdateUserRequest>,
) -> UserResult<Json<UserResponse>> {
    let user = service
        .update_user_as(
            &caller,
            &input.update_by_selector,
            &input.update_by_data,
            input.updated_user,
        )
        .await?;
    Ok(Json(user.into()))
}

/// Delete a user found by id, name or email
#[utoipa::path(
    delete,
    path = "/users",
    tag = TAG,
    params(
        ("id" = Option<String>, Query, description = "Delete by id"),
        ("name" = Option<String>, Query, description = "Delete by name"),
        ("email" = Option<String>, Query, description = "Delete by email"),
        ("username" = String, Header, description = "Caller name"),
        ("access-token" = String, Header, description = "Token returned by login")
    ),
    responses(
        (status = 200, description = "User deleted", body = DeleteResponse),
        (status = 400, response = BadRequestResponse),
        (status = 401, response = UnauthorizedResponse)
    )
)]
async fn delete_user<R: UserRepository + 'static>(
    State(service): State<Arc<UserService<R>>>,
    CurrentUser(caller): CurrentUser,
    Query(params): Query<Vec<(String, String)>>,
) -> UserResult<Json<DeleteResponse>> {
    let (selector, value) = selector_param(params)?;
    service.delete_user_as(&caller, &selector, &value).await?;
    Ok(Json(DeleteResponse { success: true }))
}

/// Exchange name and password for an access token
#[utoipa::path(
    post,
    path = "/users/login",
    tag = TAG,
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Token issued", body = AccessToken),
        (status = 400, response = BadRequestResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn login<R: UserRepository + 'static>(
    State(service): State<Arc<UserService<R>>>,
    ValidatedJson(input): ValidatedJson<LoginRequest>,
) -> UserResult<Json<AccessToken>> {
    let token = service
        .add_access_token(&input.username, &input.password)
        .await?;
    Ok(Json(token))
}
