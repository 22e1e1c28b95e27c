use utoipa::OpenApi;

/// Health endpoint documentation
#[derive(OpenApi)]
#[openapi(
    paths(crate::api::health::healthz_handler),
    tags((name = "health", description = "Service health"))
)]
pub struct HealthApiDoc;

#[derive(OpenApi)]
#[openapi(
    components(
        schemas(axum_helpers::ErrorResponse)
    ),
    info(
        title = "Users API",
        version = "0.1.0",
        description = "User registration, lookup, login and role-checked updates"
    )
)]
struct BaseApiDoc;

/// Full service document: the users domain plus `/healthz`, all at the root.
pub struct ApiDoc;

impl OpenApi for ApiDoc {
    fn openapi() -> utoipa::openapi::OpenApi {
        BaseApiDoc::openapi()
            .merge_from(domain_users::handlers::ApiDoc::openapi())
            .merge_from(HealthApiDoc::openapi())
    }
}
