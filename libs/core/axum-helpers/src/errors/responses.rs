//! Reusable OpenAPI response types for the `{"error": "..."}` body.

use super::ErrorResponse;
#[allow(unused_imports)]
use serde_json::json;
use utoipa::ToResponse;

#[derive(ToResponse)]
#[response(
    description = "Bad Request - body, selector or domain validation failed",
    content_type = "application/json",
    example = json!({
        "error": "name should be at least 2 characters.\npassword should be stronger."
    })
)]
pub struct BadRequestResponse(pub ErrorResponse);

#[derive(ToResponse)]
#[response(
    description = "Unauthorized - missing or wrong credentials, or insufficient role",
    content_type = "application/json",
    example = json!({
        "error": "You should provide username and access-token into the headers."
    })
)]
pub struct UnauthorizedResponse(pub ErrorResponse);

#[derive(ToResponse)]
#[response(
    description = "Internal Server Error",
    content_type = "application/json",
    example = json!({
        "error": "An internal server error occurred"
    })
)]
pub struct InternalServerErrorResponse(pub ErrorResponse);
