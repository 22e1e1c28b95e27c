use axum::http::{HeaderName, HeaderValue, Method};
use std::io;
use std::time::Duration;
use tower_http::cors::{AllowOrigin, CorsLayer};

/// Header carrying the caller's username on protected routes.
pub const USERNAME_HEADER: &str = "username";
/// Header carrying the caller's access token on protected routes.
pub const ACCESS_TOKEN_HEADER: &str = "access-token";

/// Creates a CORS layer for the given origins.
///
/// Returns `Ok(None)` when no origins are configured, and an error when an
/// origin is not a valid header value.
///
/// The layer allows GET, POST, PUT, DELETE and OPTIONS, plus the
/// `username` / `access-token` credential headers, with a 1 hour max age.
pub fn create_cors_layer(origins: &[String]) -> io::Result<Option<CorsLayer>> {
    if origins.is_empty() {
        return Ok(None);
    }

    let allowed_origins = origins
        .iter()
        .map(|s| s.parse::<HeaderValue>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("Invalid CORS_ALLOWED_ORIGIN value: {}", e),
            )
        })?;

    tracing::info!("CORS configured with allowed origins: {}", origins.join(","));

    let layer = CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed_origins))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            axum::http::header::CONTENT_TYPE,
            axum::http::header::ACCEPT,
            HeaderName::from_static(USERNAME_HEADER),
            HeaderName::from_static(ACCESS_TOKEN_HEADER),
        ])
        .max_age(Duration::from_secs(3600));

    Ok(Some(layer))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_origins_means_no_layer() {
        assert!(create_cors_layer(&[]).unwrap().is_none());
    }

    #[test]
    fn valid_origins_build_a_layer() {
        let origins = vec!["http://localhost:5173".to_string()];
        assert!(create_cors_layer(&origins).unwrap().is_some());
    }

    #[test]
    fn invalid_origin_is_rejected() {
        let origins = vec!["http://bad\norigin".to_string()];
        let err = create_cors_layer(&origins).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
    }
}
