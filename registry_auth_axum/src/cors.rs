//! Credentialed CORS for the browser frontend.

use http::{
    HeaderName, HeaderValue, Method,
    header::{AUTHORIZATION, CONTENT_TYPE},
};
use thiserror::Error;
use tower_http::cors::{AllowOrigin, CorsLayer};

use super::config::REGISTRY_CORS_ORIGINS;

#[derive(Debug, Error)]
pub enum CorsConfigError {
    /// Cookies cross origins only for explicitly named origins.
    #[error("Wildcard origin is not allowed with credentials")]
    WildcardOrigin,

    #[error("Invalid origin: {0}")]
    InvalidOrigin(String),
}

/// Build the CORS layer from `REGISTRY_CORS_ORIGINS`.
///
/// Credentials (the session cookie) are always allowed, which is why a
/// `*` origin is a configuration error rather than a fallback.
pub fn cors_layer() -> Result<CorsLayer, CorsConfigError> {
    cors_layer_for(REGISTRY_CORS_ORIGINS.as_str())
}

fn cors_layer_for(origins: &str) -> Result<CorsLayer, CorsConfigError> {
    let parsed = parse_origins(origins)?;

    Ok(CorsLayer::new()
        .allow_headers([
            CONTENT_TYPE,
            AUTHORIZATION,
            HeaderName::from_static("x-xsrf-token"),
        ])
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
        ])
        .allow_origin(AllowOrigin::list(parsed))
        .allow_credentials(true))
}

fn parse_origins(origins: &str) -> Result<Vec<HeaderValue>, CorsConfigError> {
    origins
        .split(',')
        .map(str::trim)
        .filter(|o| !o.is_empty())
        .map(|origin| {
            if origin == "*" {
                return Err(CorsConfigError::WildcardOrigin);
            }
            HeaderValue::from_str(origin)
                .map_err(|_| CorsConfigError::InvalidOrigin(origin.to_string()))
        })
        .collect()
}
