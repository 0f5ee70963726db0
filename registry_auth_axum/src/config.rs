//! Central configuration for the axum integration crate

use std::sync::LazyLock;

/// Where anonymous browsers are sent when a page behind
/// `is_authenticated_redirect` is requested without a session.
/// Default: "/login"
pub static REGISTRY_REDIRECT_ANON: LazyLock<String> =
    LazyLock::new(|| std::env::var("REGISTRY_REDIRECT_ANON").unwrap_or_else(|_| "/login".to_string()));

/// Comma-separated list of origins allowed to call the API with
/// credentials. Default: the local Angular dev server.
pub(crate) static REGISTRY_CORS_ORIGINS: LazyLock<String> = LazyLock::new(|| {
    std::env::var("REGISTRY_CORS_ORIGINS").unwrap_or_else(|_| "http://localhost:4200".to_string())
});
