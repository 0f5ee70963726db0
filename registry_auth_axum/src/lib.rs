//! registry-auth-axum - Axum integration for the clinic registry auth core
//!
//! Exposes the session-flow and token-flow routers, the `AuthUser`
//! extractor, route-protection middleware and a credentialed CORS layer.

mod auth;
mod config;
mod cors;
mod error;
mod middleware;
mod router;
mod session;
mod token;

pub use config::REGISTRY_REDIRECT_ANON;
pub use cors::{CorsConfigError, cors_layer};
pub use middleware::{csrf_protect, is_authenticated_401, is_authenticated_redirect};
pub use router::{session_auth_router, token_auth_router};
pub use session::AuthUser;

// Re-export the pieces demo binaries need from the core crate.
pub use registry_auth::{SESSION_COOKIE_NAME, SessionUser, XSRF_COOKIE_NAME, XSRF_HEADER_NAME, init};
