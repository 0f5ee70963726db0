//! Combined routers for the authentication endpoints

use axum::Router;
use tower_http::LatencyUnit;
use tower_http::trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tracing::Level;

/// Router for the cookie-session flow, meant to be nested under `/api`:
///
/// - GET  /csrf-cookie
/// - POST /auth/login
/// - POST /auth/refresh
/// - GET  /auth/me
/// - POST /auth/logout
///
/// None of these routes carry the anti-forgery layer: csrf-cookie and
/// login run before a token can exist, refresh and logout are
/// allow-listed so a stale token can never lock a browser out.
pub fn session_auth_router() -> Router {
    super::auth::router().layer(
        TraceLayer::new_for_http()
            .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
            .on_request(DefaultOnRequest::new().level(Level::INFO))
            .on_response(
                DefaultOnResponse::new()
                    .level(Level::INFO)
                    .latency_unit(LatencyUnit::Millis),
            ),
    )
}

/// Router for the bearer-token flow, meant to be nested under `/api`:
///
/// - POST /login
/// - GET  /user
/// - POST /logout
pub fn token_auth_router() -> Router {
    super::token::router()
}
