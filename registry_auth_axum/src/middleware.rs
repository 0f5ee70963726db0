//! Layerable route protection: session checks and the anti-forgery guard.

use axum::{
    Json,
    extract::Request,
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use serde_json::json;

use super::config::REGISTRY_REDIRECT_ANON;
use super::session::AuthUser;
use registry_auth::{current_user, get_session_id_from_headers, verify_csrf_pair};

async fn resolve_session_user(headers: &http::HeaderMap) -> Option<AuthUser> {
    let session_id = get_session_id_from_headers(headers).ok()??.to_string();
    current_user(&session_id).await.ok().map(AuthUser::from)
}

fn unauthorized_response(req: &Request, redirect_on_error: bool) -> Response {
    if redirect_on_error && req.method() == http::Method::GET {
        Redirect::temporary(REGISTRY_REDIRECT_ANON.as_str()).into_response()
    } else {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "message": "Not authenticated" })),
        )
            .into_response()
    }
}

/// Require a live session; respond 401 otherwise. The resolved
/// [`AuthUser`] is stored in request extensions for downstream handlers.
pub async fn is_authenticated_401(mut req: Request, next: Next) -> Response {
    match resolve_session_user(req.headers()).await {
        Some(user) => {
            req.extensions_mut().insert(user);
            next.run(req).await
        }
        None => unauthorized_response(&req, false),
    }
}

/// Require a live session; redirect browsers (GET) to the login route,
/// respond 401 to everything else.
pub async fn is_authenticated_redirect(mut req: Request, next: Next) -> Response {
    match resolve_session_user(req.headers()).await {
        Some(user) => {
            req.extensions_mut().insert(user);
            next.run(req).await
        }
        None => unauthorized_response(&req, true),
    }
}

/// Reject state-changing requests whose `X-XSRF-TOKEN` header does not
/// match the anti-forgery cookie. Reads pass through untouched.
pub async fn csrf_protect(req: Request, next: Next) -> Response {
    let method = req.method();
    let state_changing = method == http::Method::POST
        || method == http::Method::PUT
        || method == http::Method::PATCH
        || method == http::Method::DELETE;

    if state_changing {
        if let Err(e) = verify_csrf_pair(req.headers()) {
            tracing::warn!("Rejecting {} {}: {}", req.method(), req.uri().path(), e);
            return (
                StatusCode::FORBIDDEN,
                Json(json!({ "message": "CSRF token mismatch" })),
            )
                .into_response();
        }
    }

    next.run(req).await
}
