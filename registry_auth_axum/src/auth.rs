//! Session-flow endpoints: csrf-cookie, login, refresh, me, logout.

use std::net::SocketAddr;

use axum::{
    Json, Router,
    extract::ConnectInfo,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::Deserialize;
use serde_json::{Value, json};

use super::error::{IntoResponseError, validation_failed};
use super::session::AuthUser;
use registry_auth::{
    get_session_id_from_headers, login_with_password, prepare_logout, prime_csrf_cookie,
    refresh_session,
};

pub(super) fn router() -> Router {
    Router::new()
        .route("/csrf-cookie", get(csrf_cookie))
        .route("/auth/login", post(login))
        .route("/auth/refresh", post(refresh))
        .route("/auth/me", get(me))
        .route("/auth/logout", post(logout))
}

#[derive(Debug, Deserialize)]
pub(super) struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    // Accepted for wire compatibility; sessions have a single lifetime.
    #[serde(default, rename = "remember")]
    pub _remember: bool,
}

pub(super) fn validate_login(body: &LoginRequest) -> Vec<(&'static str, &'static str)> {
    let mut errors = Vec::new();
    if body.email.is_empty() {
        errors.push(("email", "The email field is required."));
    } else if !body.email.contains('@') {
        errors.push(("email", "The email must be a valid email address."));
    }
    if body.password.is_empty() {
        errors.push(("password", "The password field is required."));
    }
    errors
}

/// GET /csrf-cookie: issue the readable anti-forgery cookie. 204.
async fn csrf_cookie() -> Result<Response, (StatusCode, Json<Value>)> {
    let headers = prime_csrf_cookie()
        .map_err(registry_auth::AuthError::from)
        .into_response_error()?;
    Ok((StatusCode::NO_CONTENT, headers).into_response())
}

/// POST /auth/login: credential check plus session establishment.
async fn login(
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    Json(body): Json<LoginRequest>,
) -> Result<Response, (StatusCode, Json<Value>)> {
    let errors = validate_login(&body);
    if !errors.is_empty() {
        return Err(validation_failed(errors));
    }

    let presented = get_session_id_from_headers(&headers)
        .map_err(registry_auth::AuthError::from)
        .into_response_error()?
        .map(str::to_string);

    let (user, response_headers) = login_with_password(
        &body.email,
        &body.password,
        &addr.ip().to_string(),
        presented.as_deref(),
    )
    .await
    .into_response_error()?;

    Ok((
        response_headers,
        Json(json!({ "message": "Logged in", "user": user })),
    )
        .into_response())
}

/// POST /auth/refresh: swap a live session for a fresh one.
async fn refresh(headers: HeaderMap) -> Result<Response, (StatusCode, Json<Value>)> {
    let session_id = get_session_id_from_headers(&headers)
        .map_err(registry_auth::AuthError::from)
        .into_response_error()?
        .ok_or(registry_auth::AuthError::Unauthenticated)
        .into_response_error()?
        .to_string();

    let (user, response_headers) = refresh_session(&session_id).await.into_response_error()?;

    Ok((
        response_headers,
        Json(json!({ "message": "Session refreshed", "user": user })),
    )
        .into_response())
}

/// GET /auth/me: the current user's profile.
async fn me(user: AuthUser) -> Json<Value> {
    Json(json!({ "id": user.id, "name": user.name, "email": user.email }))
}

/// POST /auth/logout: invalidate the session. Succeeds with or without one.
async fn logout(headers: HeaderMap) -> Result<Response, (StatusCode, Json<Value>)> {
    let presented = get_session_id_from_headers(&headers)
        .ok()
        .flatten()
        .map(str::to_string);

    let response_headers = prepare_logout(presented.as_deref())
        .await
        .into_response_error()?;

    Ok((response_headers, Json(json!({ "message": "Logged out" }))).into_response())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(email: &str, password: &str) -> LoginRequest {
        LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
            _remember: false,
        }
    }

    #[test]
    fn test_valid_body_passes_validation() {
        assert!(validate_login(&request("test@example.com", "password")).is_empty());
    }

    #[test]
    fn test_missing_fields_are_reported_together() {
        let errors = validate_login(&request("", ""));
        assert_eq!(errors.len(), 2);
        assert!(errors.iter().any(|(f, _)| *f == "email"));
        assert!(errors.iter().any(|(f, _)| *f == "password"));
    }

    #[test]
    fn test_email_without_at_sign_is_invalid() {
        let errors = validate_login(&request("not-an-email", "password"));
        assert_eq!(errors, vec![("email", "The email must be a valid email address.")]);
    }

    #[test]
    fn test_remember_flag_is_accepted() {
        let body: LoginRequest = serde_json::from_value(json!({
            "email": "test@example.com",
            "password": "password",
            "remember": true
        }))
        .unwrap();
        assert!(body._remember);
        assert!(validate_login(&body).is_empty());
    }
}
