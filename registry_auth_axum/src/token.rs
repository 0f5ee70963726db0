//! Bearer-token endpoints for non-browser API consumers.

use std::net::SocketAddr;

use axum::{
    Json, Router,
    extract::ConnectInfo,
    http::{HeaderMap, StatusCode, header::AUTHORIZATION},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde_json::{Value, json};

use super::auth::{LoginRequest, validate_login};
use super::error::{IntoResponseError, validation_failed};
use registry_auth::{authenticate_bearer, token_login, token_logout};

pub(super) fn router() -> Router {
    Router::new()
        .route("/login", post(login))
        .route("/user", get(user))
        .route("/logout", post(logout))
}

fn bearer_header(headers: &HeaderMap) -> Option<&str> {
    headers.get(AUTHORIZATION).and_then(|h| h.to_str().ok())
}

/// POST /login: credential check, returns the raw token exactly once.
async fn login(
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    Json(body): Json<LoginRequest>,
) -> Result<Response, (StatusCode, Json<Value>)> {
    let errors = validate_login(&body);
    if !errors.is_empty() {
        return Err(validation_failed(errors));
    }

    let login = token_login(&body.email, &body.password, &addr.ip().to_string())
        .await
        .into_response_error()?;

    Ok(Json(json!({ "token": login.token, "user": login.user })).into_response())
}

/// GET /user: resolve the bearer token to its profile.
async fn user(headers: HeaderMap) -> Result<Response, (StatusCode, Json<Value>)> {
    let user = authenticate_bearer(bearer_header(&headers))
        .await
        .into_response_error()?;

    Ok(Json(json!({ "id": user.id, "name": user.name, "email": user.email })).into_response())
}

/// POST /logout: revoke the presented bearer token.
async fn logout(headers: HeaderMap) -> Result<Response, (StatusCode, Json<Value>)> {
    let user = authenticate_bearer(bearer_header(&headers))
        .await
        .into_response_error()?;
    token_logout(&user.id).await.into_response_error()?;

    Ok(Json(json!({ "message": "Logged out" })).into_response())
}
