use axum::{
    RequestPartsExt,
    extract::{FromRequestParts, OptionalFromRequestParts},
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::{TypedHeader, headers};
use http::{Method, StatusCode, request::Parts};

use super::config::REGISTRY_REDIRECT_ANON;
use registry_auth::{SESSION_COOKIE_NAME, SessionUser, current_user, verify_csrf_pair};

/// Extractor rejection: browsers fetching pages get a redirect to the
/// login route, everything else gets a bare status.
pub struct AuthRedirect {
    method: Method,
    status: StatusCode,
}

impl AuthRedirect {
    fn unauthorized(method: Method) -> Self {
        Self {
            method,
            status: StatusCode::UNAUTHORIZED,
        }
    }

    fn forbidden(method: Method) -> Self {
        Self {
            method,
            status: StatusCode::FORBIDDEN,
        }
    }

    fn into_response_with_method(self) -> Response {
        if self.method == Method::GET && self.status == StatusCode::UNAUTHORIZED {
            tracing::debug!("Redirecting to {}", REGISTRY_REDIRECT_ANON.as_str());
            Redirect::temporary(REGISTRY_REDIRECT_ANON.as_str()).into_response()
        } else {
            (self.status, self.status.canonical_reason().unwrap_or("Error")).into_response()
        }
    }
}

impl IntoResponse for AuthRedirect {
    fn into_response(self) -> Response {
        self.into_response_with_method()
    }
}

/// Authenticated user, available as an axum extractor.
///
/// Resolves the session cookie to its user, and for state-changing
/// methods (POST, PUT, PATCH, DELETE) additionally requires the
/// anti-forgery header to match the readable anti-forgery cookie.
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub id: String,
    pub name: String,
    pub email: String,
}

impl From<SessionUser> for AuthUser {
    fn from(user: SessionUser) -> Self {
        AuthUser {
            id: user.id,
            name: user.name,
            email: user.email,
        }
    }
}

impl From<&AuthUser> for SessionUser {
    fn from(user: &AuthUser) -> Self {
        SessionUser {
            id: user.id.clone(),
            name: user.name.clone(),
            email: user.email.clone(),
        }
    }
}

fn is_state_changing(method: &Method) -> bool {
    method == Method::POST
        || method == Method::PUT
        || method == Method::PATCH
        || method == Method::DELETE
}

impl<B> FromRequestParts<B> for AuthUser
where
    B: Send + Sync,
{
    type Rejection = AuthRedirect;

    async fn from_request_parts(parts: &mut Parts, _: &B) -> Result<Self, Self::Rejection> {
        let method = parts.method.clone();

        if is_state_changing(&method) {
            verify_csrf_pair(&parts.headers).map_err(|e| {
                tracing::warn!("CSRF verification failed: {}", e);
                AuthRedirect::forbidden(method.clone())
            })?;
        }

        let cookies: TypedHeader<headers::Cookie> = parts.extract().await.map_err(|_| {
            tracing::debug!("Failed to extract cookies");
            AuthRedirect::unauthorized(method.clone())
        })?;

        let session_cookie = cookies.get(SESSION_COOKIE_NAME.as_str()).ok_or_else(|| {
            tracing::debug!("No session cookie {}", SESSION_COOKIE_NAME.as_str());
            AuthRedirect::unauthorized(method.clone())
        })?;

        let user = current_user(session_cookie).await.map_err(|e| {
            tracing::debug!("Session did not resolve: {}", e);
            AuthRedirect::unauthorized(method.clone())
        })?;

        Ok(AuthUser::from(user))
    }
}

impl<B> OptionalFromRequestParts<B> for AuthUser
where
    B: Send + Sync,
{
    type Rejection = AuthRedirect;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &B,
    ) -> Result<Option<Self>, Self::Rejection> {
        let result: Result<Self, Self::Rejection> =
            <AuthUser as FromRequestParts<B>>::from_request_parts(parts, state).await;
        Ok(result.ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_user_round_trip() {
        let session_user = SessionUser {
            id: "user123".to_string(),
            name: "Test User".to_string(),
            email: "test@example.com".to_string(),
        };

        let auth_user = AuthUser::from(session_user);
        assert_eq!(auth_user.id, "user123");
        assert_eq!(auth_user.name, "Test User");
        assert_eq!(auth_user.email, "test@example.com");

        let back = SessionUser::from(&auth_user);
        assert_eq!(back.id, "user123");
        assert_eq!(back.email, "test@example.com");
    }

    #[test]
    fn test_state_changing_methods() {
        assert!(is_state_changing(&Method::POST));
        assert!(is_state_changing(&Method::PUT));
        assert!(is_state_changing(&Method::PATCH));
        assert!(is_state_changing(&Method::DELETE));
        assert!(!is_state_changing(&Method::GET));
        assert!(!is_state_changing(&Method::HEAD));
        assert!(!is_state_changing(&Method::OPTIONS));
    }

    #[test]
    fn test_unauthorized_get_redirects() {
        let response = AuthRedirect::unauthorized(Method::GET).into_response_with_method();
        assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    }

    #[test]
    fn test_unauthorized_post_is_401() {
        let response = AuthRedirect::unauthorized(Method::POST).into_response_with_method();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_forbidden_is_403_even_for_get() {
        let response = AuthRedirect::forbidden(Method::GET).into_response_with_method();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    fn request_parts(method: Method, cookie: &str, xsrf_header: Option<&str>) -> Parts {
        let mut builder = http::Request::builder()
            .method(method)
            .uri("/clinics")
            .header(http::header::COOKIE, cookie);
        if let Some(token) = xsrf_header {
            builder = builder.header(registry_auth::XSRF_HEADER_NAME, token);
        }
        builder.body(()).unwrap().into_parts().0
    }

    async fn extract(parts: &mut Parts) -> Result<AuthUser, AuthRedirect> {
        <AuthUser as FromRequestParts<()>>::from_request_parts(parts, &()).await
    }

    #[tokio::test]
    async fn test_state_changing_extraction_rejects_mismatched_csrf() {
        let mut parts = request_parts(Method::POST, "XSRF-TOKEN=tok123", Some("other"));
        let rejection = extract(&mut parts).await.err().unwrap();
        assert_eq!(
            rejection.into_response_with_method().status(),
            StatusCode::FORBIDDEN
        );
    }

    #[tokio::test]
    async fn test_state_changing_extraction_rejects_missing_csrf_header() {
        let mut parts = request_parts(Method::DELETE, "XSRF-TOKEN=tok123", None);
        let rejection = extract(&mut parts).await.err().unwrap();
        assert_eq!(
            rejection.into_response_with_method().status(),
            StatusCode::FORBIDDEN
        );
    }

    #[tokio::test]
    async fn test_matching_csrf_without_session_is_unauthorized() {
        let mut parts = request_parts(Method::POST, "XSRF-TOKEN=tok123", Some("tok123"));
        let rejection = extract(&mut parts).await.err().unwrap();
        assert_eq!(
            rejection.into_response_with_method().status(),
            StatusCode::UNAUTHORIZED
        );
    }

    #[tokio::test]
    #[serial_test::serial]
    async fn test_state_changing_extraction_resolves_logged_in_user() {
        use registry_auth::{UserStore, hash_password, login_with_password};

        registry_auth::init().await.expect("init stores");
        let user = registry_auth::User::new(
            "extractor-u1".to_string(),
            "Test User".to_string(),
            "extractor-u1@example.com".to_string(),
            hash_password("password").expect("hash"),
        );
        UserStore::upsert_user(user).await.expect("seed user");

        let (_, headers) =
            login_with_password("extractor-u1@example.com", "password", "10.7.7.7", None)
                .await
                .expect("login");
        let session_id = headers
            .get_all(http::header::SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .find(|c| c.starts_with(SESSION_COOKIE_NAME.as_str()))
            .and_then(|c| c.split(';').next())
            .and_then(|kv| kv.split('=').nth(1))
            .expect("session cookie present")
            .to_string();

        let cookie = format!(
            "{}={session_id}; XSRF-TOKEN=tok123",
            SESSION_COOKIE_NAME.as_str()
        );
        let mut parts = request_parts(Method::POST, &cookie, Some("tok123"));

        let user = extract(&mut parts)
            .await
            .map_err(|r| r.into_response_with_method().status())
            .expect("extract user");
        assert_eq!(user.email, "extractor-u1@example.com");
    }
}
