//! Session-flow operations: login, refresh, me, logout.

use http::header::HeaderMap;

use crate::credentials::{UserStore, verify_password};
use crate::session::{
    SessionUser, append_csrf_cookie, create_session, delete_session_by_id, expire_session_cookie,
    get_user_from_session,
};

use super::errors::AuthError;
use super::throttle::check_login_throttle;

/// Check credentials and establish a session.
///
/// On success the previously presented session id (if any) is
/// invalidated and a fresh one is issued, so a fixated pre-login
/// session id never survives authentication. The returned headers
/// carry the new session cookie and a rotated anti-forgery cookie.
pub async fn login_with_password(
    email: &str,
    password: &str,
    client_addr: &str,
    presented_session_id: Option<&str>,
) -> Result<(SessionUser, HeaderMap), AuthError> {
    check_login_throttle(client_addr).await?;

    let user = UserStore::get_user_by_email(email)
        .await?
        .ok_or_else(|| AuthError::InvalidCredentials.log())?;

    if !verify_password(password, &user.password_hash) {
        return Err(AuthError::InvalidCredentials.log());
    }

    if let Some(session_id) = presented_session_id {
        delete_session_by_id(session_id).await?;
    }

    let mut headers = create_session(&user.id).await?;
    append_csrf_cookie(&mut headers)?;

    tracing::info!("User {} logged in", user.id);
    Ok((SessionUser::from(user), headers))
}

/// Return the user bound to the current session.
pub async fn current_user(session_id: &str) -> Result<SessionUser, AuthError> {
    Ok(get_user_from_session(session_id).await?)
}

/// Re-validate and extend an existing session.
///
/// A valid session id is swapped for a fresh one (same anti-fixation
/// transition as login); anything else is `Unauthenticated`.
pub async fn refresh_session(session_id: &str) -> Result<(SessionUser, HeaderMap), AuthError> {
    let user = get_user_from_session(session_id).await?;

    delete_session_by_id(session_id).await?;
    let headers = create_session(&user.id).await?;

    tracing::debug!("Session refreshed for user {}", user.id);
    Ok((user, headers))
}

/// Invalidate the presented session, if any, and build the logout
/// response headers: an expired session cookie plus a fresh
/// anti-forgery cookie for future requests.
///
/// Succeeds unconditionally; logging out without a session is a no-op,
/// not an error, so repeated logouts are idempotent.
pub async fn prepare_logout(presented_session_id: Option<&str>) -> Result<HeaderMap, AuthError> {
    if let Some(session_id) = presented_session_id {
        delete_session_by_id(session_id).await?;
    }

    let mut headers = HeaderMap::new();
    expire_session_cookie(&mut headers)?;
    append_csrf_cookie(&mut headers)?;
    Ok(headers)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credentials::{User, hash_password};
    use http::header::SET_COOKIE;

    async fn seed_user(id: &str, email: &str, password: &str) -> User {
        crate::credentials::init().await.expect("init user store");
        let user = User::new(
            id.to_string(),
            "Test User".to_string(),
            email.to_string(),
            hash_password(password).expect("hash"),
        );
        UserStore::upsert_user(user).await.expect("seed user")
    }

    fn session_id_from(headers: &HeaderMap) -> String {
        headers
            .get_all(SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .find(|c| c.starts_with(crate::session::SESSION_COOKIE_NAME.as_str()))
            .and_then(|c| c.split(';').next())
            .and_then(|kv| kv.split('=').nth(1))
            .expect("session cookie present")
            .to_string()
    }

    #[tokio::test]
    #[serial_test::serial]
    async fn test_login_with_valid_credentials() {
        seed_user("login-u1", "login-u1@example.com", "password").await;

        let (user, headers) =
            login_with_password("login-u1@example.com", "password", "127.0.0.1", None)
                .await
                .expect("login");

        assert_eq!(user.email, "login-u1@example.com");
        assert_eq!(user.name, "Test User");

        // Both the session cookie and a rotated XSRF cookie are set
        let cookies: Vec<_> = headers
            .get_all(SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .collect();
        assert!(cookies.iter().any(|c| c.starts_with("registry_session=")));
        assert!(cookies.iter().any(|c| c.starts_with("XSRF-TOKEN=")));

        // And the session resolves back to the user
        let session_id = session_id_from(&headers);
        let resolved = current_user(&session_id).await.expect("me");
        assert_eq!(resolved.id, user.id);
    }

    #[tokio::test]
    #[serial_test::serial]
    async fn test_login_with_wrong_password() {
        seed_user("login-u2", "login-u2@example.com", "password").await;

        let result = login_with_password("login-u2@example.com", "wrong", "127.0.0.2", None).await;
        assert!(matches!(result, Err(AuthError::InvalidCredentials)));
    }

    #[tokio::test]
    #[serial_test::serial]
    async fn test_login_with_unknown_email_is_same_error() {
        crate::credentials::init().await.expect("init user store");
        let result =
            login_with_password("nobody@example.com", "password", "127.0.0.3", None).await;
        assert!(matches!(result, Err(AuthError::InvalidCredentials)));
    }

    #[tokio::test]
    #[serial_test::serial]
    async fn test_login_regenerates_presented_session() {
        seed_user("login-u3", "login-u3@example.com", "password").await;

        let (_, first_headers) =
            login_with_password("login-u3@example.com", "password", "127.0.0.4", None)
                .await
                .expect("first login");
        let old_session_id = session_id_from(&first_headers);

        let (_, second_headers) = login_with_password(
            "login-u3@example.com",
            "password",
            "127.0.0.4",
            Some(&old_session_id),
        )
        .await
        .expect("second login");
        let new_session_id = session_id_from(&second_headers);

        assert_ne!(old_session_id, new_session_id);
        // The fixated id no longer resolves
        assert!(current_user(&old_session_id).await.is_err());
        assert!(current_user(&new_session_id).await.is_ok());
    }

    #[tokio::test]
    #[serial_test::serial]
    async fn test_refresh_swaps_session_id() {
        seed_user("login-u4", "login-u4@example.com", "password").await;

        let (_, headers) =
            login_with_password("login-u4@example.com", "password", "127.0.0.5", None)
                .await
                .expect("login");
        let session_id = session_id_from(&headers);

        let (user, refresh_headers) = refresh_session(&session_id).await.expect("refresh");
        assert_eq!(user.email, "login-u4@example.com");

        let new_session_id = session_id_from(&refresh_headers);
        assert_ne!(session_id, new_session_id);
        assert!(current_user(&session_id).await.is_err());
        assert!(current_user(&new_session_id).await.is_ok());
    }

    #[tokio::test]
    #[serial_test::serial]
    async fn test_refresh_without_session_is_unauthenticated() {
        let result = refresh_session("no-such-session").await;
        assert!(matches!(result, Err(AuthError::Unauthenticated)));
    }

    #[tokio::test]
    #[serial_test::serial]
    async fn test_logout_invalidates_session() {
        seed_user("login-u5", "login-u5@example.com", "password").await;

        let (_, headers) =
            login_with_password("login-u5@example.com", "password", "127.0.0.6", None)
                .await
                .expect("login");
        let session_id = session_id_from(&headers);

        let logout_headers = prepare_logout(Some(&session_id)).await.expect("logout");
        assert!(current_user(&session_id).await.is_err());

        // Expired session cookie and fresh XSRF cookie on the way out
        let cookies: Vec<_> = logout_headers
            .get_all(SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .collect();
        assert!(
            cookies
                .iter()
                .any(|c| c.starts_with("registry_session=") && c.contains("Max-Age=-86400"))
        );
        assert!(cookies.iter().any(|c| c.starts_with("XSRF-TOKEN=")));
    }

    #[tokio::test]
    #[serial_test::serial]
    async fn test_logout_twice_succeeds_both_times() {
        seed_user("login-u6", "login-u6@example.com", "password").await;

        let (_, headers) =
            login_with_password("login-u6@example.com", "password", "127.0.0.7", None)
                .await
                .expect("login");
        let session_id = session_id_from(&headers);

        assert!(prepare_logout(Some(&session_id)).await.is_ok());
        assert!(prepare_logout(Some(&session_id)).await.is_ok());
        assert!(prepare_logout(None).await.is_ok());
    }

    #[tokio::test]
    #[serial_test::serial]
    async fn test_throttled_login_is_rejected_regardless_of_credentials() {
        seed_user("login-u7", "login-u7@example.com", "password").await;

        // Exhaust the window with bad attempts, then a correct one
        for _ in 0..10 {
            let _ = login_with_password("login-u7@example.com", "wrong", "10.9.9.9", None).await;
        }
        let result = login_with_password("login-u7@example.com", "password", "10.9.9.9", None).await;
        assert!(matches!(result, Err(AuthError::Throttled)));
    }
}
