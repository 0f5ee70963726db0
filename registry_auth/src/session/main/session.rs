use chrono::{Duration, Utc};
use http::header::{COOKIE, HeaderMap};

use crate::session::config::{SESSION_COOKIE_MAX_AGE, SESSION_COOKIE_NAME};
use crate::session::errors::SessionError;
use crate::session::types::{SessionUser, StoredSession};
use crate::utils::{gen_random_string, header_set_cookie};

use crate::credentials::UserStore;
use crate::storage::GENERIC_CACHE_STORE;

const SESSION_CACHE_PREFIX: &str = "session";

/// Create a fresh session bound to `user_id` and return the headers
/// carrying the new session cookie.
///
/// Callers regenerate on every successful authentication: delete the
/// previously presented session id first, then call this. From the
/// caller's perspective the swap is a single transition.
pub(crate) async fn create_session(user_id: &str) -> Result<HeaderMap, SessionError> {
    let session_id = gen_random_string(32)?;
    let ttl = *SESSION_COOKIE_MAX_AGE;
    let expires_at = Utc::now() + Duration::seconds(ttl as i64);

    let stored_session = StoredSession {
        user_id: user_id.to_string(),
        expires_at,
        ttl,
    };

    GENERIC_CACHE_STORE
        .lock()
        .await
        .put_with_ttl(
            SESSION_CACHE_PREFIX,
            &session_id,
            stored_session.into(),
            ttl as usize,
        )
        .await
        .map_err(|e| SessionError::Storage(e.to_string()))?;

    let mut headers = HeaderMap::new();
    header_set_cookie(
        &mut headers,
        SESSION_COOKIE_NAME.as_str(),
        &session_id,
        Some(ttl as i64),
        true,
    )?;

    tracing::debug!("Created session for user {}", user_id);
    Ok(headers)
}

pub(crate) async fn delete_session_by_id(session_id: &str) -> Result<(), SessionError> {
    GENERIC_CACHE_STORE
        .lock()
        .await
        .remove(SESSION_CACHE_PREFIX, session_id)
        .await
        .map_err(|e| SessionError::Storage(e.to_string()))?;
    Ok(())
}

/// Expire the session cookie on the response, regardless of whether a
/// session existed.
pub(crate) fn expire_session_cookie(headers: &mut HeaderMap) -> Result<(), SessionError> {
    header_set_cookie(headers, SESSION_COOKIE_NAME.as_str(), "", Some(-86400), true)?;
    Ok(())
}

/// Resolve a session id to the user bound to it.
///
/// An unknown, expired or dangling session (user since deleted) is
/// reported uniformly so callers cannot distinguish the cases.
pub async fn get_user_from_session(session_id: &str) -> Result<SessionUser, SessionError> {
    let cached_session = GENERIC_CACHE_STORE
        .lock()
        .await
        .get(SESSION_CACHE_PREFIX, session_id)
        .await
        .map_err(|e| SessionError::Storage(e.to_string()))?
        .ok_or(SessionError::SessionError)?;

    let stored_session: StoredSession = cached_session.try_into()?;

    if stored_session.expires_at < Utc::now() {
        tracing::debug!("Session expired at {}", stored_session.expires_at);
        delete_session_by_id(session_id).await?;
        return Err(SessionError::SessionExpired);
    }

    let user = UserStore::get_user(&stored_session.user_id)
        .await
        .map_err(|_| SessionError::SessionError)?
        .ok_or(SessionError::SessionError)?;

    Ok(SessionUser::from(user))
}

/// Extract the session cookie value from request headers, if present.
pub fn get_session_id_from_headers(headers: &HeaderMap) -> Result<Option<&str>, SessionError> {
    get_cookie_from_headers(headers, SESSION_COOKIE_NAME.as_str())
}

pub(crate) fn get_cookie_from_headers<'a>(
    headers: &'a HeaderMap,
    cookie_name: &str,
) -> Result<Option<&'a str>, SessionError> {
    let Some(cookie_header) = headers.get(COOKIE) else {
        tracing::trace!("No cookie header found");
        return Ok(None);
    };

    let cookie_str = cookie_header.to_str().map_err(|e| {
        tracing::error!("Invalid cookie header: {}", e);
        SessionError::HeaderError("Invalid cookie header".to_string())
    })?;

    let value = cookie_str.split(';').map(|s| s.trim()).find_map(|s| {
        let mut parts = s.splitn(2, '=');
        match (parts.next(), parts.next()) {
            (Some(k), Some(v)) if k == cookie_name => Some(v),
            _ => None,
        }
    });

    if value.is_none() {
        tracing::trace!("No cookie '{}' found in cookies", cookie_name);
    }

    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::header::HeaderValue;

    fn headers_with_cookie(cookie: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, HeaderValue::from_str(cookie).unwrap());
        headers
    }

    #[test]
    fn test_get_cookie_from_headers_present() {
        let headers = headers_with_cookie("a=1; target=value; b=2");
        let value = get_cookie_from_headers(&headers, "target").expect("parse");
        assert_eq!(value, Some("value"));
    }

    #[test]
    fn test_get_cookie_from_headers_absent() {
        let headers = headers_with_cookie("a=1; b=2");
        let value = get_cookie_from_headers(&headers, "target").expect("parse");
        assert_eq!(value, None);
    }

    #[test]
    fn test_get_cookie_from_headers_no_cookie_header() {
        let headers = HeaderMap::new();
        let value = get_cookie_from_headers(&headers, "target").expect("parse");
        assert_eq!(value, None);
    }

    #[test]
    fn test_get_cookie_name_is_exact_match() {
        // "session" must not match "session2" or "my_session"
        let headers = headers_with_cookie("session2=x; my_session=y");
        let value = get_cookie_from_headers(&headers, "session").expect("parse");
        assert_eq!(value, None);
    }

    #[test]
    fn test_expire_session_cookie_sets_negative_max_age() {
        let mut headers = HeaderMap::new();
        expire_session_cookie(&mut headers).expect("expire");
        let cookie = headers
            .get(http::header::SET_COOKIE)
            .unwrap()
            .to_str()
            .unwrap();
        assert!(cookie.contains("Max-Age=-86400"));
    }

    #[tokio::test]
    async fn test_session_roundtrip_via_store() {
        // Uses the in-memory cache store (the default when the env vars
        // are unset). The user lookup fails because no user table row
        // exists, which must surface as the generic session error.
        let headers = create_session("no-such-user").await.expect("create");
        let set_cookie = headers
            .get(http::header::SET_COOKIE)
            .unwrap()
            .to_str()
            .unwrap();
        let session_id = set_cookie
            .split(';')
            .next()
            .unwrap()
            .split('=')
            .nth(1)
            .unwrap()
            .to_string();

        let result = get_user_from_session(&session_id).await;
        assert!(matches!(
            result,
            Err(SessionError::SessionError) | Err(SessionError::Storage(_))
        ));

        delete_session_by_id(&session_id).await.expect("delete");
    }

    #[tokio::test]
    async fn test_unknown_session_id_is_rejected() {
        let result = get_user_from_session("definitely-not-a-session").await;
        assert!(matches!(result, Err(SessionError::SessionError)));
    }
}
