//! Double-submit CSRF guard.
//!
//! A random token is issued in a cookie that client-side code can read
//! and must echo back in the `X-XSRF-TOKEN` header on state-changing
//! requests. A request forged from another origin can make the browser
//! send the cookie but cannot read it to fill in the header.

use http::header::HeaderMap;
use subtle::ConstantTimeEq;

use crate::session::config::{XSRF_COOKIE_NAME, XSRF_HEADER_NAME};
use crate::session::errors::SessionError;
use crate::utils::{gen_random_string, header_set_cookie};

use super::session::get_cookie_from_headers;

/// Issue a fresh anti-forgery cookie. Used by the priming endpoint and
/// rotated on login and logout.
pub fn prime_csrf_cookie() -> Result<HeaderMap, SessionError> {
    let mut headers = HeaderMap::new();
    append_csrf_cookie(&mut headers)?;
    Ok(headers)
}

pub(crate) fn append_csrf_cookie(headers: &mut HeaderMap) -> Result<(), SessionError> {
    let token = gen_random_string(32)?;
    // Not HttpOnly: the client must read this cookie to echo it back.
    // No Max-Age: a browser-session cookie, discarded when the browser
    // exits rather than at a fixed point in the session's lifetime.
    header_set_cookie(headers, XSRF_COOKIE_NAME.as_str(), &token, None, false)?;
    Ok(())
}

/// Verify that the `X-XSRF-TOKEN` header matches the anti-forgery
/// cookie. Rejects before any business logic runs.
pub fn verify_csrf_pair(headers: &HeaderMap) -> Result<(), SessionError> {
    let cookie_token = get_cookie_from_headers(headers, XSRF_COOKIE_NAME.as_str())?
        .ok_or_else(|| SessionError::CsrfToken("No CSRF cookie found".to_string()))?;

    let header_token = headers
        .get(XSRF_HEADER_NAME)
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| SessionError::CsrfToken("No CSRF header found".to_string()))?;

    if header_token
        .as_bytes()
        .ct_eq(cookie_token.as_bytes())
        .into()
    {
        Ok(())
    } else {
        tracing::warn!("CSRF token mismatch between header and cookie");
        Err(SessionError::CsrfToken("CSRF token mismatch".to_string()))
    }
}
