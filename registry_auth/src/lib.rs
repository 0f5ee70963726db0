//! registry_auth - Session and credential handling for the clinic registry
//!
//! This crate provides the server-side authentication core: the credential
//! store (password and hashed bearer-token secrets), the session authority
//! (cookie-backed sessions with anti-fixation regeneration) and the CSRF
//! guard (double-submit cookie), plus per-address login throttling.

mod authority;
mod credentials;
mod session;
mod storage;
mod utils;

pub use authority::{
    AuthError, BearerLogin, authenticate_bearer, current_user, login_with_password,
    prepare_logout, refresh_session, token_login, token_logout,
};

pub use credentials::{User, UserError, UserStore, hash_password};

pub use session::{
    SESSION_COOKIE_NAME, SessionError, SessionUser, XSRF_COOKIE_NAME, XSRF_HEADER_NAME,
    get_session_id_from_headers, get_user_from_session, prime_csrf_cookie, verify_csrf_pair,
};

pub use utils::gen_random_string;

/// Initialize the credential and session stores.
///
/// Must be called once at application startup, before any login or session
/// lookup is attempted.
pub async fn init() -> Result<(), Box<dyn std::error::Error>> {
    storage::init().await?;
    credentials::init().await?;
    Ok(())
}
