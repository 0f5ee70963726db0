//! Bearer-token flow for non-browser API consumers.
//!
//! Tokens are 40 bytes of entropy presented as 80 hex characters. Only
//! the SHA-256 of the token is stored, so a database leak does not leak
//! usable credentials. One token per user; issuing a new one revokes
//! the previous.

use sha2::{Digest, Sha256};

use crate::credentials::{UserStore, verify_password};
use crate::session::SessionUser;
use crate::utils::{gen_random_hex, hex_encode};

use super::errors::AuthError;
use super::throttle::check_login_throttle;

/// Result of a successful token login: the raw token (shown exactly
/// once) and the user it belongs to.
#[derive(Debug)]
pub struct BearerLogin {
    pub token: String,
    pub user: SessionUser,
}

fn hash_token(token: &str) -> String {
    hex_encode(&Sha256::digest(token.as_bytes()))
}

/// Check credentials and issue a fresh bearer token.
pub async fn token_login(
    email: &str,
    password: &str,
    client_addr: &str,
) -> Result<BearerLogin, AuthError> {
    check_login_throttle(client_addr).await?;

    let user = UserStore::get_user_by_email(email)
        .await?
        .ok_or_else(|| AuthError::InvalidCredentials.log())?;

    if !verify_password(password, &user.password_hash) {
        return Err(AuthError::InvalidCredentials.log());
    }

    let token = gen_random_hex(40)?;
    UserStore::set_api_token_hash(&user.id, Some(&hash_token(&token))).await?;

    tracing::info!("Issued bearer token for user {}", user.id);
    Ok(BearerLogin {
        token,
        user: SessionUser::from(user),
    })
}

/// Resolve an `Authorization` header value to its user.
///
/// Lookup is by token hash, so the comparison happens inside the
/// database on a fixed-length digest rather than on the raw token.
pub async fn authenticate_bearer(auth_header: Option<&str>) -> Result<SessionUser, AuthError> {
    let token = auth_header
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or(AuthError::Unauthenticated)?;

    let user = UserStore::get_user_by_token_hash(&hash_token(token))
        .await?
        .ok_or(AuthError::Unauthenticated)?;

    Ok(SessionUser::from(user))
}

/// Revoke the user's bearer token. Idempotent.
pub async fn token_logout(user_id: &str) -> Result<(), AuthError> {
    UserStore::set_api_token_hash(user_id, None).await?;
    tracing::info!("Revoked bearer token for user {}", user_id);
    Ok(())
}
