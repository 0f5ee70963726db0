//! Per-address login throttling.
//!
//! Fixed rolling window: N attempts per window per client address,
//! counted in the cache store. Exceeding the limit yields `Throttled`
//! regardless of credential validity. Counter updates are last-write-
//! wins under contention, which is acceptable at this scale.

use std::sync::LazyLock;

use crate::storage::GENERIC_CACHE_STORE;

use super::errors::AuthError;

const THROTTLE_CACHE_PREFIX: &str = "throttle";

static LOGIN_THROTTLE_MAX_ATTEMPTS: LazyLock<u64> = LazyLock::new(|| {
    std::env::var("LOGIN_THROTTLE_MAX_ATTEMPTS")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(10)
});

static LOGIN_THROTTLE_WINDOW_SECS: LazyLock<u64> = LazyLock::new(|| {
    std::env::var("LOGIN_THROTTLE_WINDOW_SECS")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(60)
});

/// Count a login attempt for `client_addr` and reject once the window
/// limit is exceeded. Called before the credential check so throttling
/// is independent of credential validity.
pub(super) async fn check_login_throttle(client_addr: &str) -> Result<(), AuthError> {
    let count = GENERIC_CACHE_STORE
        .lock()
        .await
        .incr_with_ttl(
            THROTTLE_CACHE_PREFIX,
            client_addr,
            *LOGIN_THROTTLE_WINDOW_SECS as usize,
        )
        .await
        .map_err(|e| {
            AuthError::SessionError(crate::session::SessionError::Storage(e.to_string()))
        })?;

    if count > *LOGIN_THROTTLE_MAX_ATTEMPTS {
        tracing::warn!(
            "Login throttle exceeded for {}: {} attempts",
            client_addr,
            count
        );
        return Err(AuthError::Throttled);
    }

    Ok(())
}
