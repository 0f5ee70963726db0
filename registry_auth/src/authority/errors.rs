//! The closed error enumeration exposed by the authority operations.
//!
//! Server payloads and statuses are derived from these variants at the
//! HTTP boundary; nothing downstream inspects raw failure shapes.

use thiserror::Error;

use crate::credentials::UserError;
use crate::session::SessionError;
use crate::utils::UtilError;

#[derive(Debug, Error)]
pub enum AuthError {
    /// Wrong email/password or unrecognized bearer token. Deliberately
    /// does not distinguish "no such user" from "wrong password".
    #[error("Credenciais inválidas. Tente novamente.")]
    InvalidCredentials,

    /// Valid request shape but no active session or token
    #[error("Not authenticated")]
    Unauthenticated,

    /// Header/cookie anti-forgery pair missing or mismatched
    #[error("CSRF token mismatch")]
    CsrfMismatch,

    /// Too many login attempts from this address in the window
    #[error("Too many login attempts. Please try again later.")]
    Throttled,

    /// Error from session operations
    #[error("Session error: {0}")]
    SessionError(SessionError),

    /// Error from the user database operations
    #[error("User error: {0}")]
    UserError(UserError),

    /// Error from utils operations
    #[error("Utils error: {0}")]
    UtilsError(UtilError),
}

impl AuthError {
    /// Log the error and return self, allowing method chaining at the
    /// point where an operation gives up.
    pub fn log(self) -> Self {
        match &self {
            Self::InvalidCredentials => tracing::debug!("Invalid credentials"),
            Self::Unauthenticated => tracing::debug!("Not authenticated"),
            Self::CsrfMismatch => tracing::warn!("CSRF token mismatch"),
            Self::Throttled => tracing::warn!("Login attempts throttled"),
            Self::SessionError(err) => tracing::error!("Session error: {}", err),
            Self::UserError(err) => tracing::error!("User error: {}", err),
            Self::UtilsError(err) => tracing::error!("Utils error: {}", err),
        }
        self
    }
}

// Session failures fold into the closed enumeration: an absent or
// expired session is Unauthenticated, a CSRF failure is CsrfMismatch,
// everything else stays wrapped.
impl From<SessionError> for AuthError {
    fn from(err: SessionError) -> Self {
        let error = match err {
            SessionError::SessionError | SessionError::SessionExpired => Self::Unauthenticated,
            SessionError::CsrfToken(_) => Self::CsrfMismatch,
            other => Self::SessionError(other),
        };
        tracing::debug!("{}", error);
        error
    }
}

impl From<UserError> for AuthError {
    fn from(err: UserError) -> Self {
        let error = Self::UserError(err);
        tracing::error!("{}", error);
        error
    }
}

impl From<UtilError> for AuthError {
    fn from(err: UtilError) -> Self {
        let error = Self::UtilsError(err);
        tracing::error!("{}", error);
        error
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_is_sync_and_send() {
        fn assert_sync_send<T: Sync + Send>() {}
        assert_sync_send::<AuthError>();
    }

    #[test]
    fn test_session_error_folds_to_unauthenticated() {
        let err: AuthError = SessionError::SessionError.into();
        assert!(matches!(err, AuthError::Unauthenticated));

        let err: AuthError = SessionError::SessionExpired.into();
        assert!(matches!(err, AuthError::Unauthenticated));
    }

    #[test]
    fn test_csrf_error_folds_to_csrf_mismatch() {
        let err: AuthError = SessionError::CsrfToken("mismatch".to_string()).into();
        assert!(matches!(err, AuthError::CsrfMismatch));
    }

    #[test]
    fn test_storage_error_stays_wrapped() {
        let err: AuthError = SessionError::Storage("down".to_string()).into();
        assert!(matches!(err, AuthError::SessionError(_)));
    }

    #[test]
    fn test_invalid_credentials_message_is_generic() {
        // One message for both unknown user and wrong password
        assert_eq!(
            AuthError::InvalidCredentials.to_string(),
            "Credenciais inválidas. Tente novamente."
        );
    }

    #[test]
    fn test_log_returns_self() {
        let err = AuthError::Throttled.log();
        assert!(matches!(err, AuthError::Throttled));
    }
}
