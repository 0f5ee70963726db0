use thiserror::Error;

#[derive(Debug, Error, Clone)]
pub enum UserError {
    /// Generic user store error
    #[error("User error: {0}")]
    UserError(String),

    /// User not found
    #[error("User not found")]
    NotFound,

    /// Password hashing failed
    #[error("Password hash error: {0}")]
    PasswordHash(String),

    /// Database operation failed
    #[error("Storage error: {0}")]
    Storage(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(
            UserError::UserError("oops".to_string()).to_string(),
            "User error: oops"
        );
        assert_eq!(UserError::NotFound.to_string(), "User not found");
        assert_eq!(
            UserError::PasswordHash("bad".to_string()).to_string(),
            "Password hash error: bad"
        );
        assert_eq!(
            UserError::Storage("db down".to_string()).to_string(),
            "Storage error: db down"
        );
    }

    #[test]
    fn test_error_is_sync_and_send() {
        fn assert_sync_send<T: Sync + Send>() {}
        assert_sync_send::<UserError>();
    }
}
