use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A registry user identity with its stored authentication secrets.
///
/// The password hash is set at creation and on password change; the
/// bearer-token hash is set on token login and cleared on token logout.
/// Neither secret is ever serialized into responses.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct User {
    /// Database-assigned sequence number (primary key)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sequence_number: Option<i64>,
    /// Unique user identifier
    pub id: String,
    /// Display name
    pub name: String,
    /// Login identifier, unique
    pub email: String,
    /// Argon2 PHC hash of the password
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// sha256 hex of the persistent bearer token, if one is active
    #[serde(skip_serializing)]
    pub api_token_hash: Option<String>,
    /// When the user account was created
    pub created_at: DateTime<Utc>,
    /// When the user account was last updated
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a new user with a pre-hashed password
    pub fn new(id: String, name: String, email: String, password_hash: String) -> Self {
        let now = Utc::now();
        Self {
            sequence_number: None,
            id,
            name,
            email,
            password_hash,
            api_token_hash: None,
            created_at: now,
            updated_at: now,
        }
    }
}
