use serde::{Deserialize, Serialize};

/// The signed-in user's profile as served by the `me` endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionUser {
    pub id: String,
    pub name: String,
    pub email: String,
}
