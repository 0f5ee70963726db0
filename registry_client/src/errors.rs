use std::collections::BTreeMap;

use http::StatusCode;
use serde_json::Value;
use thiserror::Error;

/// Shown when the server supplied no usable message.
pub const DEFAULT_ERROR_MESSAGE: &str = "An unexpected error occurred, please try again.";

/// Closed enumeration of everything a call can fail with. UI code
/// dispatches on the kind and renders the message; nothing downstream
/// inspects raw response shapes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiErrorKind {
    /// 401: bad credentials, or no live session/token
    Unauthorized,
    /// 403: anti-forgery rejection
    Forbidden,
    /// 429: too many login attempts
    Throttled,
    /// 422: malformed payload, with field messages
    Validation,
    /// Any other server-originated failure status
    Server,
    /// The request exceeded the configured deadline
    NetworkTimeout,
    /// The request never completed (DNS, refused connection, ...)
    NetworkFailure,
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{message}")]
pub struct ApiError {
    pub kind: ApiErrorKind,
    pub message: String,
    /// Populated only for `Validation`
    pub field_errors: BTreeMap<String, Vec<String>>,
}

impl ApiError {
    pub(crate) fn network_timeout() -> Self {
        Self {
            kind: ApiErrorKind::NetworkTimeout,
            message: DEFAULT_ERROR_MESSAGE.to_string(),
            field_errors: BTreeMap::new(),
        }
    }

    pub(crate) fn network_failure(detail: String) -> Self {
        tracing::debug!("Network failure: {}", detail);
        Self {
            kind: ApiErrorKind::NetworkFailure,
            message: DEFAULT_ERROR_MESSAGE.to_string(),
            field_errors: BTreeMap::new(),
        }
    }

    /// Normalize a non-success response into the closed error shape.
    pub(crate) fn from_response(status: StatusCode, body: &Value) -> Self {
        let kind = match status {
            StatusCode::UNAUTHORIZED => ApiErrorKind::Unauthorized,
            StatusCode::FORBIDDEN => ApiErrorKind::Forbidden,
            StatusCode::TOO_MANY_REQUESTS => ApiErrorKind::Throttled,
            StatusCode::UNPROCESSABLE_ENTITY => ApiErrorKind::Validation,
            _ => ApiErrorKind::Server,
        };

        let message = body
            .get("message")
            .and_then(Value::as_str)
            .filter(|m| !m.is_empty())
            .unwrap_or(DEFAULT_ERROR_MESSAGE)
            .to_string();

        let mut field_errors = BTreeMap::new();
        if let Some(errors) = body.get("errors").and_then(Value::as_object) {
            for (field, messages) in errors {
                let list: Vec<String> = messages
                    .as_array()
                    .map(|a| {
                        a.iter()
                            .filter_map(Value::as_str)
                            .map(str::to_string)
                            .collect()
                    })
                    .unwrap_or_default();
                field_errors.insert(field.clone(), list);
            }
        }

        Self {
            kind,
            message,
            field_errors,
        }
    }
}
