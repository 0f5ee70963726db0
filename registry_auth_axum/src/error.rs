use axum::Json;
use http::StatusCode;
use serde_json::{Value, json};

use registry_auth::AuthError;

/// Helper trait for converting errors to the JSON error format the
/// API speaks: `{"message": …}` with the status derived from the variant.
pub(super) trait IntoResponseError<T> {
    fn into_response_error(self) -> Result<T, (StatusCode, Json<Value>)>;
}

impl<T> IntoResponseError<T> for Result<T, AuthError> {
    fn into_response_error(self) -> Result<T, (StatusCode, Json<Value>)> {
        self.map_err(|e| {
            let status = match e {
                AuthError::InvalidCredentials => StatusCode::UNAUTHORIZED,
                AuthError::Unauthenticated => StatusCode::UNAUTHORIZED,
                AuthError::CsrfMismatch => StatusCode::FORBIDDEN,
                AuthError::Throttled => StatusCode::TOO_MANY_REQUESTS,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            };
            // Internal detail stays in the logs, not in the body.
            let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
                tracing::error!("Internal error: {}", e);
                "Server error".to_string()
            } else {
                e.to_string()
            };
            (status, Json(json!({ "message": message })))
        })
    }
}

/// 422 body for malformed request payloads, shaped
/// `{"message": …, "errors": {field: [msg, …]}}`.
pub(super) fn validation_failed(
    errors: Vec<(&'static str, &'static str)>,
) -> (StatusCode, Json<Value>) {
    let mut map = serde_json::Map::new();
    for (field, message) in errors {
        map.entry(field.to_string())
            .or_insert_with(|| Value::Array(Vec::new()));
        if let Some(Value::Array(list)) = map.get_mut(field) {
            list.push(Value::String(message.to_string()));
        }
    }
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(json!({ "message": "The given data was invalid.", "errors": Value::Object(map) })),
    )
}
