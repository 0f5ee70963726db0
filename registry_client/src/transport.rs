//! The wire seam: a request/response pair plus the transport trait the
//! interceptor and tests plug into.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use http::{Method, StatusCode};
use reqwest::cookie::{CookieStore, Jar};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::errors::ApiError;

#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub body: Option<Value>,
}

impl ApiRequest {
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            method: Method::GET,
            path: path.into(),
            body: None,
        }
    }

    pub fn post(path: impl Into<String>, body: Option<Value>) -> Self {
        Self {
            method: Method::POST,
            path: path.into(),
            body,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: StatusCode,
    pub body: Value,
}

impl ApiResponse {
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Turn an error response into its normalized [`ApiError`];
    /// success responses pass through.
    pub fn into_result(self) -> Result<ApiResponse, ApiError> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(ApiError::from_response(self.status, &self.body))
        }
    }

    pub fn json<T: DeserializeOwned>(&self) -> Result<T, ApiError> {
        serde_json::from_value(self.body.clone())
            .map_err(|e| ApiError::network_failure(format!("Malformed response body: {e}")))
    }
}

/// Executes one request. `Err` is reserved for transport-level trouble;
/// every HTTP status, including failures, comes back as `Ok(response)`
/// so the interceptor can reason about it.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn execute(&self, request: &ApiRequest) -> Result<ApiResponse, ApiError>;
}

/// Production transport: reqwest with an in-memory cookie store (the
/// session and anti-forgery cookies ride along automatically) and a
/// bounded per-request timeout.
pub struct ReqwestTransport {
    client: reqwest::Client,
    base_url: String,
    jar: Arc<Jar>,
}

impl ReqwestTransport {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ApiError> {
        let jar = Arc::new(Jar::default());
        let client = reqwest::Client::builder()
            .cookie_provider(jar.clone())
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::network_failure(format!("Failed to build client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            jar,
        })
    }

    /// Read the anti-forgery token the server placed in the readable
    /// cookie, to echo back as the double-submit header.
    fn xsrf_cookie_value(&self, url: &reqwest::Url) -> Option<String> {
        let header = self.jar.cookies(url)?;
        let cookies = header.to_str().ok()?;
        cookies
            .split("; ")
            .find_map(|kv| kv.strip_prefix("XSRF-TOKEN="))
            .map(str::to_string)
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn execute(&self, request: &ApiRequest) -> Result<ApiResponse, ApiError> {
        let url = format!("{}{}", self.base_url, request.path);
        let url = reqwest::Url::parse(&url)
            .map_err(|e| ApiError::network_failure(format!("Invalid URL {url}: {e}")))?;
        let mut builder = self.client.request(request.method.clone(), url.clone());

        if let Some(token) = self.xsrf_cookie_value(&url) {
            builder = builder.header("X-XSRF-TOKEN", token);
        }

        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(|e| {
            if e.is_timeout() {
                ApiError::network_timeout()
            } else {
                ApiError::network_failure(e.to_string())
            }
        })?;

        let status = StatusCode::from_u16(response.status().as_u16())
            .map_err(|e| ApiError::network_failure(e.to_string()))?;

        let bytes = response
            .bytes()
            .await
            .map_err(|e| ApiError::network_failure(e.to_string()))?;
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };

        Ok(ApiResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_constructors() {
        let get = ApiRequest::get("/auth/me");
        assert_eq!(get.method, Method::GET);
        assert_eq!(get.path, "/auth/me");
        assert!(get.body.is_none());

        let post = ApiRequest::post("/auth/login", Some(json!({ "email": "a@b" })));
        assert_eq!(post.method, Method::POST);
        assert!(post.body.is_some());
    }

    #[test]
    fn test_success_response_passes_through() {
        let response = ApiResponse {
            status: StatusCode::OK,
            body: json!({ "data": "ok" }),
        };
        assert!(response.into_result().is_ok());
    }

    #[test]
    fn test_error_response_normalizes() {
        let response = ApiResponse {
            status: StatusCode::UNAUTHORIZED,
            body: json!({ "message": "Not authenticated" }),
        };
        let err = response.into_result().unwrap_err();
        assert_eq!(err.message, "Not authenticated");
    }

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        let transport =
            ReqwestTransport::new("http://localhost:8080/api/", Duration::from_secs(5))
                .expect("build");
        assert_eq!(transport.base_url, "http://localhost:8080/api");
    }
}
