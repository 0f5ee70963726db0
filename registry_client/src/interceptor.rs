//! Catch-and-retry-once on expired sessions.
//!
//! Every outgoing request passes through here. A 401 on anything but
//! the refresh endpoint triggers one POST to the refresh endpoint; if
//! that succeeds the original request is re-issued exactly once and its
//! outcome handed to the caller. If the refresh fails, the refresh
//! failure is what propagates, not the original 401.

use std::sync::Arc;

use http::StatusCode;

use crate::errors::ApiError;
use crate::transport::{ApiRequest, ApiResponse, HttpTransport};

pub(crate) const REFRESH_PATH: &str = "/auth/refresh";

/// What to do with a response, computed once. Never nested, never
/// recomputed for the retried request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    /// Hand the response to the caller unchanged
    Forward,
    /// 401 off the refresh endpoint: refresh, then retry once
    RefreshThenRetry,
    /// 401 on the refresh endpoint itself: give up immediately
    Fail,
}

impl RetryDecision {
    pub fn for_response(status: StatusCode, path: &str) -> Self {
        if status != StatusCode::UNAUTHORIZED {
            RetryDecision::Forward
        } else if path == REFRESH_PATH {
            RetryDecision::Fail
        } else {
            RetryDecision::RefreshThenRetry
        }
    }
}

pub struct RefreshInterceptor {
    transport: Arc<dyn HttpTransport>,
}

impl RefreshInterceptor {
    pub fn new(transport: Arc<dyn HttpTransport>) -> Self {
        Self { transport }
    }

    /// Execute a request with at most one refresh-and-retry cycle.
    ///
    /// Status failures on the returned response are not converted here;
    /// callers normalize via [`ApiResponse::into_result`]. `Err` means
    /// transport failure, a dead session that refresh could not revive,
    /// or a failed refresh.
    pub async fn execute(&self, request: &ApiRequest) -> Result<ApiResponse, ApiError> {
        let response = self.transport.execute(request).await?;

        match RetryDecision::for_response(response.status, &request.path) {
            RetryDecision::Forward => Ok(response),
            RetryDecision::Fail => {
                tracing::debug!("Refresh endpoint itself returned 401; not retrying");
                Err(ApiError::from_response(response.status, &response.body))
            }
            RetryDecision::RefreshThenRetry => {
                tracing::debug!(
                    "{} {} returned 401; attempting session refresh",
                    request.method,
                    request.path
                );
                let refresh = ApiRequest::post(REFRESH_PATH, None);
                let refresh_response = self.transport.execute(&refresh).await?;

                if refresh_response.is_success() {
                    self.transport.execute(request).await
                } else {
                    Err(ApiError::from_response(
                        refresh_response.status,
                        &refresh_response.body,
                    ))
                }
            }
        }
    }
}
