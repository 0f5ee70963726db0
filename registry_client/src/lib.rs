//! registry-client - Client library for the clinic registry API
//!
//! Three pieces, mirroring how the frontend consumes the backend:
//!
//! - [`AuthClient`]: owns the reactive current-user cell and the
//!   login/logout/profile calls that drive it.
//! - [`RefreshInterceptor`]: wraps every outgoing request and, on a 401,
//!   attempts exactly one session refresh followed by one retry.
//! - [`RouteGuard`]: synchronous allow/redirect decision from the
//!   current-user cell, for navigation layers.

mod auth;
mod errors;
mod guard;
mod interceptor;
mod transport;
mod types;

#[cfg(test)]
pub(crate) mod testing;

pub use auth::AuthClient;
pub use errors::{ApiError, ApiErrorKind, DEFAULT_ERROR_MESSAGE};
pub use guard::{RouteDecision, RouteGuard};
pub use interceptor::{RefreshInterceptor, RetryDecision};
pub use transport::{ApiRequest, ApiResponse, HttpTransport, ReqwestTransport};
pub use types::SessionUser;
