//! The auth client: drives the login/logout/profile endpoints and owns
//! the reactive current-user cell everything else observes.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use serde_json::json;
use tokio::sync::watch;

use crate::errors::ApiError;
use crate::interceptor::RefreshInterceptor;
use crate::transport::{ApiRequest, HttpTransport};
use crate::types::SessionUser;

/// Owns `current_user`: a single-writer watch cell holding
/// `Option<SessionUser>`, starting at `None`. Guards and UI code hold
/// receivers; only this client ever publishes.
pub struct AuthClient {
    interceptor: RefreshInterceptor,
    current_user: watch::Sender<Option<SessionUser>>,
    // Bumped on logout so a stale in-flight profile completion cannot
    // overwrite the newer signed-out state.
    epoch: AtomicU64,
}

impl AuthClient {
    pub fn new(transport: Arc<dyn HttpTransport>) -> Self {
        let (sender, _) = watch::channel(None);
        Self {
            interceptor: RefreshInterceptor::new(transport),
            current_user: sender,
            epoch: AtomicU64::new(0),
        }
    }

    /// A receiver over the current-user cell, for guards and UI.
    pub fn subscribe(&self) -> watch::Receiver<Option<SessionUser>> {
        self.current_user.subscribe()
    }

    /// The value right now. `None` means signed out (or not yet known).
    pub fn current_user(&self) -> Option<SessionUser> {
        self.current_user.borrow().clone()
    }

    fn publish(&self, epoch: u64, value: Option<SessionUser>) {
        if self.epoch.load(Ordering::SeqCst) == epoch {
            let _ = self.current_user.send(value);
        } else {
            tracing::debug!("Dropping stale auth state publish");
        }
    }

    /// Sign in: prime the anti-forgery cookie, post credentials, fetch
    /// the profile. Strictly sequential; each stage starts only after
    /// the previous one succeeded.
    ///
    /// A failure before the profile stage leaves `current_user`
    /// untouched; a profile-stage failure resets it to `None`.
    pub async fn login(&self, email: &str, password: &str) -> Result<SessionUser, ApiError> {
        let epoch = self.epoch.load(Ordering::SeqCst);

        self.interceptor
            .execute(&ApiRequest::get("/csrf-cookie"))
            .await?
            .into_result()?;

        self.interceptor
            .execute(&ApiRequest::post(
                "/auth/login",
                Some(json!({ "email": email, "password": password })),
            ))
            .await?
            .into_result()?;

        match self.profile().await {
            Ok(user) => {
                self.publish(epoch, Some(user.clone()));
                Ok(user)
            }
            Err(e) => {
                self.publish(epoch, None);
                Err(e)
            }
        }
    }

    /// Re-fetch the profile and publish the outcome: the user on
    /// success, `None` on any failure.
    pub async fn fetch_profile(&self) -> Result<SessionUser, ApiError> {
        let epoch = self.epoch.load(Ordering::SeqCst);
        match self.profile().await {
            Ok(user) => {
                self.publish(epoch, Some(user.clone()));
                Ok(user)
            }
            Err(e) => {
                self.publish(epoch, None);
                Err(e)
            }
        }
    }

    /// Startup probe. Having no session yet is a normal state, so the
    /// failure is swallowed after it has reset the cell.
    pub async fn bootstrap(&self) {
        if let Err(e) = self.fetch_profile().await {
            tracing::debug!("No session at startup: {}", e);
        }
    }

    /// Sign out. Success publishes `None`; failure leaves the cell
    /// unchanged so the UI keeps reflecting the (still live) session.
    pub async fn logout(&self) -> Result<(), ApiError> {
        self.interceptor
            .execute(&ApiRequest::post("/auth/logout", None))
            .await?
            .into_result()?;

        self.epoch.fetch_add(1, Ordering::SeqCst);
        let _ = self.current_user.send(None);
        Ok(())
    }

    async fn profile(&self) -> Result<SessionUser, ApiError> {
        self.interceptor
            .execute(&ApiRequest::get("/auth/me"))
            .await?
            .into_result()?
            .json()
    }
}
