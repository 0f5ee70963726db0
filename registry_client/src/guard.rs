//! Navigation guard over the current-user cell.

use tokio::sync::watch;

use crate::types::SessionUser;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteDecision {
    Allow,
    /// Where to send the anonymous visitor instead
    Redirect(String),
}

/// Decides, synchronously, whether navigation to a protected route may
/// proceed. The first observed value is sufficient; the guard never
/// waits for the state to settle.
pub struct RouteGuard {
    receiver: watch::Receiver<Option<SessionUser>>,
    login_route: String,
}

impl RouteGuard {
    pub fn new(receiver: watch::Receiver<Option<SessionUser>>, login_route: impl Into<String>) -> Self {
        Self {
            receiver,
            login_route: login_route.into(),
        }
    }

    /// Allow iff a user is present right now. A closed state source
    /// counts as signed out; the guard never fails open.
    pub fn check(&self) -> RouteDecision {
        if self.receiver.has_changed().is_err() {
            tracing::warn!("Auth state source is gone; treating as signed out");
            return RouteDecision::Redirect(self.login_route.clone());
        }

        match *self.receiver.borrow() {
            Some(_) => RouteDecision::Allow,
            None => RouteDecision::Redirect(self.login_route.clone()),
        }
    }
}
