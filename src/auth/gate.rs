use super::User;
use crate::client::DataClient;
use crate::ui::{Severity, ToastStack};

/// Where unauthenticated users are sent
pub const LOGIN_PAGE: &str = "login";

/// Outcome of the page-load session check. A missing session is a
/// redirect, not an error.
#[derive(Debug, Clone, PartialEq)]
pub enum AuthGate {
    Authenticated(User),
    Redirect { to: &'static str },
}

impl AuthGate {
    pub fn user(&self) -> Option<&User> {
        match self {
            AuthGate::Authenticated(user) => Some(user),
            AuthGate::Redirect { .. } => None,
        }
    }
}

pub async fn require_login(client: &dyn DataClient) -> AuthGate {
    match client.current_user().await {
        Ok(Some(user)) => AuthGate::Authenticated(user),
        Ok(None) => AuthGate::Redirect { to: LOGIN_PAGE },
        Err(e) => {
            tracing::warn!("session check failed, redirecting to login: {}", e);
            AuthGate::Redirect { to: LOGIN_PAGE }
        }
    }
}

/// End the backend session and report the outcome as a toast. Returns
/// whether the session actually ended.
pub async fn logout(client: &dyn DataClient, toasts: &mut ToastStack) -> bool {
    match client.sign_out().await {
        Ok(()) => {
            toasts.show("Signed out", Severity::Info);
            true
        }
        Err(e) => {
            tracing::warn!("backend sign-out failed: {}", e);
            toasts.show(format!("Logout failed: {}", e), Severity::Error);
            false
        }
    }
}
