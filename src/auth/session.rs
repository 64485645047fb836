//! Observable sign-in state over an [`AuthProvider`].

use crate::baas::{AuthProvider, Session, User};
use parking_lot::Mutex;
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::watch;

/// What a view needs to know about authentication.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AuthSnapshot {
    pub user: Option<User>,
    pub is_loading: bool,
}

/// Coarse state derived from a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthState {
    Loading,
    SignedIn,
    SignedOut,
}

impl AuthSnapshot {
    pub fn loading() -> Self {
        Self {
            user: None,
            is_loading: true,
        }
    }

    pub fn signed_in(user: User) -> Self {
        Self {
            user: Some(user),
            is_loading: false,
        }
    }

    pub fn signed_out() -> Self {
        Self::default()
    }

    pub fn state(&self) -> AuthState {
        if self.is_loading {
            AuthState::Loading
        } else if self.user.is_some() {
            AuthState::SignedIn
        } else {
            AuthState::SignedOut
        }
    }

    pub fn user_id(&self) -> Option<&str> {
        self.user.as_ref().map(|u| u.id.as_str())
    }
}

/// A single client's session.
///
/// Every change is published as an [`AuthSnapshot`] on a watch channel;
/// `subscribe()` is the session-change notification.
pub struct SessionHandle {
    provider: Arc<dyn AuthProvider>,
    token: Mutex<Option<String>>,
    tx: watch::Sender<AuthSnapshot>,
}

impl SessionHandle {
    pub fn new(provider: Arc<dyn AuthProvider>) -> Self {
        let (tx, _rx) = watch::channel(AuthSnapshot::signed_out());
        Self {
            provider,
            token: Mutex::new(None),
            tx,
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<AuthSnapshot> {
        self.tx.subscribe()
    }

    pub fn current(&self) -> AuthSnapshot {
        self.tx.borrow().clone()
    }

    pub fn access_token(&self) -> Option<String> {
        self.token.lock().clone()
    }

    fn publish(&self, snapshot: AuthSnapshot) {
        self.tx.send_replace(snapshot);
    }

    /// Sign in with email and password.
    pub async fn login(&self, email: &str, password: &str) -> anyhow::Result<Session> {
        self.publish(AuthSnapshot::loading());

        match self.provider.sign_in(email, password).await {
            Ok(session) => {
                *self.token.lock() = Some(session.access_token.clone());
                tracing::info!(user_id = %session.user.id, "Signed in");
                self.publish(AuthSnapshot::signed_in(session.user.clone()));
                Ok(session)
            }
            Err(e) => {
                *self.token.lock() = None;
                self.publish(AuthSnapshot::signed_out());
                Err(e)
            }
        }
    }

    /// Resume a session from a stored token.
    ///
    /// Returns `false` (and stays signed out) when the token is no longer valid.
    pub async fn restore(&self, access_token: &str) -> anyhow::Result<bool> {
        self.publish(AuthSnapshot::loading());

        match self.provider.user_for_token(access_token).await {
            Ok(Some(user)) => {
                *self.token.lock() = Some(access_token.to_string());
                self.publish(AuthSnapshot::signed_in(user));
                Ok(true)
            }
            Ok(None) => {
                *self.token.lock() = None;
                self.publish(AuthSnapshot::signed_out());
                Ok(false)
            }
            Err(e) => {
                self.publish(AuthSnapshot::signed_out());
                Err(e)
            }
        }
    }

    /// Sign out. The local state is cleared even if revoking the token fails.
    pub async fn logout(&self) -> anyhow::Result<()> {
        let token = self.token.lock().take();
        self.publish(AuthSnapshot::signed_out());

        if let Some(token) = token {
            self.provider.sign_out(&token).await?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::baas::testing::FakeAuth;

    fn handle() -> (Arc<FakeAuth>, SessionHandle) {
        let auth = Arc::new(FakeAuth::new("a@b.in", "pw", "u1"));
        let handle = SessionHandle::new(auth.clone());
        (auth, handle)
    }

    #[test]
    fn snapshot_states() {
        assert_eq!(AuthSnapshot::loading().state(), AuthState::Loading);
        assert_eq!(AuthSnapshot::signed_out().state(), AuthState::SignedOut);
        let user = User {
            id: "u1".into(),
            email: None,
        };
        let snap = AuthSnapshot::signed_in(user);
        assert_eq!(snap.state(), AuthState::SignedIn);
        assert_eq!(snap.user_id(), Some("u1"));
    }

    #[tokio::test]
    async fn login_publishes_signed_in() {
        let (_auth, handle) = handle();
        let mut rx = handle.subscribe();
        assert_eq!(handle.current().state(), AuthState::SignedOut);

        handle.login("a@b.in", "pw").await.unwrap();

        assert!(rx.has_changed().unwrap());
        let snap = rx.borrow_and_update().clone();
        assert_eq!(snap.state(), AuthState::SignedIn);
        assert_eq!(snap.user_id(), Some("u1"));
        assert_eq!(handle.access_token().as_deref(), Some("token-u1"));
    }

    #[tokio::test]
    async fn failed_login_stays_signed_out() {
        let (_auth, handle) = handle();
        assert!(handle.login("a@b.in", "wrong").await.is_err());
        assert_eq!(handle.current().state(), AuthState::SignedOut);
        assert!(handle.access_token().is_none());
    }

    #[tokio::test]
    async fn logout_revokes_token() {
        let (auth, handle) = handle();
        handle.login("a@b.in", "pw").await.unwrap();
        handle.logout().await.unwrap();

        assert_eq!(handle.current().state(), AuthState::SignedOut);
        assert_eq!(auth.signed_out.lock().as_slice(), ["token-u1".to_string()]);
        assert!(!handle.restore("token-u1").await.unwrap());
    }

    #[tokio::test]
    async fn restore_accepts_valid_token() {
        let (_auth, handle) = handle();
        assert!(handle.restore("token-u1").await.unwrap());
        assert_eq!(handle.current().user_id(), Some("u1"));
        assert!(!handle.restore("bogus").await.unwrap());
        assert_eq!(handle.current().state(), AuthState::SignedOut);
    }
}
