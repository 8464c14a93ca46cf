//! Signed-in user state for the storefront and the admin guard

use std::sync::{Arc, PoisonError, RwLock};

use serde_json::Value;

use crate::auth::{Auth, AuthEvent, AuthSubscription, Session, SignUpResponse, User};
use crate::error::Result;

/// Current user, kept in step with the auth client's state changes
#[derive(Clone)]
pub struct SessionStore {
    auth: Auth,
    user: Arc<RwLock<Option<User>>>,
}

impl SessionStore {
    /// Seed the store from the auth client's current session
    pub fn new(auth: Auth) -> Self {
        let user = auth.get_session().map(|session| session.user);
        Self {
            auth,
            user: Arc::new(RwLock::new(user)),
        }
    }

    fn set_user(&self, user: Option<User>) {
        *self.user.write().unwrap_or_else(PoisonError::into_inner) = user;
    }

    pub fn current_user(&self) -> Option<User> {
        self.user
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn session(&self) -> Option<Session> {
        self.auth.get_session()
    }

    /// Admin pages require a user whose role is "admin"
    pub fn is_admin(&self) -> bool {
        self.current_user()
            .map(|user| user.is_admin())
            .unwrap_or(false)
    }

    /// Checkout requires a live session
    pub fn can_checkout(&self) -> bool {
        self.auth
            .get_session()
            .map(|session| !session.is_expired())
            .unwrap_or(false)
    }

    /// Register an account; `metadata` carries e.g. `full_name` and `role`
    pub async fn sign_up(
        &self,
        email: &str,
        password: &str,
        metadata: Option<Value>,
    ) -> Result<SignUpResponse> {
        let response = self.auth.sign_up(email, password, metadata).await?;
        if let Some(session) = response.session() {
            self.set_user(Some(session.user.clone()));
        }
        Ok(response)
    }

    pub async fn sign_in(&self, email: &str, password: &str) -> Result<User> {
        let session = self.auth.sign_in_with_password(email, password).await?;
        self.set_user(Some(session.user.clone()));
        Ok(session.user)
    }

    /// Sign out; on failure the user stays signed in
    pub async fn sign_out(&self) -> Result<()> {
        self.auth.sign_out().await?;
        self.set_user(None);
        Ok(())
    }

    /// Subscribe to auth state changes; pass the events to [`SessionStore::apply`]
    pub fn subscribe(&self) -> AuthSubscription {
        self.auth.on_auth_state_change()
    }

    /// Take the user from an auth state change
    pub fn apply(&self, event: &AuthEvent) {
        tracing::debug!(event = ?event.event, "auth state changed");
        self.set_user(event.session.as_ref().map(|session| session.user.clone()));
    }

    /// Apply every event already queued on `subscription`; returns how many
    pub fn sync(&self, subscription: &mut AuthSubscription) -> usize {
        let mut applied = 0;
        while let Some(event) = subscription.try_recv() {
            self.apply(&event);
            applied += 1;
        }
        applied
    }
}
