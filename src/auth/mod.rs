//! Authentication and session management

mod session;
mod types;

use std::sync::{Arc, PoisonError, RwLock};

use reqwest::Client;
use serde_json::json;
use tokio::sync::broadcast;

use crate::config::ClientOptions;
use crate::error::{Error, Result};
use crate::fetch::{Fetch, FetchBuilder};

pub use session::*;
pub use types::*;

const EVENT_CAPACITY: usize = 16;

/// Client for Supabase Authentication
#[derive(Clone)]
pub struct Auth {
    /// The base URL for the project
    url: String,

    /// The anonymous API key
    key: String,

    client_info: String,

    /// HTTP client used for requests
    client: Client,

    /// The current session
    session: Arc<RwLock<Option<Session>>>,

    /// Fan-out of auth state changes
    events: broadcast::Sender<AuthEvent>,
}

impl Auth {
    pub(crate) fn new(url: &str, key: &str, client: Client, options: &ClientOptions) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            url: url.to_string(),
            key: key.to_string(),
            client_info: options.client_info.clone(),
            client,
            session: Arc::new(RwLock::new(None)),
            events,
        }
    }

    fn get_auth_url(&self, path: &str) -> String {
        format!("{}/auth/v1{}", self.url, path)
    }

    fn decorate<'a>(&self, fetch: FetchBuilder<'a>) -> FetchBuilder<'a> {
        fetch
            .header("apikey", &self.key)
            .header("X-Client-Info", &self.client_info)
    }

    fn store(&self, session: Option<Session>) {
        let mut current = self.session.write().unwrap_or_else(PoisonError::into_inner);
        *current = session;
    }

    fn emit(&self, event: AuthChangeEvent) {
        let session = self.get_session();
        // Err only means nobody is subscribed.
        let _ = self.events.send(AuthEvent { event, session });
    }

    /// Sign up a new user; `data` becomes the user metadata (e.g. role, full name)
    pub async fn sign_up(
        &self,
        email: &str,
        password: &str,
        data: Option<serde_json::Value>,
    ) -> Result<SignUpResponse> {
        let url = self.get_auth_url("/signup");

        let mut body = json!({
            "email": email,
            "password": password,
        });
        if let Some(data) = data {
            body["data"] = data;
        }

        let response = self
            .decorate(Fetch::post(&self.client, &url))
            .json(&body)?
            .execute::<SignUpResponse>()
            .await
            .map_err(into_auth_error)?;

        if let SignUpResponse::Session(session) = &response {
            self.store(Some(session.clone().stamped()));
            self.emit(AuthChangeEvent::SignedIn);
        }
        tracing::info!(email, confirmed = response.session().is_some(), "signed up");

        Ok(response)
    }

    /// Sign in a user with email and password
    pub async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<Session> {
        let url = self.get_auth_url("/token");

        let body = json!({
            "email": email,
            "password": password,
        });

        let session = self
            .decorate(Fetch::post(&self.client, &url))
            .query_pair("grant_type", "password")
            .json(&body)?
            .execute::<Session>()
            .await
            .map_err(into_auth_error)?
            .stamped();

        self.store(Some(session.clone()));
        self.emit(AuthChangeEvent::SignedIn);
        tracing::info!(email, "signed in");

        Ok(session)
    }

    /// Sign out the current user.
    ///
    /// Without a session this only emits `SignedOut`. When the remote logout
    /// fails the session is kept.
    pub async fn sign_out(&self) -> Result<()> {
        if let Some(session) = self.get_session() {
            let url = self.get_auth_url("/logout");
            self.decorate(Fetch::post(&self.client, &url))
                .bearer_auth(&session.access_token)
                .execute_empty()
                .await
                .map_err(into_auth_error)?;
        }

        self.store(None);
        self.emit(AuthChangeEvent::SignedOut);
        tracing::info!("signed out");
        Ok(())
    }

    /// Get the current session
    pub fn get_session(&self) -> Option<Session> {
        self.session
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Restore a previously obtained session
    pub fn set_session(&self, session: Session) {
        self.store(Some(session));
        self.emit(AuthChangeEvent::SignedIn);
    }

    /// Subscribe to auth state changes.
    ///
    /// The first event is always `InitialSession` carrying the current
    /// session. Dropping the subscription unsubscribes.
    pub fn on_auth_state_change(&self) -> AuthSubscription {
        let receiver = self.events.subscribe();
        AuthSubscription {
            initial: Some(AuthEvent {
                event: AuthChangeEvent::InitialSession,
                session: self.get_session(),
            }),
            receiver,
        }
    }
}

fn into_auth_error(err: Error) -> Error {
    match err {
        Error::Api { .. } | Error::UnparsedApi { .. } => Error::auth(err.user_message()),
        other => other,
    }
}

/// Live subscription to auth state changes
pub struct AuthSubscription {
    initial: Option<AuthEvent>,
    receiver: broadcast::Receiver<AuthEvent>,
}

impl AuthSubscription {
    /// Wait for the next event; `None` once the auth client is gone
    pub async fn recv(&mut self) -> Option<AuthEvent> {
        if let Some(initial) = self.initial.take() {
            return Some(initial);
        }
        loop {
            match self.receiver.recv().await {
                Ok(event) => return Some(event),
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "auth subscriber lagged; skipping to latest");
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }

    /// Next event if one is already queued
    pub fn try_recv(&mut self) -> Option<AuthEvent> {
        if let Some(initial) = self.initial.take() {
            return Some(initial);
        }
        loop {
            match self.receiver.try_recv() {
                Ok(event) => return Some(event),
                Err(broadcast::error::TryRecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "auth subscriber lagged; skipping to latest");
                }
                Err(_) => return None,
            }
        }
    }
}
