//! Types for authentication and user management

use serde::{Deserialize, Serialize};

use crate::auth::Session;

/// User data as held by the identity service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// The user ID
    pub id: String,

    /// The user's email address
    pub email: Option<String>,

    /// The user's phone number
    #[serde(default)]
    pub phone: Option<String>,

    /// The app metadata
    #[serde(default)]
    pub app_metadata: serde_json::Value,

    /// The user metadata (sign-up data such as `role` and `full_name`)
    #[serde(default)]
    pub user_metadata: serde_json::Value,

    /// Postgres role of the token (usually "authenticated")
    #[serde(default)]
    pub role: Option<String>,

    /// The creation time
    #[serde(default)]
    pub created_at: Option<String>,
}

impl User {
    /// Application role from user metadata, falling back to app metadata
    pub fn app_role(&self) -> Option<&str> {
        self.user_metadata
            .get("role")
            .and_then(|v| v.as_str())
            .or_else(|| self.app_metadata.get("role").and_then(|v| v.as_str()))
    }

    pub fn full_name(&self) -> Option<&str> {
        self.user_metadata.get("full_name").and_then(|v| v.as_str())
    }

    pub fn is_admin(&self) -> bool {
        self.app_role() == Some("admin")
    }
}

/// Result of a sign-up: a session when confirmation is disabled,
/// otherwise only the pending user
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum SignUpResponse {
    Session(Session),
    User(User),
}

impl SignUpResponse {
    pub fn user(&self) -> &User {
        match self {
            SignUpResponse::Session(session) => &session.user,
            SignUpResponse::User(user) => user,
        }
    }

    pub fn session(&self) -> Option<&Session> {
        match self {
            SignUpResponse::Session(session) => Some(session),
            SignUpResponse::User(_) => None,
        }
    }
}

/// Kind of auth state change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthChangeEvent {
    /// Delivered once, right after subscribing
    InitialSession,
    SignedIn,
    SignedOut,
}

/// Auth state change with the session in effect afterwards
#[derive(Debug, Clone, PartialEq)]
pub struct AuthEvent {
    pub event: AuthChangeEvent,
    pub session: Option<Session>,
}
