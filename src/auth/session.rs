//! Session data for authentication

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::auth::User;

/// Session data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    /// The access token
    pub access_token: String,

    /// The refresh token
    #[serde(default)]
    pub refresh_token: String,

    /// The token type
    #[serde(default = "default_token_type")]
    pub token_type: String,

    /// The lifetime in seconds
    pub expires_in: i64,

    /// The expiry timestamp (seconds since the epoch)
    #[serde(default)]
    pub expires_at: Option<i64>,

    /// The signed-in user
    pub user: User,
}

fn default_token_type() -> String {
    "bearer".to_string()
}

impl Session {
    /// Fill in `expires_at` from `expires_in` when the server omitted it
    pub(crate) fn stamped(mut self) -> Self {
        if self.expires_at.is_none() {
            self.expires_at = Some(Utc::now().timestamp() + self.expires_in);
        }
        self
    }

    /// Check if the session has expired
    pub fn is_expired(&self) -> bool {
        match self.expires_at {
            Some(expires_at) => Utc::now().timestamp() >= expires_at,
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(expires_at: Option<i64>) -> Session {
        Session {
            access_token: "token".to_string(),
            refresh_token: "refresh".to_string(),
            token_type: "bearer".to_string(),
            expires_in: 3600,
            expires_at,
            user: User {
                id: "u1".to_string(),
                email: None,
                phone: None,
                app_metadata: serde_json::Value::Null,
                user_metadata: serde_json::Value::Null,
                role: None,
                created_at: None,
            },
        }
    }

    #[test]
    fn stamping_sets_future_expiry() {
        let s = session(None).stamped();
        assert!(s.expires_at.is_some());
        assert!(!s.is_expired());
    }

    #[test]
    fn past_expiry_is_expired() {
        assert!(session(Some(0)).is_expired());
    }
}
