//! Error handling for the storefront data layer

use std::collections::BTreeMap;
use std::fmt;

use serde::Deserialize;
use thiserror::Error;

/// Error body returned by PostgREST and the storage API
#[derive(Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct ApiErrorDetails {
    pub code: Option<String>,
    pub message: Option<String>,
    pub details: Option<String>,
    pub hint: Option<String>,
    /// Storage API error name (e.g. "Duplicate")
    pub error: Option<String>,
}

impl ApiErrorDetails {
    fn is_empty(&self) -> bool {
        self.code.is_none()
            && self.message.is_none()
            && self.details.is_none()
            && self.hint.is_none()
            && self.error.is_none()
    }
}

impl fmt::Display for ApiErrorDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();
        if let Some(code) = &self.code {
            parts.push(format!("Code: {}", code));
        }
        if let Some(error) = &self.error {
            parts.push(format!("Error: {}", error));
        }
        if let Some(message) = &self.message {
            parts.push(format!("Message: {}", message));
        }
        if let Some(details) = &self.details {
            parts.push(format!("Details: {}", details));
        }
        if let Some(hint) = &self.hint {
            parts.push(format!("Hint: {}", hint));
        }
        write!(f, "{}", parts.join(", "))
    }
}

/// Per-field validation messages, shown inline next to the offending field
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    fields: BTreeMap<String, String>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validation errors holding a single message
    pub fn single(field: &str, message: &str) -> Self {
        let mut errors = Self::new();
        errors.add(field, message);
        errors
    }

    pub fn add(&mut self, field: &str, message: &str) {
        self.fields.insert(field.to_string(), message.to_string());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields.get(field).map(String::as_str)
    }

    pub fn clear_field(&mut self, field: &str) {
        self.fields.remove(field);
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .fields
            .iter()
            .map(|(field, message)| format!("{}: {}", field, message))
            .collect();
        write!(f, "{}", parts.join("; "))
    }
}

/// Unified error type for the storefront data layer
#[derive(Error, Debug)]
pub enum Error {
    /// Network or HTTP related errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization or deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// URL parsing errors
    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),

    /// The remote service rejected the request with a structured body
    #[error("API error: {details} (Status: {status})")]
    Api {
        status: reqwest::StatusCode,
        details: ApiErrorDetails,
    },

    /// The remote service rejected the request with a body we could not decode
    #[error("API error (unparsed): {message} (Status: {status})")]
    UnparsedApi {
        status: reqwest::StatusCode,
        message: String,
    },

    /// A write succeeded but returned no row
    #[error("Empty response from {0}")]
    EmptyResponse(String),

    /// Authentication errors
    #[error("Authentication error: {0}")]
    Auth(String),

    /// Storage errors
    #[error("Storage error: {0}")]
    Storage(String),

    /// Missing or malformed form input; no remote call was made
    #[error("Validation failed: {0}")]
    Validation(ValidationErrors),

    /// Request that the client refuses to send
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A route parameter or id matched nothing
    #[error("{0} not found")]
    NotFound(String),

    /// The operator declined a confirmation prompt
    #[error("Operation cancelled")]
    Cancelled,

    /// Missing or invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Coarse classification of an [`Error`], used to pick how it is surfaced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Network failure or server rejection
    Remote,
    /// Rejected locally before any remote call
    Validation,
    /// Rendered as a full-page "not found"
    NotFound,
    /// Declined by the operator
    Cancelled,
    /// Client setup problem
    Config,
}

impl Error {
    /// Create a new authentication error
    pub fn auth<T: fmt::Display>(msg: T) -> Self {
        Error::Auth(msg.to_string())
    }

    /// Create a new storage error
    pub fn storage<T: fmt::Display>(msg: T) -> Self {
        Error::Storage(msg.to_string())
    }

    /// Create a new not-found error for the given entity
    pub fn not_found<T: fmt::Display>(what: T) -> Self {
        Error::NotFound(what.to_string())
    }

    /// Create a validation error carrying a single field message
    pub fn validation(field: &str, message: &str) -> Self {
        Error::Validation(ValidationErrors::single(field, message))
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Validation(_) | Error::InvalidInput(_) => ErrorKind::Validation,
            Error::NotFound(_) => ErrorKind::NotFound,
            Error::Cancelled => ErrorKind::Cancelled,
            Error::Config(_) => ErrorKind::Config,
            Error::Http(_)
            | Error::Json(_)
            | Error::Url(_)
            | Error::Api { .. }
            | Error::UnparsedApi { .. }
            | Error::EmptyResponse(_)
            | Error::Auth(_)
            | Error::Storage(_) => ErrorKind::Remote,
        }
    }

    /// Human-readable message, without the transport prefix, for operator alerts
    pub fn user_message(&self) -> String {
        match self {
            Error::Api { details, .. } => details
                .message
                .clone()
                .or_else(|| details.error.clone())
                .unwrap_or_else(|| details.to_string()),
            Error::UnparsedApi { message, .. } => message.clone(),
            Error::Auth(msg) | Error::Storage(msg) => msg.clone(),
            other => other.to_string(),
        }
    }

    /// Build an error from a non-success response, decoding the body when possible
    pub(crate) async fn from_response(response: reqwest::Response) -> Self {
        let status = response.status();
        let text = response
            .text()
            .await
            .unwrap_or_else(|_| "Failed to read error response".to_string());

        match serde_json::from_str::<ApiErrorDetails>(&text) {
            Ok(details) if !details.is_empty() => Error::Api { status, details },
            _ => Error::UnparsedApi {
                status,
                message: text,
            },
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
