//! Configuration for the storefront client

use std::fmt;
use std::time::Duration;

use url::Url;

use crate::error::{Error, Result};

/// Largest image accepted by the admin forms
pub const DEFAULT_MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;

/// Configuration options for the storefront client
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// The request timeout; `None` leaves requests unbounded
    pub request_timeout: Option<Duration>,

    /// The database schema
    pub db_schema: String,

    /// Storage bucket holding product images
    pub product_bucket: String,

    /// Storage bucket holding category cover images
    pub category_bucket: String,

    /// Largest image file accepted by the forms, in bytes
    pub max_image_bytes: usize,

    /// Value of the `X-Client-Info` header
    pub client_info: String,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            request_timeout: None,
            db_schema: "public".to_string(),
            product_bucket: "products".to_string(),
            category_bucket: "categories".to_string(),
            max_image_bytes: DEFAULT_MAX_IMAGE_BYTES,
            client_info: concat!("bawk-storefront/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl ClientOptions {
    /// Set the request timeout
    pub fn with_request_timeout(mut self, value: Option<Duration>) -> Self {
        self.request_timeout = value;
        self
    }

    /// Set the database schema
    pub fn with_db_schema(mut self, value: &str) -> Self {
        self.db_schema = value.to_string();
        self
    }

    /// Set the product image bucket
    pub fn with_product_bucket(mut self, value: &str) -> Self {
        self.product_bucket = value.to_string();
        self
    }

    /// Set the category cover bucket
    pub fn with_category_bucket(mut self, value: &str) -> Self {
        self.category_bucket = value.to_string();
        self
    }

    /// Set the largest accepted image size
    pub fn with_max_image_bytes(mut self, value: usize) -> Self {
        self.max_image_bytes = value;
        self
    }
}

/// Project URL, anon key and client options
#[derive(Clone)]
pub struct StoreConfig {
    pub url: Url,
    anon_key: String,
    pub options: ClientOptions,
}

impl fmt::Debug for StoreConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoreConfig")
            .field("url", &self.url.as_str())
            .field("anon_key", &"[REDACTED]")
            .field("options", &self.options)
            .finish()
    }
}

impl StoreConfig {
    /// Creates a new configuration, validating the URL.
    pub fn new(url_str: &str, anon_key: impl Into<String>) -> Result<Self> {
        let url = Url::parse(url_str)?;
        let anon_key = anon_key.into();
        if anon_key.is_empty() {
            return Err(Error::Config("anon_key cannot be empty".to_string()));
        }
        Ok(Self {
            url,
            anon_key,
            options: ClientOptions::default(),
        })
    }

    /// Reads `SUPABASE_URL` and `SUPABASE_ANON_KEY`, loading `.env` first if present.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let url_str = std::env::var("SUPABASE_URL").map_err(|_| {
            Error::Config("SUPABASE_URL environment variable not found".to_string())
        })?;
        let anon_key = std::env::var("SUPABASE_ANON_KEY").map_err(|_| {
            Error::Config("SUPABASE_ANON_KEY environment variable not found".to_string())
        })?;
        Self::new(&url_str, anon_key)
    }

    pub fn with_options(mut self, options: ClientOptions) -> Self {
        self.options = options;
        self
    }

    pub fn anon_key(&self) -> &str {
        &self.anon_key
    }

    /// Project URL without a trailing slash, ready for path concatenation
    pub fn base_url(&self) -> String {
        self.url.as_str().trim_end_matches('/').to_string()
    }
}
