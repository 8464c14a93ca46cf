//! Storefront data layer
//!
//! Client-side data access and state for a storefront (catalog, cart,
//! checkout, order tracking) and its admin dashboard (products, categories,
//! orders, users), backed by a hosted Supabase project.
//!
//! [`Storefront`] talks to the project; the stores in [`admin`], [`cart`],
//! [`checkout`] and [`session`] hold the in-memory snapshots the views render.

pub mod admin;
pub mod auth;
pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod config;
pub mod error;
pub mod fetch;
pub mod forms;
pub mod models;
pub mod operator;
pub mod postgrest;
pub mod remote;
pub mod session;
pub mod slug;
pub mod storage;

use reqwest::Client;

use crate::auth::Auth;
use crate::config::{ClientOptions, StoreConfig};
use crate::error::Result;
use crate::postgrest::TableClient;
use crate::storage::StorageClient;

/// The main entry point: HTTP client, auth, tables and storage for one project
#[derive(Clone)]
pub struct Storefront {
    /// Project URL without a trailing slash
    url: String,
    /// The anonymous API key
    key: String,
    /// HTTP client shared by every sub-client
    http_client: Client,
    /// Auth client holding the current session
    auth: Auth,
    options: ClientOptions,
}

impl Storefront {
    /// Create a client for the configured project
    ///
    /// # Example
    ///
    /// ```
    /// use bawk_storefront::{config::StoreConfig, Storefront};
    ///
    /// let config = StoreConfig::new("https://your-project.supabase.co", "your-anon-key").unwrap();
    /// let store = Storefront::new(config).unwrap();
    /// assert_eq!(store.url(), "https://your-project.supabase.co");
    /// ```
    pub fn new(config: StoreConfig) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.options.request_timeout {
            builder = builder.timeout(timeout);
        }
        let http_client = builder.build()?;

        let url = config.base_url();
        let key = config.anon_key().to_string();
        let auth = Auth::new(&url, &key, http_client.clone(), &config.options);

        tracing::debug!(url = %url, "storefront client ready");
        Ok(Self {
            url,
            key,
            http_client,
            auth,
            options: config.options,
        })
    }

    /// Create a client from `SUPABASE_URL` and `SUPABASE_ANON_KEY`
    pub fn from_env() -> Result<Self> {
        Self::new(StoreConfig::from_env()?)
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn options(&self) -> &ClientOptions {
        &self.options
    }

    /// The auth client
    pub fn auth(&self) -> &Auth {
        &self.auth
    }

    /// Client for one table, authorized as the signed-in user when there is one
    pub fn from(&self, table: &str) -> TableClient {
        let client = TableClient::new(
            &self.url,
            &self.key,
            table,
            self.http_client.clone(),
            &self.options,
        );
        match self.auth.get_session() {
            Some(session) => client.with_auth(&session.access_token),
            None => client,
        }
    }

    /// Storage client, authorized as the signed-in user when there is one
    pub fn storage(&self) -> StorageClient {
        let client = StorageClient::new(&self.url, &self.key, self.http_client.clone(), &self.options);
        match self.auth.get_session() {
            Some(session) => client.with_auth(&session.access_token),
            None => client,
        }
    }
}

/// A convenience module for common imports
pub mod prelude {
    pub use crate::admin::{AdminStore, Stats, UserHistory};
    pub use crate::cart::{Cart, CartLine};
    pub use crate::checkout::Checkout;
    pub use crate::config::{ClientOptions, StoreConfig};
    pub use crate::error::{Error, ErrorKind, Result};
    pub use crate::forms::{CategoryForm, ProductField, ProductForm};
    pub use crate::models::{Category, ImageFile, Order, Product, RowId, UserProfile};
    pub use crate::operator::{LogOperator, Operator};
    pub use crate::remote::Remote;
    pub use crate::session::SessionStore;
    pub use crate::Storefront;
}
