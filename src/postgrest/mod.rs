//! Table operations through the PostgREST API

mod filter;
mod query;
mod types;

use reqwest::Client;
use serde::Serialize;

use crate::config::ClientOptions;
use crate::fetch::FetchBuilder;

pub use filter::*;
pub use query::*;
pub use types::*;

/// Client for one table
#[derive(Clone)]
pub struct TableClient {
    /// `{project}/rest/v1/{table}`
    url: String,

    /// The anonymous API key
    key: String,

    /// Access token of the signed-in user, if any
    token: Option<String>,

    /// The table name
    table: String,

    schema: String,
    client_info: String,

    /// HTTP client
    client: Client,
}

impl TableClient {
    pub(crate) fn new(
        base_url: &str,
        key: &str,
        table: &str,
        client: Client,
        options: &ClientOptions,
    ) -> Self {
        Self {
            url: format!("{}/rest/v1/{}", base_url, table),
            key: key.to_string(),
            token: None,
            table: table.to_string(),
            schema: options.db_schema.clone(),
            client_info: options.client_info.clone(),
            client,
        }
    }

    /// Send requests with a user access token instead of the anon key
    pub fn with_auth(mut self, token: &str) -> Self {
        self.token = Some(token.to_string());
        self
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    /// Select specific columns from the table
    pub fn select(&self, columns: &str) -> SelectBuilder {
        SelectBuilder::new(self.clone(), columns)
    }

    /// Insert rows; `rows` should serialize to a JSON array
    pub fn insert<T: Serialize>(&self, rows: T) -> InsertBuilder<T> {
        InsertBuilder::new(self.clone(), rows)
    }

    /// Update the given columns on matching rows
    pub fn update<T: Serialize>(&self, values: T) -> UpdateBuilder<T> {
        UpdateBuilder::new(self.clone(), values)
    }

    /// Delete matching rows
    pub fn delete(&self) -> DeleteBuilder {
        DeleteBuilder::new(self.clone())
    }

    /// Attach the headers every PostgREST call carries
    fn decorate<'a>(&self, fetch: FetchBuilder<'a>) -> FetchBuilder<'a> {
        let token = self.token.as_deref().unwrap_or(&self.key);
        fetch
            .header("apikey", &self.key)
            .bearer_auth(token)
            .header("X-Client-Info", &self.client_info)
            .header("Accept-Profile", &self.schema)
            .header("Content-Profile", &self.schema)
    }
}
