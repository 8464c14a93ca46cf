//! The remote data service contract consumed by the stores

use async_trait::async_trait;
use bytes::Bytes;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

use crate::error::{Error, Result};
use crate::models::RowId;
use crate::postgrest::{Filter, Order};
use crate::storage::{DownloadedObject, FileOptions};
use crate::Storefront;

/// Shape of a table read: one optional equality filter, optional newest-first
/// order and an optional row cap
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableQuery {
    pub filter: Option<Filter>,
    pub newest_first: bool,
    pub limit: Option<usize>,
}

impl TableQuery {
    /// Every row, unordered
    pub fn all() -> Self {
        Self::default()
    }

    pub fn eq<T: ToString + ?Sized>(mut self, column: &str, value: &T) -> Self {
        self.filter = Some(Filter::eq(column, value));
        self
    }

    pub fn newest_first(mut self) -> Self {
        self.newest_first = true;
        self
    }

    pub fn limit(mut self, count: usize) -> Self {
        self.limit = Some(count);
        self
    }
}

/// Tables, object storage and nothing else.
///
/// Every call is one request; there are no retries and no timeouts beyond
/// what the client options configure.
#[async_trait]
pub trait Remote: Send + Sync {
    /// Read rows
    async fn select(&self, table: &str, query: TableQuery) -> Result<Vec<Value>>;

    /// Insert one row and return it as stored
    async fn insert(&self, table: &str, row: Value) -> Result<Value>;

    /// Partial update of the row with `id`
    async fn update(&self, table: &str, id: &RowId, patch: Value) -> Result<()>;

    /// Delete the row with `id`
    async fn delete(&self, table: &str, id: &RowId) -> Result<()>;

    /// Store an object under `name`
    async fn upload(
        &self,
        bucket: &str,
        name: &str,
        bytes: Bytes,
        content_type: Option<&str>,
        upsert: bool,
    ) -> Result<()>;

    /// Fetch an object's bytes and stored content type
    async fn download(&self, bucket: &str, name: &str) -> Result<DownloadedObject>;

    /// Public reference to an object; computed locally
    fn public_url(&self, bucket: &str, name: &str) -> String;

    /// Remove objects
    async fn remove(&self, bucket: &str, names: &[String]) -> Result<()>;
}

/// Typed read through a [`Remote`]
pub async fn select_as<T, R>(remote: &R, table: &str, query: TableQuery) -> Result<Vec<T>>
where
    T: DeserializeOwned,
    R: Remote + ?Sized,
{
    remote
        .select(table, query)
        .await?
        .into_iter()
        .map(|row| serde_json::from_value(row).map_err(Error::from))
        .collect()
}

/// Typed insert through a [`Remote`]
pub async fn insert_as<T, P, R>(remote: &R, table: &str, payload: &P) -> Result<T>
where
    T: DeserializeOwned,
    P: Serialize,
    R: Remote + ?Sized,
{
    let row = remote.insert(table, serde_json::to_value(payload)?).await?;
    Ok(serde_json::from_value(row)?)
}

fn into_storage_error(err: Error) -> Error {
    match err {
        Error::Api { .. } | Error::UnparsedApi { .. } => Error::storage(err.user_message()),
        other => other,
    }
}

#[async_trait]
impl Remote for Storefront {
    async fn select(&self, table: &str, query: TableQuery) -> Result<Vec<Value>> {
        let mut select = self.from(table).select("*");
        if let Some(filter) = query.filter {
            select = select.filter(filter);
        }
        if query.newest_first {
            select = select.order(Order::newest_first());
        }
        if let Some(count) = query.limit {
            select = select.limit(count);
        }
        select.execute::<Value>().await
    }

    async fn insert(&self, table: &str, row: Value) -> Result<Value> {
        let rows = self.from(table).insert(vec![row]).execute::<Value>().await?;
        rows.into_iter()
            .next()
            .ok_or_else(|| Error::EmptyResponse(format!("insert into {}", table)))
    }

    async fn update(&self, table: &str, id: &RowId, patch: Value) -> Result<()> {
        self.from(table).update(patch).eq("id", id).execute().await
    }

    async fn delete(&self, table: &str, id: &RowId) -> Result<()> {
        self.from(table).delete().eq("id", id).execute().await
    }

    async fn upload(
        &self,
        bucket: &str,
        name: &str,
        bytes: Bytes,
        content_type: Option<&str>,
        upsert: bool,
    ) -> Result<()> {
        let options = FileOptions::default()
            .with_content_type(content_type)
            .with_upsert(upsert);
        self.storage()
            .from(bucket)
            .upload(name, bytes, options)
            .await
            .map_err(into_storage_error)?;
        Ok(())
    }

    async fn download(&self, bucket: &str, name: &str) -> Result<DownloadedObject> {
        self.storage()
            .from(bucket)
            .download(name)
            .await
            .map_err(into_storage_error)
    }

    fn public_url(&self, bucket: &str, name: &str) -> String {
        self.storage().from(bucket).get_public_url(name)
    }

    async fn remove(&self, bucket: &str, names: &[String]) -> Result<()> {
        self.storage()
            .from(bucket)
            .remove(names)
            .await
            .map_err(into_storage_error)?;
        Ok(())
    }
}
