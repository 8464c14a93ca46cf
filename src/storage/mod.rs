//! Storage operations for image uploads and removal

mod keys;
mod types;

use bytes::Bytes;
use reqwest::header::CONTENT_TYPE;
use reqwest::{multipart, Client};

use crate::config::ClientOptions;
use crate::error::Result;
use crate::fetch::{Fetch, FetchBuilder};

pub use keys::*;
pub use types::*;

/// Client for Supabase Storage
#[derive(Clone)]
pub struct StorageClient {
    /// The base URL for the project
    url: String,

    /// The anonymous API key
    key: String,

    /// Access token of the signed-in user, if any
    token: Option<String>,

    client_info: String,

    /// HTTP client used for requests
    client: Client,
}

/// Client for a specific storage bucket
pub struct BucketClient<'a> {
    storage: &'a StorageClient,
    bucket_id: String,
}

impl StorageClient {
    pub(crate) fn new(url: &str, key: &str, client: Client, options: &ClientOptions) -> Self {
        Self {
            url: url.to_string(),
            key: key.to_string(),
            token: None,
            client_info: options.client_info.clone(),
            client,
        }
    }

    /// Send requests with a user access token instead of the anon key
    pub fn with_auth(mut self, token: &str) -> Self {
        self.token = Some(token.to_string());
        self
    }

    fn get_url(&self, path: &str) -> String {
        format!("{}/storage/v1{}", self.url, path)
    }

    fn decorate<'a>(&self, fetch: FetchBuilder<'a>) -> FetchBuilder<'a> {
        let token = self.token.as_deref().unwrap_or(&self.key);
        fetch
            .header("apikey", &self.key)
            .bearer_auth(token)
            .header("X-Client-Info", &self.client_info)
    }

    /// Get a client for a specific bucket
    pub fn from(&self, bucket_id: &str) -> BucketClient<'_> {
        BucketClient {
            storage: self,
            bucket_id: bucket_id.to_string(),
        }
    }
}

impl<'a> BucketClient<'a> {
    /// Upload a file to the bucket
    pub async fn upload(
        &self,
        path: &str,
        data: Bytes,
        options: FileOptions,
    ) -> Result<UploadResponse> {
        let url = self
            .storage
            .get_url(&format!("/object/{}/{}", self.bucket_id, path));

        let mut part = multipart::Part::bytes(data.to_vec()).file_name(path.to_string());
        if let Some(content_type) = &options.content_type {
            part = part.mime_str(content_type)?;
        }
        let form = multipart::Form::new()
            .text("cacheControl", options.cache_control.clone())
            .part("", part);

        tracing::debug!(bucket = %self.bucket_id, path, "upload");
        self.storage
            .decorate(Fetch::post(&self.storage.client, &url))
            .header("x-upsert", &options.upsert.to_string())
            .multipart(form)
            .execute::<UploadResponse>()
            .await
    }

    /// Download a file from the bucket, keeping its `Content-Type`
    pub async fn download(&self, path: &str) -> Result<DownloadedObject> {
        let url = self
            .storage
            .get_url(&format!("/object/{}/{}", self.bucket_id, path));

        tracing::debug!(bucket = %self.bucket_id, path, "download");
        let response = self
            .storage
            .decorate(Fetch::get(&self.storage.client, &url))
            .send()
            .await?;
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);

        Ok(DownloadedObject {
            bytes: response.bytes().await?,
            content_type,
        })
    }

    /// Remove files from the bucket
    pub async fn remove(&self, paths: &[String]) -> Result<Vec<FileObject>> {
        let url = self
            .storage
            .get_url(&format!("/object/{}", self.bucket_id));

        let body = serde_json::json!({
            "prefixes": paths
        });

        tracing::debug!(bucket = %self.bucket_id, count = paths.len(), "remove");
        self.storage
            .decorate(Fetch::delete(&self.storage.client, &url))
            .json(&body)?
            .execute::<Vec<FileObject>>()
            .await
    }

    /// Get the public URL for a file
    pub fn get_public_url(&self, path: &str) -> String {
        format!(
            "{}/storage/v1/object/public/{}/{}",
            self.storage.url, self.bucket_id, path
        )
    }
}
