//! HTTP request helper shared by the table, storage and auth clients

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use reqwest::{multipart, Client, Method, RequestBuilder, Response};
use serde::{de::DeserializeOwned, Serialize};
use url::Url;

use crate::error::{Error, Result};

enum Body {
    Json(Vec<u8>),
    Multipart(multipart::Form),
}

/// Helper for building and executing HTTP requests
pub struct FetchBuilder<'a> {
    client: &'a Client,
    url: String,
    method: Method,
    headers: HeaderMap,
    query: Vec<(String, String)>,
    body: Option<Body>,
}

impl<'a> FetchBuilder<'a> {
    /// Create a new FetchBuilder
    pub fn new(client: &'a Client, url: &str, method: Method) -> Self {
        Self {
            client,
            url: url.to_string(),
            method,
            headers: HeaderMap::new(),
            query: Vec::new(),
            body: None,
        }
    }

    /// Add a header to the request; invalid names or values are dropped
    pub fn header(mut self, name: &str, value: &str) -> Self {
        match (
            HeaderName::from_bytes(name.as_bytes()),
            HeaderValue::from_str(value),
        ) {
            (Ok(name), Ok(value)) => {
                self.headers.insert(name, value);
            }
            _ => tracing::warn!(header = name, "dropping invalid request header"),
        }
        self
    }

    /// Add bearer token authentication to the request
    pub fn bearer_auth(self, token: &str) -> Self {
        self.header("Authorization", &format!("Bearer {}", token))
    }

    /// Add a query pair; repeated keys are kept in order
    pub fn query_pair(mut self, key: &str, value: &str) -> Self {
        self.query.push((key.to_string(), value.to_string()));
        self
    }

    /// Add a JSON body to the request
    pub fn json<T: Serialize + ?Sized>(mut self, body: &T) -> Result<Self> {
        self.body = Some(Body::Json(serde_json::to_vec(body)?));
        Ok(self)
    }

    /// Add a multipart body to the request
    pub fn multipart(mut self, form: multipart::Form) -> Self {
        self.body = Some(Body::Multipart(form));
        self
    }

    fn build(self) -> Result<RequestBuilder> {
        let mut url = Url::parse(&self.url)?;
        if !self.query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in &self.query {
                pairs.append_pair(key, value);
            }
        }

        let req = self.client.request(self.method, url).headers(self.headers);
        Ok(match self.body {
            Some(Body::Json(bytes)) => req
                .header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
                .body(bytes),
            Some(Body::Multipart(form)) => req.multipart(form),
            None => req,
        })
    }

    /// Send the request, turning a non-success status into an error
    pub async fn send(self) -> Result<Response> {
        let method = self.method.clone();
        let url = self.url.clone();
        let response = self.build()?.send().await?;

        let status = response.status();
        tracing::debug!(%method, %url, %status, "remote call completed");
        if !status.is_success() {
            return Err(Error::from_response(response).await);
        }
        Ok(response)
    }

    /// Execute the request and parse the response as JSON
    pub async fn execute<T: DeserializeOwned>(self) -> Result<T> {
        let response = self.send().await?;
        let text = response.text().await?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Execute the request, discarding any response body
    pub async fn execute_empty(self) -> Result<()> {
        self.send().await?;
        Ok(())
    }
}

/// Helper for creating HTTP requests
pub struct Fetch;

impl Fetch {
    /// Create a GET request
    pub fn get<'a>(client: &'a Client, url: &str) -> FetchBuilder<'a> {
        FetchBuilder::new(client, url, Method::GET)
    }

    /// Create a POST request
    pub fn post<'a>(client: &'a Client, url: &str) -> FetchBuilder<'a> {
        FetchBuilder::new(client, url, Method::POST)
    }

    /// Create a PATCH request
    pub fn patch<'a>(client: &'a Client, url: &str) -> FetchBuilder<'a> {
        FetchBuilder::new(client, url, Method::PATCH)
    }

    /// Create a DELETE request
    pub fn delete<'a>(client: &'a Client, url: &str) -> FetchBuilder<'a> {
        FetchBuilder::new(client, url, Method::DELETE)
    }
}
