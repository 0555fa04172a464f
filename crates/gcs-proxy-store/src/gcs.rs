//! Google Cloud Storage JSON API client for object reads

use crate::{ObjectMetadata, ObjectReader, ObjectStore, Result, StoreError};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::TryStreamExt;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, instrument};

/// Public Google Cloud Storage endpoint
pub const DEFAULT_GCS_ENDPOINT: &str = "https://storage.googleapis.com";

/// Configuration for a GCS bucket connection
#[derive(Clone)]
pub struct GcsConfig {
    /// Bucket name
    pub bucket: String,
    /// API endpoint (e.g., "https://storage.googleapis.com" or an emulator)
    pub endpoint: String,
    /// OAuth2 bearer token; anonymous access when unset
    pub access_token: Option<String>,
    /// Connection establishment timeout
    pub connect_timeout: Duration,
}

impl GcsConfig {
    /// Configuration for a bucket on the public endpoint
    pub fn for_bucket(bucket: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            endpoint: DEFAULT_GCS_ENDPOINT.to_string(),
            access_token: None,
            connect_timeout: Duration::from_secs(10),
        }
    }

    /// Use a custom API endpoint
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into().trim_end_matches('/').to_string();
        self
    }

    /// Authenticate with a bearer token
    pub fn with_access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(token.into());
        self
    }
}

impl std::fmt::Debug for GcsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GcsConfig")
            .field("bucket", &self.bucket)
            .field("endpoint", &self.endpoint)
            .field("access_token", &self.access_token.as_ref().map(|_| "<redacted>"))
            .field("connect_timeout", &self.connect_timeout)
            .finish()
    }
}

/// GCS-backed object store
#[derive(Clone)]
pub struct GcsObjectStore {
    client: Client,
    config: GcsConfig,
}

impl GcsObjectStore {
    /// Create a new store for the configured bucket
    pub fn new(config: GcsConfig) -> Result<Self> {
        if config.bucket.is_empty() {
            return Err(StoreError::Configuration("bucket name is empty".to_string()));
        }

        let client = Client::builder()
            .connect_timeout(config.connect_timeout)
            .build()
            .map_err(|e| StoreError::Connection(e.to_string()))?;

        Ok(Self { client, config })
    }

    /// An empty name would address the bucket's object collection
    fn check_key(key: &str) -> Result<()> {
        if key.is_empty() {
            return Err(StoreError::Configuration("object name is empty".to_string()));
        }
        Ok(())
    }

    fn object_url(&self, key: &str) -> String {
        format!(
            "{}/storage/v1/b/{}/o/{}",
            self.config.endpoint,
            urlencoding::encode(&self.config.bucket),
            urlencoding::encode(key)
        )
    }

    fn list_url(&self) -> String {
        format!(
            "{}/storage/v1/b/{}/o",
            self.config.endpoint,
            urlencoding::encode(&self.config.bucket)
        )
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.config.access_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// Map a non-success response to a store error
    async fn status_error(key: &str, response: Response) -> StoreError {
        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return StoreError::NotFound(key.to_string());
        }
        let message = response.text().await.unwrap_or_default();
        StoreError::Status {
            key: key.to_string(),
            status: status.as_u16(),
            message,
        }
    }

    async fn fetch_metadata(&self, key: &str) -> Result<GcsObject> {
        Self::check_key(key)?;

        let response = self
            .authorize(self.client.get(self.object_url(key)))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::status_error(key, response).await);
        }

        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}

#[async_trait]
impl ObjectStore for GcsObjectStore {
    #[instrument(skip(self), fields(bucket = %self.config.bucket))]
    async fn open_reader(&self, key: &str) -> Result<ObjectReader> {
        Self::check_key(key)?;

        let response = self
            .authorize(self.client.get(self.object_url(key)).query(&[("alt", "media")]))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::status_error(key, response).await);
        }

        let mut metadata = ObjectMetadata::new(key);
        metadata.size = response.content_length();
        metadata.content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        debug!(size = ?metadata.size, "Opened object stream");

        let stream = response
            .bytes_stream()
            .map_err(|e| StoreError::Stream(e.to_string()));

        Ok(ObjectReader::new(metadata, Box::pin(stream)))
    }

    #[instrument(skip(self), fields(bucket = %self.config.bucket))]
    async fn metadata(&self, key: &str) -> Result<ObjectMetadata> {
        self.fetch_metadata(key).await.map(ObjectMetadata::from)
    }

    #[instrument(skip(self), fields(bucket = %self.config.bucket))]
    async fn list_objects(&self, prefix: &str) -> Result<Vec<ObjectMetadata>> {
        let mut objects = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut query: Vec<(&str, &str)> = vec![("prefix", prefix)];
            if let Some(ref token) = page_token {
                query.push(("pageToken", token.as_str()));
            }

            let response = self
                .authorize(self.client.get(self.list_url()).query(&query))
                .send()
                .await?;

            if !response.status().is_success() {
                return Err(Self::status_error(prefix, response).await);
            }

            let body = response.bytes().await?;
            let page: ListResponse = serde_json::from_slice(&body)?;
            objects.extend(page.items.into_iter().map(ObjectMetadata::from));

            match page.next_page_token {
                Some(token) if !token.is_empty() => page_token = Some(token),
                _ => break,
            }
        }

        Ok(objects)
    }

    fn describe(&self) -> String {
        format!("gs://{} via {}", self.config.bucket, self.config.endpoint)
    }
}

/// Object resource as returned by the JSON API
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GcsObject {
    name: String,
    /// The API encodes sizes as decimal strings
    size: Option<String>,
    content_type: Option<String>,
    updated: Option<DateTime<Utc>>,
}

impl From<GcsObject> for ObjectMetadata {
    fn from(object: GcsObject) -> Self {
        Self {
            name: object.name,
            size: object.size.and_then(|s| s.parse().ok()),
            content_type: object.content_type,
            updated: object.updated,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListResponse {
    #[serde(default)]
    items: Vec<GcsObject>,
    next_page_token: Option<String>,
}
