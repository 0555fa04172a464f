//! # GCS Proxy Store
//!
//! Read-only object store layer for the GCS proxy.
//!
//! This crate provides:
//! - **Object reads**: Open a streaming reader for a key
//! - **Metadata**: Look up an object's attributes without reading it
//! - **Listing**: Enumerate objects under a prefix
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │              Gateway Handler            │
//! ├─────────────────────────────────────────┤
//! │            ObjectStore Trait            │
//! ├────────────────────┬────────────────────┤
//! │   GcsObjectStore   │ MemoryObjectStore  │
//! ├────────────────────┴────────────────────┤
//! │        Google Cloud Storage JSON API    │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```rust,ignore
//! use gcs_proxy_store::{GcsConfig, GcsObjectStore, ObjectStore};
//!
//! let store = GcsObjectStore::new(GcsConfig::for_bucket("my-site"))?;
//! let reader = store.open_reader("index.html").await?;
//! ```

pub mod error;
pub mod gcs;
pub mod memory;

pub use error::{Result, StoreError};
pub use gcs::{GcsConfig, GcsObjectStore};
pub use memory::MemoryObjectStore;

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use futures::stream::BoxStream;
use serde::{Deserialize, Serialize};

/// Default chunk size for in-memory streaming (64 KB)
pub const DEFAULT_CHUNK_SIZE: usize = 64 * 1024;

/// Forward-only stream of object bytes
pub type ByteStream = BoxStream<'static, Result<Bytes>>;

/// Attributes of a stored object
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectMetadata {
    /// Full object name (the resolved key)
    pub name: String,
    /// Size in bytes, when the backend reports it
    pub size: Option<u64>,
    /// Content type recorded by the backend
    pub content_type: Option<String>,
    /// Last update time
    pub updated: Option<DateTime<Utc>>,
}

impl ObjectMetadata {
    /// Create metadata with only a name
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            size: None,
            content_type: None,
            updated: None,
        }
    }

    /// Set the size
    pub fn with_size(mut self, size: u64) -> Self {
        self.size = Some(size);
        self
    }
}

/// An open object: its metadata and a stream over its bytes.
///
/// The reader owns the underlying backend stream. Dropping it (fully read,
/// abandoned on error, or dropped with a cancelled request) releases the
/// backend connection.
pub struct ObjectReader {
    /// Metadata known at open time
    pub metadata: ObjectMetadata,
    stream: ByteStream,
}

impl ObjectReader {
    /// Wrap a byte stream
    pub fn new(metadata: ObjectMetadata, stream: ByteStream) -> Self {
        Self { metadata, stream }
    }

    /// Split into metadata and the owned byte stream
    pub fn into_parts(self) -> (ObjectMetadata, ByteStream) {
        (self.metadata, self.stream)
    }

    /// Read the whole object into memory
    pub async fn read_to_end(self) -> Result<Bytes> {
        use futures::TryStreamExt;

        let chunks: Vec<Bytes> = self.stream.try_collect().await?;
        Ok(chunks.concat().into())
    }
}

impl std::fmt::Debug for ObjectReader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObjectReader")
            .field("metadata", &self.metadata)
            .finish_non_exhaustive()
    }
}

/// Trait for read-only object storage backends
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Open a streaming reader for a key
    async fn open_reader(&self, key: &str) -> Result<ObjectReader>;

    /// Fetch object attributes without reading content
    async fn metadata(&self, key: &str) -> Result<ObjectMetadata>;

    /// List all objects whose name starts with `prefix`
    async fn list_objects(&self, prefix: &str) -> Result<Vec<ObjectMetadata>>;

    /// Short description of the backend for logs
    fn describe(&self) -> String;
}
