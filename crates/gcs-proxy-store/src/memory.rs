//! In-memory object store for testing and development

use crate::{ByteStream, ObjectMetadata, ObjectReader, ObjectStore, Result, StoreError};
use async_trait::async_trait;
use bytes::Bytes;
use chrono::Utc;
use dashmap::DashMap;
use futures::stream;
use std::sync::Arc;

#[derive(Clone)]
struct StoredObject {
    data: Bytes,
    metadata: ObjectMetadata,
}

/// An in-memory object store
#[derive(Clone)]
pub struct MemoryObjectStore {
    objects: Arc<DashMap<String, StoredObject>>,
    chunk_size: usize,
}

impl Default for MemoryObjectStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryObjectStore {
    /// Create a new empty memory store
    pub fn new() -> Self {
        Self {
            objects: Arc::new(DashMap::new()),
            chunk_size: crate::DEFAULT_CHUNK_SIZE,
        }
    }

    /// Stream objects in chunks of `chunk_size` bytes (minimum 1)
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    /// Store an object, replacing any previous content
    pub fn put(&self, key: impl Into<String>, data: impl Into<Bytes>) {
        let key = key.into();
        let data = data.into();
        let mut metadata = ObjectMetadata::new(key.clone()).with_size(data.len() as u64);
        metadata.updated = Some(Utc::now());
        self.objects.insert(key, StoredObject { data, metadata });
    }

    /// Store an object with an explicit content type
    pub fn put_with_content_type(
        &self,
        key: impl Into<String>,
        data: impl Into<Bytes>,
        content_type: impl Into<String>,
    ) {
        let key = key.into();
        self.put(key.clone(), data);
        if let Some(mut entry) = self.objects.get_mut(&key) {
            entry.metadata.content_type = Some(content_type.into());
        }
    }

    /// Get the number of objects stored
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Check if the store is empty
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    fn get(&self, key: &str) -> Result<StoredObject> {
        self.objects
            .get(key)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| StoreError::NotFound(key.to_string()))
    }

    fn chunked(data: Bytes, chunk_size: usize) -> ByteStream {
        let chunks: Vec<Result<Bytes>> = (0..data.len())
            .step_by(chunk_size)
            .map(|start| Ok(data.slice(start..(start + chunk_size).min(data.len()))))
            .collect();
        Box::pin(stream::iter(chunks))
    }
}

#[async_trait]
impl ObjectStore for MemoryObjectStore {
    async fn open_reader(&self, key: &str) -> Result<ObjectReader> {
        let object = self.get(key)?;
        let stream = Self::chunked(object.data, self.chunk_size);
        Ok(ObjectReader::new(object.metadata, stream))
    }

    async fn metadata(&self, key: &str) -> Result<ObjectMetadata> {
        Ok(self.get(key)?.metadata)
    }

    async fn list_objects(&self, prefix: &str) -> Result<Vec<ObjectMetadata>> {
        let mut objects: Vec<ObjectMetadata> = self
            .objects
            .iter()
            .filter(|entry| entry.key().starts_with(prefix))
            .map(|entry| entry.value().metadata.clone())
            .collect();
        objects.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(objects)
    }

    fn describe(&self) -> String {
        format!("memory ({} objects)", self.len())
    }
}
