//! In-process document store.
//!
//! Keeps each collection as an insertion-ordered vector behind an async
//! lock. Filters are top-level equality on wire names.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use futures::StreamExt;
use futures::stream;
use serde_json::Value;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{
    Document, DocumentCollection, DocumentStore, DocumentStream, Filter, ID_FIELD, StoreError,
    StoreResult, merge, page_window,
};
use crate::model::CollectionBinding;

/// A store that lives in memory for the lifetime of the process.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    collections: Arc<Mutex<HashMap<String, Arc<MemoryCollection>>>>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the named collection, creating it on first use.
    pub fn named(&self, name: &str) -> Arc<MemoryCollection> {
        let mut collections = self
            .collections
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        Arc::clone(
            collections
                .entry(name.to_string())
                .or_insert_with(|| Arc::new(MemoryCollection::new(name))),
        )
    }
}

impl DocumentStore for MemoryStore {
    fn collection(&self, binding: &CollectionBinding) -> Arc<dyn DocumentCollection> {
        self.named(binding.name)
    }
}

/// One in-memory collection.
#[derive(Debug)]
pub struct MemoryCollection {
    name: String,
    documents: RwLock<Vec<Document>>,
}

impl MemoryCollection {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            documents: RwLock::new(Vec::new()),
        }
    }

    /// Number of stored documents.
    pub async fn len(&self) -> usize {
        self.documents.read().await.len()
    }

    /// Whether the collection holds no documents.
    pub async fn is_empty(&self) -> bool {
        self.documents.read().await.is_empty()
    }

    async fn select(
        &self,
        filter: &Filter,
        page: Option<u64>,
        page_size: Option<u64>,
    ) -> Vec<Document> {
        let (offset, limit) = page_window(page, page_size);
        let offset = usize::try_from(offset).unwrap_or(usize::MAX);
        let limit = limit.map_or(usize::MAX, |l| usize::try_from(l).unwrap_or(usize::MAX));

        self.documents
            .read()
            .await
            .iter()
            .filter(|doc| is_match(doc, filter))
            .skip(offset)
            .take(limit)
            .cloned()
            .collect()
    }
}

fn is_match(document: &Document, filter: &Filter) -> bool {
    filter
        .iter()
        .all(|(key, expected)| document.get(key).unwrap_or(&Value::Null) == expected)
}

#[async_trait]
impl DocumentCollection for MemoryCollection {
    async fn find_one(&self, filter: &Filter) -> StoreResult<Option<Document>> {
        Ok(self
            .documents
            .read()
            .await
            .iter()
            .find(|doc| is_match(doc, filter))
            .cloned())
    }

    async fn find_many(
        &self,
        filter: &Filter,
        page: Option<u64>,
        page_size: Option<u64>,
    ) -> StoreResult<Vec<Document>> {
        Ok(self.select(filter, page, page_size).await)
    }

    async fn find_stream(
        &self,
        filter: &Filter,
        page: Option<u64>,
        page_size: Option<u64>,
    ) -> StoreResult<DocumentStream> {
        let snapshot = self.select(filter, page, page_size).await;
        Ok(stream::iter(snapshot.into_iter().map(Ok)).boxed())
    }

    async fn insert_one(&self, mut document: Document) -> StoreResult<Document> {
        let mut documents = self.documents.write().await;

        let id = match document.get(ID_FIELD) {
            Some(Value::String(id)) => id.clone(),
            Some(Value::Null) | None => {
                let id = Uuid::now_v7().to_string();
                document.insert(ID_FIELD.to_string(), Value::String(id.clone()));
                id
            }
            Some(other) => return Err(StoreError::InvalidId(other.to_string())),
        };

        if documents
            .iter()
            .any(|doc| doc.get(ID_FIELD).and_then(Value::as_str) == Some(id.as_str()))
        {
            return Err(StoreError::DuplicateId {
                collection: self.name.clone(),
                id,
            });
        }

        documents.push(document.clone());
        Ok(document)
    }

    async fn update_one(
        &self,
        filter: &Filter,
        document: Document,
    ) -> StoreResult<Option<Document>> {
        let mut documents = self.documents.write().await;

        Ok(documents
            .iter_mut()
            .find(|doc| is_match(doc, filter))
            .map(|stored| {
                merge(stored, document);
                stored.clone()
            }))
    }

    async fn update_many(&self, filter: &Filter, patch: Document) -> StoreResult<bool> {
        let mut documents = self.documents.write().await;
        let mut matched = false;

        for stored in documents.iter_mut().filter(|doc| is_match(doc, filter)) {
            merge(stored, patch.clone());
            matched = true;
        }

        Ok(matched)
    }

    async fn delete_one(&self, filter: &Filter) -> StoreResult<bool> {
        let mut documents = self.documents.write().await;

        match documents.iter().position(|doc| is_match(doc, filter)) {
            Some(index) => {
                documents.remove(index);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_many(&self, filter: &Filter) -> StoreResult<bool> {
        let mut documents = self.documents.write().await;
        let before = documents.len();
        documents.retain(|doc| !is_match(doc, filter));
        Ok(documents.len() != before)
    }
}
