//! The document collection contract.
//!
//! A store hands out one [`DocumentCollection`] per [`CollectionBinding`].
//! Collections speak untyped JSON documents; typing happens in the DAO.
//! Every document carries its identity under [`ID_FIELD`] and the store,
//! never the caller, assigns it.

pub mod memory;
pub mod postgres;

use std::sync::Arc;

use async_trait::async_trait;
use futures::stream::BoxStream;
use sea_orm::DbErr;
use serde_json::Value;
use thiserror::Error;

use crate::model::CollectionBinding;

pub use memory::MemoryStore;
pub use postgres::PgDocumentStore;

/// A stored document.
pub type Document = serde_json::Map<String, Value>;

/// Top-level equality filters keyed by wire name.
pub type Filter = finrep_core::query::Filters;

/// Lazily produced documents.
pub type DocumentStream = BoxStream<'static, StoreResult<Document>>;

/// Result type alias using `StoreError`.
pub type StoreResult<T> = Result<T, StoreError>;

/// Wire name of the identity field.
pub const ID_FIELD: &str = "_id";

/// Storage-layer errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),

    /// A stored row is not a JSON object.
    #[error("Malformed document in {collection}: {reason}")]
    Malformed {
        /// Collection name.
        collection: String,
        /// What is wrong with it.
        reason: String,
    },

    /// An identity value is not a UUID.
    #[error("Invalid document id: {0}")]
    InvalidId(String),

    /// A document with the same identity already exists.
    #[error("Duplicate document id {id} in {collection}")]
    DuplicateId {
        /// Collection name.
        collection: String,
        /// The conflicting id.
        id: String,
    },
}

/// Async access to one collection of documents.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DocumentCollection: Send + Sync {
    /// Returns the first document matching `filter`.
    async fn find_one(&self, filter: &Filter) -> StoreResult<Option<Document>>;

    /// Returns the matching documents in storage order.
    ///
    /// `page` is 1-indexed and only applies together with `page_size`;
    /// without `page_size` every match is returned.
    async fn find_many(
        &self,
        filter: &Filter,
        page: Option<u64>,
        page_size: Option<u64>,
    ) -> StoreResult<Vec<Document>>;

    /// Like [`DocumentCollection::find_many`] but yields documents lazily.
    async fn find_stream(
        &self,
        filter: &Filter,
        page: Option<u64>,
        page_size: Option<u64>,
    ) -> StoreResult<DocumentStream>;

    /// Inserts a document and returns it with its assigned identity.
    async fn insert_one(&self, document: Document) -> StoreResult<Document>;

    /// Merges `document` into the first match and returns the stored result.
    ///
    /// The identity field of `document`, if any, is ignored.
    async fn update_one(&self, filter: &Filter, document: Document)
    -> StoreResult<Option<Document>>;

    /// Merges `patch` into every match. Returns whether anything matched.
    async fn update_many(&self, filter: &Filter, patch: Document) -> StoreResult<bool>;

    /// Removes the first match. Returns whether anything was removed.
    async fn delete_one(&self, filter: &Filter) -> StoreResult<bool>;

    /// Removes every match. Returns whether anything was removed.
    async fn delete_many(&self, filter: &Filter) -> StoreResult<bool>;
}

/// A connection handing out collections.
pub trait DocumentStore: Send + Sync {
    /// Returns the collection behind `binding`.
    fn collection(&self, binding: &CollectionBinding) -> Arc<dyn DocumentCollection>;
}

/// Resolves a 1-indexed page request into an offset and an optional limit.
pub(crate) fn page_window(page: Option<u64>, page_size: Option<u64>) -> (u64, Option<u64>) {
    match page_size.filter(|size| *size > 0) {
        Some(size) => {
            let page = page.unwrap_or(1).max(1);
            ((page - 1).saturating_mul(size), Some(size))
        }
        None => (0, None),
    }
}

/// Merges `patch` into `target`, leaving the identity untouched.
pub(crate) fn merge(target: &mut Document, patch: Document) {
    for (key, value) in patch {
        if key != ID_FIELD {
            target.insert(key, value);
        }
    }
}
