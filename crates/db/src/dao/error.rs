//! DAO error types.

use finrep_core::query::QueryError;
use thiserror::Error;

use crate::store::StoreError;

/// Errors raised by [`DocumentDao`](super::DocumentDao).
#[derive(Debug, Error)]
pub enum DaoError {
    /// The model declares no collection.
    #[error("Model is not bound to any collection")]
    NoCollection,

    /// The model maps to more than one collection.
    #[error("Model maps to several collections: {0}")]
    AmbiguousCollection(String),

    /// A value could not be turned into a document.
    #[error("Cannot encode document for {0}")]
    Encode(String),

    /// A stored document does not match the model.
    #[error("Cannot decode document from {collection}: {source}")]
    Decode {
        /// Collection the document came from.
        collection: String,
        /// Underlying serde error.
        #[source]
        source: serde_json::Error,
    },

    /// Invalid filter or pagination parameters.
    #[error(transparent)]
    Query(#[from] QueryError),

    /// Storage failure, passed through untouched.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Result type alias using `DaoError`.
pub type DaoResult<T> = Result<T, DaoError>;
