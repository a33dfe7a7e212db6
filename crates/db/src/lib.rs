//! Document storage and data access for Finrep.
//!
//! This crate provides:
//! - The document collection contract and its in-memory and PostgreSQL stores
//! - `SeaORM` entity and migrations backing the PostgreSQL store
//! - The generic [`DocumentDao`] with its read cache
//! - Financial domain models and the managers that consume them

pub mod codec;
pub mod dao;
pub mod entities;
pub mod managers;
pub mod migration;
pub mod model;
pub mod models;
pub mod store;

pub use dao::{DaoError, DaoResult, DaoSettings, DocumentDao};
pub use model::{CollectionBinding, Model};
pub use store::{
    Document, DocumentCollection, DocumentStore, Filter, MemoryStore, PgDocumentStore, StoreError,
};

use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};

use finrep_shared::DatabaseConfig;

/// Establishes a connection to the database.
///
/// # Errors
///
/// Returns an error if the connection cannot be established.
pub async fn connect(database_url: &str) -> Result<DatabaseConnection, DbErr> {
    Database::connect(database_url).await
}

/// Establishes a pooled connection using the application configuration.
///
/// # Errors
///
/// Returns an error if the connection cannot be established.
pub async fn connect_with(config: &DatabaseConfig) -> Result<DatabaseConnection, DbErr> {
    let mut options = ConnectOptions::new(config.url.clone());
    options
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .sqlx_logging(false);

    Database::connect(options).await
}
