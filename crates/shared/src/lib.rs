//! Shared types, errors, and configuration for Finrep.
//!
//! This crate provides common types used across all other crates:
//! - Typed IDs for type-safe document references
//! - Pagination types for list operations
//! - Application-wide error types
//! - Configuration management

pub mod config;
pub mod error;
pub mod types;

pub use config::{AppConfig, CacheConfig, DatabaseConfig};
pub use error::{AppError, AppResult};
