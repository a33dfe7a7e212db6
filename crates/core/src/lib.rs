//! Core data-access logic for Finrep.
//!
//! This crate contains storage-agnostic building blocks with ZERO web or
//! database dependencies.
//!
//! # Modules
//!
//! - `cache` - Per-entry TTL cache with a background sweeper
//! - `pagination` - Ordering, slicing and metadata for list reads
//! - `query` - Schema descriptor tables, filter extraction and order fields

pub mod cache;
pub mod pagination;
pub mod query;
