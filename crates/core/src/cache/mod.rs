//! Read cache for the document DAOs.
//!
//! A [`TtlCache`] keeps values for a per-entry time-to-live. Expired entries
//! are never returned; they are reclaimed lazily on read and eagerly by a
//! [`CacheSweeper`] running on its own tokio task.

pub mod sweeper;
pub mod ttl;

pub use sweeper::CacheSweeper;
pub use ttl::TtlCache;
