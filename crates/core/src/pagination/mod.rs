//! Ordering, slicing and metadata for list reads.
//!
//! The engine works on whatever list the storage returned. It never mutates
//! the input: ordering is computed as an index permutation and only the
//! requested window is cloned out.

pub mod paginator;
pub mod sort;

#[cfg(test)]
mod props;

pub use finrep_shared::types::{OrderDirection, Page, PaginationFilters, PaginationMetadata};
pub use paginator::{effective_limit, paginate, pagination_metadata};
pub use sort::{SortValue, Sortable};
