//! Pagination types for list operations.
//!
//! These are plain value types. The algorithm that turns a list of items into
//! a [`Page`] lives in `finrep-core`.

use serde::{Deserialize, Serialize};

/// Direction applied to a page ordering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderDirection {
    /// Ascending order, or the original relative order when no field is given.
    #[default]
    Asc,
    /// Descending order, or the reversed original order when no field is given.
    Desc,
}

impl OrderDirection {
    /// Returns the wire value of the direction.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

impl std::fmt::Display for OrderDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Request parameters for paginated reads.
///
/// `limit == 0` means "no limit": everything from `skip` onwards is returned.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PaginationFilters {
    /// Number of items to skip.
    #[serde(default)]
    pub skip: usize,
    /// Maximum number of items to return (0 = unbounded).
    #[serde(default)]
    pub limit: usize,
    /// Wire name of the field to order by.
    #[serde(default)]
    pub order_by: Option<String>,
    /// Ordering direction.
    #[serde(default)]
    pub order_direction: OrderDirection,
}

impl PaginationFilters {
    /// Creates filters for a `skip`/`limit` window in ascending order.
    #[must_use]
    pub const fn new(skip: usize, limit: usize) -> Self {
        Self {
            skip,
            limit,
            order_by: None,
            order_direction: OrderDirection::Asc,
        }
    }

    /// Sets the field to order by.
    #[must_use]
    pub fn order_by(mut self, field: impl Into<String>) -> Self {
        self.order_by = Some(field.into());
        self
    }

    /// Sets the ordering direction.
    #[must_use]
    pub const fn direction(mut self, direction: OrderDirection) -> Self {
        self.order_direction = direction;
        self
    }
}

/// Pagination metadata.
///
/// `total_pages`, `has_next` and `current_page` are only exact when `skip` is
/// a multiple of `limit`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationMetadata {
    /// Total number of items before slicing.
    pub total_items: usize,
    /// Total number of pages (1 when unbounded).
    pub total_pages: usize,
    /// Whether items exist after this page.
    pub has_next: bool,
    /// Whether items exist before this page.
    pub has_previous: bool,
    /// 1-indexed page number derived from `skip` and `limit`.
    pub current_page: usize,
    /// Echoed request limit.
    pub limit: usize,
    /// Echoed request skip.
    pub skip: usize,
}

/// A page of items with its metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    /// The items in the current page.
    pub data: Vec<T>,
    /// Pagination metadata.
    pub metadata: PaginationMetadata,
}

impl<T> Page<T> {
    /// Splits the page into its items and metadata.
    #[must_use]
    pub fn into_parts(self) -> (Vec<T>, PaginationMetadata) {
        (self.data, self.metadata)
    }

    /// Maps every item of the page, keeping the metadata.
    #[must_use]
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            data: self.data.into_iter().map(f).collect(),
            metadata: self.metadata,
        }
    }
}

#[cfg(test)]
#[path = "pagination_tests.rs"]
mod tests;
