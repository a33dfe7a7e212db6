//! Schema descriptor tables and the query surfaces built from them.
//!
//! Every model declares a static [`FieldDescriptor`] table. At registration
//! time [`ModelFilters`] turns that table into a filter-extraction function
//! and a closed set of [`OrderFields`]; nothing is introspected per request.

pub mod error;
pub mod filters;
pub mod order;
pub mod schema;


pub use error::QueryError;
pub use filters::{Filters, ModelFilters, PaginationParams, model_less_pagination};
pub use order::OrderFields;
pub use schema::{EnumMember, FieldDescriptor, FieldKind, Schema};
