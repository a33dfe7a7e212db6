//! Sort keys extracted from domain models.

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

/// A totally ordered value a list can be sorted by.
///
/// Values of different variants never meet in practice since one field
/// always yields the same variant; the derived order between variants only
/// keeps `Ord` total.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SortValue {
    /// Boolean (`false < true`).
    Bool(bool),
    /// Signed integer.
    Integer(i64),
    /// Exact decimal amount.
    Decimal(Decimal),
    /// Text, compared lexicographically.
    Text(String),
    /// Calendar date.
    Date(NaiveDate),
    /// Instant in UTC.
    DateTime(DateTime<Utc>),
    /// Identifier.
    Uuid(Uuid),
}

impl From<bool> for SortValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for SortValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<i32> for SortValue {
    fn from(value: i32) -> Self {
        Self::Integer(i64::from(value))
    }
}

impl From<Decimal> for SortValue {
    fn from(value: Decimal) -> Self {
        Self::Decimal(value)
    }
}

impl From<String> for SortValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&str> for SortValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<NaiveDate> for SortValue {
    fn from(value: NaiveDate) -> Self {
        Self::Date(value)
    }
}

impl From<DateTime<Utc>> for SortValue {
    fn from(value: DateTime<Utc>) -> Self {
        Self::DateTime(value)
    }
}

impl From<Uuid> for SortValue {
    fn from(value: Uuid) -> Self {
        Self::Uuid(value)
    }
}

/// Gives the paginator access to a model's orderable fields.
pub trait Sortable {
    /// Returns the sort key of the field with the given wire name.
    ///
    /// `None` means the value is absent (or the field unknown); absent values
    /// sort before every present value.
    fn sort_value(&self, field: &str) -> Option<SortValue>;
}

impl<T: Sortable + ?Sized> Sortable for &T {
    fn sort_value(&self, field: &str) -> Option<SortValue> {
        (**self).sort_value(field)
    }
}

impl<T: Sortable + ?Sized> Sortable for Arc<T> {
    fn sort_value(&self, field: &str) -> Option<SortValue> {
        (**self).sort_value(field)
    }
}

impl<T: Sortable + ?Sized> Sortable for Box<T> {
    fn sort_value(&self, field: &str) -> Option<SortValue> {
        (**self).sort_value(field)
    }
}
