//! Closed sets of order-by choices.

use super::error::QueryError;
use super::schema::{FieldDescriptor, Schema};

/// The orderable fields of a model, keyed by wire name.
///
/// Built once from the model's field table; requests are validated against
/// it before reaching the paginator.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderFields {
    names: Vec<&'static str>,
}

impl OrderFields {
    /// Collects the orderable fields of a field table, in declaration order.
    #[must_use]
    pub fn from_fields(fields: &[FieldDescriptor]) -> Self {
        let names = fields
            .iter()
            .filter(|field| field.is_orderable())
            .map(FieldDescriptor::wire_name)
            .collect();

        Self { names }
    }

    /// Collects the orderable fields of a model.
    #[must_use]
    pub fn of<S: Schema>() -> Self {
        Self::from_fields(S::FIELDS)
    }

    /// Returns true when no field can be ordered by.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Number of choices.
    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// The first declared choice, used as the default ordering.
    #[must_use]
    pub fn first(&self) -> Option<&'static str> {
        self.names.first().copied()
    }

    /// Returns true if `name` is one of the choices.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|candidate| *candidate == name)
    }

    /// Iterates over the choices.
    pub fn iter(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.names.iter().copied()
    }

    /// Validates an order-by choice.
    pub fn parse(&self, name: &str) -> Result<&'static str, QueryError> {
        if self.is_empty() {
            return Err(QueryError::OrderingNotOffered);
        }

        self.names
            .iter()
            .copied()
            .find(|candidate| *candidate == name)
            .ok_or_else(|| QueryError::UnknownOrderField(name.to_owned()))
    }
}
