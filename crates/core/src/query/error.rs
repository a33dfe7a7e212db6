//! Query surface error types.

use thiserror::Error;

/// Errors raised while binding filter or pagination parameters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    /// The parameter does not name a filterable field.
    #[error("Unknown filter field: {0}")]
    UnknownField(String),

    /// The raw value does not parse as the field's type.
    #[error("Invalid value {value:?} for field {field}: expected {expected}")]
    InvalidValue {
        /// Wire name of the field.
        field: String,
        /// Raw value received.
        value: String,
        /// Expected type.
        expected: &'static str,
    },

    /// The value is neither a member name nor a member value of the enum.
    #[error("Invalid value {value:?} for field {field}: expected one of {allowed}")]
    InvalidEnumValue {
        /// Wire name of the field.
        field: String,
        /// Raw value received.
        value: String,
        /// Comma-separated member values.
        allowed: String,
    },

    /// The requested order field is not offered for this model.
    #[error("Cannot order by {0}")]
    UnknownOrderField(String),

    /// Ordering by field is not offered at all for this listing.
    #[error("Ordering by field is not available here")]
    OrderingNotOffered,
}
