//! Filter extraction and pagination binding for one model.

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, SecondsFormat};
use finrep_shared::types::{OrderDirection, PaginationFilters};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Value;
use uuid::Uuid;

use super::error::QueryError;
use super::order::OrderFields;
use super::schema::{EnumMember, FieldDescriptor, FieldKind, Schema};

/// Equality filters keyed by wire name.
pub type Filters = serde_json::Map<String, Value>;

/// Raw pagination parameters as received from a caller.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PaginationParams {
    /// Number of items to skip.
    #[serde(default)]
    pub skip: usize,
    /// Maximum number of items (0 = unbounded).
    #[serde(default)]
    pub limit: usize,
    /// Requested order field (wire name).
    #[serde(default)]
    pub order_by: Option<String>,
    /// Requested direction.
    #[serde(default)]
    pub order_direction: OrderDirection,
}

/// Binds pagination parameters for a listing that has no model.
///
/// Such listings only offer `skip`, `limit` and a direction.
pub fn model_less_pagination(params: PaginationParams) -> Result<PaginationFilters, QueryError> {
    if params.order_by.is_some() {
        return Err(QueryError::OrderingNotOffered);
    }

    Ok(PaginationFilters::new(params.skip, params.limit).direction(params.order_direction))
}

/// Query surfaces generated from a model's field table.
///
/// Build one per model and exclusion set at registration time and reuse it
/// for every request.
#[derive(Debug, Clone)]
pub struct ModelFilters {
    fields: Vec<FieldDescriptor>,
    order_fields: OrderFields,
}

impl ModelFilters {
    /// Builds the surfaces of a model, leaving out the `exclude`d fields.
    #[must_use]
    pub fn build<S: Schema>(exclude: &[&str]) -> Self {
        Self::from_fields(S::FIELDS, exclude)
    }

    /// Builds the surfaces of a field table.
    ///
    /// Exclusions match either the field name or its wire name and only
    /// affect filtering; ordering covers every orderable field.
    #[must_use]
    pub fn from_fields(fields: &[FieldDescriptor], exclude: &[&str]) -> Self {
        let filterable = fields
            .iter()
            .filter(|field| !exclude.iter().any(|name| field.is_named(name)))
            .copied()
            .collect();

        Self {
            fields: filterable,
            order_fields: OrderFields::from_fields(fields),
        }
    }

    /// Wire names accepted by [`ModelFilters::extract`].
    pub fn filter_fields(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.iter().map(FieldDescriptor::wire_name)
    }

    /// The order-by choices of the model.
    #[must_use]
    pub const fn order_fields(&self) -> &OrderFields {
        &self.order_fields
    }

    /// Turns raw query parameters into equality filters.
    ///
    /// Every parameter must name a filterable field; its value is parsed as
    /// the field's type. Enum fields accept a member name or value and are
    /// reduced to the member's primitive value. Empty values count as absent
    /// and are left out.
    pub fn extract<I, K, V>(&self, params: I) -> Result<Filters, QueryError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut filters = Filters::new();

        for (key, raw) in params {
            let field = self.field(key.as_ref())?;
            let raw = raw.as_ref();
            if raw.is_empty() {
                continue;
            }

            filters.insert(field.wire_name().to_owned(), parse_raw(field, raw)?);
        }

        Ok(filters)
    }

    /// Turns already-typed optional values into equality filters.
    ///
    /// `None` and JSON `null` are left out. Enum values are reduced to the
    /// member's primitive value.
    pub fn extract_values<I, K>(&self, values: I) -> Result<Filters, QueryError>
    where
        I: IntoIterator<Item = (K, Option<Value>)>,
        K: AsRef<str>,
    {
        let mut filters = Filters::new();

        for (key, value) in values {
            let field = self.field(key.as_ref())?;
            let Some(value) = value.filter(|value| !value.is_null()) else {
                continue;
            };

            let value = if let FieldKind::Enum(members) = field.kind {
                let Value::String(raw) = &value else {
                    return Err(invalid_enum(field, members, &value.to_string()));
                };
                Value::String(enum_value(field, members, raw)?.to_owned())
            } else {
                value
            };

            filters.insert(field.wire_name().to_owned(), value);
        }

        Ok(filters)
    }

    /// Validates pagination parameters against the model's order fields.
    ///
    /// When the model offers order fields and none is requested, the first
    /// declared one is used. When it offers none, any `order_by` is rejected.
    pub fn pagination(&self, params: PaginationParams) -> Result<PaginationFilters, QueryError> {
        let order_by = match params.order_by.as_deref() {
            Some(name) => Some(self.order_fields.parse(name)?),
            None => self.order_fields.first(),
        };

        let mut filters =
            PaginationFilters::new(params.skip, params.limit).direction(params.order_direction);
        filters.order_by = order_by.map(str::to_owned);

        Ok(filters)
    }

    fn field(&self, name: &str) -> Result<&FieldDescriptor, QueryError> {
        self.fields
            .iter()
            .find(|field| field.wire_name() == name)
            .ok_or_else(|| QueryError::UnknownField(name.to_owned()))
    }
}

fn parse_raw(field: &FieldDescriptor, raw: &str) -> Result<Value, QueryError> {
    let invalid = || QueryError::InvalidValue {
        field: field.wire_name().to_owned(),
        value: raw.to_owned(),
        expected: field.kind.type_name(),
    };

    let value = match field.kind {
        FieldKind::Text => Value::String(raw.to_owned()),
        FieldKind::Integer => Value::from(raw.parse::<i64>().map_err(|_| invalid())?),
        FieldKind::Decimal => {
            Value::String(Decimal::from_str(raw).map_err(|_| invalid())?.to_string())
        }
        FieldKind::Boolean => Value::Bool(raw.parse::<bool>().map_err(|_| invalid())?),
        FieldKind::Date => Value::String(
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .map_err(|_| invalid())?
                .to_string(),
        ),
        FieldKind::DateTime => Value::String(
            DateTime::parse_from_rfc3339(raw)
                .map_err(|_| invalid())?
                .to_utc()
                .to_rfc3339_opts(SecondsFormat::AutoSi, true),
        ),
        FieldKind::Id => Value::String(Uuid::parse_str(raw).map_err(|_| invalid())?.to_string()),
        FieldKind::Enum(members) => Value::String(enum_value(field, members, raw)?.to_owned()),
        FieldKind::Nested => serde_json::from_str(raw).map_err(|_| invalid())?,
    };

    Ok(value)
}

fn enum_value(
    field: &FieldDescriptor,
    members: &[EnumMember],
    raw: &str,
) -> Result<&'static str, QueryError> {
    members
        .iter()
        .find(|member| member.value == raw || member.name == raw)
        .map(|member| member.value)
        .ok_or_else(|| invalid_enum(field, members, raw))
}

fn invalid_enum(field: &FieldDescriptor, members: &[EnumMember], raw: &str) -> QueryError {
    QueryError::InvalidEnumValue {
        field: field.wire_name().to_owned(),
        value: raw.to_owned(),
        allowed: members
            .iter()
            .map(|member| member.value)
            .collect::<Vec<_>>()
            .join(", "),
    }
}
