//! Declarative field tables.

/// One member of an enum-valued field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnumMember {
    /// Symbolic name of the member.
    pub name: &'static str,
    /// Primitive value stored and filtered on.
    pub value: &'static str,
}

impl EnumMember {
    /// Creates an enum member descriptor.
    #[must_use]
    pub const fn new(name: &'static str, value: &'static str) -> Self {
        Self { name, value }
    }
}

/// Declared type of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// UTF-8 text.
    Text,
    /// Signed integer.
    Integer,
    /// Exact decimal, stored as a string.
    Decimal,
    /// Boolean.
    Boolean,
    /// Calendar date (`YYYY-MM-DD`).
    Date,
    /// RFC 3339 instant.
    DateTime,
    /// UUID reference.
    Id,
    /// Closed set of primitive values.
    Enum(&'static [EnumMember]),
    /// Embedded document or list.
    Nested,
}

impl FieldKind {
    /// Returns true if values of this kind have a total order.
    ///
    /// Enums order by their primitive value.
    #[must_use]
    pub const fn is_orderable(self) -> bool {
        !matches!(self, Self::Nested)
    }

    /// Human-readable type name used in error messages.
    #[must_use]
    pub const fn type_name(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Integer => "integer",
            Self::Decimal => "decimal",
            Self::Boolean => "boolean",
            Self::Date => "date (YYYY-MM-DD)",
            Self::DateTime => "RFC 3339 datetime",
            Self::Id => "UUID",
            Self::Enum(_) => "enum",
            Self::Nested => "JSON",
        }
    }
}

/// Describes one field of a model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDescriptor {
    /// Field name in the Rust model.
    pub name: &'static str,
    /// External name, when it differs from `name`.
    pub wire_name: Option<&'static str>,
    /// Declared type.
    pub kind: FieldKind,
    /// False when the field is withheld from ordering.
    pub sortable: bool,
}

impl FieldDescriptor {
    /// Creates a descriptor whose wire name equals its name.
    #[must_use]
    pub const fn new(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            wire_name: None,
            kind,
            sortable: true,
        }
    }

    /// Sets the external name of the field.
    #[must_use]
    pub const fn renamed(mut self, wire_name: &'static str) -> Self {
        self.wire_name = Some(wire_name);
        self
    }

    /// Withholds the field from ordering regardless of its kind.
    #[must_use]
    pub const fn unordered(mut self) -> Self {
        self.sortable = false;
        self
    }

    /// Returns true if the field can be offered as an order-by choice.
    #[must_use]
    pub const fn is_orderable(&self) -> bool {
        self.sortable && self.kind.is_orderable()
    }

    /// Returns the external name, falling back to the field name.
    #[must_use]
    pub const fn wire_name(&self) -> &'static str {
        match self.wire_name {
            Some(wire_name) => wire_name,
            None => self.name,
        }
    }

    /// Returns true if `name` is the field name or its wire name.
    #[must_use]
    pub fn is_named(&self, name: &str) -> bool {
        self.name == name || self.wire_name() == name
    }
}

/// A model with a static field table.
pub trait Schema {
    /// Every field of the model, in declaration order.
    const FIELDS: &'static [FieldDescriptor];
}
