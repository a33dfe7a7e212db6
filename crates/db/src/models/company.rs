//! Companies.

use finrep_core::pagination::{SortValue, Sortable};
use finrep_core::query::{EnumMember, FieldDescriptor, FieldKind, Schema};
use finrep_shared::types::CompanyId;
use serde::{Deserialize, Serialize};

use crate::model::{CollectionBinding, Model};

/// Lifecycle state of a company. Deleting a company makes it inactive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CompanyStatus {
    /// Open for reporting.
    #[default]
    #[serde(rename = "active")]
    Active,
    /// Soft-deleted.
    #[serde(rename = "inactive")]
    Inactive,
}

impl CompanyStatus {
    /// Members as seen by the filter builder.
    pub const MEMBERS: &'static [EnumMember] = &[
        EnumMember::new("Active", "active"),
        EnumMember::new("Inactive", "inactive"),
    ];

    /// The primitive value stored for this status.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
        }
    }
}

/// A reporting company.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Company {
    /// Storage identity.
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<CompanyId>,
    /// Legal name.
    pub name: String,
    /// Tax registry code.
    pub rfc: String,
    /// Current status.
    #[serde(default)]
    pub status: CompanyStatus,
}

impl Company {
    /// Creates an active company without identity.
    pub fn new(name: impl Into<String>, rfc: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            rfc: rfc.into(),
            status: CompanyStatus::Active,
        }
    }

    /// Returns true unless the company was deleted.
    pub fn is_active(&self) -> bool {
        self.status == CompanyStatus::Active
    }
}

impl Schema for Company {
    const FIELDS: &'static [FieldDescriptor] = &[
        FieldDescriptor::new("id", FieldKind::Id).renamed("_id"),
        FieldDescriptor::new("name", FieldKind::Text),
        FieldDescriptor::new("rfc", FieldKind::Text),
        FieldDescriptor::new("status", FieldKind::Enum(CompanyStatus::MEMBERS)),
    ];
}

impl Sortable for Company {
    fn sort_value(&self, field: &str) -> Option<SortValue> {
        match field {
            "_id" => self.id.map(|id| id.into_inner().into()),
            "name" => Some(self.name.as_str().into()),
            "rfc" => Some(self.rfc.as_str().into()),
            "status" => Some(self.status.as_str().into()),
            _ => None,
        }
    }
}

impl Model for Company {
    type Id = CompanyId;

    fn bindings() -> Vec<CollectionBinding> {
        vec![CollectionBinding::new("company", 1)]
    }

    fn id(&self) -> Option<CompanyId> {
        self.id
    }

    fn set_id(&mut self, id: Option<CompanyId>) {
        self.id = id;
    }
}
