//! Users.

use finrep_core::pagination::{SortValue, Sortable};
use finrep_core::query::{FieldDescriptor, FieldKind, Schema};
use finrep_shared::types::UserId;
use serde::{Deserialize, Serialize};

use crate::model::{CollectionBinding, Model};

/// A login account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Storage identity.
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<UserId>,
    /// Unique login name.
    pub username: String,
    /// Password hash, never the password itself.
    pub password_hash: String,
}

impl User {
    /// Creates a user without identity.
    pub fn new(username: impl Into<String>, password_hash: impl Into<String>) -> Self {
        Self {
            id: None,
            username: username.into(),
            password_hash: password_hash.into(),
        }
    }
}

impl Schema for User {
    const FIELDS: &'static [FieldDescriptor] = &[
        FieldDescriptor::new("id", FieldKind::Id).renamed("_id"),
        FieldDescriptor::new("username", FieldKind::Text),
        FieldDescriptor::new("password_hash", FieldKind::Text).unordered(),
    ];
}

impl Sortable for User {
    fn sort_value(&self, field: &str) -> Option<SortValue> {
        match field {
            "_id" => self.id.map(|id| id.into_inner().into()),
            "username" => Some(self.username.as_str().into()),
            _ => None,
        }
    }
}

impl Model for User {
    type Id = UserId;

    fn bindings() -> Vec<CollectionBinding> {
        vec![CollectionBinding::new("user", 1)]
    }

    fn id(&self) -> Option<UserId> {
        self.id
    }

    fn set_id(&mut self, id: Option<UserId>) {
        self.id = id;
    }
}
