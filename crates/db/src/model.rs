//! The contract a type fulfils to be stored through a [`DocumentDao`].
//!
//! [`DocumentDao`]: crate::dao::DocumentDao

use std::fmt::Display;

use finrep_core::query::Schema;
use serde::Serialize;
use serde::de::DeserializeOwned;
use uuid::Uuid;

use crate::dao::DaoError;

/// Ties a model to the collection it is stored in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CollectionBinding {
    /// Collection name.
    pub name: &'static str,
    /// Version of the document layout written to the collection.
    pub schema_version: u32,
}

impl CollectionBinding {
    /// Creates a binding.
    #[must_use]
    pub const fn new(name: &'static str, schema_version: u32) -> Self {
        Self {
            name,
            schema_version,
        }
    }

    /// Picks the single binding a DAO can be built over.
    ///
    /// Candidates naming the same collection collapse to the highest schema
    /// version. Candidates naming different collections are ambiguous.
    pub fn resolve(candidates: &[Self]) -> Result<Self, DaoError> {
        let Some(first) = candidates.first() else {
            return Err(DaoError::NoCollection);
        };

        if let Some(other) = candidates.iter().find(|c| c.name != first.name) {
            return Err(DaoError::AmbiguousCollection(format!(
                "{}, {}",
                first.name, other.name
            )));
        }

        Ok(candidates
            .iter()
            .copied()
            .max_by_key(|c| c.schema_version)
            .unwrap_or(*first))
    }
}

impl std::fmt::Display for CollectionBinding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}@v{}", self.name, self.schema_version)
    }
}

/// A document type with a storage identity.
///
/// The identity is `None` until the store assigns one on insert. It travels
/// on the wire under `_id`.
pub trait Model: Serialize + DeserializeOwned + Clone + Send + Sync + Schema + 'static {
    /// Typed identity.
    type Id: Copy + Into<Uuid> + From<Uuid> + Display + Send + Sync + 'static;

    /// Collections this type may be stored in.
    ///
    /// Unions of several models return the bindings of every member.
    fn bindings() -> Vec<CollectionBinding>;

    /// Returns the identity, if assigned.
    fn id(&self) -> Option<Self::Id>;

    /// Replaces the identity.
    fn set_id(&mut self, id: Option<Self::Id>);

    /// Detaches and returns the identity.
    fn take_id(&mut self) -> Option<Self::Id> {
        let id = self.id();
        self.set_id(None);
        id
    }
}
