//! Generic document DAO.
//!
//! [`DocumentDao`] wraps one collection and exposes typed CRUD plus paged
//! reads. Reads go through a per-instance [`TtlCache`]; every successful
//! write clears that cache as a whole.

mod error;

#[cfg(test)]
mod tests;

use std::sync::Arc;
use std::time::Duration;

use finrep_core::cache::{CacheSweeper, TtlCache};
use finrep_core::pagination::{Page, PaginationFilters, Sortable, paginate};
use finrep_core::query::OrderFields;
use finrep_shared::CacheConfig;
use futures::stream::BoxStream;
use futures::{StreamExt, TryStreamExt};
use serde_json::Value;
use tokio::runtime::Handle;
use tracing::{debug, warn};

use crate::codec::{decode, encode};
use crate::model::{CollectionBinding, Model};
use crate::store::{Document, DocumentCollection, DocumentStore, Filter, ID_FIELD, StoreError};

pub use error::{DaoError, DaoResult};

/// Cache settings for a DAO instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DaoSettings {
    /// TTL of cached read results.
    pub default_ttl: Duration,
    /// Period of the background sweep. Zero disables it.
    pub sweep_interval: Duration,
    /// Maximum number of cached results.
    pub max_capacity: u64,
}

impl Default for DaoSettings {
    fn default() -> Self {
        Self::from(&CacheConfig::default())
    }
}

impl From<&CacheConfig> for DaoSettings {
    fn from(config: &CacheConfig) -> Self {
        Self {
            default_ttl: config.default_ttl(),
            sweep_interval: config.sweep_interval(),
            max_capacity: config.max_capacity,
        }
    }
}

#[derive(Clone)]
enum Cached<T> {
    Many(Arc<Vec<T>>),
    One(Arc<T>),
}

/// Typed access to the collection a [`Model`] is bound to.
pub struct DocumentDao<T: Model> {
    binding: CollectionBinding,
    collection: Arc<dyn DocumentCollection>,
    cache: TtlCache<Cached<T>>,
    sweeper: Option<CacheSweeper>,
    order_fields: OrderFields,
}

impl<T: Model> std::fmt::Debug for DocumentDao<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocumentDao")
            .field("binding", &self.binding)
            .field("order_fields", &self.order_fields)
            .field("cached", &self.cache.entry_count())
            .finish_non_exhaustive()
    }
}

impl<T: Model> DocumentDao<T> {
    /// Creates a DAO over the collection `binding` names in `store`.
    pub fn new<S>(store: &S, binding: CollectionBinding, settings: &DaoSettings) -> Self
    where
        S: DocumentStore + ?Sized,
    {
        Self::with_collection(store.collection(&binding), binding, settings)
    }

    /// Creates a DAO over the single collection `T` is bound to.
    ///
    /// Fails when `T` declares no collection or maps to several.
    pub fn for_model<S>(store: &S, settings: &DaoSettings) -> DaoResult<Self>
    where
        S: DocumentStore + ?Sized,
    {
        let binding = CollectionBinding::resolve(&T::bindings())?;
        Ok(Self::new(store, binding, settings))
    }

    /// Creates a DAO over an already opened collection.
    ///
    /// The sweeper only runs when a tokio runtime is available.
    pub fn with_collection(
        collection: Arc<dyn DocumentCollection>,
        binding: CollectionBinding,
        settings: &DaoSettings,
    ) -> Self {
        let cache = TtlCache::with_config(settings.max_capacity, settings.default_ttl);

        let sweeper = match Handle::try_current() {
            Ok(runtime) => Some(CacheSweeper::start_on(
                &runtime,
                cache.clone(),
                settings.sweep_interval,
            )),
            Err(_) => {
                warn!(collection = binding.name, "no tokio runtime, cache sweeping disabled");
                None
            }
        };

        debug!(collection = binding.name, version = binding.schema_version, "dao ready");

        Self {
            binding,
            collection,
            cache,
            sweeper,
            order_fields: OrderFields::of::<T>(),
        }
    }

    /// The collection this DAO is bound to.
    pub const fn binding(&self) -> CollectionBinding {
        self.binding
    }

    /// Orderable wire names of `T`.
    pub const fn order_fields(&self) -> &OrderFields {
        &self.order_fields
    }

    /// Drops every cached read result.
    pub fn clear_cache(&self) {
        debug!(collection = self.binding.name, "cache cleared");
        self.cache.clear();
    }

    /// Returns true while the background sweep task is alive.
    pub fn is_sweeping(&self) -> bool {
        self.sweeper.as_ref().is_some_and(CacheSweeper::is_running)
    }

    /// Stops the background sweep and waits for it to finish.
    ///
    /// Cached reads keep working afterwards; entries then expire lazily.
    pub async fn shutdown(&mut self) {
        if let Some(sweeper) = self.sweeper.as_mut() {
            sweeper.stop().await;
        }
    }

    fn cache_key(&self, method: &str, args: &str, filter: &Filter) -> String {
        // serde_json maps iterate in key order, so equal filters give equal keys
        format!(
            "{}:{method}:{args}:{}",
            self.binding.name,
            Value::Object(filter.clone())
        )
    }

    fn cached(&self, key: &str, use_cache: bool) -> Option<Cached<T>> {
        if !use_cache {
            return None;
        }

        let hit = self.cache.get(key);
        debug!(
            collection = self.binding.name,
            key,
            hit = hit.is_some(),
            "cache lookup"
        );
        hit
    }

    fn decode(&self, document: Document) -> DaoResult<T> {
        decode(self.binding.name, document)
    }

    fn encode_without_id(&self, entity: &T) -> DaoResult<Document> {
        let mut document = encode(self.binding.name, entity)?;
        document.remove(ID_FIELD);
        Ok(document)
    }

    fn id_filter(id: T::Id) -> Filter {
        let mut filter = Filter::new();
        filter.insert(ID_FIELD.to_string(), Value::String(id.to_string()));
        filter
    }

    /// Returns every document matching `filter`.
    ///
    /// `page` is 1-indexed and applies with `page_size`. With `use_cache`, a
    /// hit returns the very list cached earlier. The result is cached either
    /// way.
    pub async fn get_all(
        &self,
        filter: &Filter,
        page: Option<u64>,
        page_size: Option<u64>,
        use_cache: bool,
    ) -> DaoResult<Arc<Vec<T>>> {
        let args = format!("page={page:?},page_size={page_size:?}");
        let key = self.cache_key("get_all", &args, filter);

        if let Some(Cached::Many(items)) = self.cached(&key, use_cache) {
            return Ok(items);
        }

        let items = self
            .collection
            .find_many(filter, page, page_size)
            .await?
            .into_iter()
            .map(|document| self.decode(document))
            .collect::<DaoResult<Vec<T>>>()?;

        let items = Arc::new(items);
        self.cache.set(key, Cached::Many(Arc::clone(&items)));
        Ok(items)
    }

    /// Streams the documents matching `filter` without materialising them.
    ///
    /// Streamed reads bypass the cache.
    pub async fn get_all_stream(
        &self,
        filter: &Filter,
        page: Option<u64>,
        page_size: Option<u64>,
    ) -> DaoResult<BoxStream<'static, DaoResult<T>>> {
        let collection = self.binding.name;
        let documents = self
            .collection
            .find_stream(filter, page, page_size)
            .await?;

        Ok(documents
            .map_err(DaoError::from)
            .and_then(move |document| futures::future::ready(decode::<T>(collection, document)))
            .boxed())
    }

    /// Returns the document with the given identity.
    pub async fn get_by_id(&self, id: T::Id, use_cache: bool) -> DaoResult<Option<Arc<T>>> {
        let filter = Self::id_filter(id);
        let key = self.cache_key("get_by_id", &id.to_string(), &Filter::new());
        self.find_one(key, &filter, use_cache).await
    }

    /// Returns the first document matching `filter`.
    pub async fn get(&self, filter: &Filter, use_cache: bool) -> DaoResult<Option<Arc<T>>> {
        let key = self.cache_key("get", "", filter);
        self.find_one(key, filter, use_cache).await
    }

    async fn find_one(
        &self,
        key: String,
        filter: &Filter,
        use_cache: bool,
    ) -> DaoResult<Option<Arc<T>>> {
        if let Some(Cached::One(item)) = self.cached(&key, use_cache) {
            return Ok(Some(item));
        }

        let Some(document) = self.collection.find_one(filter).await? else {
            return Ok(None);
        };

        let item = Arc::new(self.decode(document)?);
        self.cache.set(key, Cached::One(Arc::clone(&item)));
        Ok(Some(item))
    }

    /// Reads every match of `filter`, then orders and slices it.
    ///
    /// `order_by` must be one of [`DocumentDao::order_fields`].
    pub async fn get_page(
        &self,
        filter: &Filter,
        pagination: &PaginationFilters,
        use_cache: bool,
    ) -> DaoResult<Page<T>>
    where
        T: Sortable,
    {
        if let Some(order_by) = pagination.order_by.as_deref().filter(|f| !f.is_empty()) {
            self.order_fields.parse(order_by)?;
        }

        let items = self.get_all(filter, None, None, use_cache).await?;
        Ok(paginate(items.as_slice(), pagination))
    }

    /// Inserts `entity` and returns it with the identity the store assigned.
    pub async fn create(&self, entity: T) -> DaoResult<T> {
        let document = self.encode_without_id(&entity)?;
        let result = self.collection.insert_one(document).await;

        self.clear_cache();
        self.decode(result?)
    }

    /// Overwrites the fields of the document with the given identity.
    ///
    /// Returns `None` when nothing matched.
    pub async fn update_by_id(&self, id: T::Id, mut entity: T) -> DaoResult<Option<T>> {
        let document = self.encode_without_id(&entity)?;

        if self.replace_one(&Self::id_filter(id), document).await?.is_none() {
            return Ok(None);
        }
        entity.set_id(Some(id));
        Ok(Some(entity))
    }

    /// Overwrites the fields of the first document matching `filter`.
    ///
    /// The identity of `entity` is not written. The returned value carries
    /// the identity of the document that was updated.
    pub async fn update(&self, mut entity: T, filter: &Filter) -> DaoResult<Option<T>> {
        let document = self.encode_without_id(&entity)?;

        let Some(stored) = self.replace_one(filter, document).await? else {
            return Ok(None);
        };
        entity.set_id(Some(self.stored_id(&stored)?));
        Ok(Some(entity))
    }

    async fn replace_one(&self, filter: &Filter, document: Document) -> DaoResult<Option<Document>> {
        let stored = self.collection.update_one(filter, document).await?;
        if stored.is_some() {
            self.clear_cache();
        }
        Ok(stored)
    }

    fn stored_id(&self, stored: &Document) -> DaoResult<T::Id> {
        let raw = match stored.get(ID_FIELD) {
            Some(Value::String(raw)) => raw,
            Some(other) => return Err(StoreError::InvalidId(other.to_string()).into()),
            None => {
                return Err(StoreError::Malformed {
                    collection: self.binding.name.to_owned(),
                    reason: format!("updated document has no {ID_FIELD}"),
                }
                .into());
            }
        };

        let id = uuid::Uuid::parse_str(raw).map_err(|_| StoreError::InvalidId(raw.clone()))?;
        Ok(<T::Id as From<uuid::Uuid>>::from(id))
    }

    /// Merges `patch` into every document matching `filter`.
    pub async fn update_many(&self, filter: &Filter, patch: Document) -> DaoResult<bool> {
        let matched = self.collection.update_many(filter, patch).await?;
        if matched {
            self.clear_cache();
        }
        Ok(matched)
    }

    /// Removes the document with the given identity.
    pub async fn delete_by_id(&self, id: T::Id) -> DaoResult<bool> {
        let removed = self.collection.delete_one(&Self::id_filter(id)).await?;
        if removed {
            self.clear_cache();
        }
        Ok(removed)
    }

    /// Removes every document matching `filter`.
    pub async fn delete(&self, filter: &Filter) -> DaoResult<bool> {
        let removed = self.collection.delete_many(filter).await?;
        if removed {
            self.clear_cache();
        }
        Ok(removed)
    }
}
