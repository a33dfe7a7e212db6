//! DAO unit tests against a mocked collection.

use std::sync::Arc;

use finrep_core::pagination::{OrderDirection, SortValue};
use finrep_core::query::{FieldDescriptor, FieldKind, QueryError, Schema};
use futures::TryStreamExt;
use mockall::predicate::always;
use sea_orm::DbErr;
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use super::*;
use crate::store::{MockDocumentCollection, StoreError};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Widget {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    id: Option<Uuid>,
    name: String,
    size: i64,
}

impl Widget {
    fn new(name: &str, size: i64) -> Self {
        Self {
            id: None,
            name: name.to_string(),
            size,
        }
    }
}

impl Schema for Widget {
    const FIELDS: &'static [FieldDescriptor] = &[
        FieldDescriptor::new("id", FieldKind::Id).renamed("_id"),
        FieldDescriptor::new("name", FieldKind::Text),
        FieldDescriptor::new("size", FieldKind::Integer),
    ];
}

impl Sortable for Widget {
    fn sort_value(&self, field: &str) -> Option<SortValue> {
        match field {
            "_id" => self.id.map(SortValue::from),
            "name" => Some(self.name.as_str().into()),
            "size" => Some(self.size.into()),
            _ => None,
        }
    }
}

impl Model for Widget {
    type Id = Uuid;

    fn bindings() -> Vec<CollectionBinding> {
        vec![CollectionBinding::new("widget", 1)]
    }

    fn id(&self) -> Option<Uuid> {
        self.id
    }

    fn set_id(&mut self, id: Option<Uuid>) {
        self.id = id;
    }
}

fn doc(value: serde_json::Value) -> Document {
    value.as_object().cloned().unwrap()
}

fn widget_docs() -> Vec<Document> {
    vec![
        doc(json!({ "_id": Uuid::now_v7().to_string(), "name": "c", "size": 3 })),
        doc(json!({ "_id": Uuid::now_v7().to_string(), "name": "a", "size": 1 })),
        doc(json!({ "_id": Uuid::now_v7().to_string(), "name": "b", "size": 2 })),
    ]
}

fn dao(collection: MockDocumentCollection) -> DocumentDao<Widget> {
    DocumentDao::with_collection(
        Arc::new(collection),
        CollectionBinding::new("widget", 1),
        &DaoSettings::default(),
    )
}

#[tokio::test]
async fn test_cache_hit_skips_storage() {
    let mut collection = MockDocumentCollection::new();
    collection
        .expect_find_many()
        .times(1)
        .returning(|_, _, _| Ok(widget_docs()));
    let dao = dao(collection);

    let first = dao.get_all(&Filter::new(), None, None, true).await.unwrap();
    let second = dao.get_all(&Filter::new(), None, None, true).await.unwrap();

    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(second.len(), 3);
}

#[tokio::test]
async fn test_without_use_cache_always_queries() {
    let mut collection = MockDocumentCollection::new();
    collection
        .expect_find_many()
        .times(2)
        .returning(|_, _, _| Ok(widget_docs()));
    let dao = dao(collection);

    dao.get_all(&Filter::new(), None, None, false).await.unwrap();
    dao.get_all(&Filter::new(), None, None, false).await.unwrap();
}

#[tokio::test]
async fn test_uncached_read_still_fills_cache() {
    let mut collection = MockDocumentCollection::new();
    collection
        .expect_find_many()
        .times(1)
        .returning(|_, _, _| Ok(widget_docs()));
    let dao = dao(collection);

    let fresh = dao.get_all(&Filter::new(), None, None, false).await.unwrap();
    let cached = dao.get_all(&Filter::new(), None, None, true).await.unwrap();

    assert!(Arc::ptr_eq(&fresh, &cached));
}

#[tokio::test]
async fn test_distinct_filters_use_distinct_keys() {
    let mut collection = MockDocumentCollection::new();
    collection
        .expect_find_many()
        .times(3)
        .returning(|_, _, _| Ok(widget_docs()));
    let dao = dao(collection);

    let by_name = doc(json!({ "name": "a" }));
    dao.get_all(&Filter::new(), None, None, true).await.unwrap();
    dao.get_all(&by_name, None, None, true).await.unwrap();
    dao.get_all(&by_name, Some(1), Some(2), true).await.unwrap();
    dao.get_all(&by_name, None, None, true).await.unwrap();
}

#[tokio::test]
async fn test_storage_errors_propagate_unchanged() {
    let mut collection = MockDocumentCollection::new();
    collection
        .expect_find_many()
        .returning(|_, _, _| Err(StoreError::Database(DbErr::Custom("boom".to_string()))));
    let dao = dao(collection);

    let result = dao.get_all(&Filter::new(), None, None, true).await;

    assert!(matches!(
        result,
        Err(DaoError::Store(StoreError::Database(DbErr::Custom(msg)))) if msg == "boom"
    ));
}

#[tokio::test]
async fn test_create_clears_cache() {
    let mut collection = MockDocumentCollection::new();
    collection
        .expect_find_many()
        .times(2)
        .returning(|_, _, _| Ok(widget_docs()));
    collection.expect_insert_one().times(1).returning(|mut document| {
        document.insert(ID_FIELD.to_string(), json!(Uuid::now_v7().to_string()));
        Ok(document)
    });
    let dao = dao(collection);

    dao.get_all(&Filter::new(), None, None, true).await.unwrap();
    let created = dao.create(Widget::new("d", 4)).await.unwrap();
    dao.get_all(&Filter::new(), None, None, true).await.unwrap();

    assert!(created.id.is_some());
    assert_eq!(created.name, "d");
}

#[tokio::test]
async fn test_create_never_sends_identity() {
    let mut collection = MockDocumentCollection::new();
    collection
        .expect_insert_one()
        .withf(|document| !document.contains_key(ID_FIELD))
        .returning(|mut document| {
            document.insert(ID_FIELD.to_string(), json!(Uuid::now_v7().to_string()));
            Ok(document)
        });
    let dao = dao(collection);

    let mut widget = Widget::new("d", 4);
    widget.id = Some(Uuid::now_v7());

    dao.create(widget).await.unwrap();
}

#[tokio::test]
async fn test_update_reattaches_identity() {
    let id = Uuid::now_v7();
    let mut collection = MockDocumentCollection::new();
    collection
        .expect_update_one()
        .withf(move |filter, document| {
            filter.get(ID_FIELD) == Some(&json!(id.to_string())) && !document.contains_key(ID_FIELD)
        })
        .returning(move |_, mut document| {
            document.insert(ID_FIELD.to_string(), json!(id.to_string()));
            Ok(Some(document))
        });
    let dao = dao(collection);

    let updated = dao
        .update_by_id(id, Widget::new("renamed", 9))
        .await
        .unwrap()
        .unwrap();

    assert_eq!(updated.id, Some(id));
    assert_eq!(updated.name, "renamed");
}

#[tokio::test]
async fn test_update_by_id_keeps_known_identity() {
    let id = Uuid::now_v7();
    let mut collection = MockDocumentCollection::new();
    collection
        .expect_update_one()
        .returning(|_, document| Ok(Some(document)));
    let dao = dao(collection);

    let updated = dao
        .update_by_id(id, Widget::new("renamed", 9))
        .await
        .unwrap()
        .unwrap();

    assert_eq!(updated.id, Some(id));
}

#[tokio::test]
async fn test_update_by_filter_rejects_stored_document_without_identity() {
    let mut collection = MockDocumentCollection::new();
    collection
        .expect_update_one()
        .returning(|_, document| Ok(Some(document)));
    let dao = dao(collection);

    let result = dao
        .update(Widget::new("renamed", 9), &doc(json!({ "name": "a" })))
        .await;

    assert!(matches!(result, Err(DaoError::Store(StoreError::Malformed { .. }))));
}

#[tokio::test]
async fn test_update_by_filter_rejects_unparseable_identity() {
    let mut collection = MockDocumentCollection::new();
    collection.expect_update_one().returning(|_, mut document| {
        document.insert(ID_FIELD.to_string(), json!("not-a-uuid"));
        Ok(Some(document))
    });
    let dao = dao(collection);

    let result = dao
        .update(Widget::new("renamed", 9), &doc(json!({ "name": "a" })))
        .await;

    assert!(matches!(result, Err(DaoError::Store(StoreError::InvalidId(raw))) if raw == "not-a-uuid"));
}

#[tokio::test]
async fn test_update_without_match_keeps_cache() {
    let mut collection = MockDocumentCollection::new();
    collection
        .expect_find_many()
        .times(1)
        .returning(|_, _, _| Ok(widget_docs()));
    collection.expect_update_one().returning(|_, _| Ok(None));
    let dao = dao(collection);

    dao.get_all(&Filter::new(), None, None, true).await.unwrap();
    let updated = dao
        .update_by_id(Uuid::now_v7(), Widget::new("x", 0))
        .await
        .unwrap();
    dao.get_all(&Filter::new(), None, None, true).await.unwrap();

    assert!(updated.is_none());
}

#[tokio::test]
async fn test_delete_reports_removal() {
    let mut collection = MockDocumentCollection::new();
    collection
        .expect_delete_one()
        .with(always())
        .returning(|_| Ok(false));
    collection
        .expect_delete_many()
        .with(always())
        .returning(|_| Ok(true));
    let dao = dao(collection);

    assert!(!dao.delete_by_id(Uuid::now_v7()).await.unwrap());
    assert!(dao.delete(&doc(json!({ "name": "a" }))).await.unwrap());
}

#[tokio::test]
async fn test_get_by_id_absent_is_not_cached() {
    let mut collection = MockDocumentCollection::new();
    collection.expect_find_one().times(2).returning(|_| Ok(None));
    let dao = dao(collection);

    let id = Uuid::now_v7();
    assert!(dao.get_by_id(id, true).await.unwrap().is_none());
    assert!(dao.get_by_id(id, true).await.unwrap().is_none());
}

#[tokio::test]
async fn test_get_by_id_hit_returns_same_value() {
    let id = Uuid::now_v7();
    let mut collection = MockDocumentCollection::new();
    collection
        .expect_find_one()
        .times(1)
        .returning(move |_| Ok(Some(doc(json!({ "_id": id.to_string(), "name": "a", "size": 1 })))));
    let dao = dao(collection);

    let first = dao.get_by_id(id, true).await.unwrap().unwrap();
    let second = dao.get_by_id(id, true).await.unwrap().unwrap();

    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(first.id, Some(id));
}

#[tokio::test]
async fn test_decode_failure_names_collection() {
    let mut collection = MockDocumentCollection::new();
    collection
        .expect_find_one()
        .returning(|_| Ok(Some(doc(json!({ "name": "a" })))));
    let dao = dao(collection);

    let result = dao.get(&Filter::new(), false).await;

    assert!(matches!(result, Err(DaoError::Decode { collection, .. }) if collection == "widget"));
}

#[tokio::test]
async fn test_get_page_orders_and_slices() {
    let mut collection = MockDocumentCollection::new();
    collection
        .expect_find_many()
        .withf(|_, page, page_size| page.is_none() && page_size.is_none())
        .returning(|_, _, _| Ok(widget_docs()));
    let dao = dao(collection);

    let pagination = PaginationFilters::new(0, 2).order_by("size");
    let page = dao.get_page(&Filter::new(), &pagination, false).await.unwrap();

    let sizes: Vec<i64> = page.data.iter().map(|w| w.size).collect();
    assert_eq!(sizes, vec![1, 2]);
    assert_eq!(page.metadata.total_items, 3);
    assert_eq!(page.metadata.total_pages, 2);
    assert!(page.metadata.has_next);
}

#[tokio::test]
async fn test_get_page_rejects_unknown_order_field() {
    let collection = MockDocumentCollection::new();
    let dao = dao(collection);

    let pagination = PaginationFilters::new(0, 2)
        .order_by("colour")
        .direction(OrderDirection::Desc);
    let result = dao.get_page(&Filter::new(), &pagination, false).await;

    assert!(matches!(
        result,
        Err(DaoError::Query(QueryError::UnknownOrderField(field))) if field == "colour"
    ));
}

#[tokio::test]
async fn test_stream_decodes_lazily() {
    let mut collection = MockDocumentCollection::new();
    collection.expect_find_stream().returning(|_, _, _| {
        Ok(futures::stream::iter(widget_docs().into_iter().map(Ok)).boxed())
    });
    let dao = dao(collection);

    let widgets: Vec<Widget> = dao
        .get_all_stream(&Filter::new(), None, None)
        .await
        .unwrap()
        .try_collect()
        .await
        .unwrap();

    let names: Vec<&str> = widgets.iter().map(|w| w.name.as_str()).collect();
    assert_eq!(names, vec!["c", "a", "b"]);
}

#[tokio::test]
async fn test_for_model_resolves_binding() {
    let store = crate::store::MemoryStore::new();

    let mut dao = DocumentDao::<Widget>::for_model(&store, &DaoSettings::default()).unwrap();

    assert_eq!(dao.binding().name, "widget");
    assert_eq!(dao.order_fields().iter().collect::<Vec<_>>(), vec!["_id", "name", "size"]);
    dao.shutdown().await;
}

#[test]
fn test_settings_follow_cache_config() {
    let config = CacheConfig {
        default_ttl_secs: 5,
        sweep_interval_secs: 0,
        max_capacity: 12,
    };

    let settings = DaoSettings::from(&config);

    assert_eq!(settings.default_ttl, Duration::from_secs(5));
    assert!(settings.sweep_interval.is_zero());
    assert_eq!(settings.max_capacity, 12);
}

#[test]
fn test_construction_outside_runtime_has_no_sweeper() {
    let dao = dao(MockDocumentCollection::new());
    assert!(dao.sweeper.is_none());
}
