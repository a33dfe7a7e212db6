//! PostgreSQL document store.
//!
//! All collections share the `documents` table. The identity lives in the
//! `id` column and is spliced back into the body under `_id` on the way out.
//! Non-identity filters compile to JSONB containment on `body`.

use std::sync::Arc;

use async_trait::async_trait;
use futures::{StreamExt, TryStreamExt, stream};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, SqlErr,
};
use serde_json::Value;
use uuid::Uuid;

use super::{
    Document, DocumentCollection, DocumentStore, DocumentStream, Filter, ID_FIELD, StoreError,
    StoreResult, merge, page_window,
};
use crate::entities::documents;
use crate::model::CollectionBinding;

/// Rows fetched per round trip when streaming.
const STREAM_BATCH: u64 = 100;

/// Document store backed by the `documents` table.
#[derive(Debug, Clone)]
pub struct PgDocumentStore {
    db: DatabaseConnection,
}

impl PgDocumentStore {
    /// Creates a new store over an open connection.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

impl DocumentStore for PgDocumentStore {
    fn collection(&self, binding: &CollectionBinding) -> Arc<dyn DocumentCollection> {
        Arc::new(PgCollection {
            db: self.db.clone(),
            name: binding.name,
            schema_version: i32::try_from(binding.schema_version).unwrap_or(i32::MAX),
        })
    }
}

/// One collection inside the `documents` table.
#[derive(Debug, Clone)]
pub struct PgCollection {
    db: DatabaseConnection,
    name: &'static str,
    schema_version: i32,
}

impl PgCollection {
    fn condition(&self, filter: &Filter) -> StoreResult<Condition> {
        let mut condition = Condition::all().add(documents::Column::Collection.eq(self.name));
        let mut body = Filter::new();

        for (key, value) in filter {
            if key == ID_FIELD {
                condition = condition.add(documents::Column::Id.eq(parse_id(value)?));
            } else {
                body.insert(key.clone(), value.clone());
            }
        }

        if !body.is_empty() {
            condition = condition.add(Expr::cust_with_values(
                "body @> $1::jsonb",
                [Value::Object(body)],
            ));
        }

        Ok(condition)
    }

    async fn first(&self, filter: &Filter) -> StoreResult<Option<documents::Model>> {
        Ok(documents::Entity::find()
            .filter(self.condition(filter)?)
            .order_by_asc(documents::Column::CreatedAt)
            .order_by_asc(documents::Column::Id)
            .one(&self.db)
            .await?)
    }

    fn duplicate_or(&self, id: Uuid, err: DbErr) -> StoreError {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => StoreError::DuplicateId {
                collection: self.name.to_string(),
                id: id.to_string(),
            },
            _ => StoreError::Database(err),
        }
    }
}

fn parse_id(value: &Value) -> StoreResult<Uuid> {
    value
        .as_str()
        .and_then(|raw| Uuid::parse_str(raw).ok())
        .ok_or_else(|| StoreError::InvalidId(value.to_string()))
}

fn to_document(collection: &str, row: documents::Model) -> StoreResult<Document> {
    let Value::Object(mut body) = row.body else {
        return Err(StoreError::Malformed {
            collection: collection.to_string(),
            reason: format!("document {} is not an object", row.id),
        });
    };

    body.insert(ID_FIELD.to_string(), Value::String(row.id.to_string()));
    Ok(body)
}

struct Cursor {
    db: DatabaseConnection,
    collection: &'static str,
    condition: Condition,
    offset: u64,
    remaining: Option<u64>,
}

#[async_trait]
impl DocumentCollection for PgCollection {
    async fn find_one(&self, filter: &Filter) -> StoreResult<Option<Document>> {
        self.first(filter)
            .await?
            .map(|row| to_document(self.name, row))
            .transpose()
    }

    async fn find_many(
        &self,
        filter: &Filter,
        page: Option<u64>,
        page_size: Option<u64>,
    ) -> StoreResult<Vec<Document>> {
        let (offset, limit) = page_window(page, page_size);

        let rows = documents::Entity::find()
            .filter(self.condition(filter)?)
            .order_by_asc(documents::Column::CreatedAt)
            .order_by_asc(documents::Column::Id)
            .offset(offset)
            .limit(limit)
            .all(&self.db)
            .await?;

        rows.into_iter()
            .map(|row| to_document(self.name, row))
            .collect()
    }

    async fn find_stream(
        &self,
        filter: &Filter,
        page: Option<u64>,
        page_size: Option<u64>,
    ) -> StoreResult<DocumentStream> {
        let (offset, remaining) = page_window(page, page_size);
        let cursor = Cursor {
            db: self.db.clone(),
            collection: self.name,
            condition: self.condition(filter)?,
            offset,
            remaining,
        };

        let batches = stream::try_unfold(cursor, |mut cursor| async move {
            let batch = match cursor.remaining {
                Some(0) => return Ok::<_, StoreError>(None),
                Some(remaining) => remaining.min(STREAM_BATCH),
                None => STREAM_BATCH,
            };

            let rows = documents::Entity::find()
                .filter(cursor.condition.clone())
                .order_by_asc(documents::Column::CreatedAt)
                .order_by_asc(documents::Column::Id)
                .offset(cursor.offset)
                .limit(batch)
                .all(&cursor.db)
                .await?;

            if rows.is_empty() {
                return Ok(None);
            }

            let fetched = u64::try_from(rows.len()).unwrap_or(u64::MAX);
            cursor.offset = cursor.offset.saturating_add(fetched);
            cursor.remaining = cursor.remaining.map(|r| r.saturating_sub(fetched));

            let docs: Vec<StoreResult<Document>> = rows
                .into_iter()
                .map(|row| to_document(cursor.collection, row))
                .collect();

            Ok(Some((docs, cursor)))
        });

        Ok(batches.map_ok(stream::iter).try_flatten().boxed())
    }

    async fn insert_one(&self, mut document: Document) -> StoreResult<Document> {
        let id = match document.remove(ID_FIELD) {
            Some(Value::Null) | None => Uuid::now_v7(),
            Some(value) => parse_id(&value)?,
        };
        let now = chrono::Utc::now().into();

        let row = documents::ActiveModel {
            id: Set(id),
            collection: Set(self.name.to_string()),
            schema_version: Set(self.schema_version),
            body: Set(Value::Object(document)),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&self.db)
        .await
        .map_err(|err| self.duplicate_or(id, err))?;

        to_document(self.name, row)
    }

    async fn update_one(
        &self,
        filter: &Filter,
        document: Document,
    ) -> StoreResult<Option<Document>> {
        let Some(row) = self.first(filter).await? else {
            return Ok(None);
        };

        let Value::Object(mut body) = row.body.clone() else {
            return Err(StoreError::Malformed {
                collection: self.name.to_string(),
                reason: format!("document {} is not an object", row.id),
            });
        };
        merge(&mut body, document);

        let mut active: documents::ActiveModel = row.into();
        active.body = Set(Value::Object(body));
        active.updated_at = Set(chrono::Utc::now().into());
        let updated = active.update(&self.db).await?;

        to_document(self.name, updated).map(Some)
    }

    async fn update_many(&self, filter: &Filter, mut patch: Document) -> StoreResult<bool> {
        patch.remove(ID_FIELD);
        let now: sea_orm::prelude::DateTimeWithTimeZone = chrono::Utc::now().into();

        let result = documents::Entity::update_many()
            .col_expr(
                documents::Column::Body,
                Expr::cust_with_values("body || $1::jsonb", [Value::Object(patch)]),
            )
            .col_expr(documents::Column::UpdatedAt, Expr::value(now))
            .filter(self.condition(filter)?)
            .exec(&self.db)
            .await?;

        Ok(result.rows_affected > 0)
    }

    async fn delete_one(&self, filter: &Filter) -> StoreResult<bool> {
        let Some(row) = self.first(filter).await? else {
            return Ok(false);
        };

        let result = documents::Entity::delete_by_id(row.id)
            .exec(&self.db)
            .await?;

        Ok(result.rows_affected > 0)
    }

    async fn delete_many(&self, filter: &Filter) -> StoreResult<bool> {
        let result = documents::Entity::delete_many()
            .filter(self.condition(filter)?)
            .exec(&self.db)
            .await?;

        Ok(result.rows_affected > 0)
    }
}
