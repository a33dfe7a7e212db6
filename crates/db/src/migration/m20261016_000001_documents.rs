//! Documents migration.
//!
//! Creates the `documents` table holding every collection's JSON bodies.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(DOCUMENTS_SQL).await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared("DROP TABLE IF EXISTS documents CASCADE;")
            .await?;
        Ok(())
    }
}

const DOCUMENTS_SQL: &str = r"
CREATE EXTENSION IF NOT EXISTS pgcrypto;

-- One row per document, grouped by collection
CREATE TABLE documents (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    collection VARCHAR(100) NOT NULL,
    schema_version INTEGER NOT NULL DEFAULT 1,
    body JSONB NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_body_object CHECK (jsonb_typeof(body) = 'object'),
    CONSTRAINT chk_schema_version CHECK (schema_version > 0)
);

-- Storage order within a collection
CREATE INDEX idx_documents_collection ON documents(collection, created_at, id);

-- Containment filters on the body
CREATE INDEX idx_documents_body ON documents USING GIN (body jsonb_path_ops);
";
