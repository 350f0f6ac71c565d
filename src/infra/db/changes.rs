use async_trait::async_trait;
use sqlx::QueryBuilder;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::application::repos::{ChangeQueueRepo, NewChangeRecord, PageRequest, RepoError};
use crate::domain::entities::ChangeRecord;

use super::{PostgresChangeQueue, map_sqlx_error};

#[derive(sqlx::FromRow)]
struct ChangeRow {
    id: Uuid,
    entity_type: String,
    entity_id: Option<String>,
    created_at: OffsetDateTime,
    updated_at: OffsetDateTime,
}

impl From<ChangeRow> for ChangeRecord {
    fn from(row: ChangeRow) -> Self {
        Self {
            id: row.id,
            entity_type: row.entity_type,
            entity_id: row.entity_id,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[async_trait]
impl ChangeQueueRepo for PostgresChangeQueue {
    async fn find_pending(
        &self,
        entity_type: &str,
        entity_id: &str,
    ) -> Result<Option<ChangeRecord>, RepoError> {
        let row = sqlx::query_as::<_, ChangeRow>(
            r#"
            SELECT id, entity_type, entity_id, created_at, updated_at
              FROM cache_changes
             WHERE entity_type = $1 AND entity_id = $2
             ORDER BY created_at
             LIMIT 1
            "#,
        )
        .bind(entity_type)
        .bind(entity_id)
        .fetch_optional(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.map(ChangeRecord::from))
    }

    async fn create(&self, record: NewChangeRecord) -> Result<ChangeRecord, RepoError> {
        let row = sqlx::query_as::<_, ChangeRow>(
            r#"
            INSERT INTO cache_changes (entity_type, entity_id)
            VALUES ($1, $2)
            RETURNING id, entity_type, entity_id, created_at, updated_at
            "#,
        )
        .bind(&record.entity_type)
        .bind(&record.entity_id)
        .fetch_one(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.into())
    }

    async fn touch(&self, id: Uuid, updated_at: OffsetDateTime) -> Result<(), RepoError> {
        let result = sqlx::query(
            r#"
            UPDATE cache_changes
               SET updated_at = $2
             WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(updated_at)
        .execute(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        if result.rows_affected() == 0 {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }

    async fn list_pending(&self, page: PageRequest) -> Result<Vec<ChangeRecord>, RepoError> {
        let rows = sqlx::query_as::<_, ChangeRow>(
            r#"
            SELECT id, entity_type, entity_id, created_at, updated_at
              FROM cache_changes
             ORDER BY created_at, id
             LIMIT $1 OFFSET $2
            "#,
        )
        .bind(i64::from(page.limit))
        .bind(page.offset() as i64)
        .fetch_all(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(ChangeRecord::from).collect())
    }

    async fn has_pending(&self) -> Result<bool, RepoError> {
        let exists: (bool,) =
            sqlx::query_as(r#"SELECT EXISTS (SELECT 1 FROM cache_changes)"#)
                .fetch_one(self.pool())
                .await
                .map_err(map_sqlx_error)?;

        Ok(exists.0)
    }

    async fn delete(&self, ids: &[Uuid]) -> Result<u64, RepoError> {
        if ids.is_empty() {
            return Ok(0);
        }

        let mut qb = QueryBuilder::new("DELETE FROM cache_changes WHERE id IN (");
        let mut separated = qb.separated(", ");
        for id in ids {
            separated.push_bind(id);
        }
        separated.push_unseparated(")");

        let result = qb
            .build()
            .execute(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Ok(result.rows_affected())
    }
}
