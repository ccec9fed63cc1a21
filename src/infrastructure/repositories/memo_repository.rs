use crate::domain::void::{CandidateFilter, ContentStoreGateway, Item, VoidError};
use crate::infrastructure::db::DbPool;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use std::sync::Arc;

#[derive(Debug, FromRow)]
struct MemoRow {
    id: String,
    title: String,
    summary: Option<String>,
    body: String,
    media_ref: Option<String>,
    duration_seconds: i32,
    created_at: DateTime<Utc>,
    tags: Vec<String>,
    like_count: i64,
    view_count: i64,
    author_id: Option<String>,
}

impl From<MemoRow> for Item {
    fn from(row: MemoRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            summary: row.summary,
            body: row.body,
            media_ref: row.media_ref,
            duration_seconds: row.duration_seconds.max(0) as u32,
            created_at: row.created_at,
            tags: row.tags,
            like_count: row.like_count.max(0) as u64,
            view_count: row.view_count.max(0) as u64,
            author_id: row.author_id,
        }
    }
}

/// Postgres-backed content store for the void feed
pub struct MemoRepository {
    pool: Arc<DbPool>,
}

impl MemoRepository {
    pub fn new(pool: Arc<DbPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ContentStoreGateway for MemoRepository {
    /// Newest memos matching the filter
    async fn fetch_candidates(&self, filter: &CandidateFilter) -> Result<Vec<Item>, VoidError> {
        let limit = i64::try_from(filter.max_count)
            .ok()
            .filter(|limit| *limit > 0)
            .ok_or_else(|| {
                VoidError::StoreQuery(format!("invalid max_count {}", filter.max_count))
            })?;

        let pool = self.pool.as_ref();
        let rows = sqlx::query_as::<_, MemoRow>(
            r#"
            SELECT id::text AS id, title, summary, body, media_ref, duration_seconds,
                   created_at, tags, like_count, view_count, author_id::text AS author_id
            FROM memos
            WHERE visibility = $1
              AND NOT (id::text = ANY($2))
            ORDER BY created_at DESC
            LIMIT $3
            "#,
        )
        .bind(filter.visibility.as_str())
        .bind(&filter.exclude_ids)
        .bind(limit)
        .fetch_all(pool)
        .await
        .map_err(store_error)?;

        tracing::debug!(
            requested = filter.max_count,
            excluded = filter.exclude_ids.len(),
            returned = rows.len(),
            "Fetched void candidates"
        );

        Ok(rows.into_iter().map(Item::from).collect())
    }

    async fn ping(&self) -> Result<(), VoidError> {
        sqlx::query("SELECT 1")
            .fetch_one(self.pool.as_ref())
            .await
            .map(|_| ())
            .map_err(store_error)
    }
}

/// Errors reported by Postgres itself mean the query was bad; anything
/// else (pool, I/O, TLS, protocol) means the store could not be reached.
fn store_error(err: sqlx::Error) -> VoidError {
    match err {
        sqlx::Error::Database(db_err) => VoidError::StoreQuery(db_err.to_string()),
        other @ (sqlx::Error::ColumnNotFound(_)
        | sqlx::Error::ColumnDecode { .. }
        | sqlx::Error::TypeNotFound { .. }) => VoidError::StoreQuery(other.to_string()),
        other => VoidError::StoreUnavailable(other.to_string()),
    }
}
