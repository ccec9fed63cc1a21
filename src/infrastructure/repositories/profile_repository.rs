use crate::domain::void::{AuthorSummary, IdentityResolver, VoidError};
use crate::infrastructure::db::DbPool;
use async_trait::async_trait;
use sqlx::FromRow;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

#[derive(Debug, FromRow)]
struct ProfileRow {
    id: String,
    display_name: Option<String>,
    avatar_ref: Option<String>,
}

/// Resolves memo authors from the profiles table in a single query
pub struct ProfileRepository {
    pool: Arc<DbPool>,
}

impl ProfileRepository {
    pub fn new(pool: Arc<DbPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl IdentityResolver for ProfileRepository {
    async fn resolve_authors(
        &self,
        ids: &HashSet<String>,
    ) -> Result<HashMap<String, AuthorSummary>, VoidError> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let ids: Vec<String> = ids.iter().cloned().collect();
        let pool = self.pool.as_ref();
        let rows = sqlx::query_as::<_, ProfileRow>(
            r#"
            SELECT id::text AS id, display_name, avatar_ref
            FROM profiles
            WHERE id::text = ANY($1)
            "#,
        )
        .bind(&ids)
        .fetch_all(pool)
        .await
        .map_err(|e| VoidError::ResolverUnavailable(e.to_string()))?;

        tracing::debug!(requested = ids.len(), resolved = rows.len(), "Resolved void authors");

        Ok(rows
            .into_iter()
            .map(|row| {
                (
                    row.id,
                    AuthorSummary {
                        display_name: row.display_name,
                        avatar_ref: row.avatar_ref,
                    },
                )
            })
            .collect())
    }
}
