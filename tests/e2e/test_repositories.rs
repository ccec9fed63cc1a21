use crate::e2e::helpers;

use chrono::{DateTime, Duration, TimeZone, Utc};
use helpers::DbContext;
use pretty_assertions::assert_eq;
use sqlx::PgPool;
use std::collections::HashSet;
use test_context::test_context;
use uuid::Uuid;
use void_backend::domain::void::{
    CandidateFilter, ContentStoreGateway, IdentityResolver, Item, VoidError,
};
use void_backend::infrastructure::repositories::{MemoRepository, ProfileRepository};

fn at(minutes: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap() + Duration::minutes(minutes)
}

async fn insert_memo(
    pool: &PgPool,
    minutes: i64,
    visibility: &str,
    author_id: Option<Uuid>,
) -> String {
    let id = Uuid::new_v4();
    sqlx::query(
        r#"
        INSERT INTO memos (id, title, summary, body, media_ref, duration_seconds,
                           created_at, tags, like_count, view_count, author_id, visibility)
        VALUES ($1, $2, NULL, $3, $4, $5, $6, $7, $8, $9, $10, $11)
        "#,
    )
    .bind(id)
    .bind(format!("Memo at {minutes}"))
    .bind("<p>Spoken note</p>")
    .bind(format!("audio/{id}.m4a"))
    .bind(42_i32)
    .bind(at(minutes))
    .bind(vec!["void".to_string(), "night".to_string()])
    .bind(7_i64)
    .bind(19_i64)
    .bind(author_id)
    .bind(visibility)
    .execute(pool)
    .await
    .unwrap();
    id.to_string()
}

async fn insert_profile(pool: &PgPool, display_name: &str) -> Uuid {
    let id = Uuid::new_v4();
    sqlx::query("INSERT INTO profiles (id, display_name, avatar_ref) VALUES ($1, $2, $3)")
        .bind(id)
        .bind(display_name)
        .bind(format!("avatars/{id}.png"))
        .execute(pool)
        .await
        .unwrap();
    id
}

fn ids(items: &[Item]) -> Vec<String> {
    items.iter().map(|item| item.id.clone()).collect()
}

#[test_context(DbContext)]
#[tokio::test]
async fn it_should_return_newest_public_memos_up_to_the_limit(ctx: &DbContext) {
    let mut public = Vec::new();
    for minutes in 0..5 {
        public.push(insert_memo(&ctx.pool, minutes, "public", None).await);
    }
    insert_memo(&ctx.pool, 60, "private", None).await;
    let repo = MemoRepository::new(ctx.pool.clone());

    let items = repo
        .fetch_candidates(&CandidateFilter::discoverable(3))
        .await
        .unwrap();

    assert_eq!(
        ids(&items),
        vec![public[4].clone(), public[3].clone(), public[2].clone()]
    );
}

#[test_context(DbContext)]
#[tokio::test]
async fn it_should_skip_excluded_memos(ctx: &DbContext) {
    let mut public = Vec::new();
    for minutes in 0..4 {
        public.push(insert_memo(&ctx.pool, minutes, "public", None).await);
    }
    let repo = MemoRepository::new(ctx.pool.clone());
    let filter = CandidateFilter::discoverable(10)
        .excluding(vec![public[3].clone(), public[1].clone(), "unknown".to_string()]);

    let items = repo.fetch_candidates(&filter).await.unwrap();

    assert_eq!(ids(&items), vec![public[2].clone(), public[0].clone()]);
}

#[test_context(DbContext)]
#[tokio::test]
async fn it_should_return_nothing_when_everything_is_excluded(ctx: &DbContext) {
    let only = insert_memo(&ctx.pool, 0, "public", None).await;
    let repo = MemoRepository::new(ctx.pool.clone());

    let items = repo
        .fetch_candidates(&CandidateFilter::discoverable(4).excluding(vec![only]))
        .await
        .unwrap();

    assert!(items.is_empty());
}

#[test_context(DbContext)]
#[tokio::test]
async fn it_should_map_memo_columns(ctx: &DbContext) {
    let author = insert_profile(&ctx.pool, "Ada").await;
    let id = insert_memo(&ctx.pool, 5, "public", Some(author)).await;
    let repo = MemoRepository::new(ctx.pool.clone());

    let items = repo
        .fetch_candidates(&CandidateFilter::discoverable(1))
        .await
        .unwrap();

    let item = &items[0];
    assert_eq!(item.id, id);
    assert_eq!(item.title, "Memo at 5");
    assert_eq!(item.summary, None);
    assert_eq!(item.duration_seconds, 42);
    assert_eq!(item.created_at, at(5));
    assert_eq!(item.tags, vec!["void".to_string(), "night".to_string()]);
    assert_eq!(item.like_count, 7);
    assert_eq!(item.view_count, 19);
    assert_eq!(item.author_id, Some(author.to_string()));
}

#[test_context(DbContext)]
#[tokio::test]
async fn it_should_report_a_closed_pool_as_unavailable(ctx: &DbContext) {
    let repo = MemoRepository::new(ctx.pool.clone());
    repo.ping().await.unwrap();

    ctx.pool.close().await;

    assert!(matches!(repo.ping().await, Err(VoidError::StoreUnavailable(_))));
    assert!(matches!(
        repo.fetch_candidates(&CandidateFilter::discoverable(2)).await,
        Err(VoidError::StoreUnavailable(_))
    ));
}

#[test_context(DbContext)]
#[tokio::test]
async fn it_should_resolve_known_authors_only(ctx: &DbContext) {
    let ada = insert_profile(&ctx.pool, "Ada").await;
    let grace = insert_profile(&ctx.pool, "Grace").await;
    let repo = ProfileRepository::new(ctx.pool.clone());
    let requested: HashSet<String> = [
        ada.to_string(),
        grace.to_string(),
        Uuid::new_v4().to_string(),
        "not-a-uuid".to_string(),
    ]
    .into_iter()
    .collect();

    let authors = repo.resolve_authors(&requested).await.unwrap();

    assert_eq!(authors.len(), 2);
    let summary = &authors[&ada.to_string()];
    assert_eq!(summary.display_name.as_deref(), Some("Ada"));
    assert_eq!(summary.avatar_ref, Some(format!("avatars/{ada}.png")));
    assert_eq!(
        authors[&grace.to_string()].display_name.as_deref(),
        Some("Grace")
    );
}

#[test_context(DbContext)]
#[tokio::test]
async fn it_should_resolve_an_empty_set_without_querying(ctx: &DbContext) {
    let repo = ProfileRepository::new(ctx.pool.clone());
    ctx.pool.close().await;

    let authors = repo.resolve_authors(&HashSet::new()).await.unwrap();

    assert!(authors.is_empty());
}
