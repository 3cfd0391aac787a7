//! PostgreSQL repository integration tests
//!
//! Require a live database: set `TEST_DATABASE_URL` and run with
//! `cargo test -p chatrelay-integration-tests --test postgres_test -- --ignored`.

#![allow(dead_code)]

mod common;

use anyhow::Result;
use chatrelay_attachments::{Attachment, AttachmentRepository, AttachmentStore, NewAttachment};
use chatrelay_common::db;
use chatrelay_conversations::{
    ConversationQuery, ConversationsRepositories, Message, MessageRole,
};
use chrono::{Duration, Utc};
use sqlx::PgPool;
use uuid::Uuid;

/// Connect, migrate, and return the pool with a per-test session prefix
async fn setup() -> Result<(PgPool, String)> {
    let url = common::test_database_url()
        .ok_or_else(|| anyhow::anyhow!("TEST_DATABASE_URL is not set"))?;
    let pool = db::connect(&url).await?;
    sqlx::migrate!("../../migrations").run(&pool).await?;
    Ok((pool, format!("pgtest-{}", Uuid::new_v4().simple())))
}

/// Remove every row created under `prefix`
async fn cleanup(pool: &PgPool, prefix: &str) -> Result<()> {
    let pattern = format!("{prefix}%");
    sqlx::query("DELETE FROM messages WHERE session_id LIKE $1")
        .bind(&pattern)
        .execute(pool)
        .await?;
    sqlx::query("DELETE FROM conversations WHERE session_id LIKE $1")
        .bind(&pattern)
        .execute(pool)
        .await?;
    sqlx::query("DELETE FROM attachments WHERE session_id LIKE $1")
        .bind(&pattern)
        .execute(pool)
        .await?;
    Ok(())
}

#[tokio::test]
#[ignore = "requires TEST_DATABASE_URL"]
async fn test_upsert_turn_creates_then_overwrites() -> Result<()> {
    let (pool, prefix) = setup().await?;
    let repos = ConversationsRepositories::new(pool.clone());
    let session = format!("{prefix}-a");
    let t0 = Utc::now();

    let created = repos.conversations.upsert_turn(&session, "First", t0).await?;
    let updated = repos
        .conversations
        .upsert_turn(&session, "Second", t0 + Duration::seconds(1))
        .await?;

    assert_eq!(created.title, "First");
    assert_eq!(updated.title, "Second");
    assert_eq!(updated.created_at, created.created_at);
    assert!(updated.updated_at > created.updated_at);
    assert!(!updated.is_deleted);

    cleanup(&pool, &prefix).await
}

#[tokio::test]
#[ignore = "requires TEST_DATABASE_URL"]
async fn test_concurrent_upserts_keep_one_row() -> Result<()> {
    let (pool, prefix) = setup().await?;
    let repos = ConversationsRepositories::new(pool.clone());
    let session = format!("{prefix}-race");
    let now = Utc::now();

    let (a, b) = tokio::join!(
        repos.conversations.upsert_turn(&session, "Alpha", now),
        repos.conversations.upsert_turn(&session, "Beta", now),
    );
    a?;
    b?;

    let rows: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM conversations WHERE session_id = $1")
        .bind(&session)
        .fetch_one(&pool)
        .await?;
    assert_eq!(rows, 1);

    let conv = repos.conversations.find(&session).await?.unwrap();
    assert!(conv.title == "Alpha" || conv.title == "Beta");

    cleanup(&pool, &prefix).await
}

#[tokio::test]
#[ignore = "requires TEST_DATABASE_URL"]
async fn test_keyword_search_escapes_wildcards() -> Result<()> {
    let (pool, prefix) = setup().await?;
    let repos = ConversationsRepositories::new(pool.clone());
    let now = Utc::now();
    let plan = format!("{prefix} Project Plan");
    let discount = format!("{prefix} 100% off");
    let other = format!("{prefix} 1000 offers");
    repos.conversations.upsert_turn(&format!("{prefix}-1"), &plan, now).await?;
    repos.conversations.upsert_turn(&format!("{prefix}-2"), &discount, now).await?;
    repos.conversations.upsert_turn(&format!("{prefix}-3"), &other, now).await?;

    for keyword in [format!("{prefix} project plan"), format!("{prefix} PROJECT")] {
        let query = ConversationQuery {
            keyword: Some(keyword.clone()),
            offset: 0,
            limit: 10,
        };
        let found = repos.conversations.search(&query).await?;
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].title, plan);
        assert_eq!(repos.conversations.count(Some(&keyword)).await?, 1);
    }

    let literal = format!("{prefix} 100%");
    assert_eq!(repos.conversations.count(Some(&literal)).await?, 1);

    cleanup(&pool, &prefix).await
}

#[tokio::test]
#[ignore = "requires TEST_DATABASE_URL"]
async fn test_search_pages_disjoint_when_timestamps_tie() -> Result<()> {
    let (pool, prefix) = setup().await?;
    let repos = ConversationsRepositories::new(pool.clone());
    let title = format!("{prefix} tie");
    let at = Utc::now();
    for i in 0..15 {
        repos
            .conversations
            .upsert_turn(&format!("{prefix}-{i:02}"), &title, at)
            .await?;
    }

    let mut seen = std::collections::HashSet::new();
    for offset in [0, 10] {
        let query = ConversationQuery {
            keyword: Some(title.clone()),
            offset,
            limit: 10,
        };
        seen.extend(
            repos
                .conversations
                .search(&query)
                .await?
                .into_iter()
                .map(|c| c.session_id),
        );
    }
    assert_eq!(seen.len(), 15);

    cleanup(&pool, &prefix).await
}

#[tokio::test]
#[ignore = "requires TEST_DATABASE_URL"]
async fn test_messages_ordered_with_insertion_tiebreak() -> Result<()> {
    let (pool, prefix) = setup().await?;
    let repos = ConversationsRepositories::new(pool.clone());
    let session = format!("{prefix}-thread");
    let at = Utc::now();

    let mut user = Message::new_user(&session, "question", vec!["x".to_string()])?;
    let mut reply = Message::new_external_ai(&session, "answer", "gemini3")?;
    user.created_at = at;
    reply.created_at = at;
    repos.messages.create(&user).await?;
    repos.messages.create(&reply).await?;

    let thread = repos.messages.list_by_session(&session).await?;
    assert_eq!(thread.len(), 2);
    assert_eq!(thread[0].id, user.id);
    assert_eq!(thread[0].attachments, vec!["x"]);
    assert_eq!(thread[1].role, MessageRole::ExternalAi);
    assert_eq!(thread[1].sender_ai.as_deref(), Some("gemini3"));

    let counts = repos
        .messages
        .count_by_sessions(&[session.clone(), format!("{prefix}-none")])
        .await?;
    assert_eq!(counts.get(&session), Some(&2));
    assert_eq!(counts.len(), 1);

    cleanup(&pool, &prefix).await
}

#[tokio::test]
#[ignore = "requires TEST_DATABASE_URL"]
async fn test_attachment_round_trip() -> Result<()> {
    let (pool, prefix) = setup().await?;
    let store = AttachmentRepository::new(pool.clone());

    let attachment = Attachment::new(NewAttachment {
        original_name: "brief.pdf".to_string(),
        mime_type: "application/pdf".to_string(),
        size_bytes: 1024,
        storage_path: format!("{}.pdf", Uuid::new_v4()),
        session_id: Some(format!("{prefix}-files")),
    })?;
    let created = store.create(&attachment).await?;

    assert_eq!(store.find(created.id).await?.as_ref(), Some(&created));
    let many = store.find_many(&[created.id, Uuid::new_v4()]).await?;
    assert_eq!(many.len(), 1);
    assert!(created.message_id.is_none());

    cleanup(&pool, &prefix).await
}
