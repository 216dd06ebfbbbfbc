//! Database layer — migrations, queries, and cursor management.

use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use tracing::info;

use crate::errors::Result;
use crate::events::{EventRecord, FundMeEvent};

/// Establish a SQLite connection pool and run pending migrations.
pub async fn init_pool(database_url: &str) -> Result<SqlitePool> {
    let url = if database_url.starts_with("sqlite:") {
        database_url.to_string()
    } else {
        format!("sqlite:{database_url}")
    };

    // Create the database file on first start.
    let options = SqliteConnectOptions::from_str(&url)?.create_if_missing(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;
    info!("Database migrations applied successfully");
    Ok(pool)
}

// ─────────────────────────────────────────────────────────
// Cursor helpers
// ─────────────────────────────────────────────────────────

/// Read the last-seen ledger from the cursor row.
/// Returns `0` when no cursor has been persisted yet.
pub async fn get_last_ledger(pool: &SqlitePool) -> Result<i64> {
    let row: Option<(i64,)> = sqlx::query_as("SELECT last_ledger FROM indexer_cursor WHERE id = 1")
        .fetch_optional(pool)
        .await?;
    Ok(row.map(|(v,)| v).unwrap_or(0))
}

/// Persist the last-seen ledger (and optionally a pagination cursor string).
pub async fn save_cursor(
    pool: &SqlitePool,
    last_ledger: i64,
    last_cursor: Option<&str>,
) -> Result<()> {
    sqlx::query("UPDATE indexer_cursor SET last_ledger = ?1, last_cursor = ?2 WHERE id = 1")
        .bind(last_ledger)
        .bind(last_cursor)
        .execute(pool)
        .await?;
    Ok(())
}

/// Read back the raw cursor string (used to resume pagination mid-ledger).
pub async fn get_cursor_string(pool: &SqlitePool) -> Result<Option<String>> {
    let row: Option<(Option<String>,)> =
        sqlx::query_as("SELECT last_cursor FROM indexer_cursor WHERE id = 1")
            .fetch_optional(pool)
            .await?;
    Ok(row.and_then(|(v,)| v))
}

// ─────────────────────────────────────────────────────────
// Event writes
// ─────────────────────────────────────────────────────────

/// Persist a batch of decoded events.  Events whose `event_id` is already
/// stored are silently ignored to make the indexer idempotent.
pub async fn insert_events(pool: &SqlitePool, events: &[FundMeEvent]) -> Result<usize> {
    let mut count = 0usize;
    for ev in events {
        let rows_affected = sqlx::query(
            r#"
            INSERT OR IGNORE INTO events
                (event_id, event_type, actor, amount, entry, memo, ledger, timestamp,
                 contract_id, tx_hash)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            "#,
        )
        .bind(&ev.event_id)
        .bind(&ev.event_type)
        .bind(&ev.actor)
        .bind(&ev.amount)
        .bind(&ev.entry)
        .bind(&ev.memo)
        .bind(ev.ledger)
        .bind(ev.timestamp)
        .bind(&ev.contract_id)
        .bind(&ev.tx_hash)
        .execute(pool)
        .await?
        .rows_affected();

        count += rows_affected as usize;
    }
    Ok(count)
}

// ─────────────────────────────────────────────────────────
// Event reads
// ─────────────────────────────────────────────────────────

/// Fetch all events where `actor` is the funder (or owner), oldest first.
pub async fn get_events_for_actor(pool: &SqlitePool, actor: &str) -> Result<Vec<EventRecord>> {
    let rows = sqlx::query_as::<_, EventRecord>(
        r#"
        SELECT id, event_id, event_type, actor, amount, entry, memo, ledger, timestamp,
               contract_id, tx_hash, created_at
        FROM   events
        WHERE  actor = ?1
        ORDER  BY ledger ASC, id ASC
        "#,
    )
    .bind(actor)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Fetch all events, ordered by ledger ascending.
pub async fn get_all_events(pool: &SqlitePool) -> Result<Vec<EventRecord>> {
    let rows = sqlx::query_as::<_, EventRecord>(
        r#"
        SELECT id, event_id, event_type, actor, amount, entry, memo, ledger, timestamp,
               contract_id, tx_hash, created_at
        FROM   events
        ORDER  BY ledger ASC, id ASC
        "#,
    )
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Fetch the events that make up the current funding round: everything after
/// the most recent withdrawal, oldest first.
pub async fn get_current_round(pool: &SqlitePool) -> Result<Vec<EventRecord>> {
    let rows = sqlx::query_as::<_, EventRecord>(
        r#"
        SELECT id, event_id, event_type, actor, amount, entry, memo, ledger, timestamp,
               contract_id, tx_hash, created_at
        FROM   events
        WHERE  id > COALESCE(
                   (SELECT MAX(id) FROM events WHERE event_type = 'withdrawn'), 0)
        ORDER  BY ledger ASC, id ASC
        "#,
    )
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn memory_pool() -> SqlitePool {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        sqlx::migrate!("./migrations").run(&pool).await.unwrap();
        pool
    }

    fn event(id: &str, kind: &str, actor: &str, amount: &str, ledger: i64) -> FundMeEvent {
        FundMeEvent {
            event_id: id.to_string(),
            event_type: kind.to_string(),
            actor: Some(actor.to_string()),
            amount: Some(amount.to_string()),
            entry: Some("fund".to_string()),
            memo: None,
            ledger,
            timestamp: 1_704_067_200,
            contract_id: "CONTRACT1".to_string(),
            tx_hash: Some(format!("tx-{id}")),
        }
    }

    #[tokio::test]
    async fn insert_is_idempotent() {
        let pool = memory_pool().await;
        let batch = vec![
            event("a", "funded", "GALICE", "1000000", 10),
            event("b", "funded", "GBOB", "1000000", 11),
        ];

        assert_eq!(insert_events(&pool, &batch).await.unwrap(), 2);
        assert_eq!(insert_events(&pool, &batch).await.unwrap(), 0);
        assert_eq!(get_all_events(&pool).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn cursor_round_trips() {
        let pool = memory_pool().await;
        assert_eq!(get_last_ledger(&pool).await.unwrap(), 0);
        assert_eq!(get_cursor_string(&pool).await.unwrap(), None);

        save_cursor(&pool, 42, Some("cursor-42")).await.unwrap();
        assert_eq!(get_last_ledger(&pool).await.unwrap(), 42);
        assert_eq!(
            get_cursor_string(&pool).await.unwrap().as_deref(),
            Some("cursor-42")
        );
    }

    #[tokio::test]
    async fn events_for_actor_are_filtered() {
        let pool = memory_pool().await;
        let batch = vec![
            event("a", "funded", "GALICE", "1000000", 10),
            event("b", "funded", "GBOB", "1000000", 11),
            event("c", "funded", "GALICE", "2000000", 12),
        ];
        insert_events(&pool, &batch).await.unwrap();

        let alice = get_events_for_actor(&pool, "GALICE").await.unwrap();
        assert_eq!(alice.len(), 2);
        assert!(alice.iter().all(|e| e.actor.as_deref() == Some("GALICE")));
        assert_eq!(alice[1].amount.as_deref(), Some("2000000"));
    }

    #[tokio::test]
    async fn current_round_starts_after_last_withdrawal() {
        let pool = memory_pool().await;
        let batch = vec![
            event("a", "funded", "GALICE", "1000000", 10),
            event("b", "withdrawn", "GOWNER", "1000000", 11),
            event("c", "funded", "GBOB", "3000000", 12),
        ];
        insert_events(&pool, &batch).await.unwrap();

        let round = get_current_round(&pool).await.unwrap();
        assert_eq!(round.len(), 1);
        assert_eq!(round[0].event_id, "c");
    }
}
