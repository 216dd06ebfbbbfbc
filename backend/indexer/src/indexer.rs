//! Background task that pages through FundMe events and stores them.
//!
//! The resume point is persisted after every page, in the same order as the
//! events it covers, so a restart neither skips nor re-reads a page. Re-reads
//! that do happen are absorbed by the idempotent insert.

use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use sqlx::SqlitePool;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use crate::config::Config;
use crate::db;
use crate::errors::Result;
use crate::rpc::{self, EventSource, EventsPage, PageStart};

pub struct IndexerState {
    pub pool: SqlitePool,
    pub config: Config,
    pub client: Client,
}

/// Resume point of the scan.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Cursor {
    /// Highest ledger known to be covered.
    ledger: u32,
    /// RPC continuation token, preferred over `ledger` when present.
    token: Option<String>,
}

impl Cursor {
    /// Read the persisted cursor, starting at `start_ledger` on a fresh database.
    async fn load(pool: &SqlitePool, start_ledger: u32) -> Self {
        let ledger = match db::get_last_ledger(pool).await {
            Ok(stored) if stored > 0 => u32::try_from(stored).unwrap_or(start_ledger),
            Ok(_) => start_ledger,
            Err(e) => {
                warn!("Could not read stored ledger, starting at {start_ledger}: {e}");
                start_ledger
            }
        };
        let token = db::get_cursor_string(pool).await.unwrap_or_else(|e| {
            warn!("Could not read stored cursor: {e}");
            None
        });
        Self { ledger, token }
    }

    fn page_start(&self) -> PageStart<'_> {
        match &self.token {
            Some(token) => PageStart::Cursor(token),
            None => PageStart::Ledger(self.ledger),
        }
    }

    /// The cursor after `page` has been stored. The ledger never moves back.
    fn after(&self, page: &EventsPage) -> Self {
        let latest = page
            .latest_ledger
            .and_then(|l| u32::try_from(l).ok())
            .unwrap_or(self.ledger);
        Self {
            ledger: latest.max(self.ledger),
            token: page.cursor.clone().or_else(|| self.token.clone()),
        }
    }

    async fn save(&self, pool: &SqlitePool) -> Result<()> {
        db::save_cursor(pool, i64::from(self.ledger), self.token.as_deref()).await
    }
}

/// Counters for one poll, logged when anything arrived.
#[derive(Debug, Default, PartialEq, Eq)]
struct PollStats {
    fetched: usize,
    stored: usize,
    rejected: usize,
}

/// Spawn the indexer loop as a background [`tokio`] task.
///
/// Runs until `shutdown` is cancelled; an in-flight poll is allowed to finish
/// so the persisted cursor always matches the stored events.
pub async fn run(state: Arc<IndexerState>, shutdown: CancellationToken) {
    info!("Indexer starting — contract: {}", state.config.contract_id);

    let mut cursor = Cursor::load(&state.pool, state.config.start_ledger).await;
    info!("Resuming from ledger {}", cursor.ledger);

    let source = EventSource::new(&state.client, &state.config);

    loop {
        match poll_once(&state.pool, &source, &state.config.contract_id, &cursor).await {
            Ok((next, stats)) => {
                if stats.fetched > 0 {
                    info!(
                        "Polled {} raw events → {} new records stored, {} rejected",
                        stats.fetched, stats.stored, stats.rejected
                    );
                }
                cursor = next;
            }
            Err(e) => {
                error!("Indexer poll error: {e}");
            }
        }

        tokio::select! {
            _ = shutdown.cancelled() => {
                info!("Indexer stopping at ledger {}", cursor.ledger);
                return;
            }
            _ = tokio::time::sleep(Duration::from_secs(state.config.poll_interval_secs)) => {}
        }
    }
}

/// Fetch, decode and store one page, then persist the advanced cursor.
async fn poll_once(
    pool: &SqlitePool,
    source: &EventSource<'_>,
    contract_id: &str,
    cursor: &Cursor,
) -> Result<(Cursor, PollStats)> {
    let page = source.next_page(cursor.page_start()).await?;

    let mut stats = PollStats {
        fetched: page.events.len(),
        ..PollStats::default()
    };
    if !page.events.is_empty() {
        let decoded = rpc::decode_events(&page.events, contract_id);
        stats.rejected = decoded.rejected;
        stats.stored = db::insert_events(pool, &decoded.events).await?;
    }

    let next = cursor.after(&page);
    next.save(pool).await?;
    Ok((next, stats))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(cursor: Option<&str>, latest_ledger: Option<u64>) -> EventsPage {
        EventsPage {
            events: Vec::new(),
            cursor: cursor.map(String::from),
            latest_ledger,
        }
    }

    #[test]
    fn first_page_starts_at_ledger() {
        let cursor = Cursor {
            ledger: 500,
            token: None,
        };
        assert_eq!(cursor.page_start(), PageStart::Ledger(500));
    }

    #[test]
    fn continues_from_returned_token() {
        let cursor = Cursor {
            ledger: 500,
            token: None,
        };
        let next = cursor.after(&page(Some("tok-1"), Some(640)));
        assert_eq!(next.ledger, 640);
        assert_eq!(next.page_start(), PageStart::Cursor("tok-1"));
    }

    #[test]
    fn ledger_never_moves_back() {
        let cursor = Cursor {
            ledger: 900,
            token: Some("tok-1".to_string()),
        };
        let next = cursor.after(&page(None, Some(100)));
        assert_eq!(next.ledger, 900);
        assert_eq!(next.token.as_deref(), Some("tok-1"));
    }

    #[test]
    fn out_of_range_latest_ledger_is_ignored() {
        let cursor = Cursor {
            ledger: 7,
            token: None,
        };
        assert_eq!(cursor.after(&page(None, Some(u64::MAX))).ledger, 7);
    }

    #[tokio::test]
    async fn cursor_survives_restart() {
        let pool = sqlx::sqlite::SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        sqlx::migrate!("./migrations").run(&pool).await.unwrap();

        let fresh = Cursor::load(&pool, 42).await;
        assert_eq!(
            fresh,
            Cursor {
                ledger: 42,
                token: None
            }
        );

        let next = fresh.after(&page(Some("tok-9"), Some(1200)));
        next.save(&pool).await.unwrap();
        assert_eq!(Cursor::load(&pool, 42).await, next);
    }
}
