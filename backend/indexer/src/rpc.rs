//! Stellar RPC access: paging through `getEvents` and decoding FundMe events.
//!
//! Requests ask for `xdrFormat: "json"`, so topics and data come back as
//! ScVal JSON in `topicJson` / `valueJson` and are flattened by [`scval`].
//!
//! ## Resilience
//!
//! * Network failures, HTTP 429 and RPC errors other than malformed-request
//!   codes are retried with an exponential back-off of up to
//!   [`MAX_BACKOFF_SECS`] seconds.
//! * Malformed-request codes are returned as [`IndexerError::RpcRejected`].
//!
//! [`scval`]: crate::scval

use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::config::Config;
use crate::errors::{IndexerError, Result};
use crate::events::{EventKind, FundMeEvent};
use crate::scval;

const MAX_BACKOFF_SECS: u64 = 60;
const INITIAL_BACKOFF_SECS: u64 = 2;

/// Invalid request, unknown method and invalid params.
const REJECTING_CODES: [i64; 3] = [-32600, -32601, -32602];

// ─────────────────────────────────────────────────────────
// JSON-RPC response shapes
// ─────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct RpcResponse {
    pub result: Option<EventsPage>,
    pub error: Option<RpcError>,
}

#[derive(Debug, Deserialize)]
pub struct RpcError {
    pub code: i64,
    pub message: String,
}

/// One page of `getEvents` output.
#[derive(Debug, Deserialize)]
pub struct EventsPage {
    pub events: Vec<RawEvent>,
    /// Continuation token; resumes right after the last event of this page.
    pub cursor: Option<String>,
    #[serde(rename = "latestLedger")]
    pub latest_ledger: Option<u64>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RawEvent {
    #[serde(rename = "topicJson", default)]
    pub topic: Vec<Value>,
    #[serde(rename = "valueJson", default)]
    pub value: Value,
    #[serde(rename = "contractId")]
    pub contract_id: Option<String>,
    #[serde(rename = "txHash")]
    pub tx_hash: Option<String>,
    pub id: Option<String>,
    pub ledger: Option<u64>,
    #[serde(rename = "ledgerClosedAt")]
    pub ledger_closed_at: Option<String>,
    #[serde(rename = "inSuccessfulContractCall")]
    pub in_successful_contract_call: Option<bool>,
}

// ─────────────────────────────────────────────────────────
// Paging
// ─────────────────────────────────────────────────────────

/// Where the next page begins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageStart<'a> {
    /// First page of a scan, inclusive.
    Ledger(u32),
    /// Continuation token returned with an earlier page.
    Cursor(&'a str),
}

/// `getEvents` for one contract.
pub struct EventSource<'a> {
    client: &'a Client,
    rpc_url: &'a str,
    contract_id: &'a str,
    limit: u32,
}

impl<'a> EventSource<'a> {
    pub fn new(client: &'a Client, config: &'a Config) -> Self {
        Self {
            client,
            rpc_url: &config.rpc_url,
            contract_id: &config.contract_id,
            limit: config.events_per_page,
        }
    }

    /// Fetch the page starting at `start`, retrying until the RPC answers
    /// with events or rejects the request.
    pub async fn next_page(&self, start: PageStart<'_>) -> Result<EventsPage> {
        let request = json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": "getEvents",
            "params": build_params(self.contract_id, start, self.limit),
        });
        let mut backoff = Backoff::new();

        loop {
            let attempt = match self.client.post(self.rpc_url).json(&request).send().await {
                Err(e) => Attempt::Retry(format!("request failed: {e}")),
                Ok(resp) if resp.status() == StatusCode::TOO_MANY_REQUESTS => {
                    Attempt::Retry("rate-limited".to_string())
                }
                Ok(resp) => settle(resp.json().await?),
            };

            match attempt {
                Attempt::Done(page) => {
                    debug!(
                        "Fetched {} events (latest_ledger={:?})",
                        page.events.len(),
                        page.latest_ledger
                    );
                    return Ok(page);
                }
                Attempt::Fail(err) => return Err(err),
                Attempt::Retry(reason) => {
                    let delay = backoff.next_delay();
                    warn!("getEvents {reason} (will retry in {}s)", delay.as_secs());
                    tokio::time::sleep(delay).await;
                }
            }
        }
    }
}

#[derive(Debug)]
enum Attempt {
    Done(EventsPage),
    Retry(String),
    Fail(IndexerError),
}

/// Classify a JSON-RPC body that arrived with a non-429 status.
fn settle(body: RpcResponse) -> Attempt {
    if let Some(err) = body.error {
        if REJECTING_CODES.contains(&err.code) {
            return Attempt::Fail(IndexerError::RpcRejected {
                code: err.code,
                message: err.message,
            });
        }
        return Attempt::Retry(format!("error {}: {}", err.code, err.message));
    }
    match body.result {
        Some(page) => Attempt::Done(page),
        None => Attempt::Fail(IndexerError::EmptyResult),
    }
}

/// Doubling delay between retries of one page.
#[derive(Debug)]
struct Backoff {
    secs: u64,
}

impl Backoff {
    fn new() -> Self {
        Self {
            secs: INITIAL_BACKOFF_SECS,
        }
    }

    fn next_delay(&mut self) -> Duration {
        let delay = Duration::from_secs(self.secs);
        self.secs = (self.secs * 2).min(MAX_BACKOFF_SECS);
        delay
    }
}

fn build_params(contract_id: &str, start: PageStart<'_>, limit: u32) -> Value {
    let mut params = json!({
        "filters": [
            {
                "type": "contract",
                "contractIds": [contract_id]
            }
        ],
        "pagination": {
            "limit": limit
        },
        "xdrFormat": "json"
    });

    match start {
        PageStart::Cursor(cursor) => params["pagination"]["cursor"] = json!(cursor),
        PageStart::Ledger(ledger) => params["startLedger"] = json!(ledger),
    }

    params
}

// ─────────────────────────────────────────────────────────
// Event decoding
// ─────────────────────────────────────────────────────────

/// Decoded contents of one page.
#[derive(Debug, Default)]
pub struct DecodedPage {
    pub events: Vec<FundMeEvent>,
    /// Events that could not be read as FundMe events and were dropped.
    pub rejected: usize,
}

/// Decode every event of a page, logging and counting the ones that fail.
pub fn decode_events(raw: &[RawEvent], contract_id: &str) -> DecodedPage {
    let mut page = DecodedPage::default();
    for (position, event) in raw.iter().enumerate() {
        match decode_event(event, position, contract_id) {
            Ok(Some(decoded)) => page.events.push(decoded),
            Ok(None) => {}
            Err(err) => {
                warn!("{err}");
                page.rejected += 1;
            }
        }
    }
    page
}

/// Decode one event.
///
/// `Ok(None)` for events of reverted calls, which never touched the ledger.
/// `position` is the index within the page, used for the fallback id.
pub fn decode_event(
    raw: &RawEvent,
    position: usize,
    contract_id: &str,
) -> Result<Option<FundMeEvent>> {
    if raw.in_successful_contract_call == Some(false) {
        return Ok(None);
    }

    let ledger = raw.ledger.unwrap_or(0) as i64;
    let event_id = raw.id.clone().unwrap_or_else(|| {
        format!(
            "{ledger}:{}:{position}",
            raw.tx_hash.as_deref().unwrap_or("-")
        )
    });
    let reject = |reason: String| IndexerError::undecodable(&event_id, reason);

    let topics = raw
        .topic
        .iter()
        .map(scval::plain)
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| reject(format!("topic: {e}")))?;
    let kind = match topics.first() {
        Some(Value::String(name)) => EventKind::from_topic(name),
        Some(other) => return Err(reject(format!("leading topic {other} is not a symbol"))),
        None => return Err(reject("no topics".to_string())),
    };
    // The second topic is the funder (or owner) address.
    let topic_actor = topics.get(1).and_then(Value::as_str).map(String::from);

    let data = scval::plain(&raw.value).map_err(|e| reject(format!("data: {e}")))?;
    let decoded = decode_data(&data, &kind);

    let actor = decoded.actor.or(topic_actor);
    match kind {
        EventKind::Funded if actor.is_none() || decoded.amount.is_none() => {
            return Err(reject("funded without funder or amount".to_string()));
        }
        EventKind::Withdrawn if decoded.amount.is_none() => {
            return Err(reject("withdrawn without amount".to_string()));
        }
        _ => {}
    }

    let timestamp = raw
        .ledger_closed_at
        .as_deref()
        .and_then(parse_iso_to_unix)
        .unwrap_or(0);

    Ok(Some(FundMeEvent {
        event_id,
        event_type: kind.as_str().to_string(),
        actor,
        amount: decoded.amount,
        entry: decoded.entry,
        memo: decoded.memo,
        ledger,
        timestamp,
        contract_id: raw
            .contract_id
            .clone()
            .unwrap_or_else(|| contract_id.to_string()),
        tx_hash: raw.tx_hash.clone(),
    }))
}

#[derive(Debug, Default)]
struct DecodedData {
    actor: Option<String>,
    amount: Option<String>,
    entry: Option<String>,
    memo: Option<String>,
}

/// Read the event payload struct once its ScVal tags are stripped.
fn decode_data(value: &Value, kind: &EventKind) -> DecodedData {
    match kind {
        EventKind::Funded => DecodedData {
            actor: extract_field(value, "funder"),
            amount: extract_field(value, "amount"),
            entry: value.get("entry").and_then(extract_variant),
            memo: extract_field(value, "payload").and_then(|p| decode_memo(&p)),
        },
        EventKind::Withdrawn => DecodedData {
            actor: extract_field(value, "owner"),
            amount: extract_field(value, "amount"),
            ..DecodedData::default()
        },
        EventKind::Unknown => DecodedData::default(),
    }
}

fn extract_field(value: &Value, key: &str) -> Option<String> {
    match value.get(key)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// A unit enum variant such as `Entry::Fallback` is a one-element vec
/// holding its name.
fn extract_variant(value: &Value) -> Option<String> {
    let name = match value {
        Value::String(s) => s.as_str(),
        Value::Array(items) => items.first()?.as_str()?,
        _ => return None,
    };
    Some(name.to_lowercase())
}

/// Render a hex-encoded fallback payload: text when it is printable UTF-8,
/// otherwise the normalised hex. Empty payloads carry no memo.
fn decode_memo(payload_hex: &str) -> Option<String> {
    let bytes = hex::decode(payload_hex).ok()?;
    if bytes.is_empty() {
        return None;
    }
    match String::from_utf8(bytes) {
        Ok(text) if !text.chars().any(char::is_control) => Some(text),
        Ok(text) => Some(hex::encode(text.as_bytes())),
        Err(err) => Some(hex::encode(err.into_bytes())),
    }
}

/// Parse an ISO-8601 timestamp string into a Unix epoch (seconds).
fn parse_iso_to_unix(s: &str) -> Option<i64> {
    use chrono::DateTime;
    DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|dt| dt.timestamp())
}

// ─────────────────────────────────────────────────────────
// Unit tests
// ─────────────────────────────────────────────────────────
