//! Off-chain replay of the contract ledger.
//!
//! Replaying `funded` and `withdrawn` events in order reproduces what the
//! contract reports through `get_address_to_amount_funded` and its contributor
//! log: amounts accumulate per funder and a withdrawal zeroes everything.

use serde::Serialize;
use tracing::warn;

use crate::events::{EventKind, EventRecord};

/// Per-funder standing since the last withdrawal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FunderTotal {
    pub funder: String,
    /// Sum of contributions, as a decimal string (i128 range).
    pub total: String,
    /// Number of contributor-log entries for this funder.
    pub contributions: u32,
}

/// Replay `records` (ordered oldest first) into the current ledger.
///
/// Funders are returned in order of their first log entry. Records with an
/// unparseable amount, or whose amount would overflow the funder's total, are
/// skipped.
pub fn funder_totals(records: &[EventRecord]) -> Vec<FunderTotal> {
    let mut totals: Vec<(String, i128, u32)> = Vec::new();

    for record in records {
        match EventKind::from_topic(&record.event_type) {
            EventKind::Withdrawn => totals.clear(),
            EventKind::Funded => {
                let (Some(funder), Some(amount)) = (
                    record.actor.as_deref(),
                    record.amount.as_deref().and_then(|a| a.parse::<i128>().ok()),
                ) else {
                    continue;
                };
                match totals.iter_mut().find(|entry| entry.0 == funder) {
                    Some(entry) => match entry.1.checked_add(amount) {
                        Some(total) => {
                            entry.1 = total;
                            entry.2 += 1;
                        }
                        None => warn!(
                            "Skipping event {}: total for {funder} overflows i128",
                            record.event_id
                        ),
                    },
                    None => totals.push((funder.to_string(), amount, 1)),
                }
            }
            EventKind::Unknown => {}
        }
    }

    totals
        .into_iter()
        .map(|(funder, total, contributions)| FunderTotal {
            funder,
            total: total.to_string(),
            contributions,
        })
        .collect()
}
