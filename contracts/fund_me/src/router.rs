//! # Entry router
//!
//! Soroban has no bare value transfers, so the two implicit entry points of a
//! payable contract are explicit functions here: `receive` for a transfer with
//! no payload and `fallback` for one with a payload no other entry point
//! claims. Both are classified by [`route`] and forwarded by [`dispatch`] to
//! [`ledger::contribute`], the same path `fund` uses. There is no second copy
//! of the threshold or ledger logic.

use soroban_sdk::{Address, Bytes, Env};

use crate::ledger;
use crate::types::Entry;
use crate::Error;

/// Classify an incoming value transfer by its payload.
pub fn route(payload: &Bytes) -> Entry {
    if payload.is_empty() {
        Entry::Receive
    } else {
        Entry::Fallback
    }
}

/// Authenticate `funder` and forward the transfer to the ledger.
pub fn dispatch(env: &Env, funder: &Address, amount: i128, payload: Bytes) -> Result<(), Error> {
    funder.require_auth();
    let entry = route(&payload);
    ledger::contribute(env, funder, amount, entry, payload)
}
