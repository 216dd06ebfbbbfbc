//! # Storage
//!
//! Provides typed helpers over Soroban's two storage tiers used by FundMe:
//!
//! ## Instance storage (contract-lifetime TTL)
//!
//! | Key         | Type              | Description                         |
//! |-------------|-------------------|-------------------------------------|
//! | `Owner`     | `Address`         | Sole identity allowed to withdraw   |
//! | `PriceFeed` | `Address`         | Oracle queried for the latest rate  |
//! | `Settings`  | `FundingSettings` | Token, precisions and minimum       |
//! | `Round`     | `u32`             | Current funding round               |
//!
//! `Owner`, `PriceFeed` and `Settings` are written by the constructor and
//! never again. `Round` starts at 0 and is bumped by every withdrawal.
//! Instance TTL is bumped by **7 days** whenever it falls below 1 day remaining.
//!
//! ## Persistent storage (per-entry TTL)
//!
//! | Key                     | Type           | Description                        |
//! |-------------------------|----------------|------------------------------------|
//! | `Funders`               | `Vec<Address>` | Contributor log, one entry per fund |
//! | `AmountFunded(round, address)` | `i128`  | Cumulative amount within a round   |
//!
//! Persistent TTL is bumped by **30 days** whenever it falls below 7 days remaining.
//!
//! Amounts are keyed by round, so a withdrawal zeroes every funder by moving
//! to the next round: it never touches per-funder entries and its write count
//! does not depend on how many addresses funded. Entries of past rounds are
//! never read again and lapse with their TTL.

use soroban_sdk::{contracttype, Address, Env, Vec};

use crate::types::FundingSettings;
use crate::Error;

// ── TTL Constants ────────────────────────────────────────────────────

/// Approximate ledgers per day (~5 seconds per ledger).
const DAY_IN_LEDGERS: u32 = 17_280;

/// Instance storage: bump by 7 days when below 1 day remaining.
const INSTANCE_BUMP_AMOUNT: u32 = 7 * DAY_IN_LEDGERS;
const INSTANCE_LIFETIME_THRESHOLD: u32 = DAY_IN_LEDGERS;

/// Persistent storage: bump by 30 days when below 7 days remaining.
const PERSISTENT_BUMP_AMOUNT: u32 = 30 * DAY_IN_LEDGERS;
const PERSISTENT_LIFETIME_THRESHOLD: u32 = 7 * DAY_IN_LEDGERS;

// ── Storage Keys ─────────────────────────────────────────────────────

/// All contract storage keys.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum DataKey {
    /// Contract owner (Instance).
    Owner,
    /// Price feed contract address (Instance).
    PriceFeed,
    /// Deployment settings (Instance).
    Settings,
    /// Current funding round (Instance).
    Round,
    /// Ordered contributor log (Persistent).
    Funders,
    /// Cumulative amount funded by an address in a round (Persistent).
    AmountFunded(u32, Address),
}

// ── Instance Storage Helpers ─────────────────────────────────────────

/// Extend instance storage TTL if it falls below the threshold.
fn bump_instance(env: &Env) {
    env.storage()
        .instance()
        .extend_ttl(INSTANCE_LIFETIME_THRESHOLD, INSTANCE_BUMP_AMOUNT);
}

/// Write the immutable deployment parameters. Called only by the constructor.
pub fn init(env: &Env, owner: &Address, price_feed: &Address, settings: &FundingSettings) {
    let instance = env.storage().instance();
    instance.set(&DataKey::Owner, owner);
    instance.set(&DataKey::PriceFeed, price_feed);
    instance.set(&DataKey::Settings, settings);
    bump_instance(env);
}

pub fn get_owner(env: &Env) -> Address {
    bump_instance(env);
    env.storage()
        .instance()
        .get(&DataKey::Owner)
        .expect("owner not set")
}

pub fn get_price_feed(env: &Env) -> Address {
    bump_instance(env);
    env.storage()
        .instance()
        .get(&DataKey::PriceFeed)
        .expect("price feed not set")
}

pub fn get_settings(env: &Env) -> FundingSettings {
    bump_instance(env);
    env.storage()
        .instance()
        .get(&DataKey::Settings)
        .expect("settings not set")
}

pub fn get_round(env: &Env) -> u32 {
    env.storage().instance().get(&DataKey::Round).unwrap_or(0)
}

/// Move to the next funding round. Every funder reads as zero afterwards.
pub fn advance_round(env: &Env) -> Result<u32, Error> {
    let next = get_round(env)
        .checked_add(1)
        .ok_or(Error::ArithmeticOverflow)?;
    env.storage().instance().set(&DataKey::Round, &next);
    bump_instance(env);
    Ok(next)
}

// ── Persistent Storage Helpers ───────────────────────────────────────

/// Extend the TTL for a persistent storage key.
fn bump_persistent(env: &Env, key: &DataKey) {
    env.storage()
        .persistent()
        .extend_ttl(key, PERSISTENT_LIFETIME_THRESHOLD, PERSISTENT_BUMP_AMOUNT);
}

/// Load the contributor log. An absent entry is an empty log.
pub fn load_funders(env: &Env) -> Vec<Address> {
    let key = DataKey::Funders;
    match env.storage().persistent().get(&key) {
        Some(funders) => {
            bump_persistent(env, &key);
            funders
        }
        None => Vec::new(env),
    }
}

pub fn save_funders(env: &Env, funders: &Vec<Address>) {
    let key = DataKey::Funders;
    env.storage().persistent().set(&key, funders);
    bump_persistent(env, &key);
}

pub fn clear_funders(env: &Env) {
    env.storage().persistent().remove(&DataKey::Funders);
}

/// Cumulative amount funded by `funder` in `round`; `0` for unknown addresses.
pub fn get_amount_funded(env: &Env, round: u32, funder: &Address) -> i128 {
    let key = DataKey::AmountFunded(round, funder.clone());
    match env.storage().persistent().get(&key) {
        Some(amount) => {
            bump_persistent(env, &key);
            amount
        }
        None => 0,
    }
}

pub fn set_amount_funded(env: &Env, round: u32, funder: &Address, amount: i128) {
    let key = DataKey::AmountFunded(round, funder.clone());
    env.storage().persistent().set(&key, &amount);
    bump_persistent(env, &key);
}
