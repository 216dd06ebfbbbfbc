//! # Mock Price Feed
//!
//! A stand-in oracle for local deployments and tests. It reports whatever
//! answer it was last given, at a fixed number of decimals, and is shaped like
//! the feed interface FundMe consumes (`latest_rate`).
//!
//! `update_answer` is unauthenticated; never deploy this contract where a real
//! feed is expected.

#![no_std]

use soroban_sdk::{contract, contractimpl, contracttype, Env};

/// Latest rate, field-compatible with the FundMe `PriceData`.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PriceData {
    pub answer: i128,
    pub decimals: u32,
    pub updated_at: u64,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
enum DataKey {
    Decimals,
    Answer,
    UpdatedAt,
}

#[contract]
pub struct MockPriceFeed;

#[contractimpl]
impl MockPriceFeed {
    pub fn __constructor(env: Env, decimals: u32, initial_answer: i128) {
        env.storage().instance().set(&DataKey::Decimals, &decimals);
        Self::update_answer(env, initial_answer);
    }

    /// Replace the reported answer and stamp it with the current ledger time.
    pub fn update_answer(env: Env, answer: i128) {
        let storage = env.storage().instance();
        storage.set(&DataKey::Answer, &answer);
        storage.set(&DataKey::UpdatedAt, &env.ledger().timestamp());
    }

    pub fn decimals(env: Env) -> u32 {
        env.storage()
            .instance()
            .get(&DataKey::Decimals)
            .unwrap_or(0)
    }

    pub fn latest_rate(env: Env) -> PriceData {
        let storage = env.storage().instance();
        PriceData {
            answer: storage.get(&DataKey::Answer).unwrap_or(0),
            decimals: storage.get(&DataKey::Decimals).unwrap_or(0),
            updated_at: storage.get(&DataKey::UpdatedAt).unwrap_or(0),
        }
    }
}
