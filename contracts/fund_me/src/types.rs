//! # Types
//!
//! Shared data structures used across all modules of the FundMe contract.
//!
//! ## Fixed-point conventions
//!
//! Every amount is an `i128` scaled by a power of ten:
//!
//! | Quantity              | Scale                                  |
//! |-----------------------|----------------------------------------|
//! | token amounts         | `10^token_decimals` (7 for native XLM) |
//! | oracle rate           | `10^PriceData::decimals`               |
//! | reference-currency    | `10^reference_decimals` (usually 18)   |
//!
//! The scales are configuration, fixed once by the constructor through
//! [`FundingSettings`].

use soroban_sdk::{contracttype, Address, Bytes};

/// Deployment parameters, written once by the constructor and never mutated.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FundingSettings {
    /// Token contract of the native value unit (e.g. the XLM SAC).
    pub token: Address,
    /// Fixed-point precision of `token` amounts.
    pub token_decimals: u32,
    /// Fixed-point precision of reference-currency values.
    pub reference_decimals: u32,
    /// Minimum contribution, in reference units at `reference_decimals`.
    pub minimum_contribution: i128,
}

/// Latest rate reported by a price feed: reference units per one whole token.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PriceData {
    /// Signed fixed-point rate.
    pub answer: i128,
    /// Number of decimals `answer` is scaled by.
    pub decimals: u32,
    /// Ledger timestamp of the last update.
    pub updated_at: u64,
}

/// How a contribution reached the ledger.
#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Entry {
    /// Explicit `fund` call.
    Fund,
    /// Value transfer without payload.
    Receive,
    /// Value transfer carrying an unmatched payload.
    Fallback,
}

/// Event payload published on every successful contribution.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ContributionReceived {
    pub funder: Address,
    pub amount: i128,
    pub entry: Entry,
    /// Raw payload of a fallback transfer; empty otherwise.
    pub payload: Bytes,
}

/// Event payload published on every successful withdrawal.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FundsWithdrawn {
    pub owner: Address,
    pub amount: i128,
    /// Number of contributor-log entries cleared.
    pub cleared: u32,
}
