//! # FundMe Contract
//!
//! A minimal crowdfunding ledger. Anyone may contribute the native token as
//! long as the contribution is worth at least a configured minimum in a
//! reference currency, priced through an external feed. The owner fixed at
//! deployment may withdraw the whole balance, which resets all bookkeeping.
//!
//! | Phase        | Entry Point(s)                                          |
//! |--------------|---------------------------------------------------------|
//! | Bootstrap    | `__constructor`                                         |
//! | Funding      | [`FundMe::fund`], [`FundMe::receive`], [`FundMe::fallback`] |
//! | Withdrawal   | [`FundMe::withdraw`]                                    |
//! | Queries      | `get_owner`, `get_price_feed`, `get_funder`, `get_address_to_amount_funded`, `get_funders_count`, `get_settings`, `get_minimum_contribution`, `get_conversion_rate` |
//!
//! ## Architecture
//!
//! Accounting lives in [`ledger`], the owner gate in [`access`], pricing in
//! [`price`] and payload routing in [`router`]. Storage access is fully
//! delegated to [`storage`]. This file contains only the public entry points.
//!
//! Every entry point either commits all of its effects or, by returning an
//! [`Error`], none of them: the host rolls back storage writes and token
//! movements of a failed invocation.

#![no_std]

use soroban_sdk::{
    contract, contracterror, contractimpl, panic_with_error, token, Address, Bytes, Env,
};

pub mod access;
pub mod events;
pub mod ledger;
pub mod price;
pub mod router;
mod storage;
mod types;

#[cfg(test)]
mod invariants;
#[cfg(test)]
mod test_events;
#[cfg(test)]
mod test_router;

pub use types::{ContributionReceived, Entry, FundingSettings, FundsWithdrawn, PriceData};

/// Highest decimal precision accepted for token or reference amounts.
const MAX_DECIMALS: u32 = 38;

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum Error {
    /// "Not enough funds!": the contribution is worth less than the minimum.
    InsufficientContribution = 1,
    NotOwner                 = 2,
    IndexOutOfRange          = 3,
    TransferFailed           = 4,
    InvalidAmount            = 5,
    InvalidPrice             = 6,
    ArithmeticOverflow       = 7,
    InvalidSettings          = 8,
}

#[contract]
pub struct FundMe;

#[contractimpl]
impl FundMe {
    // ─────────────────────────────────────────────────────────
    // Initialisation
    // ─────────────────────────────────────────────────────────

    /// Fix the owner, the price feed and the funding settings.
    ///
    /// None of them can change afterwards.
    pub fn __constructor(env: Env, owner: Address, price_feed: Address, settings: FundingSettings) {
        if settings.minimum_contribution < 0
            || settings.token_decimals > MAX_DECIMALS
            || settings.reference_decimals > MAX_DECIMALS
        {
            panic_with_error!(&env, Error::InvalidSettings);
        }
        storage::init(&env, &owner, &price_feed, &settings);
    }

    // ─────────────────────────────────────────────────────────
    // Funding
    // ─────────────────────────────────────────────────────────

    /// Contribute `amount` tokens from `funder`.
    ///
    /// Fails with `InsufficientContribution` when the amount is worth less
    /// than the minimum in the reference currency.
    pub fn fund(env: Env, funder: Address, amount: i128) -> Result<(), Error> {
        funder.require_auth();
        ledger::contribute(&env, &funder, amount, Entry::Fund, Bytes::new(&env))
    }

    /// Plain value transfer into the contract.
    pub fn receive(env: Env, funder: Address, amount: i128) -> Result<(), Error> {
        router::dispatch(&env, &funder, amount, Bytes::new(&env))
    }

    /// Value transfer carrying an arbitrary payload.
    ///
    /// The payload is published with the contribution event but plays no part
    /// in accounting. An empty payload is handled exactly like `receive`.
    pub fn fallback(env: Env, funder: Address, amount: i128, payload: Bytes) -> Result<(), Error> {
        router::dispatch(&env, &funder, amount, payload)
    }

    // ─────────────────────────────────────────────────────────
    // Withdrawal
    // ─────────────────────────────────────────────────────────

    /// Send the whole balance to the owner and reset the ledger.
    ///
    /// The ledger is reset before the transfer. If the transfer fails the
    /// call returns `TransferFailed` and the reset is rolled back with it.
    /// The number of ledger writes is fixed, whatever the number of funders.
    ///
    /// Returns the amount sent.
    pub fn withdraw(env: Env, caller: Address) -> Result<i128, Error> {
        caller.require_auth();
        access::require_owner(&env, &caller)?;

        let settings = storage::get_settings(&env);
        let contract = env.current_contract_address();
        let token_client = token::Client::new(&env, &settings.token);
        let balance = token_client.balance(&contract);

        let cleared = ledger::reset(&env)?;

        if balance > 0 {
            let sent = token_client.try_transfer(&contract, &caller, &balance);
            if !matches!(sent, Ok(Ok(()))) {
                return Err(Error::TransferFailed);
            }
        }

        events::emit_withdrawn(&env, caller, balance, cleared);
        Ok(balance)
    }

    // ─────────────────────────────────────────────────────────
    // Queries
    // ─────────────────────────────────────────────────────────

    pub fn get_owner(env: Env) -> Address {
        storage::get_owner(&env)
    }

    pub fn get_price_feed(env: Env) -> Address {
        storage::get_price_feed(&env)
    }

    /// Entry `index` of the contributor log; `IndexOutOfRange` past the end.
    pub fn get_funder(env: Env, index: u32) -> Result<Address, Error> {
        ledger::funder_at(&env, index)
    }

    /// Cumulative amount funded by `funder` since the last withdrawal.
    pub fn get_address_to_amount_funded(env: Env, funder: Address) -> i128 {
        ledger::amount_funded(&env, &funder)
    }

    /// Length of the contributor log.
    pub fn get_funders_count(env: Env) -> u32 {
        ledger::funders_count(&env)
    }

    pub fn get_settings(env: Env) -> FundingSettings {
        storage::get_settings(&env)
    }

    pub fn get_minimum_contribution(env: Env) -> i128 {
        storage::get_settings(&env).minimum_contribution
    }

    /// Current value of `amount` tokens in reference units.
    pub fn get_conversion_rate(env: Env, amount: i128) -> Result<i128, Error> {
        price::to_reference_currency(&env, amount)
    }
}
