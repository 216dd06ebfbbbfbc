//! # Funding ledger
//!
//! The single accounting path of the contract. Every contribution, whichever
//! entry point it arrived through, ends in [`contribute`]; the only other
//! mutation is [`reset`], run by the owner's withdrawal.
//!
//! The contributor log keeps one entry per successful contribution, so an
//! address that funds twice appears twice. Amounts live under the current
//! funding round; [`reset`] starts a new round and drops the log, a fixed
//! number of writes however many addresses funded.

use soroban_sdk::{token, Address, Bytes, Env};

use crate::events;
use crate::price;
use crate::storage;
use crate::types::Entry;
use crate::Error;

/// Record a contribution of `amount` tokens from `funder`.
///
/// Checks the minimum in reference currency, pulls the tokens into the
/// contract, then credits the ledger and appends to the log. The caller must
/// have authenticated `funder`.
pub fn contribute(
    env: &Env,
    funder: &Address,
    amount: i128,
    entry: Entry,
    payload: Bytes,
) -> Result<(), Error> {
    if amount < 0 {
        return Err(Error::InvalidAmount);
    }

    let settings = storage::get_settings(env);
    let value = price::to_reference_currency(env, amount)?;
    if value < settings.minimum_contribution {
        return Err(Error::InsufficientContribution);
    }

    let round = storage::get_round(env);
    let total = storage::get_amount_funded(env, round, funder)
        .checked_add(amount)
        .ok_or(Error::ArithmeticOverflow)?;

    let token_client = token::Client::new(env, &settings.token);
    let transferred = token_client.try_transfer(funder, &env.current_contract_address(), &amount);
    if !matches!(transferred, Ok(Ok(()))) {
        return Err(Error::TransferFailed);
    }

    storage::set_amount_funded(env, round, funder, total);
    let mut funders = storage::load_funders(env);
    funders.push_back(funder.clone());
    storage::save_funders(env, &funders);

    events::emit_funded(env, funder.clone(), amount, entry, payload);
    Ok(())
}

/// Zero every funder and empty the log.
///
/// Returns the number of log entries cleared. Must run inside the same
/// invocation as the transfer that pays out the balance.
pub fn reset(env: &Env) -> Result<u32, Error> {
    let cleared = storage::load_funders(env).len();
    storage::advance_round(env)?;
    storage::clear_funders(env);
    Ok(cleared)
}

/// Cumulative amount funded by `funder` since the last withdrawal.
pub fn amount_funded(env: &Env, funder: &Address) -> i128 {
    storage::get_amount_funded(env, storage::get_round(env), funder)
}

/// The `index`-th entry of the contributor log.
pub fn funder_at(env: &Env, index: u32) -> Result<Address, Error> {
    storage::load_funders(env)
        .get(index)
        .ok_or(Error::IndexOutOfRange)
}

pub fn funders_count(env: &Env) -> u32 {
    storage::load_funders(env).len()
}
