#![allow(dead_code)]

extern crate std;

use std::vec::Vec as StdVec;

use soroban_sdk::{token, Address};

use crate::{Error, FundMeClient};

/// INV-1: the contract holds exactly the sum of the distinct funders' ledger
/// amounts while no withdrawal is in progress.
pub fn assert_balance_matches_ledger(
    client: &FundMeClient,
    token: &token::Client,
    funders: &[Address],
) {
    let mut distinct: StdVec<Address> = StdVec::new();
    for funder in funders {
        if !distinct.contains(funder) {
            distinct.push(funder.clone());
        }
    }
    let ledger_total: i128 = distinct
        .iter()
        .map(|f| client.get_address_to_amount_funded(f))
        .sum();
    let held = token.balance(&client.address);
    assert_eq!(
        held, ledger_total,
        "INV-1 violated: contract holds {} but ledger sums to {}",
        held, ledger_total
    );
}

/// INV-2: a successful contribution of `amount` raises the funder's ledger
/// amount by exactly `amount`.
pub fn assert_contribution_invariant(amount_before: i128, amount_after: i128, amount: i128) {
    assert_eq!(
        amount_after,
        amount_before + amount,
        "INV-2 violated: {} + {} != {}",
        amount_before,
        amount,
        amount_after
    );
}

/// INV-3: the last contributor-log entry is the most recent funder.
pub fn assert_last_funder(client: &FundMeClient, funder: &Address) {
    let count = client.get_funders_count();
    assert!(count > 0, "INV-3 violated: contributor log is empty");
    assert_eq!(
        &client.get_funder(&(count - 1)),
        funder,
        "INV-3 violated: last log entry is not the latest funder"
    );
}

/// INV-4: after a withdrawal the log is empty, every former funder maps to
/// zero and the contract holds nothing.
pub fn assert_reset(client: &FundMeClient, token: &token::Client, funders: &[Address]) {
    assert_eq!(
        client.get_funders_count(),
        0,
        "INV-4 violated: contributor log not cleared"
    );
    assert_eq!(
        client.try_get_funder(&0),
        Err(Ok(Error::IndexOutOfRange)),
        "INV-4 violated: get_funder(0) did not fail"
    );
    for funder in funders {
        assert_eq!(
            client.get_address_to_amount_funded(funder),
            0,
            "INV-4 violated: funder still has a ledger amount"
        );
    }
    assert_eq!(
        token.balance(&client.address),
        0,
        "INV-4 violated: contract balance not drained"
    );
}

/// INV-5: ledger amounts never decrease outside a withdrawal.
pub fn assert_amount_monotonic(before: i128, after: i128) {
    assert!(
        after >= before,
        "INV-5 violated: ledger amount decreased from {} to {}",
        before,
        after
    );
}
