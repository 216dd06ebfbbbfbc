extern crate std;

use soroban_sdk::{Address, Bytes};

use crate::invariants::{assert_balance_matches_ledger, assert_last_funder, assert_reset};
use crate::test::{setup, Fixture, SEND_VALUE};
use crate::Error;

/// Ledger and log effects visible for a single funder.
fn snapshot(f: &Fixture, funder: &Address) -> (i128, u32, i128) {
    (
        f.client.get_address_to_amount_funded(funder),
        f.client.get_funders_count(),
        f.token.balance(&f.client.address),
    )
}

#[test]
fn test_receive_saves_funder() {
    let f = setup();
    let funder = f.funded_account(SEND_VALUE);

    f.client.receive(&funder, &SEND_VALUE);

    assert_eq!(f.token.balance(&f.client.address), SEND_VALUE);
    assert_eq!(f.client.get_address_to_amount_funded(&funder), SEND_VALUE);
    assert_last_funder(&f.client, &funder);
}

#[test]
fn test_fallback_saves_funder() {
    let f = setup();
    let funder = f.funded_account(SEND_VALUE);
    let payload = Bytes::from_slice(&f.env, b"Alice");

    f.client.fallback(&funder, &SEND_VALUE, &payload);

    assert_eq!(f.token.balance(&f.client.address), SEND_VALUE);
    assert_eq!(f.client.get_address_to_amount_funded(&funder), SEND_VALUE);
    assert_last_funder(&f.client, &funder);
}

#[test]
fn test_all_entry_points_have_identical_effects() {
    let explicit = setup();
    let funder = explicit.funded_account(SEND_VALUE);
    explicit.client.fund(&funder, &SEND_VALUE);
    let expected = snapshot(&explicit, &funder);

    let bare = setup();
    let funder = bare.funded_account(SEND_VALUE);
    bare.client.receive(&funder, &SEND_VALUE);
    assert_eq!(snapshot(&bare, &funder), expected);

    let with_payload = setup();
    let funder = with_payload.funded_account(SEND_VALUE);
    let payload = Bytes::from_slice(&with_payload.env, &[0xde, 0xad, 0xbe, 0xef]);
    with_payload.client.fallback(&funder, &SEND_VALUE, &payload);
    assert_eq!(snapshot(&with_payload, &funder), expected);
}

#[test]
fn test_bare_entry_points_enforce_minimum() {
    let f = setup();
    let funder = f.funded_account(SEND_VALUE);
    let small = SEND_VALUE / 10;

    assert_eq!(
        f.client.try_receive(&funder, &small),
        Err(Ok(Error::InsufficientContribution))
    );
    assert_eq!(
        f.client
            .try_fallback(&funder, &small, &Bytes::from_slice(&f.env, b"Alice")),
        Err(Ok(Error::InsufficientContribution))
    );
    assert_eq!(snapshot(&f, &funder), (0, 0, 0));
}

#[test]
fn test_mixed_entry_points_share_one_ledger() {
    let f = setup();
    let alice = f.funded_account(2 * SEND_VALUE);
    let bob = f.funded_account(SEND_VALUE);

    f.client.fund(&alice, &SEND_VALUE);
    f.client.receive(&bob, &SEND_VALUE);
    f.client
        .fallback(&alice, &SEND_VALUE, &Bytes::from_slice(&f.env, b"again"));

    assert_eq!(f.client.get_funders_count(), 3);
    assert_eq!(f.client.get_funder(&0), alice);
    assert_eq!(f.client.get_funder(&1), bob);
    assert_eq!(f.client.get_funder(&2), alice);
    assert_eq!(f.client.get_address_to_amount_funded(&alice), 2 * SEND_VALUE);
    let funders = [alice.clone(), bob.clone(), alice.clone()];
    assert_balance_matches_ledger(&f.client, &f.token, &funders);

    f.client.withdraw(&f.owner);
    assert_reset(&f.client, &f.token, &funders);
}
