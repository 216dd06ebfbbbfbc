extern crate std;

use soroban_sdk::{symbol_short, testutils::Events, vec, Bytes, IntoVal, TryIntoVal};

use crate::test::{setup, SEND_VALUE};
use crate::{ContributionReceived, Entry, FundsWithdrawn};

#[test]
fn test_funded_event() {
    let f = setup();
    let funder = f.funded_account(SEND_VALUE);

    f.client.fund(&funder, &SEND_VALUE);

    let all_events = f.env.events().all();
    let last_event = all_events.last().expect("No events found");

    // Topic: (symbol_short!("funded"), funder)
    assert_eq!(last_event.0, f.client.address);
    let expected_topics = vec![
        &f.env,
        symbol_short!("funded").into_val(&f.env),
        funder.into_val(&f.env),
    ];
    assert_eq!(last_event.1, expected_topics);

    let event_data: ContributionReceived = last_event.2.try_into_val(&f.env).unwrap();
    assert_eq!(
        event_data,
        ContributionReceived {
            funder: funder.clone(),
            amount: SEND_VALUE,
            entry: Entry::Fund,
            payload: Bytes::new(&f.env),
        }
    );
}

#[test]
fn test_funded_event_records_entry_point() {
    let f = setup();
    let funder = f.funded_account(3 * SEND_VALUE);
    let payload = Bytes::from_slice(&f.env, b"Alice");

    f.client.receive(&funder, &SEND_VALUE);
    let event: ContributionReceived = f
        .env
        .events()
        .all()
        .last()
        .expect("No events found")
        .2
        .try_into_val(&f.env)
        .unwrap();
    assert_eq!(event.entry, Entry::Receive);
    assert!(event.payload.is_empty());

    f.client.fallback(&funder, &SEND_VALUE, &payload);
    let event: ContributionReceived = f
        .env
        .events()
        .all()
        .last()
        .expect("No events found")
        .2
        .try_into_val(&f.env)
        .unwrap();
    assert_eq!(event.entry, Entry::Fallback);
    assert_eq!(event.payload, payload);

    // An empty fallback payload is a plain receive.
    f.client.fallback(&funder, &SEND_VALUE, &Bytes::new(&f.env));
    let event: ContributionReceived = f
        .env
        .events()
        .all()
        .last()
        .expect("No events found")
        .2
        .try_into_val(&f.env)
        .unwrap();
    assert_eq!(event.entry, Entry::Receive);
}

#[test]
fn test_withdrawn_event() {
    let f = setup();
    for _ in 0..3 {
        let funder = f.funded_account(SEND_VALUE);
        f.client.fund(&funder, &SEND_VALUE);
    }

    f.client.withdraw(&f.owner);

    let all_events = f.env.events().all();
    let last_event = all_events.last().expect("No events found");

    // Topic: (symbol_short!("withdrawn"), owner)
    assert_eq!(last_event.0, f.client.address);
    let expected_topics = vec![
        &f.env,
        symbol_short!("withdrawn").into_val(&f.env),
        f.owner.into_val(&f.env),
    ];
    assert_eq!(last_event.1, expected_topics);

    let event_data: FundsWithdrawn = last_event.2.try_into_val(&f.env).unwrap();
    assert_eq!(
        event_data,
        FundsWithdrawn {
            owner: f.owner.clone(),
            amount: 3 * SEND_VALUE,
            cleared: 3,
        }
    );
}

#[test]
fn test_rejected_contribution_emits_nothing() {
    let f = setup();
    let funder = f.funded_account(SEND_VALUE);

    let _ = f.client.try_fund(&funder, &1);

    let from_contract = f
        .env
        .events()
        .all()
        .iter()
        .filter(|event| event.0 == f.client.address)
        .count();
    assert_eq!(from_contract, 0);
}
