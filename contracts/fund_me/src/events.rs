//! Contract events.
//!
//! | Topic                   | Data                     |
//! |-------------------------|--------------------------|
//! | `("funded", funder)`    | [`ContributionReceived`] |
//! | `("withdrawn", owner)`  | [`FundsWithdrawn`]       |

use soroban_sdk::{symbol_short, Address, Bytes, Env};

use crate::types::{ContributionReceived, Entry, FundsWithdrawn};

pub fn emit_funded(env: &Env, funder: Address, amount: i128, entry: Entry, payload: Bytes) {
    env.events().publish(
        (symbol_short!("funded"), funder.clone()),
        ContributionReceived {
            funder,
            amount,
            entry,
            payload,
        },
    );
}

pub fn emit_withdrawn(env: &Env, owner: Address, amount: i128, cleared: u32) {
    env.events().publish(
        (symbol_short!("withdrawn"), owner.clone()),
        FundsWithdrawn {
            owner,
            amount,
            cleared,
        },
    );
}
