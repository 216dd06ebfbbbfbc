//! Owner gate for privileged entry points.

use soroban_sdk::{Address, Env};

use crate::storage;
use crate::Error;

/// Fail with [`Error::NotOwner`] unless `caller` is the owner fixed at construction.
///
/// Pure check: callers are expected to have already run `caller.require_auth()`.
pub fn require_owner(env: &Env, caller: &Address) -> Result<(), Error> {
    if *caller != storage::get_owner(env) {
        return Err(Error::NotOwner);
    }
    Ok(())
}
