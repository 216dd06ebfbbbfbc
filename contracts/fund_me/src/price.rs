//! # Price conversion
//!
//! Converts token amounts into reference-currency value using the external
//! price feed registered at construction.
//!
//! For an amount `a` with `t` decimals and a rate `r` with `p` decimals, the
//! product `a * r` carries `t + p` decimals. It is rescaled to the configured
//! reference precision `q`:
//!
//! ```text
//! t + p <= q   value = a * r * 10^(q - t - p)
//! t + p >  q   value = a * r / 10^(t + p - q)
//! ```
//!
//! Division happens last so no precision is lost before the product is formed.
//! Every step is checked; anything that does not fit in `i128` is reported as
//! [`Error::ArithmeticOverflow`].

use soroban_sdk::{contractclient, Env};

use crate::storage;
use crate::types::{FundingSettings, PriceData};
use crate::Error;

/// Interface consumed from the price feed contract.
#[contractclient(name = "PriceFeedClient")]
pub trait PriceFeed {
    /// Latest rate of one whole token in reference units.
    fn latest_rate(env: Env) -> PriceData;
}

/// Query the registered feed for its latest rate.
pub fn latest_rate(env: &Env) -> PriceData {
    let feed = storage::get_price_feed(env);
    PriceFeedClient::new(env, &feed).latest_rate()
}

/// Value of `amount` tokens in reference units, at the configured precision.
pub fn to_reference_currency(env: &Env, amount: i128) -> Result<i128, Error> {
    let settings = storage::get_settings(env);
    let rate = latest_rate(env);
    convert(amount, &rate, &settings)
}

/// Pure fixed-point conversion; see the module docs for the formula.
pub fn convert(amount: i128, rate: &PriceData, settings: &FundingSettings) -> Result<i128, Error> {
    if rate.answer <= 0 {
        return Err(Error::InvalidPrice);
    }

    let product = amount
        .checked_mul(rate.answer)
        .ok_or(Error::ArithmeticOverflow)?;

    let source = settings
        .token_decimals
        .checked_add(rate.decimals)
        .ok_or(Error::ArithmeticOverflow)?;
    let target = settings.reference_decimals;

    if source <= target {
        product
            .checked_mul(pow10(target - source)?)
            .ok_or(Error::ArithmeticOverflow)
    } else {
        // A divisor beyond i128 range truncates every representable product to zero.
        match pow10(source - target) {
            Ok(divisor) => Ok(product / divisor),
            Err(_) => Ok(0),
        }
    }
}

fn pow10(exp: u32) -> Result<i128, Error> {
    10i128.checked_pow(exp).ok_or(Error::ArithmeticOverflow)
}
