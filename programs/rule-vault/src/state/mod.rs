pub mod factory;
pub mod price_feed;
pub mod rule;
pub mod vault;

pub use factory::*;
pub use price_feed::*;
pub use rule::*;
pub use vault::*;

use anchor_lang::prelude::*;

use crate::{constants::BPS_DENOMINATOR, errors::VaultError};

/// Basis-point fee on `amount`, rounded down.
///
/// Uses u128 for the intermediate product so `amount * bps` cannot overflow.
pub fn fee_for(amount: u64, bps: u16) -> Result<u64> {
    let fee = (amount as u128)
        .checked_mul(bps as u128)
        .ok_or(error!(VaultError::MathOverflow))?
        .checked_div(BPS_DENOMINATOR as u128)
        .ok_or(error!(VaultError::MathOverflow))?;

    u64::try_from(fee).map_err(|_| error!(VaultError::MathOverflow))
}
