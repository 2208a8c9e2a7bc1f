//! Fee application and reversal
//!
//! Fees are expressed in millionths of the input amount. `amount_after_fee`
//! and `amount_before_fee` are exact inverses for a single application:
//! `amount_after_fee(amount_before_fee(y)) == y` for every `y` whose reversal
//! fits in 128 bits. Reversal never saturates; it fails instead.

use crate::constants::FEE_DENOMINATOR;
use crate::errors::{ErrorCode, MathError};
use crate::math::full_math::{mul_div, u256_to_u128};
use anchor_lang::prelude::*;
use primitive_types::U256;

/// Fee charged on `amount`: `ceil(amount * fee / FEE_DENOMINATOR)`.
///
/// # Errors
/// * `ErrorCode::InvalidFee` - If `fee >= FEE_DENOMINATOR`
pub fn compute_fee(amount: u128, fee: u32) -> Result<u128> {
    require!(fee < FEE_DENOMINATOR, ErrorCode::InvalidFee);
    let fee_amount = mul_div(
        U256::from(amount),
        U256::from(fee),
        U256::from(FEE_DENOMINATOR),
        true,
    )?;
    u256_to_u128(fee_amount, MathError::AmountOverflow)
}

/// Portion of `amount` left once the fee is deducted.
pub fn amount_after_fee(amount: u128, fee: u32) -> Result<u128> {
    let fee_amount = compute_fee(amount, fee)?;
    amount
        .checked_sub(fee_amount)
        .ok_or_else(|| error!(MathError::Underflow))
}

/// Smallest input whose post-fee amount is at least `amount`:
/// `ceil(amount * FEE_DENOMINATOR / (FEE_DENOMINATOR - fee))`.
///
/// # Errors
/// * `ErrorCode::InvalidFee` - If `fee >= FEE_DENOMINATOR`
/// * `MathError::AmountBeforeFeeOverflow` - If the result does not fit in 128 bits
pub fn amount_before_fee(amount: u128, fee: u32) -> Result<u128> {
    require!(fee < FEE_DENOMINATOR, ErrorCode::InvalidFee);
    if fee == 0 {
        return Ok(amount);
    }
    let before = mul_div(
        U256::from(amount),
        U256::from(FEE_DENOMINATOR),
        U256::from(FEE_DENOMINATOR - fee),
        true,
    )?;
    u256_to_u128(before, MathError::AmountBeforeFeeOverflow)
}
