//! Liquidity arithmetic: applying signed deltas and converting between
//! liquidity and token amounts over a tick range.

use crate::constants::SQRT_RATIO_RESOLUTION;
use crate::errors::MathError;
use crate::math::delta_math::{amount0_delta, amount1_delta};
use crate::math::full_math::{mul_div, u256_to_u128};
use anchor_lang::prelude::*;
use primitive_types::U256;

/// Applies a signed delta to a liquidity value.
///
/// # Errors
/// * `MathError::LiquidityOverflow` / `MathError::LiquidityUnderflow`
pub fn add_liquidity_delta(liquidity: u128, delta: i128) -> Result<u128> {
    if delta >= 0 {
        liquidity
            .checked_add(delta.unsigned_abs())
            .ok_or_else(|| error!(MathError::LiquidityOverflow))
    } else {
        liquidity
            .checked_sub(delta.unsigned_abs())
            .ok_or_else(|| error!(MathError::LiquidityUnderflow))
    }
}

/// Signed token amounts for applying `liquidity_delta` to a range at the given
/// price.
///
/// Amounts round up when liquidity is added and down when it is removed, so
/// the core never pays out more than it received. Positive amounts are owed
/// to the core.
pub fn amounts_for_liquidity_delta(
    sqrt_ratio: U256,
    ratio_lower: U256,
    ratio_upper: U256,
    liquidity_delta: i128,
) -> Result<(i128, i128)> {
    let round_up = liquidity_delta > 0;
    let liquidity = liquidity_delta.unsigned_abs();

    let (amount0, amount1) = if sqrt_ratio <= ratio_lower {
        (amount0_delta(ratio_lower, ratio_upper, liquidity, round_up)?, 0)
    } else if sqrt_ratio < ratio_upper {
        (
            amount0_delta(sqrt_ratio, ratio_upper, liquidity, round_up)?,
            amount1_delta(ratio_lower, sqrt_ratio, liquidity, round_up)?,
        )
    } else {
        (0, amount1_delta(ratio_lower, ratio_upper, liquidity, round_up)?)
    };

    let amount0 = i128::try_from(amount0).map_err(|_| error!(MathError::AmountOverflow))?;
    let amount1 = i128::try_from(amount1).map_err(|_| error!(MathError::AmountOverflow))?;
    Ok(if round_up {
        (amount0, amount1)
    } else {
        (-amount0, -amount1)
    })
}

fn liquidity_for_amount0(ratio_lower: U256, ratio_upper: U256, amount0: u128) -> Result<U256> {
    if ratio_lower >= ratio_upper {
        return Ok(U256::zero());
    }
    let intermediate = mul_div(
        ratio_lower,
        ratio_upper,
        U256::one() << SQRT_RATIO_RESOLUTION,
        false,
    )?;
    mul_div(U256::from(amount0), intermediate, ratio_upper - ratio_lower, false)
}

fn liquidity_for_amount1(ratio_lower: U256, ratio_upper: U256, amount1: u128) -> Result<U256> {
    if ratio_lower >= ratio_upper {
        return Ok(U256::zero());
    }
    mul_div(
        U256::from(amount1),
        U256::one() << SQRT_RATIO_RESOLUTION,
        ratio_upper - ratio_lower,
        false,
    )
}

/// Largest liquidity that can be deposited into `[ratio_lower, ratio_upper]`
/// at `sqrt_ratio` without spending more than `amount0` and `amount1`.
///
/// # Errors
/// * `MathError::LiquidityOverflow` - If the liquidity does not fit in 128 bits
pub fn max_liquidity(
    sqrt_ratio: U256,
    ratio_lower: U256,
    ratio_upper: U256,
    amount0: u128,
    amount1: u128,
) -> Result<u128> {
    let liquidity = if sqrt_ratio <= ratio_lower {
        liquidity_for_amount0(ratio_lower, ratio_upper, amount0)?
    } else if sqrt_ratio < ratio_upper {
        liquidity_for_amount0(sqrt_ratio, ratio_upper, amount0)?
            .min(liquidity_for_amount1(ratio_lower, sqrt_ratio, amount1)?)
    } else {
        liquidity_for_amount1(ratio_lower, ratio_upper, amount1)?
    };
    u256_to_u128(liquidity, MathError::LiquidityOverflow)
}
