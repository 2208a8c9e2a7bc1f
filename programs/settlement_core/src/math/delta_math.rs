//! Token amounts spanned by price intervals, and the inverse: the price reached
//! after adding or removing an amount at a given liquidity.
//!
//! Amount functions come in two flavors: `*_unbounded` returns the exact
//! 256-bit result (used by the swap step to compare against a remaining amount
//! without spurious overflow), the plain versions narrow to u128.

use crate::constants::SQRT_RATIO_RESOLUTION;
use crate::errors::MathError;
use crate::math::full_math::{div_rounding, mul_div, u256_to_u128, u512_to_u256};
use crate::math::tick_math::is_valid_sqrt_ratio;
use anchor_lang::prelude::*;
use primitive_types::{U256, U512};

fn sorted(ratio_a: U256, ratio_b: U256) -> (U256, U256) {
    if ratio_a <= ratio_b {
        (ratio_a, ratio_b)
    } else {
        (ratio_b, ratio_a)
    }
}

/// Amount of token0 between two sqrt ratios: `L * 2^96 * (upper - lower) / (upper * lower)`.
pub fn amount0_delta_unbounded(
    ratio_a: U256,
    ratio_b: U256,
    liquidity: u128,
    round_up: bool,
) -> Result<U256> {
    let (lower, upper) = sorted(ratio_a, ratio_b);
    require!(!lower.is_zero(), MathError::DivisionByZero);
    if liquidity == 0 || lower == upper {
        return Ok(U256::zero());
    }

    let numerator = U256::from(liquidity) << SQRT_RATIO_RESOLUTION;
    let scaled = mul_div(numerator, upper - lower, upper, round_up)?;
    div_rounding(scaled, lower, round_up)
}

/// Amount of token1 between two sqrt ratios: `L * (upper - lower) / 2^96`.
pub fn amount1_delta_unbounded(
    ratio_a: U256,
    ratio_b: U256,
    liquidity: u128,
    round_up: bool,
) -> Result<U256> {
    let (lower, upper) = sorted(ratio_a, ratio_b);
    if liquidity == 0 || lower == upper {
        return Ok(U256::zero());
    }

    mul_div(
        U256::from(liquidity),
        upper - lower,
        U256::one() << SQRT_RATIO_RESOLUTION,
        round_up,
    )
}

/// Token0 amount between two sqrt ratios, narrowed to u128.
///
/// # Errors
/// * `MathError::AmountOverflow` - If the amount does not fit in 128 bits
pub fn amount0_delta(ratio_a: U256, ratio_b: U256, liquidity: u128, round_up: bool) -> Result<u128> {
    u256_to_u128(
        amount0_delta_unbounded(ratio_a, ratio_b, liquidity, round_up)?,
        MathError::AmountOverflow,
    )
}

/// Token1 amount between two sqrt ratios, narrowed to u128.
///
/// # Errors
/// * `MathError::AmountOverflow` - If the amount does not fit in 128 bits
pub fn amount1_delta(ratio_a: U256, ratio_b: U256, liquidity: u128, round_up: bool) -> Result<u128> {
    u256_to_u128(
        amount1_delta_unbounded(ratio_a, ratio_b, liquidity, round_up)?,
        MathError::AmountOverflow,
    )
}

/// Sqrt ratio after adding (`amount > 0`) or removing (`amount < 0`) token0.
///
/// Computes `L * 2^96 * p / (L * 2^96 +/- amount * p)` rounded up, so the price
/// never moves further than the amount pays for.
///
/// # Returns
/// * `Ok(None)` - If the resulting price leaves `[MIN_SQRT_RATIO, MAX_SQRT_RATIO]`
///   or removing the amount would exhaust the liquidity
pub fn next_sqrt_ratio_from_amount0(
    sqrt_ratio: U256,
    liquidity: u128,
    amount: i128,
) -> Result<Option<U256>> {
    if amount == 0 {
        return Ok(Some(sqrt_ratio));
    }

    let liquidity_x96 = U512::from(U256::from(liquidity) << SQRT_RATIO_RESOLUTION);
    let price = U512::from(sqrt_ratio);
    let product = U512::from(amount.unsigned_abs()) * price;

    let denominator = if amount > 0 {
        liquidity_x96 + product
    } else {
        if product >= liquidity_x96 {
            return Ok(None);
        }
        liquidity_x96 - product
    };

    let (quotient, remainder) = (liquidity_x96 * price).div_mod(denominator);
    let quotient = if remainder.is_zero() {
        quotient
    } else {
        quotient + U512::one()
    };

    let next = match u512_to_u256(quotient) {
        Ok(next) => next,
        Err(_) => return Ok(None),
    };
    Ok(is_valid_sqrt_ratio(next).then_some(next))
}

/// Sqrt ratio after adding (`amount > 0`) or removing (`amount < 0`) token1.
///
/// Computes `p +/- amount * 2^96 / L`, rounding the quotient down when adding
/// and up when removing.
///
/// # Returns
/// * `Ok(None)` - If the resulting price leaves `[MIN_SQRT_RATIO, MAX_SQRT_RATIO]`
pub fn next_sqrt_ratio_from_amount1(
    sqrt_ratio: U256,
    liquidity: u128,
    amount: i128,
) -> Result<Option<U256>> {
    if amount == 0 {
        return Ok(Some(sqrt_ratio));
    }
    if liquidity == 0 {
        return Ok(None);
    }

    let shifted = U256::from(amount.unsigned_abs()) << SQRT_RATIO_RESOLUTION;
    let quotient = div_rounding(shifted, U256::from(liquidity), amount < 0)?;

    let next = if amount > 0 {
        match sqrt_ratio.checked_add(quotient) {
            Some(next) => next,
            None => return Ok(None),
        }
    } else {
        if quotient > sqrt_ratio {
            return Ok(None);
        }
        sqrt_ratio - quotient
    };
    Ok(is_valid_sqrt_ratio(next).then_some(next))
}
