//! Single swap step within one tick range
//!
//! A step moves the price from `sqrt_ratio` toward `sqrt_ratio_limit` (the
//! nearer of the next initialized tick and the caller's limit) using the
//! active liquidity of the range, and reports how much of the specified amount
//! it consumed, how much of the other token it calculated, and the fee it took
//! from the input.

use crate::errors::{ErrorCode, MathError};
use crate::math::delta_math::{
    amount0_delta_unbounded, amount1_delta_unbounded, next_sqrt_ratio_from_amount0,
    next_sqrt_ratio_from_amount1,
};
use crate::math::fee_math::{amount_after_fee, amount_before_fee};
use crate::math::full_math::u256_to_u128;
use anchor_lang::prelude::*;
use primitive_types::U256;

/// Result of one swap step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SwapStep {
    /// Part of the specified amount used by this step, same sign as the amount
    pub consumed_amount: i128,
    /// Output for exact-input steps, fee-inclusive input for exact-output steps
    pub calculated_amount: u128,
    pub sqrt_ratio_next: U256,
    /// Fee taken from the input token
    pub fee_amount: u128,
}

impl SwapStep {
    fn no_op(sqrt_ratio: U256) -> Self {
        Self {
            consumed_amount: 0,
            calculated_amount: 0,
            sqrt_ratio_next: sqrt_ratio,
            fee_amount: 0,
        }
    }
}

/// Whether a swap of `amount` specified in token1 (or token0) raises the price.
///
/// Selling token0 or buying token1 lowers the price; the other two cases raise it.
pub fn is_price_increasing(amount: i128, is_token1: bool) -> bool {
    (amount < 0) != is_token1
}

fn input_delta(from: U256, to: U256, liquidity: u128, increasing: bool) -> Result<U256> {
    if increasing {
        amount1_delta_unbounded(from, to, liquidity, true)
    } else {
        amount0_delta_unbounded(from, to, liquidity, true)
    }
}

fn output_delta(from: U256, to: U256, liquidity: u128, increasing: bool) -> Result<U256> {
    if increasing {
        amount0_delta_unbounded(from, to, liquidity, false)
    } else {
        amount1_delta_unbounded(from, to, liquidity, false)
    }
}

fn next_sqrt_ratio(
    sqrt_ratio: U256,
    liquidity: u128,
    amount: i128,
    is_token1: bool,
) -> Result<U256> {
    let next = if is_token1 {
        next_sqrt_ratio_from_amount1(sqrt_ratio, liquidity, amount)?
    } else {
        next_sqrt_ratio_from_amount0(sqrt_ratio, liquidity, amount)?
    };
    next.ok_or_else(|| error!(MathError::PriceOverflow))
}

/// Computes one step of a swap.
///
/// # Arguments
/// * `sqrt_ratio` - Current price
/// * `liquidity` - Active liquidity of the current range
/// * `sqrt_ratio_limit` - Price the step may not move past
/// * `amount` - Remaining specified amount; positive for exact input
/// * `is_token1` - Whether `amount` is denominated in token1
/// * `fee` - Pool fee in millionths
///
/// Exact-input steps deduct the fee before computing price impact. If the
/// remaining input cannot move the price at all, it is consumed entirely as
/// fee. Exact-output steps compute the required input and reverse the fee on
/// that step's input alone.
pub fn compute_step(
    sqrt_ratio: U256,
    liquidity: u128,
    sqrt_ratio_limit: U256,
    amount: i128,
    is_token1: bool,
    fee: u32,
) -> Result<SwapStep> {
    let increasing = is_price_increasing(amount, is_token1);
    require!(
        if increasing {
            sqrt_ratio_limit >= sqrt_ratio
        } else {
            sqrt_ratio_limit <= sqrt_ratio
        },
        ErrorCode::InvalidSqrtRatioLimit
    );

    if amount == 0 || sqrt_ratio == sqrt_ratio_limit {
        return Ok(SwapStep::no_op(sqrt_ratio));
    }

    // Nothing to trade against: the price jumps straight to the limit.
    if liquidity == 0 {
        return Ok(SwapStep::no_op(sqrt_ratio_limit));
    }

    if amount > 0 {
        let amount_in = amount.unsigned_abs();
        let price_impact_amount = amount_after_fee(amount_in, fee)?;
        let input_to_limit = input_delta(sqrt_ratio, sqrt_ratio_limit, liquidity, increasing)?;

        if U256::from(price_impact_amount) >= input_to_limit {
            let input_to_limit = input_to_limit.as_u128();
            let including_fee = amount_before_fee(input_to_limit, fee)?;
            let output = output_delta(sqrt_ratio, sqrt_ratio_limit, liquidity, increasing)?;
            return Ok(SwapStep {
                consumed_amount: i128::try_from(including_fee)
                    .map_err(|_| error!(MathError::AmountOverflow))?,
                calculated_amount: u256_to_u128(output, MathError::AmountOverflow)?,
                sqrt_ratio_next: sqrt_ratio_limit,
                fee_amount: including_fee - input_to_limit,
            });
        }

        let price_impact = i128::try_from(price_impact_amount)
            .map_err(|_| error!(MathError::AmountOverflow))?;
        let sqrt_ratio_next = next_sqrt_ratio(sqrt_ratio, liquidity, price_impact, is_token1)?;

        if sqrt_ratio_next == sqrt_ratio {
            return Ok(SwapStep {
                consumed_amount: amount,
                calculated_amount: 0,
                sqrt_ratio_next,
                fee_amount: amount_in,
            });
        }

        let output = output_delta(sqrt_ratio, sqrt_ratio_next, liquidity, increasing)?;
        Ok(SwapStep {
            consumed_amount: amount,
            calculated_amount: u256_to_u128(output, MathError::AmountOverflow)?,
            sqrt_ratio_next,
            fee_amount: amount_in - price_impact_amount,
        })
    } else {
        let amount_out = amount.unsigned_abs();
        let output_to_limit = output_delta(sqrt_ratio, sqrt_ratio_limit, liquidity, increasing)?;

        let (sqrt_ratio_next, output) = if output_to_limit <= U256::from(amount_out) {
            (sqrt_ratio_limit, output_to_limit.as_u128())
        } else {
            let next = next_sqrt_ratio(sqrt_ratio, liquidity, amount, is_token1)?;
            (next, amount_out)
        };

        let input = u256_to_u128(
            input_delta(sqrt_ratio, sqrt_ratio_next, liquidity, increasing)?,
            MathError::AmountOverflow,
        )?;
        let including_fee = amount_before_fee(input, fee)?;

        // output < amount_out <= 2^127 unless the whole amount was taken
        let consumed_amount = if output == amount_out {
            amount
        } else {
            -(output as i128)
        };

        Ok(SwapStep {
            consumed_amount,
            calculated_amount: including_fee,
            sqrt_ratio_next,
            fee_amount: including_fee - input,
        })
    }
}
