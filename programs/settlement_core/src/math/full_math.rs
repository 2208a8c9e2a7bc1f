//! Widened multiply/divide helpers.

use crate::errors::MathError;
use anchor_lang::prelude::*;
use primitive_types::{U256, U512};

/// Narrows a 512-bit value to 256 bits, failing if any high limb is set.
pub fn u512_to_u256(value: U512) -> Result<U256> {
    let U512(ref limbs) = value;
    require!(limbs[4..].iter().all(|limb| *limb == 0), MathError::Overflow);
    Ok(U256([limbs[0], limbs[1], limbs[2], limbs[3]]))
}

/// Narrows a 256-bit value to a u128, failing with `error` if it does not fit.
pub fn u256_to_u128(value: U256, error: MathError) -> Result<u128> {
    if value > U256::from(u128::MAX) {
        return Err(error.into());
    }
    Ok(value.as_u128())
}

/// Computes `a * b / denominator` with a 512-bit intermediate product.
///
/// # Arguments
/// * `a`, `b` - Factors
/// * `denominator` - Divisor, must be nonzero
/// * `round_up` - Rounds the quotient up when the division is inexact
///
/// # Returns
/// * `Result<U256>` - The quotient, or `MathError::Overflow` if it exceeds 256 bits
pub fn mul_div(a: U256, b: U256, denominator: U256, round_up: bool) -> Result<U256> {
    require!(!denominator.is_zero(), MathError::DivisionByZero);
    let (quotient, remainder) = a.full_mul(b).div_mod(U512::from(denominator));
    let quotient = if round_up && !remainder.is_zero() {
        quotient + U512::one()
    } else {
        quotient
    };
    u512_to_u256(quotient)
}

/// Divides `a` by `b`, optionally rounding up.
pub fn div_rounding(a: U256, b: U256, round_up: bool) -> Result<U256> {
    require!(!b.is_zero(), MathError::DivisionByZero);
    let (quotient, remainder) = a.div_mod(b);
    if round_up && !remainder.is_zero() {
        Ok(quotient + U256::one())
    } else {
        Ok(quotient)
    }
}
