//! Fee-per-liquidity accumulators
//!
//! Values are Q128 fee amounts per unit of liquidity held in `ethnum::I256`.
//! The global accumulator and the per-tick outside values are never negative;
//! a range's inside value and a position's checkpoint may be, since only
//! differences between them carry meaning. All arithmetic is checked.

use crate::constants::FEES_PER_LIQUIDITY_SHIFT;
use crate::errors::MathError;
use anchor_lang::prelude::*;
use ethnum::{I256, U256};

/// A pair of fee-per-liquidity values, one per pool token.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FeesPerLiquidity {
    pub value0: I256,
    pub value1: I256,
}

impl Default for FeesPerLiquidity {
    fn default() -> Self {
        Self::ZERO
    }
}

impl FeesPerLiquidity {
    pub const ZERO: Self = Self {
        value0: I256::ZERO,
        value1: I256::ZERO,
    };

    pub fn new(value0: I256, value1: I256) -> Self {
        Self { value0, value1 }
    }

    /// Converts fee amounts into per-liquidity growth: `amount << 128 / liquidity`.
    ///
    /// # Errors
    /// * `MathError::DivisionByZero` - If `liquidity` is zero
    /// * `MathError::Overflow` - If the growth does not fit in a signed 256-bit value
    pub fn from_amounts(amount0: u128, amount1: u128, liquidity: u128) -> Result<Self> {
        require!(liquidity != 0, MathError::DivisionByZero);
        Ok(Self {
            value0: growth(amount0, liquidity)?,
            value1: growth(amount1, liquidity)?,
        })
    }

    pub fn checked_add(&self, other: &Self) -> Result<Self> {
        Ok(Self {
            value0: self
                .value0
                .checked_add(other.value0)
                .ok_or(MathError::Overflow)?,
            value1: self
                .value1
                .checked_add(other.value1)
                .ok_or(MathError::Overflow)?,
        })
    }

    /// Signed difference; fails only if the result leaves the 256-bit domain.
    pub fn checked_sub(&self, other: &Self) -> Result<Self> {
        Ok(Self {
            value0: self
                .value0
                .checked_sub(other.value0)
                .ok_or(MathError::Underflow)?,
            value1: self
                .value1
                .checked_sub(other.value1)
                .ok_or(MathError::Underflow)?,
        })
    }

    /// Difference that must stay non-negative, as for `global - outside` at a
    /// tick crossing.
    ///
    /// # Errors
    /// * `MathError::FeesPerLiquidityUnderflow` - If either component would be negative
    pub fn sub_non_negative(&self, other: &Self) -> Result<Self> {
        let difference = self.checked_sub(other)?;
        require!(
            !difference.value0.is_negative() && !difference.value1.is_negative(),
            MathError::FeesPerLiquidityUnderflow
        );
        Ok(difference)
    }

    /// Fee amounts earned by `liquidity` over this growth: `value * liquidity >> 128`.
    ///
    /// # Errors
    /// * `MathError::FeesPerLiquidityUnderflow` - If the growth is negative
    /// * `MathError::Overflow` - If an amount does not fit in 128 bits
    pub fn amounts_for(&self, liquidity: u128) -> Result<(u128, u128)> {
        Ok((
            amount_for(self.value0, liquidity)?,
            amount_for(self.value1, liquidity)?,
        ))
    }

    pub fn is_zero(&self) -> bool {
        self.value0 == I256::ZERO && self.value1 == I256::ZERO
    }
}

fn growth(amount: u128, liquidity: u128) -> Result<I256> {
    let value = (U256::from(amount) << FEES_PER_LIQUIDITY_SHIFT) / U256::from(liquidity);
    require!(value <= I256::MAX.as_u256(), MathError::Overflow);
    Ok(value.as_i256())
}

fn amount_for(value: I256, liquidity: u128) -> Result<u128> {
    require!(!value.is_negative(), MathError::FeesPerLiquidityUnderflow);
    let (high, low) = value.as_u256().into_words();

    // (high * 2^128 + low) * L >> 128 == high * L + (low * L >> 128)
    let high_part = high.checked_mul(liquidity).ok_or(MathError::Overflow)?;
    let low_part = (U256::from(low) * U256::from(liquidity)) >> FEES_PER_LIQUIDITY_SHIFT;
    high_part
        .checked_add(low_part.as_u128())
        .ok_or_else(|| error!(MathError::Overflow))
}
