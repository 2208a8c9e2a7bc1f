/// Defines the state for an owner's concentrated liquidity position.
///
/// A position is identified by its owner (the locker that created it), a
/// caller-chosen salt and its tick bounds. It stores its liquidity and a fee
/// checkpoint from which the fees it has earned are derived without iterating
/// over other positions.
use anchor_lang::prelude::*;

use crate::constants::{MAX_TICK, MIN_TICK};
use crate::errors::ErrorCode;
use crate::fees_per_liquidity::FeesPerLiquidity;
use crate::math::add_liquidity_delta;

/// Tick range of a position, `[lower, upper)`.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Bounds {
    pub lower: i32,
    pub upper: i32,
}

impl Bounds {
    pub fn new(lower: i32, upper: i32) -> Self {
        Self { lower, upper }
    }

    /// Validates the bounds against the curve and the pool's tick spacing.
    ///
    /// # Errors
    /// * `ErrorCode::InvalidTickRange` - If `lower >= upper`, a bound lies
    ///   outside `[MIN_TICK, MAX_TICK]` or is not a multiple of `tick_spacing`
    pub fn validate(&self, tick_spacing: u32) -> Result<()> {
        require!(self.lower < self.upper, ErrorCode::InvalidTickRange);
        require!(
            self.lower >= MIN_TICK && self.upper <= MAX_TICK,
            ErrorCode::InvalidTickRange
        );
        require!(tick_spacing != 0, ErrorCode::InvalidTickSpacing);
        let spacing = i64::from(tick_spacing);
        require!(
            i64::from(self.lower) % spacing == 0 && i64::from(self.upper) % spacing == 0,
            ErrorCode::InvalidTickRange
        );
        Ok(())
    }

    /// Whether the range holds the given tick, i.e. its liquidity is active there.
    pub fn contains(&self, tick: i32) -> bool {
        self.lower <= tick && tick < self.upper
    }
}

/// Identifies a position within a pool.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PositionKey {
    pub salt: u64,
    pub owner: Pubkey,
    pub bounds: Bounds,
}

/// Liquidity and fee checkpoint of a position.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Position {
    pub liquidity: u128,
    /// Fees per liquidity inside the range at the last touch, offset by any
    /// fees the position has earned but not yet collected
    pub fees_per_liquidity_inside_last: FeesPerLiquidity,
}

impl Position {
    /// Fees owed to the position given the current inside value:
    /// `(inside - checkpoint) * liquidity >> 128`.
    pub fn fees(&self, fees_per_liquidity_inside: &FeesPerLiquidity) -> Result<(u128, u128)> {
        if self.liquidity == 0 {
            return Ok((0, 0));
        }
        fees_per_liquidity_inside
            .checked_sub(&self.fees_per_liquidity_inside_last)?
            .amounts_for(self.liquidity)
    }

    /// Applies a liquidity delta.
    ///
    /// Owed fees are computed against the liquidity before the delta. While
    /// liquidity remains, they stay with the position: the checkpoint is
    /// re-derived as `inside - owed * 2^128 / new_liquidity`. Once liquidity
    /// reaches zero the checkpoint is zeroed and the owed fees are returned so
    /// the caller can pay them out with the withdrawal.
    ///
    /// # Returns
    /// * `(u128, u128)` - Fees released by this update
    ///
    /// # Errors
    /// * `ErrorCode::InsufficientPositionLiquidity` - If removing more than the position holds
    /// * `MathError` - If the checkpoint re-derivation leaves the 256-bit domain
    pub fn update(
        &mut self,
        fees_per_liquidity_inside: &FeesPerLiquidity,
        liquidity_delta: i128,
    ) -> Result<(u128, u128)> {
        require!(
            liquidity_delta >= 0 || self.liquidity >= liquidity_delta.unsigned_abs(),
            ErrorCode::InsufficientPositionLiquidity
        );
        let (fees0, fees1) = self.fees(fees_per_liquidity_inside)?;
        let liquidity_next = add_liquidity_delta(self.liquidity, liquidity_delta)?;

        self.liquidity = liquidity_next;
        if liquidity_next == 0 {
            self.fees_per_liquidity_inside_last = FeesPerLiquidity::ZERO;
            return Ok((fees0, fees1));
        }

        let carried = FeesPerLiquidity::from_amounts(fees0, fees1, liquidity_next)?;
        self.fees_per_liquidity_inside_last = fees_per_liquidity_inside.checked_sub(&carried)?;
        Ok((0, 0))
    }

    /// Collects the owed fees and resets the checkpoint to the current inside value.
    ///
    /// Calling it again with no intervening accrual returns zero.
    pub fn collect(&mut self, fees_per_liquidity_inside: &FeesPerLiquidity) -> Result<(u128, u128)> {
        let fees = self.fees(fees_per_liquidity_inside)?;
        self.fees_per_liquidity_inside_last = *fees_per_liquidity_inside;
        Ok(fees)
    }
}
