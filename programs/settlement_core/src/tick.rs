use crate::errors::MathError;
use crate::fees_per_liquidity::FeesPerLiquidity;
use crate::math::add_liquidity_delta;
/// Defines the state and basic logic for individual initialized ticks.
///
/// The price curve is divided into discrete ticks. Positions reference a lower
/// and an upper tick; each referenced tick records how much active liquidity
/// changes when the price crosses it, and a snapshot of the fees accrued on
/// the far side of it ("outside") used to attribute fees to ranges.
use anchor_lang::prelude::*;

/// State of a tick referenced by at least one position.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Tick {
    /// Liquidity added to the active liquidity when the tick is crossed upward
    pub liquidity_net: i128,
    /// Total liquidity of positions bounded by this tick
    pub liquidity_gross: u128,
    /// Fees per liquidity accrued on the other side of this tick relative to
    /// the current price
    pub fees_per_liquidity_outside: FeesPerLiquidity,
}

impl Tick {
    /// A tick stays initialized while any position references it.
    pub fn is_initialized(&self) -> bool {
        self.liquidity_gross != 0
    }

    /// Updates the tick's liquidity values when a position referencing this tick changes.
    ///
    /// # Arguments
    ///
    /// * `liquidity_delta` - The change in liquidity. Positive if adding liquidity,
    ///   negative if removing.
    /// * `is_upper_tick` - True if this tick is the upper boundary of the position,
    ///   false if it's the lower boundary.
    ///
    /// # Returns
    ///
    /// * `bool` - Whether the tick's initialized state flipped
    pub fn update_on_liquidity_change(
        &mut self,
        liquidity_delta: i128,
        is_upper_tick: bool,
    ) -> Result<bool> {
        let was_initialized = self.is_initialized();

        self.liquidity_gross = add_liquidity_delta(self.liquidity_gross, liquidity_delta)?;
        self.liquidity_net = if is_upper_tick {
            self.liquidity_net.checked_sub(liquidity_delta)
        } else {
            self.liquidity_net.checked_add(liquidity_delta)
        }
        .ok_or_else(|| error!(MathError::LiquidityOverflow))?;

        Ok(was_initialized != self.is_initialized())
    }

    /// Crosses the tick, flipping its outside accumulators to the other side of
    /// the price: `outside = global - outside`.
    ///
    /// # Returns
    ///
    /// * `i128` - The net liquidity to apply (negate when crossing downward)
    ///
    /// # Errors
    ///
    /// * `MathError::FeesPerLiquidityUnderflow` - If the outside value exceeds
    ///   the global accumulator, which would otherwise wrap and inflate every
    ///   later fee claim across this tick
    pub fn cross(&mut self, fees_per_liquidity_global: &FeesPerLiquidity) -> Result<i128> {
        self.fees_per_liquidity_outside =
            fees_per_liquidity_global.sub_non_negative(&self.fees_per_liquidity_outside)?;
        Ok(self.liquidity_net)
    }
}

/// Computes the fees per liquidity accrued inside `[tick_lower, tick_upper)`.
///
/// Three-way branch on the position of the current tick relative to the range,
/// combining the outside values of the two boundary ticks with the global
/// accumulator.
pub fn fees_per_liquidity_inside(
    fees_per_liquidity_global: &FeesPerLiquidity,
    tick_current: i32,
    tick_lower: i32,
    lower_outside: &FeesPerLiquidity,
    tick_upper: i32,
    upper_outside: &FeesPerLiquidity,
) -> Result<FeesPerLiquidity> {
    if tick_current < tick_lower {
        lower_outside.checked_sub(upper_outside)
    } else if tick_current < tick_upper {
        fees_per_liquidity_global
            .checked_sub(lower_outside)?
            .checked_sub(upper_outside)
    } else {
        upper_outside.checked_sub(lower_outside)
    }
}
