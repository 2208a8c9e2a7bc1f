use crate::math::{is_valid_sqrt_ratio, tick_to_sqrt_ratio};
use crate::constants::{MAX_TICK, MIN_TICK};
use primitive_types::U256;

/// Defines the price state of a liquidity pool.
///
/// `sqrt_ratio` and `tick` always describe the same point on the curve:
/// `tick_to_sqrt_ratio(tick) <= sqrt_ratio <= tick_to_sqrt_ratio(tick + 1)`,
/// where the upper bound is only reached right after the swap engine crossed
/// tick `tick + 1` downward.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PoolState {
    /// Current sqrt price, Q64.96
    pub sqrt_ratio: U256,
    /// Current tick index
    pub tick: i32,
    /// Liquidity of all positions whose range contains `tick`
    pub liquidity: u128,
}

impl PoolState {
    /// State of a freshly initialized pool: no liquidity, price at `tick`.
    pub fn new(sqrt_ratio: U256, tick: i32) -> Self {
        Self {
            sqrt_ratio,
            tick,
            liquidity: 0,
        }
    }

    /// Checks that price and tick agree with the tick-math bijection.
    pub fn is_consistent(&self) -> bool {
        if !(MIN_TICK..=MAX_TICK).contains(&self.tick) || !is_valid_sqrt_ratio(self.sqrt_ratio) {
            return false;
        }
        let Ok(lower) = tick_to_sqrt_ratio(self.tick) else {
            return false;
        };
        if self.sqrt_ratio < lower {
            return false;
        }
        if self.tick == MAX_TICK {
            return self.sqrt_ratio == lower;
        }
        match tick_to_sqrt_ratio(self.tick + 1) {
            Ok(upper) => self.sqrt_ratio <= upper,
            Err(_) => false,
        }
    }
}
