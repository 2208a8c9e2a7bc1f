/// Settlement Core Protocol Constants
///
/// This module defines the boundaries of the price curve and the fixed-point
/// conventions shared by the math library, the tick store and the swap engine.
/// The tick and sqrt-ratio bounds are bit-exact: `MIN_SQRT_RATIO` and
/// `MAX_SQRT_RATIO` are precisely the outputs of `tick_to_sqrt_ratio` at
/// `MIN_TICK` and `MAX_TICK`.
use primitive_types::U256;

/// The minimum tick index supported by the protocol.
///
/// Ticks are spaced by a factor of 1.000001 in price, so this tick corresponds
/// to a price of roughly 1.000001^-88722835, or about 2^-128.
pub const MIN_TICK: i32 = -88_722_835;

/// The maximum tick index supported by the protocol (about 2^128 in price).
pub const MAX_TICK: i32 = 88_722_835;

/// Largest allowed magnitude of a tick index.
pub const MAX_TICK_MAGNITUDE: u32 = MAX_TICK as u32;

/// Largest tick spacing a pool may be created with.
///
/// A spacing of this size still leaves room for several usable ticks on each
/// side of tick zero.
pub const MAX_TICK_SPACING: u32 = 698_605;

/// Number of fractional bits of a sqrt ratio (Q64.96).
pub const SQRT_RATIO_RESOLUTION: usize = 96;

/// Number of fractional bits used by the fee-per-liquidity accumulators.
pub const FEES_PER_LIQUIDITY_SHIFT: u32 = 128;

/// `tick_to_sqrt_ratio(MIN_TICK)` in Q64.96.
pub const MIN_SQRT_RATIO: U256 = U256([0x1_0001_96a1, 0, 0, 0]);

/// `tick_to_sqrt_ratio(MAX_TICK)` in Q64.96.
pub const MAX_SQRT_RATIO: U256 = U256([
    0x6409_402e_efdd_9a36,
    0x27de_541a_6906_a28c,
    0xfffe_6962,
    0,
]);

/// `1.0` in Q64.96, the sqrt ratio of tick zero.
pub const ONE_SQRT_RATIO: U256 = U256([0, 0x1_0000_0000, 0, 0]);

/// Fee denominator: pool fees are expressed in millionths (pips).
pub const FEE_DENOMINATOR: u32 = 1_000_000;

/// Fee of 0.05%
pub const FEE_TIER_LOW: u32 = 500;

/// Fee of 0.3%
pub const FEE_TIER_MEDIUM: u32 = 3_000;

/// Fee of 1%
pub const FEE_TIER_HIGH: u32 = 10_000;

/// Seed prefix for deriving pool identifiers.
pub const POOL_SEED: &[u8] = b"pool";

/// Default bound on nested lock depth.
pub const DEFAULT_MAX_LOCK_DEPTH: u32 = 64;
