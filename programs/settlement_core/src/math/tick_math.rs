//! Tick <-> sqrt ratio conversion
//!
//! Ticks are spaced by a factor of 1.000001 in price, so the sqrt ratio of a
//! tick `t` is `sqrt(1.000001)^t`. The conversion decomposes `|t|` into bits
//! and multiplies the Q128 constants `sqrt(1.000001)^(-2^i)` for every set bit,
//! inverting the product for positive ticks. No floating point is involved.

use crate::constants::{MAX_SQRT_RATIO, MAX_TICK, MAX_TICK_MAGNITUDE, MIN_SQRT_RATIO, MIN_TICK};
use crate::errors::MathError;
use crate::math::full_math::u512_to_u256;
use anchor_lang::prelude::*;
use primitive_types::U256;

/// `floor(sqrt(1.000001)^(-2^i) * 2^128)` for `i` in `0..27`.
const SQRT_RATIO_POW: [u128; 27] = [
    0xfffff79c8499329c7cbb2510d893283a,
    0xffffef390978c398134b4ff3764fe40f,
    0xffffde72140b00a354bd3dc828e976c9,
    0xffffbce42c7be6c998ad6318193c0b18,
    0xffff79c86a8f6150a32d9778eceef97b,
    0xfffef3911b7cff24ba1b3dbb5f8f5974,
    0xfffde72350725cc4ea8feece3b5f13c7,
    0xfffbce4b06c196e9247ac87695d53c5f,
    0xfff79ca7a4d1bf1ee8556cea23cdbaa5,
    0xffef3995a5b6a6267530f207142a5763,
    0xffde7444b28145508125d10077ba83b8,
    0xffbceceeb791747f10df216f2e53ec56,
    0xff79eb706b9a64c6431d76e63531e929,
    0xfef41d1a5f2ae3a20676bec6f7f94599,
    0xfde95287d26d81bea159c37073122c73,
    0xfbd701c7cbc4c8a6bb81efd232d1e4e7,
    0xf7bf5211c72f5185f372aeb1d48f937d,
    0xefc2bf59df33ecc28125cf78ec4f167f,
    0xe08d35706200796273f0b3a981d90cfd,
    0xc4f76b68947482dc198a48a54348c4ed,
    0x978bcb9894317807e5fa4498eee7c0fa,
    0x59b63684b86e9f486ec54727371ba6c9,
    0x1f703399d88f6aa83a28b22d4a1f56e3,
    0x03dc5dac7376e20fc8679758d1bcdcfb,
    0x000ee7e32d61fdb0a5e622b820f681d0,
    0x000000de2ee4bc381afa7089aa84bb65,
    0x000000000000c0d55d4d7152c25fb139,
];

/// Converts a tick index to its Q64.96 sqrt ratio.
///
/// # Arguments
/// * `tick` - Tick index, `|tick| <= MAX_TICK`
///
/// # Returns
/// * `Result<U256>` - The sqrt ratio, rounded up from the Q128 intermediate
///
/// # Errors
/// * `MathError::OutOfRange` - If the tick magnitude exceeds `MAX_TICK`
pub fn tick_to_sqrt_ratio(tick: i32) -> Result<U256> {
    let abs_tick = tick.unsigned_abs();
    require!(abs_tick <= MAX_TICK_MAGNITUDE, MathError::OutOfRange);

    let mut ratio = if abs_tick & 1 != 0 {
        U256::from(SQRT_RATIO_POW[0])
    } else {
        U256::one() << 128
    };

    for (bit, factor) in SQRT_RATIO_POW.iter().enumerate().skip(1) {
        if abs_tick & (1u32 << bit) != 0 {
            ratio = u512_to_u256(ratio.full_mul(U256::from(*factor)) >> 128)?;
        }
    }

    if tick > 0 {
        ratio = U256::MAX / ratio;
    }

    // Q128 -> Q96, rounding up
    let remainder = ratio & U256::from(u32::MAX);
    let ratio = ratio >> 32;
    Ok(if remainder.is_zero() {
        ratio
    } else {
        ratio + U256::one()
    })
}

/// Converts a Q64.96 sqrt ratio to the largest tick whose sqrt ratio does not
/// exceed it.
///
/// Together with `tick_to_sqrt_ratio` this is an exact bijection on the tick
/// domain: `sqrt_ratio_to_tick(tick_to_sqrt_ratio(t)) == t`.
///
/// # Errors
/// * `MathError::OutOfRange` - If the ratio is outside `[MIN_SQRT_RATIO, MAX_SQRT_RATIO]`
pub fn sqrt_ratio_to_tick(sqrt_ratio: U256) -> Result<i32> {
    require!(
        sqrt_ratio >= MIN_SQRT_RATIO && sqrt_ratio <= MAX_SQRT_RATIO,
        MathError::OutOfRange
    );

    let (mut low, mut high) = (MIN_TICK, MAX_TICK);
    while low < high {
        let mid = low + (high - low + 1) / 2;
        if tick_to_sqrt_ratio(mid)? <= sqrt_ratio {
            low = mid;
        } else {
            high = mid - 1;
        }
    }
    Ok(low)
}

/// Whether `sqrt_ratio` lies within the representable price range.
pub fn is_valid_sqrt_ratio(sqrt_ratio: U256) -> bool {
    sqrt_ratio >= MIN_SQRT_RATIO && sqrt_ratio <= MAX_SQRT_RATIO
}
