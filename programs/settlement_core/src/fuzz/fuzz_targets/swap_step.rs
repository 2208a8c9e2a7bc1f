#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use settlement_core::constants::{FEE_DENOMINATOR, MAX_TICK, MIN_TICK};
use settlement_core::math::*;

#[derive(Arbitrary, Debug)]
struct SwapStepInput {
    tick: i32,
    limit_offset: u32,
    liquidity: u128,
    amount: i128,
    is_token1: bool,
    fee: u32,
}

// Fuzz target for single swap steps.
//
// The price and limit are taken from ticks so both lie on the curve, with the
// limit on the side the swap moves towards. Every step must stay between the
// start price and the limit and never consume more than was specified.
fuzz_target!(|input: SwapStepInput| {
    if input.amount == 0 || input.amount == i128::MIN {
        return;
    }
    let fee = input.fee % FEE_DENOMINATOR;
    let tick = input.tick.clamp(MIN_TICK, MAX_TICK);
    let increasing = is_price_increasing(input.amount, input.is_token1);
    let offset = (input.limit_offset % 10_000_000) as i32;
    let limit_tick = if increasing {
        tick.saturating_add(offset).min(MAX_TICK)
    } else {
        tick.saturating_sub(offset).max(MIN_TICK)
    };

    let sqrt_ratio = tick_to_sqrt_ratio(tick).expect("tick on the curve");
    let sqrt_ratio_limit = tick_to_sqrt_ratio(limit_tick).expect("tick on the curve");

    let Ok(step) = compute_step(
        sqrt_ratio,
        input.liquidity,
        sqrt_ratio_limit,
        input.amount,
        input.is_token1,
        fee,
    ) else {
        return;
    };

    let (low, high) = if increasing {
        (sqrt_ratio, sqrt_ratio_limit)
    } else {
        (sqrt_ratio_limit, sqrt_ratio)
    };
    assert!(step.sqrt_ratio_next >= low && step.sqrt_ratio_next <= high);

    if input.amount > 0 {
        assert!(step.consumed_amount >= 0 && step.consumed_amount <= input.amount);
        assert!(step.fee_amount <= step.consumed_amount as u128);
    } else {
        assert!(step.consumed_amount <= 0 && step.consumed_amount >= input.amount);
        assert!(step.fee_amount <= step.calculated_amount);
    }
});
