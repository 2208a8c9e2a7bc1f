#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use settlement_core::constants::FEE_DENOMINATOR;
use settlement_core::math::*;
use settlement_core::FeesPerLiquidity;

#[derive(Arbitrary, Debug)]
struct FeeCalculationInput {
    amount: u128,
    fee: u32,
    fees0: u128,
    fees1: u128,
    liquidity: u128,
}

// Fuzzes fee deduction and fee growth accounting.
//
// This fuzz target checks:
// 1. The fee never exceeds the amount it is charged on
// 2. Reversing a fee yields an input that covers the requested amount
// 3. Fee growth never pays out more than was accumulated
fuzz_target!(|input: FeeCalculationInput| {
    let fee = input.fee % FEE_DENOMINATOR;

    if let Ok(fee_amount) = compute_fee(input.amount, fee) {
        assert!(fee_amount <= input.amount);
        assert_eq!(amount_after_fee(input.amount, fee).ok(), Some(input.amount - fee_amount));
    }

    if let Ok(before) = amount_before_fee(input.amount, fee) {
        assert!(before >= input.amount);
        if let Ok(after) = amount_after_fee(before, fee) {
            assert!(after >= input.amount);
        }
    }

    if input.liquidity == 0 {
        return;
    }
    if let Ok(growth) = FeesPerLiquidity::from_amounts(input.fees0, input.fees1, input.liquidity) {
        if let Ok((amount0, amount1)) = growth.amounts_for(input.liquidity) {
            assert!(amount0 <= input.fees0);
            assert!(amount1 <= input.fees1);
        }
    }
});
