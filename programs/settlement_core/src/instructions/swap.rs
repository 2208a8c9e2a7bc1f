/// Swap Instruction Module
///
/// Moves a pool's price through its initialized ticks until the specified
/// amount is used up or the price limit is reached. Within a tick range each
/// step trades against the active liquidity; landing on an initialized tick
/// crosses it, flipping its fee checkpoints and applying its net liquidity.
///
/// Fees are taken from the input token of every step and distributed over
/// that step's active liquidity through the pool's global accumulator.
use crate::constants::MIN_TICK;
use crate::errors::{ErrorCode, MathError};
use crate::events::Swapped;
use crate::extension::HookPoint;
use crate::fees_per_liquidity::FeesPerLiquidity;
use crate::ledger::Lock;
use crate::math::{
    add_liquidity_delta, compute_step, is_price_increasing, is_valid_sqrt_ratio,
    sqrt_ratio_to_tick, tick_to_sqrt_ratio,
};
use crate::pool_key::PoolKey;
use crate::settlement::Core;
use crate::state::Delta;
use anchor_lang::prelude::*;
use ethnum::I256;
use primitive_types::U256;

/// Parameters of a swap.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SwapParams {
    /// Positive for an exact input, negative for an exact output
    pub amount: i128,
    /// Whether `amount` is denominated in token1
    pub is_token1: bool,
    /// Price the swap may not move past
    pub sqrt_ratio_limit: U256,
}

impl SwapParams {
    pub fn is_price_increasing(&self) -> bool {
        is_price_increasing(self.amount, self.is_token1)
    }
}

fn validate_limit(sqrt_ratio: U256, params: &SwapParams) -> Result<()> {
    require!(
        is_valid_sqrt_ratio(params.sqrt_ratio_limit),
        ErrorCode::InvalidSqrtRatioLimit
    );
    let on_correct_side = if params.is_price_increasing() {
        params.sqrt_ratio_limit >= sqrt_ratio
    } else {
        params.sqrt_ratio_limit <= sqrt_ratio
    };
    require!(on_correct_side, ErrorCode::InvalidSqrtRatioLimit);
    Ok(())
}

/// Handler function for swapping against a pool
///
/// # Returns
/// * `Result<Delta>` - Amounts owed by the locker. The specified token's
///   entry is the part of `amount` that was used; the other token's entry is
///   the calculated output (negative) or required input (positive)
///
/// # Errors
/// * `ErrorCode::PoolNotInitialized` - If the pool does not exist
/// * `ErrorCode::InvalidSqrtRatioLimit` - If the limit is out of range or on
///   the wrong side of the current price
pub fn handler(core: &mut Core, lock: &Lock, key: &PoolKey, params: SwapParams) -> Result<Delta> {
    // === Parameter Validation ===
    core.ledger.require_current(lock)?;
    let pool_id = key.pool_id();
    let state = core.storage.pool(&pool_id)?;
    validate_limit(state.sqrt_ratio, &params)?;

    if params.amount == 0 {
        return Ok(Delta::default());
    }

    core.dispatch_hook(key, HookPoint::BeforeSwap, |extension, core, caller| {
        extension.before_swap(core, caller, key, &params)
    })?;

    // Hooks may have moved the price
    let mut state = core.storage.pool(&pool_id)?;
    validate_limit(state.sqrt_ratio, &params)?;

    let increasing = params.is_price_increasing();
    let mut fees_per_liquidity = core.storage.fees_per_liquidity_global(&pool_id);
    let mut amount_remaining = params.amount;
    let mut calculated_amount: u128 = 0;

    // === Swap Loop ===
    while amount_remaining != 0 && state.sqrt_ratio != params.sqrt_ratio_limit {
        // 1. Next initialized tick in the swap direction, clamped by the limit
        let next_tick = core.storage.bitmaps.get(&pool_id).and_then(|bitmap| {
            if increasing {
                bitmap.next_initialized_tick_above(state.tick, key.tick_spacing)
            } else {
                bitmap.next_initialized_tick_at_or_below(state.tick, key.tick_spacing)
            }
        });
        let next_tick_ratio = next_tick.map(tick_to_sqrt_ratio).transpose()?;
        let step_limit = match next_tick_ratio {
            Some(ratio)
                if (increasing && ratio < params.sqrt_ratio_limit)
                    || (!increasing && ratio > params.sqrt_ratio_limit) =>
            {
                ratio
            }
            _ => params.sqrt_ratio_limit,
        };

        // 2. Movement within the current range
        let step = compute_step(
            state.sqrt_ratio,
            state.liquidity,
            step_limit,
            amount_remaining,
            params.is_token1,
            key.fee,
        )?;
        amount_remaining = amount_remaining
            .checked_sub(step.consumed_amount)
            .ok_or(MathError::Overflow)?;
        calculated_amount = calculated_amount
            .checked_add(step.calculated_amount)
            .ok_or(MathError::AmountOverflow)?;

        // 3. Fees go to the input token's accumulator
        if step.fee_amount != 0 && state.liquidity != 0 {
            let (fee0, fee1) = if increasing {
                (0, step.fee_amount)
            } else {
                (step.fee_amount, 0)
            };
            fees_per_liquidity = fees_per_liquidity
                .checked_add(&FeesPerLiquidity::from_amounts(fee0, fee1, state.liquidity)?)?;
        }

        // 4. Cross the tick if the step landed on it
        match (next_tick, next_tick_ratio) {
            (Some(tick), Some(ratio)) if step.sqrt_ratio_next == ratio => {
                if !increasing && tick == MIN_TICK {
                    // The curve ends here; the tick's liquidity stays active
                    state.tick = MIN_TICK;
                } else {
                    let liquidity_net =
                        core.storage
                            .cross_tick(pool_id, tick, &fees_per_liquidity)?;
                    let liquidity_delta = if increasing {
                        liquidity_net
                    } else {
                        liquidity_net.checked_neg().ok_or(MathError::Overflow)?
                    };
                    state.liquidity = add_liquidity_delta(state.liquidity, liquidity_delta)?;
                    state.tick = if increasing { tick } else { tick - 1 };
                }
            }
            _ => {
                if step.sqrt_ratio_next != state.sqrt_ratio {
                    state.tick = sqrt_ratio_to_tick(step.sqrt_ratio_next)?;
                }
            }
        }
        state.sqrt_ratio = step.sqrt_ratio_next;
    }

    // === Write Back ===
    core.storage.pools.insert(pool_id, state);
    core.storage
        .fees_per_liquidity
        .insert(pool_id, fees_per_liquidity);

    let specified = params
        .amount
        .checked_sub(amount_remaining)
        .ok_or(MathError::Overflow)?;
    let calculated =
        i128::try_from(calculated_amount).map_err(|_| error!(MathError::AmountOverflow))?;
    let other = if params.amount > 0 {
        -calculated
    } else {
        calculated
    };
    let delta = if params.is_token1 {
        Delta::new(other, specified)
    } else {
        Delta::new(specified, other)
    };

    core.accrue_debt(lock, key.token0, I256::from(delta.amount0))?;
    core.accrue_debt(lock, key.token1, I256::from(delta.amount1))?;

    emit!(Swapped {
        pool_id: pool_id.address(),
        locker: lock.locker(),
        amount0: delta.amount0,
        amount1: delta.amount1,
        sqrt_ratio_after: state.sqrt_ratio.0,
        tick_after: state.tick,
        liquidity_after: state.liquidity,
    });

    core.dispatch_hook(key, HookPoint::AfterSwap, |extension, core, caller| {
        extension.after_swap(core, caller, key, &params, delta)
    })?;

    Ok(delta)
}
