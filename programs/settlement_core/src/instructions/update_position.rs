/// Update Position Instruction Module
///
/// Adds liquidity to or removes liquidity from a position owned by the
/// current locker. Boundary ticks are initialized on first reference and
/// de-initialized once nothing references them. The token amounts for the
/// change accrue to the locker's debt; fees owed to a position that is fully
/// withdrawn are paid out with the withdrawal.
use crate::errors::{ErrorCode, MathError};
use crate::events::PositionUpdated;
use crate::extension::HookPoint;
use crate::ledger::Lock;
use crate::math::{add_liquidity_delta, amounts_for_liquidity_delta, tick_to_sqrt_ratio};
use crate::pool_key::PoolKey;
use crate::position::{Bounds, PositionKey};
use crate::settlement::Core;
use crate::state::Delta;
use anchor_lang::prelude::*;
use ethnum::I256;

/// Parameters of a position update.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct UpdatePositionParams {
    pub salt: u64,
    pub bounds: Bounds,
    /// Positive to add liquidity, negative to remove it
    pub liquidity_delta: i128,
}

fn fee_to_i128(amount: u128) -> Result<i128> {
    i128::try_from(amount).map_err(|_| error!(MathError::AmountOverflow))
}

/// Handler function for updating a position
///
/// # Returns
/// * `Result<Delta>` - Amounts owed by the locker; negative amounts are owed
///   to it, including fees released by a full withdrawal
///
/// # Errors
/// * `ErrorCode::ZeroLiquidityDelta` - If `liquidity_delta` is zero
/// * `ErrorCode::InvalidTickRange` - If the bounds are malformed
/// * `ErrorCode::PoolNotInitialized` - If the pool does not exist
/// * `ErrorCode::InsufficientPositionLiquidity` - If removing more than the position holds
pub fn handler(
    core: &mut Core,
    lock: &Lock,
    key: &PoolKey,
    params: UpdatePositionParams,
) -> Result<Delta> {
    // === Parameter Validation ===
    core.ledger.require_current(lock)?;
    require!(params.liquidity_delta != 0, ErrorCode::ZeroLiquidityDelta);
    params.bounds.validate(key.tick_spacing)?;

    let pool_id = key.pool_id();
    core.storage.pool(&pool_id)?;

    let position_key = PositionKey {
        salt: params.salt,
        owner: lock.locker(),
        bounds: params.bounds,
    };
    require!(
        params.liquidity_delta > 0
            || core.storage.position(&pool_id, &position_key).liquidity
                >= params.liquidity_delta.unsigned_abs(),
        ErrorCode::InsufficientPositionLiquidity
    );

    core.dispatch_hook(key, HookPoint::BeforeUpdatePosition, |extension, core, caller| {
        extension.before_update_position(core, caller, key, &params)
    })?;

    // Hooks may have moved the price or touched the position
    let mut state = core.storage.pool(&pool_id)?;
    let mut position = core.storage.position(&pool_id, &position_key);
    let bounds = params.bounds;

    // 1. Boundary ticks
    core.storage.update_tick(
        pool_id,
        key.tick_spacing,
        bounds.lower,
        state.tick,
        params.liquidity_delta,
        false,
    )?;
    core.storage.update_tick(
        pool_id,
        key.tick_spacing,
        bounds.upper,
        state.tick,
        params.liquidity_delta,
        true,
    )?;

    // 2. Token amounts for the liquidity change
    let (amount0, amount1) = amounts_for_liquidity_delta(
        state.sqrt_ratio,
        tick_to_sqrt_ratio(bounds.lower)?,
        tick_to_sqrt_ratio(bounds.upper)?,
        params.liquidity_delta,
    )?;

    // 3. Active liquidity
    if bounds.contains(state.tick) {
        state.liquidity = add_liquidity_delta(state.liquidity, params.liquidity_delta)?;
    }

    // 4. Fees, computed against the liquidity before the change
    let inside = core
        .storage
        .fees_per_liquidity_inside(&pool_id, state.tick, &bounds)?;
    let (fees0, fees1) = position.update(&inside, params.liquidity_delta)?;
    core.storage
        .positions
        .insert((pool_id, position_key), position);

    // 5. Ticks no position references any more
    if params.liquidity_delta < 0 {
        core.storage
            .clear_tick_if_unused(pool_id, key.tick_spacing, bounds.lower)?;
        core.storage
            .clear_tick_if_unused(pool_id, key.tick_spacing, bounds.upper)?;
    }
    core.storage.pools.insert(pool_id, state);

    // 6. Debt
    let delta = Delta::new(
        amount0
            .checked_sub(fee_to_i128(fees0)?)
            .ok_or(MathError::Underflow)?,
        amount1
            .checked_sub(fee_to_i128(fees1)?)
            .ok_or(MathError::Underflow)?,
    );
    core.accrue_debt(lock, key.token0, I256::from(delta.amount0))?;
    core.accrue_debt(lock, key.token1, I256::from(delta.amount1))?;

    emit!(PositionUpdated {
        pool_id: pool_id.address(),
        owner: position_key.owner,
        salt: params.salt,
        lower: bounds.lower,
        upper: bounds.upper,
        liquidity_delta: params.liquidity_delta,
        amount0: delta.amount0,
        amount1: delta.amount1,
    });

    core.dispatch_hook(key, HookPoint::AfterUpdatePosition, |extension, core, caller| {
        extension.after_update_position(core, caller, key, &params, delta)
    })?;

    Ok(delta)
}
