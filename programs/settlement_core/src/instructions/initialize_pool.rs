/// Initialize Pool Instruction Module
///
/// Creates the price state of a new pool at a starting tick. The pool starts
/// without liquidity and with zero fee accumulators; its identifier is derived
/// from the pool key, so each configuration can be initialized once.
use crate::constants::{MAX_TICK, MIN_TICK};
use crate::errors::ErrorCode;
use crate::events::PoolInitialized;
use crate::extension::HookPoint;
use crate::fees_per_liquidity::FeesPerLiquidity;
use crate::ledger::Lock;
use crate::math::tick_to_sqrt_ratio;
use crate::pool_key::PoolKey;
use crate::settlement::Core;
use crate::state::PoolState;
use anchor_lang::prelude::*;
use primitive_types::U256;

/// Handler function for initializing a pool
///
/// # Parameters
/// * `core` - The settlement core
/// * `lock` - The caller's current lock
/// * `key` - Configuration of the new pool
/// * `tick` - Starting tick; the price is set to the tick's exact ratio
///
/// # Returns
/// * `Result<U256>` - The starting sqrt ratio
///
/// # Errors
/// * `ErrorCode::InvalidTokenOrder`, `ErrorCode::InvalidFee`,
///   `ErrorCode::InvalidTickSpacing` - If the key is malformed
/// * `ErrorCode::InvalidTickRange` - If `tick` is outside `[MIN_TICK, MAX_TICK]`
/// * `ErrorCode::ExtensionNotRegistered` - If the key names an unknown extension
/// * `ErrorCode::PoolAlreadyInitialized` - If the pool exists
pub fn handler(core: &mut Core, lock: &Lock, key: &PoolKey, tick: i32) -> Result<U256> {
    // === Parameter Validation ===
    core.ledger.require_current(lock)?;
    key.validate()?;
    require!(
        (MIN_TICK..=MAX_TICK).contains(&tick),
        ErrorCode::InvalidTickRange
    );
    if key.has_extension() {
        require!(
            core.extensions.contains(&key.extension),
            ErrorCode::ExtensionNotRegistered
        );
    }

    let pool_id = key.pool_id();
    require!(
        !core.storage.pools.contains_key(&pool_id),
        ErrorCode::PoolAlreadyInitialized
    );

    core.dispatch_hook(key, HookPoint::BeforeInitializePool, |extension, core, caller| {
        extension.before_initialize_pool(core, caller, key, tick)
    })?;

    // The hook may have initialized the pool through a nested lock
    require!(
        !core.storage.pools.contains_key(&pool_id),
        ErrorCode::PoolAlreadyInitialized
    );

    // === Pool Initialization ===
    let sqrt_ratio = tick_to_sqrt_ratio(tick)?;
    core.storage
        .pools
        .insert(pool_id, PoolState::new(sqrt_ratio, tick));
    core.storage
        .fees_per_liquidity
        .insert(pool_id, FeesPerLiquidity::ZERO);

    msg!(
        "Pool {} initialized at tick {} (fee {}, spacing {})",
        pool_id,
        tick,
        key.fee,
        key.tick_spacing
    );
    emit!(PoolInitialized {
        pool_id: pool_id.address(),
        token0: key.token0,
        token1: key.token1,
        fee: key.fee,
        tick_spacing: key.tick_spacing,
        extension: key.extension,
        tick,
        sqrt_ratio: sqrt_ratio.0,
    });

    core.dispatch_hook(key, HookPoint::AfterInitializePool, |extension, core, caller| {
        extension.after_initialize_pool(core, caller, key, tick, sqrt_ratio)
    })?;

    Ok(sqrt_ratio)
}
