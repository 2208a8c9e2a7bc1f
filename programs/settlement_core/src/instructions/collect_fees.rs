/// Collect Fees Instruction Module
///
/// Pays the fees a position has earned since its last checkpoint to the
/// current locker, without touching its liquidity.
use crate::events::FeesCollected;
use crate::extension::HookPoint;
use crate::ledger::Lock;
use crate::pool_key::PoolKey;
use crate::position::{Bounds, PositionKey};
use crate::settlement::Core;
use anchor_lang::prelude::*;
use ethnum::I256;

/// Handler function for collecting a position's fees
///
/// Collecting twice without an intervening accrual returns zero the second
/// time.
///
/// # Returns
/// * `Result<(u128, u128)>` - Fees credited to the locker's debt
pub fn handler(
    core: &mut Core,
    lock: &Lock,
    key: &PoolKey,
    salt: u64,
    bounds: Bounds,
) -> Result<(u128, u128)> {
    core.ledger.require_current(lock)?;
    bounds.validate(key.tick_spacing)?;
    let pool_id = key.pool_id();
    core.storage.pool(&pool_id)?;

    core.dispatch_hook(key, HookPoint::BeforeCollectFees, |extension, core, caller| {
        extension.before_collect_fees(core, caller, key, salt, &bounds)
    })?;

    let state = core.storage.pool(&pool_id)?;
    let position_key = PositionKey {
        salt,
        owner: lock.locker(),
        bounds,
    };
    let inside = core
        .storage
        .fees_per_liquidity_inside(&pool_id, state.tick, &bounds)?;

    let (amount0, amount1) = match core.storage.positions.get_mut(&(pool_id, position_key)) {
        Some(position) => position.collect(&inside)?,
        None => (0, 0),
    };

    core.accrue_debt(lock, key.token0, -I256::from(amount0))?;
    core.accrue_debt(lock, key.token1, -I256::from(amount1))?;

    emit!(FeesCollected {
        pool_id: pool_id.address(),
        owner: position_key.owner,
        salt,
        lower: bounds.lower,
        upper: bounds.upper,
        amount0,
        amount1,
    });

    core.dispatch_hook(key, HookPoint::AfterCollectFees, |extension, core, caller| {
        extension.after_collect_fees(core, caller, key, salt, &bounds, amount0, amount1)
    })?;

    Ok((amount0, amount1))
}
