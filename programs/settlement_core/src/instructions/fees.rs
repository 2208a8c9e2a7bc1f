/// Fee Injection Instruction Module
///
/// Two ways to add tokens to a pool's fee accumulators without a swap:
/// `accumulate_as_fees`, reserved for the pool's extension, and `donate`,
/// open to any locker and surrounded by the donate hooks. Either way the
/// amounts are spread over the active liquidity and owed by the locker.
use crate::errors::ErrorCode;
use crate::events::FeesAccumulated;
use crate::extension::HookPoint;
use crate::fees_per_liquidity::FeesPerLiquidity;
use crate::ledger::Lock;
use crate::pool_key::PoolKey;
use crate::settlement::Core;
use anchor_lang::prelude::*;
use ethnum::I256;

fn accrue_fees(core: &mut Core, lock: &Lock, key: &PoolKey, amount0: u128, amount1: u128) -> Result<()> {
    let pool_id = key.pool_id();
    let state = core.storage.pool(&pool_id)?;

    if amount0 != 0 || amount1 != 0 {
        require!(state.liquidity != 0, ErrorCode::NoActiveLiquidity);
        let global = core
            .storage
            .fees_per_liquidity_global(&pool_id)
            .checked_add(&FeesPerLiquidity::from_amounts(amount0, amount1, state.liquidity)?)?;
        core.storage.fees_per_liquidity.insert(pool_id, global);
    }

    core.accrue_debt(lock, key.token0, I256::from(amount0))?;
    core.accrue_debt(lock, key.token1, I256::from(amount1))?;

    emit!(FeesAccumulated {
        pool_id: pool_id.address(),
        payer: lock.locker(),
        amount0,
        amount1,
    });
    Ok(())
}

/// Handler function for the extension-only fee injection
///
/// # Errors
/// * `ErrorCode::NotPoolExtension` - If the locker is not the pool's extension
/// * `ErrorCode::NoActiveLiquidity` - If a nonzero amount meets zero liquidity
pub fn accumulate_as_fees_handler(
    core: &mut Core,
    lock: &Lock,
    key: &PoolKey,
    amount0: u128,
    amount1: u128,
) -> Result<()> {
    core.ledger.require_current(lock)?;
    require!(
        key.has_extension() && lock.locker() == key.extension,
        ErrorCode::NotPoolExtension
    );
    accrue_fees(core, lock, key, amount0, amount1)
}

/// Handler function for donations
///
/// # Errors
/// * `ErrorCode::NoActiveLiquidity` - If a nonzero amount meets zero liquidity
pub fn donate_handler(
    core: &mut Core,
    lock: &Lock,
    key: &PoolKey,
    amount0: u128,
    amount1: u128,
) -> Result<()> {
    core.ledger.require_current(lock)?;
    core.storage.pool(&key.pool_id())?;

    core.dispatch_hook(key, HookPoint::BeforeDonate, |extension, core, caller| {
        extension.before_donate(core, caller, key, amount0, amount1)
    })?;

    accrue_fees(core, lock, key, amount0, amount1)?;

    core.dispatch_hook(key, HookPoint::AfterDonate, |extension, core, caller| {
        extension.after_donate(core, caller, key, amount0, amount1)
    })
}
