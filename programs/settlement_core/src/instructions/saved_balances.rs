/// Saved Balances Instruction Module
///
/// Lets a locker park tokens inside the core across atomic units. Saving
/// moves an amount from the locker's debt into its saved balance; loading
/// moves it back. Balances are keyed by owner, token pair and salt.
use crate::errors::{ErrorCode, MathError};
use crate::ledger::Lock;
use crate::settlement::Core;
use crate::state::SavedBalanceKey;
use anchor_lang::prelude::*;
use ethnum::I256;

fn apply_delta(balance: u128, delta: i128) -> Result<u128> {
    if delta >= 0 {
        balance
            .checked_add(delta.unsigned_abs())
            .ok_or_else(|| error!(MathError::Overflow))
    } else {
        balance
            .checked_sub(delta.unsigned_abs())
            .ok_or_else(|| error!(ErrorCode::InsufficientSavedBalance))
    }
}

/// Handler function for updating saved balances
///
/// # Parameters
/// * `delta0`, `delta1` - Positive to save, negative to load
///
/// # Errors
/// * `ErrorCode::InvalidTokenOrder` - If `token0 >= token1`
/// * `ErrorCode::InsufficientSavedBalance` - If loading more than is saved
pub fn handler(
    core: &mut Core,
    lock: &Lock,
    token0: Pubkey,
    token1: Pubkey,
    salt: u64,
    delta0: i128,
    delta1: i128,
) -> Result<()> {
    core.ledger.require_current(lock)?;
    require!(token0 < token1, ErrorCode::InvalidTokenOrder);

    let key = SavedBalanceKey {
        owner: lock.locker(),
        token0,
        token1,
        salt,
    };
    let (balance0, balance1) = core
        .storage
        .saved_balances
        .get(&key)
        .copied()
        .unwrap_or((0, 0));
    let next = (apply_delta(balance0, delta0)?, apply_delta(balance1, delta1)?);

    if next == (0, 0) {
        core.storage.saved_balances.remove(&key);
    } else {
        core.storage.saved_balances.insert(key, next);
    }

    core.accrue_debt(lock, token0, I256::from(delta0))?;
    core.accrue_debt(lock, token1, I256::from(delta1))
}
