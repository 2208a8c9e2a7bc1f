/// Payments Instruction Module
///
/// Token movements between lockers and the core, and their effect on debt.
///
/// Incoming payments can be made two ways. `pay` pulls tokens from the
/// locker directly. The two-phase pattern records the core's balance with
/// `record_incoming_transfer`, lets the locker transfer by any means, then
/// credits the observed increase with `settle_incoming_transfer`.
///
/// Any transfer the core makes or receives outside a settlement shifts the
/// recorded baselines on that token, so no settlement can credit it.
use crate::errors::ErrorCode;
use crate::ledger::Lock;
use crate::settlement::Core;
use anchor_lang::prelude::*;
use ethnum::I256;

/// Records the core's current balance of `token` as the baseline of an
/// incoming transfer. An existing baseline for this lock is kept.
pub fn record_incoming_transfer_handler(core: &mut Core, lock: &Lock, token: Pubkey) -> Result<()> {
    core.ledger.require_current(lock)?;
    let balance = core.core_balance(&token);
    core.ledger.record_marker(lock.id(), token, balance);
    Ok(())
}

/// Credits the balance increase since the recorded baseline.
///
/// # Returns
/// * `Result<u128>` - The payment observed; zero leaves the baseline in place
///
/// # Errors
/// * `ErrorCode::PaymentNotRecorded` - If no baseline was recorded
/// * `ErrorCode::NegativePayment` - If the balance fell below the baseline
pub fn settle_incoming_transfer_handler(core: &mut Core, lock: &Lock, token: Pubkey) -> Result<u128> {
    core.ledger.require_current(lock)?;
    let balance = core.core_balance(&token);
    let payment = core.ledger.take_payment(lock.id(), token, balance)?;
    core.accrue_debt(lock, token, -I256::from(payment))?;
    Ok(payment)
}

/// Pulls `amount` of `token` from the locker.
///
/// # Errors
/// * `ErrorCode::InvalidLock` - If the core itself holds the lock
/// * `ErrorCode::InsufficientBalance` - If the locker holds less than `amount`
pub fn pay_handler(core: &mut Core, lock: &Lock, token: Pubkey, amount: u128) -> Result<()> {
    core.ledger.require_current(lock)?;
    let address = core.address();
    require_keys_neq!(lock.locker(), address, ErrorCode::InvalidLock);
    core.bank
        .transfer(token, lock.locker(), address, amount)?;
    core.accrue_debt(lock, token, -I256::from(amount))?;
    core.ledger.shift_markers(token, I256::from(amount))
}

/// Sends `amount` of `token` from the core to `recipient`, owed by the locker.
///
/// # Errors
/// * `ErrorCode::InsufficientBalance` - If the core holds less than `amount`
pub fn withdraw_handler(
    core: &mut Core,
    lock: &Lock,
    token: Pubkey,
    recipient: Pubkey,
    amount: u128,
) -> Result<()> {
    core.ledger.require_current(lock)?;
    core.accrue_debt(lock, token, I256::from(amount))?;
    let address = core.address();
    core.bank
        .transfer(token, address, recipient, amount)?;
    if recipient == address {
        return Ok(());
    }
    core.ledger.shift_markers(token, -I256::from(amount))
}
