//! Flash-accounting ledger
//!
//! Tracks, for every open lock, the signed debt per token and the payment
//! watch-markers used by the two-phase "record, transfer, settle" pattern.
//! Everything is keyed by `(lock_id, token)`: a nested lock can never see or
//! clear an entry of an ancestor or sibling lock.
//!
//! Lock ids increase strictly within an atomic unit and the counter resets
//! when the outermost lock closes. Debt is positive when the locker owes the
//! core and negative when the core owes the locker.

use crate::errors::{ErrorCode, MathError};
use crate::settlement::Core;
use anchor_lang::prelude::*;
use ethnum::I256;
use std::collections::HashMap;

/// Capability for one open lock.
///
/// Only the ledger creates locks; operations accept a lock only while it is
/// the innermost open lock and its locker address matches.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Lock {
    id: u32,
    locker: Pubkey,
}

impl Lock {
    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn locker(&self) -> Pubkey {
        self.locker
    }
}

/// Callback run while a lock is held.
///
/// Closures can be passed to [`Core::lock`] directly; this trait is for
/// lockers that carry their own state across calls.
pub trait Locker {
    fn locked(&mut self, core: &mut Core, lock: &Lock) -> Result<()>;
}

/// Callback run under a forwarded lock; receives the locker that forwarded.
pub trait Forwardee {
    fn forwarded(&mut self, core: &mut Core, lock: &Lock, original_locker: Pubkey) -> Result<()>;
}

#[derive(Clone, Copy, Debug)]
struct LockFrame {
    id: u32,
    locker: Pubkey,
    nonzero_debt_count: u32,
}

#[derive(Debug, Default)]
pub struct FlashLedger {
    frames: Vec<LockFrame>,
    next_id: u32,
    debts: HashMap<(u32, Pubkey), I256>,
    /// Core balance baselines of pending incoming transfers
    markers: HashMap<(u32, Pubkey), I256>,
    poisoned: bool,
}

impl FlashLedger {
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    pub fn current(&self) -> Option<Lock> {
        self.frames.last().map(|frame| Lock {
            id: frame.id,
            locker: frame.locker,
        })
    }

    pub fn is_poisoned(&self) -> bool {
        self.poisoned
    }

    /// Marks the atomic unit as failed; the outermost lock will roll it back.
    pub fn poison(&mut self) {
        self.poisoned = true;
    }

    /// Opens a lock for `locker` with the next id.
    ///
    /// # Errors
    /// * `ErrorCode::LockDepthExceeded` - If `max_depth` locks are already open
    pub fn open(&mut self, locker: Pubkey, max_depth: u32) -> Result<Lock> {
        require!(
            self.frames.len() < max_depth as usize,
            ErrorCode::LockDepthExceeded
        );
        let id = self.next_id;
        self.next_id = self.next_id.checked_add(1).ok_or(MathError::Overflow)?;
        self.frames.push(LockFrame {
            id,
            locker,
            nonzero_debt_count: 0,
        });
        Ok(Lock { id, locker })
    }

    /// Checks that `lock` is the innermost open lock.
    ///
    /// # Errors
    /// * `ErrorCode::NotLocked` - If no lock is open
    /// * `ErrorCode::InvalidLock` - If `lock` is stale, nested under another
    ///   lock, or presented by a different locker
    pub fn require_current(&self, lock: &Lock) -> Result<()> {
        let frame = self.frames.last().ok_or(ErrorCode::NotLocked)?;
        require!(
            frame.id == lock.id && frame.locker == lock.locker,
            ErrorCode::InvalidLock
        );
        Ok(())
    }

    /// Closes the innermost lock.
    ///
    /// # Errors
    /// * `ErrorCode::UnsettledDebt` - If any debt entry of the lock is nonzero;
    ///   the lock stays open
    pub fn close(&mut self, lock: &Lock) -> Result<()> {
        self.require_current(lock)?;
        let frame = self.frames[self.frames.len() - 1];
        if frame.nonzero_debt_count != 0 {
            msg!(
                "Lock {} of {} closed with {} unsettled token(s)",
                frame.id,
                frame.locker,
                frame.nonzero_debt_count
            );
            return err!(ErrorCode::UnsettledDebt);
        }

        self.frames.pop();
        self.forget(frame.id);
        Ok(())
    }

    /// Pops `lock` and every lock nested above it, discarding their entries.
    pub fn unwind(&mut self, lock: &Lock) {
        let Some(position) = self.frames.iter().position(|frame| frame.id == lock.id) else {
            return;
        };
        let removed: Vec<u32> = self.frames.drain(position..).map(|frame| frame.id).collect();
        for id in removed {
            self.forget(id);
        }
    }

    /// Clears all state once the outermost lock is gone.
    ///
    /// # Returns
    /// * `bool` - Whether the unit was poisoned
    pub fn finish_unit(&mut self) -> bool {
        let poisoned = self.poisoned;
        self.frames.clear();
        self.debts.clear();
        self.markers.clear();
        self.next_id = 0;
        self.poisoned = false;
        poisoned
    }

    fn forget(&mut self, id: u32) {
        self.debts.retain(|(lock_id, _), _| *lock_id != id);
        self.markers.retain(|(lock_id, _), _| *lock_id != id);
    }

    /// Hands the innermost lock to `to`, keeping its id and debt entries.
    ///
    /// # Returns
    /// * `(Lock, Pubkey)` - The forwarded lock and the locker it replaced
    pub fn forward(&mut self, lock: &Lock, to: Pubkey) -> Result<(Lock, Pubkey)> {
        self.require_current(lock)?;
        let previous = self.set_locker(lock.id, to)?;
        Ok((Lock { id: lock.id, locker: to }, previous))
    }

    /// Replaces the locker address of an open lock, returning the previous one.
    pub fn set_locker(&mut self, lock_id: u32, locker: Pubkey) -> Result<Pubkey> {
        let frame = self
            .frames
            .iter_mut()
            .find(|frame| frame.id == lock_id)
            .ok_or(ErrorCode::InvalidLock)?;
        Ok(std::mem::replace(&mut frame.locker, locker))
    }

    /// Adds `delta` to the `(lock_id, token)` debt entry.
    pub fn accrue_debt(&mut self, lock_id: u32, token: Pubkey, delta: I256) -> Result<()> {
        if delta == I256::ZERO {
            return Ok(());
        }
        let frame = self
            .frames
            .iter_mut()
            .find(|frame| frame.id == lock_id)
            .ok_or(ErrorCode::InvalidLock)?;

        let previous = self.debts.get(&(lock_id, token)).copied().unwrap_or(I256::ZERO);
        let next = previous.checked_add(delta).ok_or(MathError::Overflow)?;

        match (previous == I256::ZERO, next == I256::ZERO) {
            (true, false) => frame.nonzero_debt_count += 1,
            (false, true) => frame.nonzero_debt_count -= 1,
            _ => {}
        }

        if next == I256::ZERO {
            self.debts.remove(&(lock_id, token));
        } else {
            self.debts.insert((lock_id, token), next);
        }
        Ok(())
    }

    pub fn debt(&self, lock_id: u32, token: &Pubkey) -> I256 {
        self.debts
            .get(&(lock_id, *token))
            .copied()
            .unwrap_or(I256::ZERO)
    }

    pub fn nonzero_debt_count(&self, lock_id: u32) -> u32 {
        self.frames
            .iter()
            .find(|frame| frame.id == lock_id)
            .map_or(0, |frame| frame.nonzero_debt_count)
    }

    /// Records the core's balance as the baseline of an incoming transfer.
    ///
    /// An existing marker is kept, so tokens that arrived after it was set
    /// still count toward the next settlement.
    pub fn record_marker(&mut self, lock_id: u32, token: Pubkey, balance: u128) {
        self.markers
            .entry((lock_id, token))
            .or_insert_with(|| I256::from(balance));
    }

    pub fn has_marker(&self, lock_id: u32, token: &Pubkey) -> bool {
        self.markers.contains_key(&(lock_id, *token))
    }

    /// Measures the payment observed since the marker was recorded.
    ///
    /// The marker is cleared only when the payment is nonzero; the remaining
    /// markers on the same token are raised by the payment so the same tokens
    /// are never credited twice.
    ///
    /// # Errors
    /// * `ErrorCode::PaymentNotRecorded` - If no marker exists
    /// * `ErrorCode::NegativePayment` - If the balance is below the baseline
    pub fn take_payment(&mut self, lock_id: u32, token: Pubkey, balance: u128) -> Result<u128> {
        let baseline = *self
            .markers
            .get(&(lock_id, token))
            .ok_or(ErrorCode::PaymentNotRecorded)?;
        let payment = I256::from(balance)
            .checked_sub(baseline)
            .ok_or(MathError::Underflow)?;
        require!(!payment.is_negative(), ErrorCode::NegativePayment);
        if payment == I256::ZERO {
            return Ok(0);
        }

        self.markers.remove(&(lock_id, token));
        self.shift_markers(token, payment)?;

        let (high, low) = payment.as_u256().into_words();
        require!(high == 0, MathError::AmountOverflow);
        Ok(low)
    }

    /// Moves every marker on `token` by `delta`, for transfers the core makes
    /// or receives outside of a settlement.
    pub fn shift_markers(&mut self, token: Pubkey, delta: I256) -> Result<()> {
        for ((_, marker_token), baseline) in self.markers.iter_mut() {
            if *marker_token == token {
                *baseline = baseline.checked_add(delta).ok_or(MathError::Overflow)?;
            }
        }
        Ok(())
    }
}
