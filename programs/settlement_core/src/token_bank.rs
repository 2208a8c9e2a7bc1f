//! In-memory token balances
//!
//! Models the token environment the core settles against: every payment into
//! or out of the core moves balances here, so the core's own balance is the
//! ground truth that solvency is measured against.

use crate::errors::{ErrorCode, MathError};
use anchor_lang::prelude::*;
use std::collections::HashMap;

#[derive(Clone, Debug, Default)]
pub struct TokenBank {
    balances: HashMap<(Pubkey, Pubkey), u128>,
}

impl TokenBank {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn balance_of(&self, token: &Pubkey, owner: &Pubkey) -> u128 {
        self.balances.get(&(*token, *owner)).copied().unwrap_or(0)
    }

    /// Creates `amount` new tokens in `owner`'s balance.
    pub fn mint(&mut self, token: Pubkey, owner: Pubkey, amount: u128) -> Result<()> {
        let balance = self.balances.entry((token, owner)).or_insert(0);
        *balance = balance.checked_add(amount).ok_or(MathError::Overflow)?;
        Ok(())
    }

    /// Moves `amount` of `token` from `from` to `to`.
    ///
    /// # Errors
    /// * `ErrorCode::InsufficientBalance` - If `from` holds less than `amount`
    pub fn transfer(&mut self, token: Pubkey, from: Pubkey, to: Pubkey, amount: u128) -> Result<()> {
        if amount == 0 || from == to {
            return Ok(());
        }
        let from_balance = self.balance_of(&token, &from);
        require!(from_balance >= amount, ErrorCode::InsufficientBalance);

        let to_balance = self
            .balance_of(&token, &to)
            .checked_add(amount)
            .ok_or(MathError::Overflow)?;
        self.balances.insert((token, from), from_balance - amount);
        self.balances.insert((token, to), to_balance);
        Ok(())
    }
}
