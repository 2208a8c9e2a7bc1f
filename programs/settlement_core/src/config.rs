//! Runtime configuration of a core instance.

use crate::constants::DEFAULT_MAX_LOCK_DEPTH;
use crate::errors::ErrorCode;
use anchor_lang::prelude::*;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CoreConfig {
    /// Account that holds the core's token balances
    pub address: Pubkey,
    /// Maximum number of simultaneously open locks
    pub max_lock_depth: u32,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            address: crate::ID,
            max_lock_depth: DEFAULT_MAX_LOCK_DEPTH,
        }
    }
}

impl CoreConfig {
    pub fn new(address: Pubkey) -> Self {
        Self {
            address,
            ..Self::default()
        }
    }

    pub fn with_max_lock_depth(mut self, max_lock_depth: u32) -> Self {
        self.max_lock_depth = max_lock_depth;
        self
    }

    pub fn validate(&self) -> Result<()> {
        require!(self.max_lock_depth >= 1, ErrorCode::LockDepthExceeded);
        Ok(())
    }
}
