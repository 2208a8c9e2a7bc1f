/// Pool Key Module
///
/// A pool is identified by its token pair, fee, tick spacing and extension.
/// Tokens are canonically ordered so each configuration maps to exactly one
/// pool, and the identifier is a program-derived address over all five fields
/// with seeds `["pool", token0, token1, fee, tick_spacing, extension]`.
use crate::constants::{FEE_DENOMINATOR, MAX_TICK_SPACING, POOL_SEED};
use crate::errors::ErrorCode;
use anchor_lang::prelude::*;
use std::fmt;

/// Immutable configuration of a pool.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PoolKey {
    /// Token with the lower address
    pub token0: Pubkey,
    /// Token with the higher address
    pub token1: Pubkey,
    /// Swap fee in millionths of the input amount
    pub fee: u32,
    pub tick_spacing: u32,
    /// Extension invoked around pool operations; `Pubkey::default()` for none
    pub extension: Pubkey,
}

impl PoolKey {
    /// Builds a key from an unordered token pair.
    ///
    /// # Errors
    /// * `ErrorCode::InvalidTokenOrder` - If both tokens are the same
    /// * Any error of [`PoolKey::validate`]
    pub fn new(
        token_a: Pubkey,
        token_b: Pubkey,
        fee: u32,
        tick_spacing: u32,
        extension: Pubkey,
    ) -> Result<Self> {
        let (token0, token1) = canonical_token_order(&token_a, &token_b)?;
        let key = Self {
            token0,
            token1,
            fee,
            tick_spacing,
            extension,
        };
        key.validate()?;
        Ok(key)
    }

    /// Checks the structural validity of the key.
    pub fn validate(&self) -> Result<()> {
        require!(self.token0 < self.token1, ErrorCode::InvalidTokenOrder);
        require!(self.fee < FEE_DENOMINATOR, ErrorCode::InvalidFee);
        require!(
            self.tick_spacing >= 1 && self.tick_spacing <= MAX_TICK_SPACING,
            ErrorCode::InvalidTickSpacing
        );
        Ok(())
    }

    pub fn has_extension(&self) -> bool {
        self.extension != Pubkey::default()
    }

    /// Derives the pool identifier.
    pub fn pool_id(&self) -> PoolId {
        let fee_bytes = self.fee.to_le_bytes();
        let spacing_bytes = self.tick_spacing.to_le_bytes();
        let seeds: [&[u8]; 6] = [
            POOL_SEED,
            self.token0.as_ref(),
            self.token1.as_ref(),
            &fee_bytes,
            &spacing_bytes,
            self.extension.as_ref(),
        ];
        let (address, _bump) = Pubkey::find_program_address(&seeds, &crate::ID);
        PoolId(address)
    }
}

/// Orders two token addresses canonically.
///
/// # Errors
/// * `ErrorCode::InvalidTokenOrder` - If both tokens are the same
pub fn canonical_token_order(token_a: &Pubkey, token_b: &Pubkey) -> Result<(Pubkey, Pubkey)> {
    require_keys_neq!(*token_a, *token_b, ErrorCode::InvalidTokenOrder);
    if token_a < token_b {
        Ok((*token_a, *token_b))
    } else {
        Ok((*token_b, *token_a))
    }
}

/// Stable identifier of a pool.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PoolId(pub Pubkey);

impl PoolId {
    pub fn address(&self) -> Pubkey {
        self.0
    }
}

impl fmt::Display for PoolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
