//! Events emitted by the core's operations.
//!
//! Sqrt ratios are carried as little-endian u64 limbs.

use anchor_lang::prelude::*;

#[event]
pub struct PoolInitialized {
    pub pool_id: Pubkey,
    pub token0: Pubkey,
    pub token1: Pubkey,
    pub fee: u32,
    pub tick_spacing: u32,
    pub extension: Pubkey,
    pub tick: i32,
    pub sqrt_ratio: [u64; 4],
}

#[event]
pub struct PositionUpdated {
    pub pool_id: Pubkey,
    pub owner: Pubkey,
    pub salt: u64,
    pub lower: i32,
    pub upper: i32,
    pub liquidity_delta: i128,
    pub amount0: i128,
    pub amount1: i128,
}

#[event]
pub struct Swapped {
    pub pool_id: Pubkey,
    pub locker: Pubkey,
    pub amount0: i128,
    pub amount1: i128,
    pub sqrt_ratio_after: [u64; 4],
    pub tick_after: i32,
    pub liquidity_after: u128,
}

#[event]
pub struct FeesCollected {
    pub pool_id: Pubkey,
    pub owner: Pubkey,
    pub salt: u64,
    pub lower: i32,
    pub upper: i32,
    pub amount0: u128,
    pub amount1: u128,
}

#[event]
pub struct FeesAccumulated {
    pub pool_id: Pubkey,
    pub payer: Pubkey,
    pub amount0: u128,
    pub amount1: u128,
}
