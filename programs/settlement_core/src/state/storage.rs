use crate::errors::ErrorCode;
use crate::fees_per_liquidity::FeesPerLiquidity;
use crate::pool_key::PoolId;
use crate::position::{Bounds, Position, PositionKey};
use crate::state::pool::PoolState;
use crate::tick::{fees_per_liquidity_inside, Tick};
use crate::tick_bitmap::TickBitmap;
use anchor_lang::prelude::*;
use std::collections::HashMap;

/// Key of a saved balance pair.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SavedBalanceKey {
    pub owner: Pubkey,
    pub token0: Pubkey,
    pub token1: Pubkey,
    pub salt: u64,
}

/// All state that outlives an atomic unit.
///
/// The whole storage is cloned when an outermost lock opens and restored if
/// the unit aborts, so every map here must hold plain values.
#[derive(Clone, Debug, Default)]
pub struct CoreStorage {
    pub pools: HashMap<PoolId, PoolState>,
    pub fees_per_liquidity: HashMap<PoolId, FeesPerLiquidity>,
    pub ticks: HashMap<(PoolId, i32), Tick>,
    pub bitmaps: HashMap<PoolId, TickBitmap>,
    pub positions: HashMap<(PoolId, PositionKey), Position>,
    pub saved_balances: HashMap<SavedBalanceKey, (u128, u128)>,
}

impl CoreStorage {
    /// Current state of an initialized pool.
    ///
    /// # Errors
    /// * `ErrorCode::PoolNotInitialized`
    pub fn pool(&self, pool_id: &PoolId) -> Result<PoolState> {
        self.pools
            .get(pool_id)
            .copied()
            .ok_or_else(|| error!(ErrorCode::PoolNotInitialized))
    }

    pub fn fees_per_liquidity_global(&self, pool_id: &PoolId) -> FeesPerLiquidity {
        self.fees_per_liquidity
            .get(pool_id)
            .copied()
            .unwrap_or_default()
    }

    pub fn tick(&self, pool_id: &PoolId, tick: i32) -> Tick {
        self.ticks.get(&(*pool_id, tick)).copied().unwrap_or_default()
    }

    pub fn position(&self, pool_id: &PoolId, key: &PositionKey) -> Position {
        self.positions
            .get(&(*pool_id, *key))
            .copied()
            .unwrap_or_default()
    }

    /// Applies a position's liquidity delta to one of its boundary ticks.
    ///
    /// A tick becoming initialized snapshots its outside value: the global
    /// accumulator if the tick is at or below the current tick, zero otherwise.
    /// Ticks are only de-initialized by [`CoreStorage::clear_tick_if_unused`],
    /// after the position's fees have been computed against them.
    pub fn update_tick(
        &mut self,
        pool_id: PoolId,
        tick_spacing: u32,
        tick: i32,
        tick_current: i32,
        liquidity_delta: i128,
        is_upper: bool,
    ) -> Result<()> {
        let global = self.fees_per_liquidity_global(&pool_id);
        let entry = self.ticks.entry((pool_id, tick)).or_default();

        if !entry.is_initialized() {
            entry.fees_per_liquidity_outside = if tick <= tick_current {
                global
            } else {
                FeesPerLiquidity::ZERO
            };
        }

        let flipped = entry.update_on_liquidity_change(liquidity_delta, is_upper)?;
        if flipped && entry.is_initialized() {
            self.bitmaps
                .entry(pool_id)
                .or_default()
                .flip_tick(tick, tick_spacing)?;
        }
        Ok(())
    }

    /// Drops a tick no position references any more and clears its bitmap bit.
    pub fn clear_tick_if_unused(&mut self, pool_id: PoolId, tick_spacing: u32, tick: i32) -> Result<()> {
        let unused = self
            .ticks
            .get(&(pool_id, tick))
            .is_some_and(|state| !state.is_initialized());
        if !unused {
            return Ok(());
        }

        self.ticks.remove(&(pool_id, tick));
        if let Some(bitmap) = self.bitmaps.get_mut(&pool_id) {
            bitmap.flip_tick(tick, tick_spacing)?;
            if bitmap.is_empty() {
                self.bitmaps.remove(&pool_id);
            }
        }
        Ok(())
    }

    /// Crosses an initialized tick during a swap and returns its net liquidity.
    pub fn cross_tick(
        &mut self,
        pool_id: PoolId,
        tick: i32,
        fees_per_liquidity_global: &FeesPerLiquidity,
    ) -> Result<i128> {
        let state = self
            .ticks
            .get_mut(&(pool_id, tick))
            .ok_or_else(|| error!(ErrorCode::TickNotInitialized))?;
        state.cross(fees_per_liquidity_global)
    }

    /// Fees per liquidity accrued inside `bounds` given the pool's current tick.
    pub fn fees_per_liquidity_inside(
        &self,
        pool_id: &PoolId,
        tick_current: i32,
        bounds: &Bounds,
    ) -> Result<FeesPerLiquidity> {
        let lower = self.tick(pool_id, bounds.lower);
        let upper = self.tick(pool_id, bounds.upper);
        fees_per_liquidity_inside(
            &self.fees_per_liquidity_global(pool_id),
            tick_current,
            bounds.lower,
            &lower.fees_per_liquidity_outside,
            bounds.upper,
            &upper.fees_per_liquidity_outside,
        )
    }
}
