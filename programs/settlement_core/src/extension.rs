/// Extension hook dispatch for pool operations.
///
/// A pool key may name one extension. The core calls it before and after
/// pool initialization, position updates, swaps, fee collection and
/// donations, filtered by the call points the extension declares. Hooks
/// receive the core itself and may open nested locks to act on it.
///
/// Dispatch rules:
/// - a hook is skipped when the extension is the current locker
/// - a hook point runs at most once at a time per pool; a re-entrant dispatch
///   of the same point for the same pool is skipped
/// - a hook error aborts the operation that dispatched it
use crate::errors::ErrorCode;
use crate::instructions::{SwapParams, UpdatePositionParams};
use crate::pool_key::{PoolId, PoolKey};
use crate::position::Bounds;
use crate::settlement::Core;
use crate::state::Delta;
use anchor_lang::prelude::*;
use primitive_types::U256;
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HookPoint {
    BeforeInitializePool,
    AfterInitializePool,
    BeforeUpdatePosition,
    AfterUpdatePosition,
    BeforeSwap,
    AfterSwap,
    BeforeCollectFees,
    AfterCollectFees,
    BeforeDonate,
    AfterDonate,
}

impl HookPoint {
    fn bit(self) -> u16 {
        1 << (self as u16)
    }
}

/// Set of hook points an extension wants to be called at.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CallPoints {
    bits: u16,
}

impl CallPoints {
    pub const fn none() -> Self {
        Self { bits: 0 }
    }

    pub const fn all() -> Self {
        Self { bits: (1 << 10) - 1 }
    }

    pub fn with(mut self, point: HookPoint) -> Self {
        self.bits |= point.bit();
        self
    }

    pub fn contains(&self, point: HookPoint) -> bool {
        self.bits & point.bit() != 0
    }
}

/// Callbacks an extension receives around pool operations.
///
/// Every hook defaults to a no-op; `caller` is the locker that invoked the
/// operation. Extensions keep their own state behind interior mutability,
/// since the registry shares them with the core.
#[allow(unused_variables)]
pub trait Extension {
    fn call_points(&self) -> CallPoints;

    fn before_initialize_pool(&self, core: &mut Core, caller: Pubkey, pool: &PoolKey, tick: i32) -> Result<()> {
        Ok(())
    }

    fn after_initialize_pool(
        &self,
        core: &mut Core,
        caller: Pubkey,
        pool: &PoolKey,
        tick: i32,
        sqrt_ratio: U256,
    ) -> Result<()> {
        Ok(())
    }

    fn before_update_position(
        &self,
        core: &mut Core,
        caller: Pubkey,
        pool: &PoolKey,
        params: &UpdatePositionParams,
    ) -> Result<()> {
        Ok(())
    }

    fn after_update_position(
        &self,
        core: &mut Core,
        caller: Pubkey,
        pool: &PoolKey,
        params: &UpdatePositionParams,
        delta: Delta,
    ) -> Result<()> {
        Ok(())
    }

    fn before_swap(&self, core: &mut Core, caller: Pubkey, pool: &PoolKey, params: &SwapParams) -> Result<()> {
        Ok(())
    }

    fn after_swap(
        &self,
        core: &mut Core,
        caller: Pubkey,
        pool: &PoolKey,
        params: &SwapParams,
        delta: Delta,
    ) -> Result<()> {
        Ok(())
    }

    fn before_collect_fees(
        &self,
        core: &mut Core,
        caller: Pubkey,
        pool: &PoolKey,
        salt: u64,
        bounds: &Bounds,
    ) -> Result<()> {
        Ok(())
    }

    #[allow(clippy::too_many_arguments)]
    fn after_collect_fees(
        &self,
        core: &mut Core,
        caller: Pubkey,
        pool: &PoolKey,
        salt: u64,
        bounds: &Bounds,
        amount0: u128,
        amount1: u128,
    ) -> Result<()> {
        Ok(())
    }

    fn before_donate(
        &self,
        core: &mut Core,
        caller: Pubkey,
        pool: &PoolKey,
        amount0: u128,
        amount1: u128,
    ) -> Result<()> {
        Ok(())
    }

    fn after_donate(
        &self,
        core: &mut Core,
        caller: Pubkey,
        pool: &PoolKey,
        amount0: u128,
        amount1: u128,
    ) -> Result<()> {
        Ok(())
    }
}

#[derive(Default)]
pub struct ExtensionRegistry {
    extensions: HashMap<Pubkey, Rc<dyn Extension>>,
}

impl ExtensionRegistry {
    pub fn register(&mut self, address: Pubkey, extension: Rc<dyn Extension>) -> Result<()> {
        require!(
            !self.extensions.contains_key(&address),
            ErrorCode::ExtensionAlreadyRegistered
        );
        self.extensions.insert(address, extension);
        Ok(())
    }

    pub fn get(&self, address: &Pubkey) -> Option<Rc<dyn Extension>> {
        self.extensions.get(address).cloned()
    }

    pub fn contains(&self, address: &Pubkey) -> bool {
        self.extensions.contains_key(address)
    }
}

/// Hook points currently executing, per pool.
#[derive(Debug, Default)]
pub struct HookGuard {
    in_flight: HashSet<(PoolId, HookPoint)>,
}

impl HookGuard {
    /// Marks the hook point as running; `false` if it already is.
    pub fn enter(&mut self, pool_id: PoolId, point: HookPoint) -> bool {
        self.in_flight.insert((pool_id, point))
    }

    pub fn exit(&mut self, pool_id: PoolId, point: HookPoint) {
        self.in_flight.remove(&(pool_id, point));
    }

    pub fn is_active(&self, pool_id: PoolId, point: HookPoint) -> bool {
        self.in_flight.contains(&(pool_id, point))
    }

    pub fn clear(&mut self) {
        self.in_flight.clear();
    }
}

// ============================================================================
// Dispatch
// ============================================================================

impl Core {
    /// Invokes `call` on the pool's extension if the hook point applies.
    ///
    /// # Errors
    /// * `ErrorCode::ExtensionNotRegistered` - If the key names an extension
    ///   that was never registered
    /// * Any error returned by the hook itself
    pub(crate) fn dispatch_hook<F>(&mut self, key: &PoolKey, point: HookPoint, call: F) -> Result<()>
    where
        F: FnOnce(&dyn Extension, &mut Core, Pubkey) -> Result<()>,
    {
        // Early exit if the pool has no extension
        if !key.has_extension() {
            return Ok(());
        }
        let extension = self
            .extensions
            .get(&key.extension)
            .ok_or(ErrorCode::ExtensionNotRegistered)?;
        if !extension.call_points().contains(point) {
            return Ok(());
        }

        let caller = self.current_lock().ok_or(ErrorCode::NotLocked)?.locker();
        if caller == key.extension {
            return Ok(());
        }

        let pool_id = key.pool_id();
        if !self.hooks.enter(pool_id, point) {
            msg!("Skipping re-entrant {:?} hook on pool {}", point, pool_id);
            return Ok(());
        }
        let result = call(extension.as_ref(), self, caller);
        self.hooks.exit(pool_id, point);
        result
    }
}
