//! Settlement core
//!
//! `Core` owns the pool, tick and position stores, the token bank it settles
//! against, the flash-accounting ledger and the extension registry. Every
//! state-changing operation runs under a lock (see `instructions/`), and the
//! outermost lock of an atomic unit either completes with an empty ledger or
//! restores the state captured when it opened.

use crate::config::CoreConfig;
use crate::errors::ErrorCode;
use crate::extension::{Extension, ExtensionRegistry, HookGuard};
use crate::fees_per_liquidity::FeesPerLiquidity;
use crate::instructions::{self, SwapParams, UpdatePositionParams};
use crate::ledger::{FlashLedger, Forwardee, Lock, Locker};
use crate::pool_key::PoolKey;
use crate::position::{Bounds, Position, PositionKey};
use crate::state::{CoreStorage, Delta, PoolState, SavedBalanceKey};
use crate::tick::Tick;
use crate::token_bank::TokenBank;
use anchor_lang::prelude::*;
use ethnum::I256;
use primitive_types::U256;
use std::rc::Rc;

/// State captured when the outermost lock opens.
#[derive(Clone, Debug)]
struct Snapshot {
    storage: CoreStorage,
    bank: TokenBank,
}

pub struct Core {
    config: CoreConfig,
    pub(crate) storage: CoreStorage,
    pub(crate) bank: TokenBank,
    pub(crate) ledger: FlashLedger,
    pub(crate) extensions: ExtensionRegistry,
    pub(crate) hooks: HookGuard,
    snapshot: Option<Box<Snapshot>>,
    now: u64,
}

impl Default for Core {
    fn default() -> Self {
        Self::with_config(CoreConfig::default())
    }
}

impl Core {
    /// Creates an empty core.
    ///
    /// # Errors
    /// * `ErrorCode::LockDepthExceeded` - If the configuration allows no lock at all
    pub fn new(config: CoreConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::with_config(config))
    }

    fn with_config(config: CoreConfig) -> Self {
        Self {
            config,
            storage: CoreStorage::default(),
            bank: TokenBank::new(),
            ledger: FlashLedger::default(),
            extensions: ExtensionRegistry::default(),
            hooks: HookGuard::default(),
            snapshot: None,
            now: 0,
        }
    }

    pub fn config(&self) -> &CoreConfig {
        &self.config
    }

    /// Account holding the core's token balances.
    pub fn address(&self) -> Pubkey {
        self.config.address
    }

    // ----------------------------------------------------------------------
    // Locks
    // ----------------------------------------------------------------------

    /// Runs `body` as `caller` inside a new lock.
    ///
    /// The lock is closed when `body` returns, which fails with
    /// `UnsettledDebt` unless every debt entry of the lock is zero. Any
    /// failure unwinds the lock; at the outermost level the whole atomic unit
    /// is rolled back.
    pub fn lock<T, F>(&mut self, caller: Pubkey, body: F) -> Result<T>
    where
        F: FnOnce(&mut Core, &Lock) -> Result<T>,
    {
        let lock = self.begin_lock(caller)?;
        let value = match body(self, &lock) {
            Ok(value) => value,
            Err(error) => {
                self.abort_lock(&lock);
                return Err(error);
            }
        };
        if let Err(error) = self.end_lock(&lock) {
            self.abort_lock(&lock);
            return Err(error);
        }
        Ok(value)
    }

    /// [`Core::lock`] for stateful lockers.
    pub fn lock_with(&mut self, caller: Pubkey, locker: &mut dyn Locker) -> Result<()> {
        self.lock(caller, |core, lock| locker.locked(core, lock))
    }

    /// Opens a lock for `caller`.
    ///
    /// The outermost lock snapshots all persistent state so the unit can be
    /// rolled back. Prefer [`Core::lock`], which pairs this with
    /// [`Core::end_lock`] and [`Core::abort_lock`].
    ///
    /// # Errors
    /// * `ErrorCode::LockDepthExceeded` - If `max_lock_depth` locks are open;
    ///   this poisons the enclosing unit
    pub fn begin_lock(&mut self, caller: Pubkey) -> Result<Lock> {
        let outermost = self.ledger.depth() == 0;
        if outermost {
            self.snapshot = Some(Box::new(Snapshot {
                storage: self.storage.clone(),
                bank: self.bank.clone(),
            }));
        }

        match self.ledger.open(caller, self.config.max_lock_depth) {
            Ok(lock) => Ok(lock),
            Err(error) => {
                if outermost {
                    self.snapshot = None;
                } else {
                    self.ledger.poison();
                }
                Err(error)
            }
        }
    }

    /// Closes the innermost lock.
    ///
    /// # Errors
    /// * `ErrorCode::UnsettledDebt` - If any debt entry of the lock is nonzero;
    ///   the lock stays open
    /// * `ErrorCode::AtomicUnitAborted` - If this was the outermost lock and a
    ///   nested failure was swallowed; all state is restored
    pub fn end_lock(&mut self, lock: &Lock) -> Result<()> {
        self.ledger.close(lock)?;
        if self.ledger.depth() > 0 {
            return Ok(());
        }

        let poisoned = self.ledger.finish_unit();
        let snapshot = self.snapshot.take();
        if poisoned {
            if let Some(snapshot) = snapshot {
                self.restore(*snapshot);
            }
            msg!("Atomic unit of {} aborted by a nested failure", lock.locker());
            return err!(ErrorCode::AtomicUnitAborted);
        }
        Ok(())
    }

    /// Abandons `lock` and every lock opened inside it.
    ///
    /// At the outermost level the unit's state is restored immediately;
    /// otherwise the unit is poisoned and restored when its outermost lock
    /// ends.
    pub fn abort_lock(&mut self, lock: &Lock) {
        self.ledger.unwind(lock);
        if self.ledger.depth() > 0 {
            self.ledger.poison();
            return;
        }

        self.ledger.finish_unit();
        if let Some(snapshot) = self.snapshot.take() {
            self.restore(*snapshot);
            msg!("Atomic unit of {} rolled back", lock.locker());
        }
    }

    fn restore(&mut self, snapshot: Snapshot) {
        self.storage = snapshot.storage;
        self.bank = snapshot.bank;
        self.hooks.clear();
    }

    /// Runs `body` as `to` under the same lock id.
    ///
    /// Debt accrued by `body` lands on the same entries as the forwarding
    /// locker's; the locker address is restored afterwards.
    pub fn forward<T, F>(&mut self, lock: &Lock, to: Pubkey, body: F) -> Result<T>
    where
        F: FnOnce(&mut Core, &Lock, Pubkey) -> Result<T>,
    {
        let (forwarded, original_locker) = self.ledger.forward(lock, to)?;
        let result = body(self, &forwarded, original_locker);
        let restored = self.ledger.set_locker(lock.id(), original_locker);
        let result = result.and_then(|value| restored.map(|_| value));
        self.poison_on_err(result)
    }

    /// [`Core::forward`] for stateful forwardees.
    pub fn forward_to(&mut self, lock: &Lock, to: Pubkey, forwardee: &mut dyn Forwardee) -> Result<()> {
        self.forward(lock, to, |core, forwarded, original| {
            forwardee.forwarded(core, forwarded, original)
        })
    }

    /// Poisons the open unit if `result` is an error.
    pub(crate) fn poison_on_err<T>(&mut self, result: Result<T>) -> Result<T> {
        if result.is_err() && self.ledger.depth() > 0 {
            self.ledger.poison();
        }
        result
    }

    pub fn current_lock(&self) -> Option<Lock> {
        self.ledger.current()
    }

    pub fn lock_depth(&self) -> usize {
        self.ledger.depth()
    }

    /// Signed debt of `lock` in `token`; positive when the locker owes the core.
    pub fn debt(&self, lock: &Lock, token: &Pubkey) -> I256 {
        self.ledger.debt(lock.id(), token)
    }

    /// Number of tokens with a nonzero debt entry under `lock`.
    pub fn nonzero_debt_count(&self, lock: &Lock) -> u32 {
        self.ledger.nonzero_debt_count(lock.id())
    }

    pub(crate) fn accrue_debt(&mut self, lock: &Lock, token: Pubkey, delta: I256) -> Result<()> {
        self.ledger.accrue_debt(lock.id(), token, delta)
    }

    // ----------------------------------------------------------------------
    // Operations
    // ----------------------------------------------------------------------

    /// Initializes a pool at `tick` and returns its starting sqrt ratio.
    pub fn initialize_pool(&mut self, lock: &Lock, key: &PoolKey, tick: i32) -> Result<U256> {
        let result = instructions::initialize_pool::handler(self, lock, key, tick);
        self.poison_on_err(result)
    }

    /// Adds or removes liquidity of the locker's position.
    pub fn update_position(
        &mut self,
        lock: &Lock,
        key: &PoolKey,
        params: UpdatePositionParams,
    ) -> Result<Delta> {
        let result = instructions::update_position::handler(self, lock, key, params);
        self.poison_on_err(result)
    }

    pub fn swap(&mut self, lock: &Lock, key: &PoolKey, params: SwapParams) -> Result<Delta> {
        let result = instructions::swap::handler(self, lock, key, params);
        self.poison_on_err(result)
    }

    /// Collects the fees of the locker's position.
    pub fn collect_fees(
        &mut self,
        lock: &Lock,
        key: &PoolKey,
        salt: u64,
        bounds: Bounds,
    ) -> Result<(u128, u128)> {
        let result = instructions::collect_fees::handler(self, lock, key, salt, bounds);
        self.poison_on_err(result)
    }

    /// Adds fees to a pool on behalf of its extension.
    pub fn accumulate_as_fees(&mut self, lock: &Lock, key: &PoolKey, amount0: u128, amount1: u128) -> Result<()> {
        let result = instructions::fees::accumulate_as_fees_handler(self, lock, key, amount0, amount1);
        self.poison_on_err(result)
    }

    pub fn donate(&mut self, lock: &Lock, key: &PoolKey, amount0: u128, amount1: u128) -> Result<()> {
        let result = instructions::fees::donate_handler(self, lock, key, amount0, amount1);
        self.poison_on_err(result)
    }

    pub fn update_saved_balances(
        &mut self,
        lock: &Lock,
        token0: Pubkey,
        token1: Pubkey,
        salt: u64,
        delta0: i128,
        delta1: i128,
    ) -> Result<()> {
        let result =
            instructions::saved_balances::handler(self, lock, token0, token1, salt, delta0, delta1);
        self.poison_on_err(result)
    }

    pub fn record_incoming_transfer(&mut self, lock: &Lock, token: Pubkey) -> Result<()> {
        let result = instructions::payments::record_incoming_transfer_handler(self, lock, token);
        self.poison_on_err(result)
    }

    pub fn settle_incoming_transfer(&mut self, lock: &Lock, token: Pubkey) -> Result<u128> {
        let result = instructions::payments::settle_incoming_transfer_handler(self, lock, token);
        self.poison_on_err(result)
    }

    pub fn pay(&mut self, lock: &Lock, token: Pubkey, amount: u128) -> Result<()> {
        let result = instructions::payments::pay_handler(self, lock, token, amount);
        self.poison_on_err(result)
    }

    pub fn withdraw(&mut self, lock: &Lock, token: Pubkey, recipient: Pubkey, amount: u128) -> Result<()> {
        let result = instructions::payments::withdraw_handler(self, lock, token, recipient, amount);
        self.poison_on_err(result)
    }

    // ----------------------------------------------------------------------
    // Extensions and clock
    // ----------------------------------------------------------------------

    /// Registers the callbacks of the extension at `address`.
    ///
    /// # Errors
    /// * `ErrorCode::ExtensionAlreadyRegistered`
    pub fn register_extension(&mut self, address: Pubkey, extension: Rc<dyn Extension>) -> Result<()> {
        self.extensions.register(address, extension)
    }

    pub fn set_time(&mut self, now: u64) {
        self.now = now;
    }

    /// Time unit the core was last advanced to.
    pub fn current_time(&self) -> u64 {
        self.now
    }

    // ----------------------------------------------------------------------
    // Token environment
    // ----------------------------------------------------------------------

    pub fn bank(&self) -> &TokenBank {
        &self.bank
    }

    /// Mutable access for transfers made outside the core, e.g. a locker
    /// paying the core ahead of `settle_incoming_transfer`.
    pub fn bank_mut(&mut self) -> &mut TokenBank {
        &mut self.bank
    }

    pub fn core_balance(&self, token: &Pubkey) -> u128 {
        self.bank.balance_of(token, &self.config.address)
    }

    // ----------------------------------------------------------------------
    // Read accessors
    // ----------------------------------------------------------------------

    pub fn pool_state(&self, key: &PoolKey) -> Result<PoolState> {
        self.storage.pool(&key.pool_id())
    }

    pub fn is_pool_initialized(&self, key: &PoolKey) -> bool {
        self.storage.pools.contains_key(&key.pool_id())
    }

    pub fn tick(&self, key: &PoolKey, tick: i32) -> Tick {
        self.storage.tick(&key.pool_id(), tick)
    }

    pub fn is_tick_initialized(&self, key: &PoolKey, tick: i32) -> bool {
        self.storage
            .bitmaps
            .get(&key.pool_id())
            .is_some_and(|bitmap| bitmap.is_tick_initialized(tick, key.tick_spacing))
    }

    pub fn fees_per_liquidity(&self, key: &PoolKey) -> FeesPerLiquidity {
        self.storage.fees_per_liquidity_global(&key.pool_id())
    }

    pub fn fees_per_liquidity_inside(&self, key: &PoolKey, bounds: &Bounds) -> Result<FeesPerLiquidity> {
        let pool_id = key.pool_id();
        let state = self.storage.pool(&pool_id)?;
        self.storage
            .fees_per_liquidity_inside(&pool_id, state.tick, bounds)
    }

    pub fn position(&self, key: &PoolKey, owner: Pubkey, salt: u64, bounds: Bounds) -> Position {
        let position_key = PositionKey { salt, owner, bounds };
        self.storage.position(&key.pool_id(), &position_key)
    }

    /// Fees a position could collect right now.
    pub fn position_fees(&self, key: &PoolKey, owner: Pubkey, salt: u64, bounds: Bounds) -> Result<(u128, u128)> {
        let inside = self.fees_per_liquidity_inside(key, &bounds)?;
        self.position(key, owner, salt, bounds).fees(&inside)
    }

    pub fn saved_balance(&self, owner: Pubkey, token0: Pubkey, token1: Pubkey, salt: u64) -> (u128, u128) {
        let key = SavedBalanceKey {
            owner,
            token0,
            token1,
            salt,
        };
        self.storage
            .saved_balances
            .get(&key)
            .copied()
            .unwrap_or((0, 0))
    }
}
