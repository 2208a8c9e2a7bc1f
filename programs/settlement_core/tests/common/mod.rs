//! Shared fixture for the integration tests
//!
//! Sets up a core with two funded lockers and a pool key over a sorted token
//! pair. The helpers open one lock per operation and settle every debt of the
//! pool's tokens before the lock closes.

#![allow(dead_code)]

use anchor_lang::prelude::*;
use ethnum::I256;
use primitive_types::U256;
use settlement_core::{Bounds, Core, Delta, Lock, PoolKey, SwapParams, UpdatePositionParams};

pub const INITIAL_BALANCE: u128 = 1_000_000_000_000_000_000_000_000_000_000;

pub fn new_pubkey(val: u8) -> Pubkey {
    Pubkey::new_from_array([val; 32])
}

/// Pays a positive debt from the locker or withdraws a negative one to it.
pub fn settle(core: &mut Core, lock: &Lock, token: Pubkey) -> Result<()> {
    let debt = core.debt(lock, &token);
    let (high, amount) = debt.unsigned_abs().into_words();
    assert_eq!(high, 0, "debt does not fit in 128 bits");

    if debt > I256::ZERO {
        core.pay(lock, token, amount)
    } else if debt < I256::ZERO {
        core.withdraw(lock, token, lock.locker(), amount)
    } else {
        Ok(())
    }
}

pub fn settle_pair(core: &mut Core, lock: &Lock, key: &PoolKey) -> Result<()> {
    settle(core, lock, key.token0)?;
    settle(core, lock, key.token1)
}

/// Test fixture for pool-level integration tests
pub struct TestFixture {
    pub core: Core,
    pub token0: Pubkey,
    pub token1: Pubkey,
    pub alice: Pubkey,
    pub bob: Pubkey,
    pub key: PoolKey,
}

impl TestFixture {
    pub fn new(fee: u32, tick_spacing: u32) -> Self {
        Self::with_extension(fee, tick_spacing, Pubkey::default())
    }

    pub fn with_extension(fee: u32, tick_spacing: u32, extension: Pubkey) -> Self {
        let token0 = new_pubkey(1);
        let token1 = new_pubkey(2);
        let key = PoolKey::new(token0, token1, fee, tick_spacing, extension).unwrap();

        let mut fixture = Self {
            core: Core::default(),
            token0,
            token1,
            alice: new_pubkey(10),
            bob: new_pubkey(11),
            key,
        };
        fixture.fund(fixture.alice);
        fixture.fund(fixture.bob);
        fixture
    }

    /// Mints both pool tokens to `owner`.
    pub fn fund(&mut self, owner: Pubkey) {
        for token in [self.token0, self.token1] {
            self.core
                .bank_mut()
                .mint(token, owner, INITIAL_BALANCE)
                .unwrap();
        }
    }

    pub fn balance(&self, token: &Pubkey, owner: &Pubkey) -> u128 {
        self.core.bank().balance_of(token, owner)
    }

    pub fn initialize_pool(&mut self, tick: i32) -> Result<U256> {
        let key = self.key;
        self.core
            .lock(self.alice, |core, lock| core.initialize_pool(lock, &key, tick))
    }

    pub fn update_position(
        &mut self,
        owner: Pubkey,
        bounds: Bounds,
        liquidity_delta: i128,
    ) -> Result<Delta> {
        let key = self.key;
        let params = UpdatePositionParams {
            salt: 0,
            bounds,
            liquidity_delta,
        };
        self.core.lock(owner, |core, lock| {
            let delta = core.update_position(lock, &key, params)?;
            settle_pair(core, lock, &key)?;
            Ok(delta)
        })
    }

    pub fn swap(&mut self, owner: Pubkey, amount: i128, is_token1: bool, sqrt_ratio_limit: U256) -> Result<Delta> {
        let key = self.key;
        let params = SwapParams {
            amount,
            is_token1,
            sqrt_ratio_limit,
        };
        self.core.lock(owner, |core, lock| {
            let delta = core.swap(lock, &key, params)?;
            settle_pair(core, lock, &key)?;
            Ok(delta)
        })
    }

    pub fn collect_fees(&mut self, owner: Pubkey, bounds: Bounds) -> Result<(u128, u128)> {
        let key = self.key;
        self.core.lock(owner, |core, lock| {
            let fees = core.collect_fees(lock, &key, 0, bounds)?;
            settle_pair(core, lock, &key)?;
            Ok(fees)
        })
    }

    pub fn donate(&mut self, owner: Pubkey, amount0: u128, amount1: u128) -> Result<()> {
        let key = self.key;
        self.core.lock(owner, |core, lock| {
            core.donate(lock, &key, amount0, amount1)?;
            settle_pair(core, lock, &key)
        })
    }
}
