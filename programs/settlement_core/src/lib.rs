#![allow(unexpected_cfgs)]

use anchor_lang::prelude::*;

// Address the core's token balances are held under by default.
declare_id!("3xoRssrLqoH3Xxj9v9hFvj7u9oqkE91y22FFVWFnbHaK");

// Constants, errors, configuration and fixed-point math
pub mod config;
pub mod constants;
pub mod errors;
pub mod events;
pub mod math;

// Pool, tick and position state
pub mod fees_per_liquidity;
pub mod pool_key;
pub mod position;
pub mod state;
pub mod tick;
pub mod tick_bitmap;

// Settlement: locks, debt, token movements and extension hooks
pub mod extension;
pub mod instructions;
pub mod ledger;
pub mod settlement;
pub mod token_bank;
pub mod utils;

pub use config::CoreConfig;
pub use errors::{ErrorCode, MathError};
pub use extension::{CallPoints, Extension, HookPoint};
pub use fees_per_liquidity::FeesPerLiquidity;
pub use instructions::{SwapParams, UpdatePositionParams};
pub use ledger::{Forwardee, Lock, Locker};
pub use pool_key::{PoolId, PoolKey};
pub use position::{Bounds, Position, PositionKey};
pub use settlement::Core;
pub use state::{Delta, PoolState};
pub use tick::Tick;
pub use token_bank::TokenBank;
pub use utils::TimeGate;

#[cfg(test)]
pub mod unit_test;
