//! Persisted state of the core: pools, their accumulators, ticks, bitmaps,
//! positions and saved balances.

pub mod delta;
pub mod pool;
pub mod storage;

pub use delta::Delta;
pub use pool::PoolState;
pub use storage::{CoreStorage, SavedBalanceKey};
