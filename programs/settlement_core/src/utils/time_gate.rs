//! Once-per-time-unit gating for extensions.

use crate::pool_key::PoolId;
use std::collections::HashMap;

/// Remembers the last time unit each pool passed the gate.
///
/// The gate is committed before the gated body runs, so a body that
/// re-enters the core (and through it the same extension) sees the gate as
/// already taken for this time unit.
#[derive(Clone, Debug, Default)]
pub struct TimeGate {
    last: HashMap<PoolId, u64>,
}

impl TimeGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Takes the gate for `pool_id` at `now`.
    ///
    /// Returns `true` the first time it is called for a pool within a time
    /// unit, `false` afterwards.
    pub fn try_enter(&mut self, pool_id: PoolId, now: u64) -> bool {
        match self.last.insert(pool_id, now) {
            Some(previous) => previous != now,
            None => true,
        }
    }

    pub fn last_entered(&self, pool_id: &PoolId) -> Option<u64> {
        self.last.get(pool_id).copied()
    }
}
