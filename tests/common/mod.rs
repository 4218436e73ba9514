//! Shared utilities for integration tests.

use std::sync::Arc;

use rpc_breaker::breaker::ManualClock;
use rpc_breaker::{Breaker, BreakerConfig};

/// Start time for the manual clock; arbitrary but non-zero.
pub const T0: u64 = 1_700_000_000;

/// A breaker on a manual clock starting at [`T0`].
pub fn manual_breaker(fail: u32, succ: u32, open_timeout: u64) -> (Arc<Breaker>, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::new(T0));
    let breaker = Breaker::with_clock(BreakerConfig::new(fail, succ, open_timeout), clock.clone())
        .expect("valid breaker config");
    (Arc::new(breaker), clock)
}
