//! Per-resource breaker state machine.
//!
//! # States
//! - Closed: calls pass, failures accumulate toward Open
//! - Open: calls fail fast until the open timeout elapses
//! - Half-Open: probation; one failure re-opens, enough successes close
//!
//! # State Transitions
//! ```text
//! Closed → Open: fail_count >= fail_threshold
//! Open → Half-Open: now - opened_at >= open_timeout (recovery ticker only)
//! Half-Open → Closed: succ_count >= succ_threshold
//! Half-Open → Open: any failure
//! ```
//!
//! Every transition yields a fresh record with both counters at zero. The
//! methods here take `self` by value and return the replacement, so the
//! registry always writes the result back into its map.

use serde::Serialize;

/// Breaker status of a single resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum BreakerStatus {
    #[default]
    Closed,
    HalfOpen,
    Open,
}

impl BreakerStatus {
    /// Whether a caller may attempt a call in this status.
    pub fn allows_calls(self) -> bool {
        !matches!(self, BreakerStatus::Open)
    }
}

/// Health record of one resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
pub struct ResourceHealth {
    /// Current status.
    pub status: BreakerStatus,
    /// Consecutive failures; only counts while Closed.
    pub fail_count: u32,
    /// Consecutive successes; only counts while Half-Open.
    pub succ_count: u32,
    /// When the record entered Open (seconds since epoch); None otherwise.
    pub opened_at: Option<u64>,
}

impl ResourceHealth {
    pub fn closed() -> Self {
        Self::default()
    }

    pub fn half_open() -> Self {
        Self {
            status: BreakerStatus::HalfOpen,
            ..Self::default()
        }
    }

    pub fn opened(now: u64) -> Self {
        Self {
            status: BreakerStatus::Open,
            opened_at: Some(now),
            ..Self::default()
        }
    }

    pub fn is_closed(&self) -> bool {
        self.status == BreakerStatus::Closed
    }

    pub fn is_half_open(&self) -> bool {
        self.status == BreakerStatus::HalfOpen
    }

    pub fn is_open(&self) -> bool {
        self.status == BreakerStatus::Open
    }

    /// Apply a failed call.
    ///
    /// A fresh Closed record passes through here as well, so a threshold of
    /// one opens on the very first failure.
    pub(crate) fn on_failure(self, fail_threshold: u32, now: u64) -> Self {
        match self.status {
            BreakerStatus::Closed => {
                let fail_count = self.fail_count.saturating_add(1);
                if fail_count >= fail_threshold {
                    Self::opened(now)
                } else {
                    Self { fail_count, ..self }
                }
            }
            BreakerStatus::HalfOpen => Self::opened(now),
            // Failures while Open never extend the timer.
            BreakerStatus::Open => self,
        }
    }

    /// Apply a successful call. Only meaningful during Half-Open.
    pub(crate) fn on_success(self, succ_threshold: u32) -> Self {
        match self.status {
            BreakerStatus::HalfOpen => {
                let succ_count = self.succ_count.saturating_add(1);
                if succ_count >= succ_threshold {
                    Self::closed()
                } else {
                    Self { succ_count, ..self }
                }
            }
            BreakerStatus::Closed | BreakerStatus::Open => self,
        }
    }

    /// Half-Open replacement if this record has been Open for at least
    /// `open_timeout` seconds.
    pub(crate) fn expire(self, open_timeout: u64, now: u64) -> Option<Self> {
        match (self.status, self.opened_at) {
            (BreakerStatus::Open, Some(opened_at)) if now.saturating_sub(opened_at) >= open_timeout => {
                Some(Self::half_open())
            }
            _ => None,
        }
    }
}
