//! Circuit breaker subsystem.
//!
//! # Data Flow
//! ```text
//! Caller, around each outgoing call:
//!     → registry.rs status() / allow_request() (fail fast when Open)
//!     → record_success() / record_failure()
//!     → state.rs (compute replacement record)
//!
//! Background (recovery.rs):
//!     Periodic timer
//!     → recover_expired()
//!     → Open records past open_timeout become Half-Open
//! ```
//!
//! # Design Decisions
//! - Per-resource records, lazily created on the first failure
//! - One mutex over the whole registry; no operation does I/O under it
//! - Trust is earned slowly and lost instantly: one failure re-opens from
//!   Half-Open, `succ_threshold` successes are needed to close
//! - Only the recovery ticker moves a record out of Open

pub mod clock;
pub mod recovery;
pub mod registry;
pub mod state;

pub use clock::{Clock, ManualClock, SystemClock};
pub use recovery::{RecoveryTicker, RECOVERY_INTERVAL};
pub use registry::{Breaker, CallError};
pub use state::{BreakerStatus, ResourceHealth};
