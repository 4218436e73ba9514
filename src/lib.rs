//! Per-resource circuit breaker.
//!
//! Tracks the recent success/failure history of calls against named remote
//! resources and decides, per resource, whether new calls should be allowed,
//! probed, or rejected.
//!
//! ```no_run
//! use rpc_breaker::{lifecycle, BreakerConfig, BreakerStatus};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let handle = lifecycle::start(BreakerConfig::new(3, 2, 10))?;
//!
//!     if handle.status("svc-a") != BreakerStatus::Open {
//!         // ... make the call, then report the outcome
//!         handle.record_failure("svc-a");
//!     }
//!
//!     handle.shutdown().await;
//!     Ok(())
//! }
//! ```

pub mod breaker;
pub mod config;
pub mod lifecycle;
pub mod observability;

pub use breaker::{Breaker, BreakerStatus, CallError, ResourceHealth};
pub use config::{AppConfig, BreakerConfig, ConfigError};
pub use lifecycle::{BreakerHandle, Shutdown};
