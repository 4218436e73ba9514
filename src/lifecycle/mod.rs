//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Validate config → Build Breaker → Spawn recovery ticker → BreakerHandle
//!
//! Shutdown (shutdown.rs):
//!     Handle dropped or shutdown() awaited → broadcast → ticker exits
//!
//! Signals (signals.rs):
//!     SIGINT/Ctrl-C → Trigger graceful shutdown
//! ```
//!
//! # Design Decisions
//! - The ticker never outlives the handle that started it
//! - Fail fast: an invalid config or missing runtime is a startup error

pub mod shutdown;
pub mod signals;
pub mod startup;

pub use shutdown::Shutdown;
pub use startup::{start, start_with_clock, BreakerHandle, StartupError};
