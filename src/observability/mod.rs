//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! breaker/ and lifecycle/ emit tracing events
//!     → logging.rs (subscriber: filter + fmt layer)
//!     → stdout/stderr
//! ```
//!
//! # Design Decisions
//! - Structured fields on every transition (resource, status, counters)
//! - JSON format for production, pretty format for development
//! - RUST_LOG overrides the configured level

pub mod logging;

pub use logging::init_logging;
