//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration read by the `rpc-breaker` binary.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Circuit breaker thresholds.
    pub breaker: BreakerConfig,

    /// Logging settings.
    pub logging: LoggingConfig,
}

/// Circuit breaker thresholds, immutable for the breaker's lifetime.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct BreakerConfig {
    /// Consecutive failures (while Closed) that open the circuit.
    pub fail_threshold: u32,

    /// Consecutive successes (while Half-Open) that close the circuit.
    pub succ_threshold: u32,

    /// Seconds a circuit stays Open before it may go Half-Open.
    pub open_timeout: u64,
}

impl Default for BreakerConfig {
    fn default() -> Self {
        Self {
            fail_threshold: 5,
            succ_threshold: 2,
            open_timeout: 60,
        }
    }
}

impl BreakerConfig {
    pub fn new(fail_threshold: u32, succ_threshold: u32, open_timeout: u64) -> Self {
        Self {
            fail_threshold,
            succ_threshold,
            open_timeout,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    pub level: String,

    /// Output format.
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
        }
    }
}
