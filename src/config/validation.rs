//! Configuration validation.
//!
//! Serde handles syntax; this module checks value ranges. Every violation is
//! reported, not just the first.

use thiserror::Error;

use crate::config::schema::{AppConfig, BreakerConfig, LoggingConfig};

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("fail_threshold must be at least 1, got {0}")]
    FailThresholdZero(u32),

    #[error("succ_threshold must be at least 1, got {0}")]
    SuccThresholdZero(u32),

    #[error("unknown log level '{0}'")]
    UnknownLogLevel(String),
}

/// Validate the breaker section.
pub fn validate_breaker(config: &BreakerConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();
    check_breaker(config, &mut errors);
    into_result(errors)
}

/// Validate a whole application config.
pub fn validate_config(config: &AppConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();
    check_breaker(&config.breaker, &mut errors);
    check_logging(&config.logging, &mut errors);
    into_result(errors)
}

fn check_breaker(config: &BreakerConfig, errors: &mut Vec<ValidationError>) {
    if config.fail_threshold == 0 {
        errors.push(ValidationError::FailThresholdZero(config.fail_threshold));
    }
    if config.succ_threshold == 0 {
        errors.push(ValidationError::SuccThresholdZero(config.succ_threshold));
    }
}

fn check_logging(config: &LoggingConfig, errors: &mut Vec<ValidationError>) {
    let level = config.level.to_ascii_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        errors.push(ValidationError::UnknownLogLevel(config.level.clone()));
    }
}

fn into_result(errors: Vec<ValidationError>) -> Result<(), Vec<ValidationError>> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
