//! The breaker registry.
//!
//! Maps resource identifiers to their [`ResourceHealth`] records. A resource
//! without a record is Closed with zero counters. Every read and write goes
//! through one mutex covering the whole map, and every transition is written
//! back as a replacement record while that lock is held.

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use thiserror::Error;

use crate::breaker::clock::{Clock, SystemClock};
use crate::breaker::state::{BreakerStatus, ResourceHealth};
use crate::config::validation::validate_breaker;
use crate::config::{BreakerConfig, ConfigError};

/// Outcome of a call made through [`Breaker::call`].
#[derive(Debug, Error)]
pub enum CallError<E> {
    /// The resource's circuit is Open; the call was not attempted.
    #[error("circuit open for resource '{resource}'")]
    Rejected { resource: String },

    /// The call ran and failed.
    #[error("call failed: {0}")]
    Inner(#[source] E),
}

/// Per-resource circuit breaker.
#[derive(Debug)]
pub struct Breaker {
    config: BreakerConfig,
    clock: Arc<dyn Clock>,
    records: Mutex<HashMap<String, ResourceHealth>>,
}

impl Breaker {
    /// Create a breaker on the system clock.
    pub fn new(config: BreakerConfig) -> Result<Self, ConfigError> {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// Create a breaker reading time from `clock`.
    pub fn with_clock(config: BreakerConfig, clock: Arc<dyn Clock>) -> Result<Self, ConfigError> {
        validate_breaker(&config).map_err(ConfigError::Validation)?;

        tracing::debug!(
            fail_threshold = config.fail_threshold,
            succ_threshold = config.succ_threshold,
            open_timeout = config.open_timeout,
            "Breaker created"
        );

        Ok(Self {
            config,
            clock,
            records: Mutex::new(HashMap::new()),
        })
    }

    pub fn config(&self) -> &BreakerConfig {
        &self.config
    }

    // Records are replaced whole, so a panic elsewhere cannot leave one half-written.
    fn lock(&self) -> MutexGuard<'_, HashMap<String, ResourceHealth>> {
        self.records.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Current status of `resource`; Closed if it has never been tracked.
    pub fn status(&self, resource: &str) -> BreakerStatus {
        self.lock()
            .get(resource)
            .map(|r| r.status)
            .unwrap_or_default()
    }

    /// Whether a call to `resource` should be attempted (Closed or Half-Open).
    pub fn allow_request(&self, resource: &str) -> bool {
        self.status(resource).allows_calls()
    }

    /// Copy of the record for `resource`, if one exists.
    pub fn health(&self, resource: &str) -> Option<ResourceHealth> {
        self.lock().get(resource).copied()
    }

    /// All tracked records, sorted by resource name.
    pub fn snapshot(&self) -> Vec<(String, ResourceHealth)> {
        let mut all: Vec<_> = self
            .lock()
            .iter()
            .map(|(name, record)| (name.clone(), *record))
            .collect();
        all.sort_by(|a, b| a.0.cmp(&b.0));
        all
    }

    /// Number of tracked resources.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Report a failed call to `resource`.
    pub fn record_failure(&self, resource: &str) {
        let now = self.clock.now_secs();
        let threshold = self.config.fail_threshold;

        let (prev, next) = {
            let mut records = self.lock();
            match records.get_mut(resource) {
                Some(record) => {
                    let prev = *record;
                    *record = prev.on_failure(threshold, now);
                    (prev, *record)
                }
                None => {
                    let prev = ResourceHealth::closed();
                    let next = prev.on_failure(threshold, now);
                    records.insert(resource.to_owned(), next);
                    (prev, next)
                }
            }
        };

        log_transition(resource, &prev, &next);
    }

    /// Report a successful call to `resource`.
    pub fn record_success(&self, resource: &str) {
        let threshold = self.config.succ_threshold;

        let (prev, next) = {
            let mut records = self.lock();
            let Some(record) = records.get_mut(resource) else {
                return;
            };
            let prev = *record;
            *record = prev.on_success(threshold);
            (prev, *record)
        };

        log_transition(resource, &prev, &next);
    }

    /// Move every Open record whose timeout has elapsed to Half-Open.
    ///
    /// Returns the number of records moved. This is the only path out of Open.
    pub fn recover_expired(&self) -> usize {
        let now = self.clock.now_secs();
        let open_timeout = self.config.open_timeout;
        let mut recovered = Vec::new();

        {
            let mut records = self.lock();
            for (resource, record) in records.iter_mut() {
                if let Some(next) = record.expire(open_timeout, now) {
                    *record = next;
                    recovered.push(resource.clone());
                }
            }
        }

        for resource in &recovered {
            tracing::info!(resource = %resource, "Circuit half-open, probing allowed");
        }
        recovered.len()
    }

    /// Run `call` unless the circuit for `resource` is Open, recording its outcome.
    pub async fn call<F, T, E>(&self, resource: &str, call: F) -> Result<T, CallError<E>>
    where
        F: Future<Output = Result<T, E>>,
    {
        if !self.allow_request(resource) {
            tracing::debug!(resource = %resource, "Call rejected, circuit open");
            return Err(CallError::Rejected {
                resource: resource.to_owned(),
            });
        }

        match call.await {
            Ok(value) => {
                self.record_success(resource);
                Ok(value)
            }
            Err(err) => {
                self.record_failure(resource);
                Err(CallError::Inner(err))
            }
        }
    }
}

fn log_transition(resource: &str, prev: &ResourceHealth, next: &ResourceHealth) {
    if prev.status == next.status {
        if prev != next {
            tracing::debug!(
                resource = %resource,
                status = ?next.status,
                fail_count = next.fail_count,
                succ_count = next.succ_count,
                "Breaker counters updated"
            );
        }
        return;
    }

    match next.status {
        BreakerStatus::Open => tracing::warn!(
            resource = %resource,
            from = ?prev.status,
            opened_at = ?next.opened_at,
            "Circuit opened"
        ),
        BreakerStatus::Closed => tracing::info!(resource = %resource, "Circuit closed"),
        BreakerStatus::HalfOpen => tracing::info!(resource = %resource, "Circuit half-open"),
    }
}
