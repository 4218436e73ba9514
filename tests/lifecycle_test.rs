//! Breaker startup and shutdown through the lifecycle API.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use rpc_breaker::breaker::{ManualClock, RECOVERY_INTERVAL};
use rpc_breaker::lifecycle;
use rpc_breaker::{BreakerConfig, BreakerStatus, CallError};

#[tokio::test(start_paused = true)]
async fn test_ticker_drives_recovery_cycle() {
    let clock = Arc::new(ManualClock::new(1_000));
    let handle = lifecycle::start_with_clock(BreakerConfig::new(3, 2, 10), clock.clone()).unwrap();
    let breaker = handle.breaker();

    for _ in 0..3 {
        breaker.record_failure("svc-a");
    }
    assert_eq!(breaker.status("svc-a"), BreakerStatus::Open);

    // Step off the tick boundaries so each sleep below spans exactly one tick.
    tokio::time::sleep(Duration::from_secs(1)).await;

    // Still inside the open window after a tick.
    clock.advance(5);
    tokio::time::sleep(RECOVERY_INTERVAL).await;
    assert_eq!(breaker.status("svc-a"), BreakerStatus::Open);

    clock.advance(6);
    tokio::time::sleep(RECOVERY_INTERVAL).await;
    assert_eq!(breaker.status("svc-a"), BreakerStatus::HalfOpen);

    breaker.record_success("svc-a");
    breaker.record_success("svc-a");
    assert_eq!(breaker.status("svc-a"), BreakerStatus::Closed);

    handle.shutdown().await;
}

#[tokio::test]
async fn test_call_fails_fast_while_open() {
    let handle = lifecycle::start(BreakerConfig::new(1, 1, 60)).unwrap();

    let attempts = AtomicU32::new(0);
    let attempts = &attempts;
    let run = move || async move {
        attempts.fetch_add(1, Ordering::SeqCst);
        Err::<(), _>(std::io::Error::other("connection refused"))
    };

    let first = handle.call("svc-a", run()).await;
    assert!(matches!(first, Err(CallError::Inner(_))));

    let second = handle.call("svc-a", run()).await;
    assert!(matches!(second, Err(CallError::Rejected { .. })));
    assert_eq!(attempts.load(Ordering::SeqCst), 1);

    handle.shutdown().await;
}

#[tokio::test]
async fn test_shutdown_completes_promptly() {
    let handle = lifecycle::start(BreakerConfig::default()).unwrap();
    tokio::time::timeout(Duration::from_secs(1), handle.shutdown())
        .await
        .expect("shutdown timed out");
}
