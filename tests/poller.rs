//! Polling a real service through state changes.

use std::sync::Arc;
use std::time::Duration;

use service_client::{HealthState, Shutdown, StatePoller};

mod common;

#[tokio::test]
async fn test_poller_follows_reported_state() {
    let (service, reporter) = common::start_mock_service(HealthState::Idle).await;
    let client = Arc::new(common::client_for(service.target()));

    let shutdown = Shutdown::new();
    let (poller, mut rx) = StatePoller::new(Arc::clone(&client), Duration::from_millis(10));
    let handle = tokio::spawn(poller.run(shutdown.subscribe()));

    let wait = Duration::from_secs(5);
    tokio::time::timeout(wait, rx.wait_for(|s| *s == HealthState::Idle))
        .await
        .unwrap()
        .unwrap();

    reporter.set(HealthState::Running);
    tokio::time::timeout(wait, rx.wait_for(|s| *s == HealthState::Running))
        .await
        .unwrap()
        .unwrap();

    reporter.set(HealthState::Error);
    tokio::time::timeout(wait, rx.wait_for(|s| *s == HealthState::Error))
        .await
        .unwrap()
        .unwrap();

    service.stop().await;
    tokio::time::timeout(wait, rx.wait_for(|s| *s == HealthState::Unavailable))
        .await
        .unwrap()
        .unwrap();

    shutdown.trigger();
    tokio::time::timeout(wait, handle).await.unwrap().unwrap();
}
