//! Connection lifecycle tests against mock drivers.

use std::time::{Duration, Instant};

use cinema_db::config::{resolve_target, DEFAULT_MONGO_URI};
use cinema_db::db::{FailingDriver, MockDriver};
use cinema_db::{ConnectionManager, ConnectionState};
use pretty_assertions::assert_eq;

#[tokio::test]
async fn test_default_target_connects() {
    let manager = ConnectionManager::new(MockDriver::new());
    let init = manager.initialize(resolve_target(None));

    assert_eq!(init.handle.target(), DEFAULT_MONGO_URI);

    let client = init.handle.wait_for_client().await.unwrap();
    assert_eq!(client.target, "mongodb://127.0.0.1:27017/cinema");
    assert_eq!(client.database, "cinema");
}

#[tokio::test]
async fn test_override_target_is_used_verbatim() {
    let target = resolve_target(Some("mongodb://db.example.com:27017/prod".to_string()));
    let manager = ConnectionManager::new(MockDriver::new());
    let init = manager.initialize(target);

    init.pending.outcome().await.unwrap();

    let client = init.handle.client().unwrap();
    assert_eq!(client.target, "mongodb://db.example.com:27017/prod");
    assert_eq!(client.database, "prod");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_slow_driver_does_not_block_initialize() {
    let manager = ConnectionManager::new(MockDriver::with_delay(Duration::from_millis(300)));

    let start = Instant::now();
    let init = manager.initialize(DEFAULT_MONGO_URI);
    assert!(start.elapsed() < Duration::from_millis(100));

    // The client is handed out while the server check is still running
    let client = init.handle.wait_for_client().await.unwrap();
    assert_eq!(client.target, DEFAULT_MONGO_URI);
    assert_eq!(init.handle.state(), ConnectionState::Connecting);

    init.pending.outcome().await.unwrap();
    assert!(init.handle.is_connected());
}

#[tokio::test]
async fn test_failed_check_keeps_client_usable() {
    // The database comes up after the first check
    let manager = ConnectionManager::new(
        MockDriver::with_delay(Duration::from_millis(20)).unavailable_for(1),
    );

    let init = manager.initialize(DEFAULT_MONGO_URI);
    assert_eq!(init.handle.state(), ConnectionState::Connecting);

    let err = init.pending.outcome().await.unwrap_err();
    assert_eq!(err.message(), "server selection timed out");

    assert_eq!(init.handle.target(), DEFAULT_MONGO_URI);
    assert_eq!(
        init.handle.state(),
        ConnectionState::Errored {
            message: "server selection timed out".to_string()
        }
    );

    let client = init.handle.wait_for_client().await.unwrap();
    client.ping().await.unwrap();
}

#[tokio::test]
async fn test_unbuildable_client_is_reported() {
    let manager = ConnectionManager::new(
        FailingDriver::new("invalid connection string").after(Duration::from_millis(20)),
    );

    let init = manager.initialize("mongodb//missing-colon");
    let err = init.pending.outcome().await.unwrap_err();

    assert_eq!(err.message(), "invalid connection string");
    assert!(init.handle.client().is_none());
    assert!(init.handle.wait_for_client().await.is_err());
}

#[tokio::test]
async fn test_state_transitions_are_observable() {
    let manager = ConnectionManager::new(MockDriver::with_delay(Duration::from_millis(20)));
    let init = manager.initialize(DEFAULT_MONGO_URI);

    let mut states = init.handle.subscribe();
    assert_eq!(*states.borrow_and_update(), ConnectionState::Connecting);

    states.changed().await.unwrap();
    assert_eq!(*states.borrow_and_update(), ConnectionState::Connected);
}

#[tokio::test]
async fn test_each_initialize_makes_one_attempt() {
    let driver = MockDriver::new();
    let manager = ConnectionManager::new(driver.clone());

    let first = manager.initialize(DEFAULT_MONGO_URI);
    let second = manager.initialize(DEFAULT_MONGO_URI);
    first.pending.outcome().await.unwrap();
    second.pending.outcome().await.unwrap();

    assert_eq!(driver.attempts(), 2);
    assert!(!first.handle.same_handle(&second.handle));
}
