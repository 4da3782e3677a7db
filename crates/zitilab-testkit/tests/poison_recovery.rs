//! Integration tests for mutex poison recovery
//!
//! These tests intentionally poison mutexes to verify recovery logic.
//! They run in a separate test binary to avoid contaminating unit tests.

use std::thread;
use zitilab_testkit::{ENV_LOCK, get_shared_mock_server, with_isolated_env};

#[test]
fn test_env_lock_recovers_from_poison() {
    let handle = thread::spawn(|| {
        let _guard = ENV_LOCK.lock().unwrap();
        panic!("Simulated panic to poison mutex");
    });
    let _ = handle.join();

    let value = with_isolated_env(&[("ZITILAB_POISON_TEST", Some("ok"))], || {
        std::env::var("ZITILAB_POISON_TEST").unwrap()
    });
    assert_eq!(value, "ok");
    assert!(std::env::var("ZITILAB_POISON_TEST").is_err());
}

#[test]
fn test_shared_mock_server_recovers_from_poison() {
    let handle = thread::spawn(|| {
        let _server = get_shared_mock_server();
        panic!("Simulated panic while holding the mock server");
    });
    let _ = handle.join();

    let server = get_shared_mock_server();
    assert!(server.url().starts_with("http://"));
}
