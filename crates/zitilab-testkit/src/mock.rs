//! Mock server infrastructure for testing
//!
//! A single shared mockito server lets parallel tests register mocks without
//! each one paying for its own listener. Tests must use unique paths (for
//! example a unique repository name per test) to avoid collisions.

use lazy_static::lazy_static;
use mockito::{Server, ServerGuard};
use std::sync::Mutex;

lazy_static! {
    /// Global shared mockito server for all tests
    pub static ref SHARED_MOCK_SERVER: Mutex<ServerGuard> = Mutex::new(Server::new());
}

/// Get reference to shared mock server
///
/// Acquire the lock only while creating mocks, not for the whole test.
///
/// # Examples
///
/// ```no_run
/// use zitilab_testkit::get_shared_mock_server;
///
/// let (mock, url) = {
///     let mut server = get_shared_mock_server();
///     let mock = server
///         .mock("GET", "/repos/unique-owner/unique-repo/releases/latest")
///         .with_status(200)
///         .create();
///     (mock, server.url())
/// }; // Lock released here
/// ```
pub fn get_shared_mock_server() -> std::sync::MutexGuard<'static, ServerGuard> {
    SHARED_MOCK_SERVER
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}
