//! Shared mock HTTP server for probe and reporter tests
//!
//! One mockito server serves every test in a binary. Tests keep apart by
//! mocking distinct paths.

use lazy_static::lazy_static;
use mockito::{Server, ServerGuard};
use std::sync::Mutex;

lazy_static! {
    /// Global shared mockito server, started on first access
    static ref SHARED_MOCK_SERVER: Mutex<ServerGuard> = Mutex::new(Server::new());
}

/// Get reference to shared mock server
///
/// Hold the guard only while creating mocks, not while the code under test
/// runs, or parallel tests serialize on it.
///
/// ```no_run
/// use statusprobe_testkit::get_shared_mock_server;
///
/// fn test_with_shared_server() {
///     let (mock, base) = {
///         let mut server = get_shared_mock_server();
///         let mock = server.mock("GET", "/unique-path/health").with_status(200).create();
///         (mock, server.url())
///     }; // Lock released here
///
///     // ... probe `{base}/unique-path/health` ...
///     mock.assert();
/// }
/// ```
pub fn get_shared_mock_server() -> std::sync::MutexGuard<'static, ServerGuard> {
    SHARED_MOCK_SERVER.lock().unwrap_or_else(|poisoned| {
        // Mockito server remains functional after a panicking test
        poisoned.into_inner()
    })
}

/// Base URL of the shared mock server
pub fn shared_mock_url() -> String {
    get_shared_mock_server().url()
}
