//! Integration tests for mutex poison recovery
//!
//! These tests intentionally poison the shared mock server mutex. They run in
//! a separate test binary so the poison does not leak into unit tests.

use statusprobe_testkit::{get_shared_mock_server, shared_mock_url};
use std::io::{Read, Write};
use std::net::TcpStream;
use std::thread;

#[test]
fn test_shared_mock_server_recovers_from_poison() {
    // Simulate panic while holding server lock
    let handle = thread::spawn(|| {
        let _guard = get_shared_mock_server();
        panic!("Simulated panic to poison mock server mutex");
    });
    let _ = handle.join();

    // Subsequent access should recover and still serve mocks
    let mock = get_shared_mock_server()
        .mock("GET", "/after-poison")
        .with_status(204)
        .create();

    let host = shared_mock_url().trim_start_matches("http://").to_string();
    let mut stream = TcpStream::connect(&host).unwrap();
    write!(
        stream,
        "GET /after-poison HTTP/1.1\r\nHost: {host}\r\nConnection: close\r\n\r\n"
    )
    .unwrap();
    let mut response = String::new();
    stream.read_to_string(&mut response).unwrap();

    assert!(response.starts_with("HTTP/1.1 204"), "{response}");
    mock.assert();
}
