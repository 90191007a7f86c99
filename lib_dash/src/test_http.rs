//! Minimal raw-TCP HTTP fixtures for transport tests.
//!
//! Each helper binds an OS-assigned local port and serves canned responses
//! from a background thread, so tests exercise the real client stack without
//! depending on the network.

use std::io::{Read, Write};
use std::net::TcpListener;
use std::thread;
use std::time::Duration;

/// Serves each canned response to one connection, in order, then exits.
/// Returns the base URL of the listener.
pub(crate) fn serve(responses: Vec<String>) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("failed to bind test listener");
    let port = listener.local_addr().unwrap().port();

    thread::spawn(move || {
        for response in responses {
            let Ok((mut stream, _)) = listener.accept() else {
                return;
            };
            let mut buf = [0u8; 4096];
            let _ = stream.read(&mut buf);
            let _ = stream.write_all(response.as_bytes());
        }
    });

    format!("http://127.0.0.1:{port}/")
}

/// Accepts one connection and goes silent for `hold` without answering,
/// which forces the client-side timeout.
pub(crate) fn serve_hanging(hold: Duration) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("failed to bind test listener");
    let port = listener.local_addr().unwrap().port();

    thread::spawn(move || {
        if let Ok((mut stream, _)) = listener.accept() {
            let mut buf = [0u8; 4096];
            let _ = stream.read(&mut buf);
            thread::sleep(hold);
        }
    });

    format!("http://127.0.0.1:{port}/")
}

/// A base URL whose port was just released, so connections are refused.
pub(crate) fn refused_base() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("failed to bind test listener");
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{port}/")
}

/// A 200 response carrying a JSON body.
pub(crate) fn json_ok(body: &str) -> String {
    format!(
        "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        body.len(),
        body
    )
}

/// An HTTP error status with an empty body.
pub(crate) fn status(code: u16, reason: &str) -> String {
    format!("HTTP/1.1 {code} {reason}\r\nContent-Length: 0\r\nConnection: close\r\n\r\n")
}
