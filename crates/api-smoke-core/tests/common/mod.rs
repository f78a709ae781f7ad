// crates/api-smoke-core/tests/common/mod.rs
// ============================================================================
// Module: Common Test Fixtures
// Description: Loopback stub servers and runner builders for core tests.
// Purpose: Provide reusable HTTP fixtures without a real backend.
// Dependencies: api-smoke-core, tiny_http
// ============================================================================

//! ## Overview
//! A [`StubServer`] answers a fixed number of requests on loopback using a
//! caller-supplied reply function and records what it received.

#![allow(dead_code, reason = "Shared test helpers may be unused in some cases.")]
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "Test-only helpers favor direct unwrap/expect for clarity."
)]

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::net::TcpListener;
use std::thread;
use std::thread::JoinHandle;
use std::time::Duration;

use api_smoke_core::ContractRunner;
use api_smoke_core::SmokeConfig;
use tiny_http::Header;
use tiny_http::Response;
use tiny_http::Server;

// ============================================================================
// SECTION: Stub Server
// ============================================================================

/// Request as seen by the stub.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Captured {
    /// Request method.
    pub method: String,
    /// Path and query.
    pub url: String,
    /// `Authorization` header, if any.
    pub authorization: Option<String>,
    /// `Content-Type` header, if any.
    pub content_type: Option<String>,
    /// `X-Request-Id` header, if any.
    pub request_id: Option<String>,
    /// Raw request body.
    pub body: String,
}

/// Reply the stub sends back.
#[derive(Debug, Clone)]
pub struct StubReply {
    /// Status code.
    pub status: u16,
    /// Body text.
    pub body: String,
    /// Delay before responding.
    pub delay: Duration,
}

impl StubReply {
    /// JSON reply with no delay.
    pub fn json(status: u16, body: serde_json::Value) -> Self {
        Self {
            status,
            body: body.to_string(),
            delay: Duration::ZERO,
        }
    }

    /// Raw text reply with no delay.
    pub fn text(status: u16, body: &str) -> Self {
        Self {
            status,
            body: body.to_string(),
            delay: Duration::ZERO,
        }
    }

    /// Delays the reply.
    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

/// Loopback server answering a bounded number of requests.
pub struct StubServer {
    /// Base URL of the server.
    pub base_url: String,
    /// Worker returning every captured request.
    handle: JoinHandle<Vec<Captured>>,
}

impl StubServer {
    /// Spawns a server answering up to `requests` requests.
    pub fn spawn<F>(requests: usize, reply: F) -> Self
    where
        F: Fn(&Captured) -> StubReply + Send + 'static,
    {
        let server = Server::http("127.0.0.1:0").unwrap();
        let addr = server.server_addr().to_ip().unwrap();
        let handle = thread::spawn(move || {
            let mut captured = Vec::new();
            for _ in 0..requests {
                let Ok(Some(mut request)) = server.recv_timeout(Duration::from_secs(10)) else {
                    break;
                };
                let mut body = String::new();
                let _ = request.as_reader().read_to_string(&mut body);
                let header = |name: &'static str| {
                    request
                        .headers()
                        .iter()
                        .find(|header| header.field.equiv(name))
                        .map(|header| header.value.as_str().to_string())
                };
                let seen = Captured {
                    method: request.method().as_str().to_string(),
                    url: request.url().to_string(),
                    authorization: header("Authorization"),
                    content_type: header("Content-Type"),
                    request_id: header("X-Request-Id"),
                    body,
                };
                let planned = reply(&seen);
                if !planned.delay.is_zero() {
                    thread::sleep(planned.delay);
                }
                let response = Response::from_string(planned.body)
                    .with_status_code(planned.status)
                    .with_header(
                        Header::from_bytes(&b"Content-Type"[..], &b"application/json"[..]).unwrap(),
                    );
                let _ = request.respond(response);
                captured.push(seen);
            }
            captured
        });
        Self {
            base_url: format!("http://{addr}"),
            handle,
        }
    }

    /// Waits for the worker and returns the captured requests.
    pub fn finish(self) -> Vec<Captured> {
        self.handle.join().expect("stub server panicked")
    }
}

// ============================================================================
// SECTION: Runners
// ============================================================================

/// Runner against `base_url` with a short timeout.
pub fn runner_for(base_url: &str) -> ContractRunner {
    runner_with_timeout(base_url, Duration::from_secs(5))
}

/// Runner against `base_url` with a custom timeout.
pub fn runner_with_timeout(base_url: &str, timeout: Duration) -> ContractRunner {
    ContractRunner::new(&SmokeConfig {
        base_url: base_url.to_string(),
        timeout,
        ..SmokeConfig::default()
    })
    .unwrap()
}

/// Base URL of a loopback port with nothing listening.
pub fn closed_port_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}
