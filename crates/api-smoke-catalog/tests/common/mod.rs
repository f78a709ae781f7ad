// crates/api-smoke-catalog/tests/common/mod.rs
// ============================================================================
// Module: Stub Marketing Backend
// Description: Loopback backend that honours every catalog contract.
// Purpose: Run the whole catalog end to end without a real deployment.
// Dependencies: tiny_http, serde_json, url
// ============================================================================

//! ## Overview
//! [`StubBackend`] implements the ten routes the catalog exercises with the
//! validation rules the contracts expect. Individual routes can be broken to
//! check that failures surface in reports.

#![allow(dead_code, reason = "Shared test helpers may be unused in some cases.")]
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "Test-only helpers favor direct unwrap/expect for clarity."
)]

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::Mutex;
use std::thread;
use std::thread::JoinHandle;

use serde_json::Value;
use serde_json::json;
use tiny_http::Header;
use tiny_http::Request;
use tiny_http::Response;
use tiny_http::Server;
use url::Url;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Email the stub accepts at login.
pub const STUB_EMAIL: &str = "validuser@example.com";
/// Password the stub accepts at login.
pub const STUB_PASSWORD: &str = "ValidPassword123";
/// Token the stub issues and accepts.
pub const STUB_TOKEN: &str = "stub-token";

// ============================================================================
// SECTION: Backend
// ============================================================================

/// Loopback backend serving until finished.
pub struct StubBackend {
    /// Base URL of the backend.
    pub base_url: String,
    /// Listening server, shared so it can be unblocked.
    server: Arc<Server>,
    /// Worker returning the `METHOD path` of every request served.
    handle: JoinHandle<Vec<String>>,
}

impl StubBackend {
    /// Starts a conforming backend.
    pub fn spawn() -> Self {
        Self::spawn_with_broken(&[])
    }

    /// Starts a backend that answers 500 on the listed paths.
    pub fn spawn_with_broken(broken: &[&str]) -> Self {
        let server = Arc::new(Server::http("127.0.0.1:0").unwrap());
        let addr = server.server_addr().to_ip().unwrap();
        let broken: Vec<String> = broken.iter().map(ToString::to_string).collect();
        let worker = Arc::clone(&server);
        let registered = Mutex::new(Vec::<String>::new());
        let handle = thread::spawn(move || {
            let mut served = Vec::new();
            while let Ok(mut request) = worker.recv() {
                let mut raw = String::new();
                let _ = request.as_reader().read_to_string(&mut raw);
                let url = Url::parse(&format!("http://stub{}", request.url())).unwrap();
                let query: BTreeMap<String, String> = url.query_pairs().into_owned().collect();
                let body: Value = serde_json::from_str(&raw).unwrap_or(Value::Null);
                let method = request.method().as_str().to_string();
                let path = url.path().to_string();
                let authorized = bearer(&request).as_deref() == Some(STUB_TOKEN);
                served.push(format!("{method} {path}"));
                let (status, reply) = if broken.contains(&path) {
                    (500, json!({"error": "injected failure"}))
                } else {
                    route(&method, &path, &query, &body, authorized, &registered)
                };
                let response = Response::from_string(reply.to_string())
                    .with_status_code(status)
                    .with_header(
                        Header::from_bytes(&b"Content-Type"[..], &b"application/json"[..]).unwrap(),
                    );
                let _ = request.respond(response);
            }
            served
        });
        Self {
            base_url: format!("http://{addr}"),
            server,
            handle,
        }
    }

    /// Stops the backend and returns the `METHOD path` of every request served.
    pub fn finish(self) -> Vec<String> {
        self.server.unblock();
        self.handle.join().expect("stub backend panicked")
    }
}

// ============================================================================
// SECTION: Routes
// ============================================================================

/// Dispatches one request.
fn route(
    method: &str,
    path: &str,
    query: &BTreeMap<String, String>,
    body: &Value,
    authorized: bool,
    registered: &Mutex<Vec<String>>,
) -> (u16, Value) {
    match (method, path) {
        ("POST", "/api/v1/auth/login") => login(body),
        ("POST", "/api/v1/auth/register") => register(body, registered),
        ("POST", "/api/v1/utm/create") => utm(body),
        ("POST", "/api/v1/google-ads/auth") => google_ads_auth(body),
        ("GET", "/api/v1/google-ads/campaigns") => campaigns(query),
        ("GET", "/api/v1/metrics/dashboard") => guarded(authorized, || dashboard(query)),
        ("GET", "/api/v1/metrics/history") => history(query, authorized),
        ("GET", "/api/v1/roas-roi/analysis") => guarded(authorized, || analysis(query)),
        ("GET", "/api/v1/billing/subscription") => {
            guarded(authorized, || (200, json!({"plan": "pro", "status": "active"})))
        }
        ("POST", "/api/v1/whatsapp/send") => guarded(authorized, || whatsapp(body)),
        _ => (404, json!({"error": "not found"})),
    }
}

fn guarded(authorized: bool, handler: impl FnOnce() -> (u16, Value)) -> (u16, Value) {
    if authorized { handler() } else { (401, json!({"error": {"code": "INVALID_TOKEN"}})) }
}

fn login(body: &Value) -> (u16, Value) {
    if text(body, "email") == Some(STUB_EMAIL) && text(body, "password") == Some(STUB_PASSWORD) {
        (200, json!({"token": STUB_TOKEN, "user": {"email": STUB_EMAIL}}))
    } else {
        (401, json!({"error": "invalid credentials"}))
    }
}

fn register(body: &Value, registered: &Mutex<Vec<String>>) -> (u16, Value) {
    for field in ["name", "email", "password", "organizationName"] {
        if text(body, field).is_none_or(str::is_empty) {
            return (400, json!({"message": format!("{field} is required")}));
        }
    }
    let email = text(body, "email").unwrap_or_default();
    if !email.contains('@') {
        return (422, json!({"message": "email must be a valid email address"}));
    }
    if text(body, "password").unwrap_or_default().len() < 8 {
        return (422, json!({"message": "password must be at least 8 characters"}));
    }
    let mut registered = registered.lock().unwrap();
    if registered.iter().any(|known| known == email) {
        return (409, json!({"message": "email already registered"}));
    }
    registered.push(email.to_string());
    (201, json!({"id": registered.len(), "email": email}))
}

fn utm(body: &Value) -> (u16, Value) {
    let Some(original) = text(body, "originalUrl") else {
        return (400, json!({"error": "originalUrl is required"}));
    };
    if !is_http_url(original) {
        return (400, json!({"errors": [{"field": "originalUrl", "detail": "invalid url"}]}));
    }
    let params: Vec<String> = [
        ("utmSource", "utm_source"),
        ("utmMedium", "utm_medium"),
        ("utmCampaign", "utm_campaign"),
        ("utmTerm", "utm_term"),
        ("utmContent", "utm_content"),
    ]
    .iter()
    .filter_map(|(field, param)| text(body, field).map(|value| format!("{param}={value}")))
    .collect();
    let link = if params.is_empty() {
        original.to_string()
    } else {
        format!("{original}?{}", params.join("&"))
    };
    (201, json!({"utmLink": link}))
}

fn google_ads_auth(body: &Value) -> (u16, Value) {
    match text(body, "redirect_uri") {
        None => (400, json!({"error": "redirect_uri is required"})),
        Some(uri) if !is_http_url(uri) => (422, json!({"message": "redirect_uri must be a url"})),
        Some(uri) => {
            let auth_url = format!("https://accounts.google.com/o/oauth2/auth?redirect_uri={uri}");
            (200, json!({"auth_url": auth_url}))
        }
    }
}

fn campaigns(query: &BTreeMap<String, String>) -> (u16, Value) {
    match query.get("customer_id") {
        None => (400, json!({"error": "customer_id is required"})),
        Some(id) if !id.chars().all(|ch| ch.is_ascii_digit() || ch == '-') => {
            (404, json!({"message": "customer not found"}))
        }
        Some(_) => (200, json!({"campaigns": [{"id": "1", "name": "Brand"}]})),
    }
}

fn dashboard(query: &BTreeMap<String, String>) -> (u16, Value) {
    let dates = [query.get("startDate"), query.get("endDate")];
    if dates.iter().flatten().any(|date| !is_iso_date(date)) {
        return (400, json!({"error": "dates must be YYYY-MM-DD"}));
    }
    (200, json!({"visits": 1200, "conversions": 48}))
}

fn history(query: &BTreeMap<String, String>, authorized: bool) -> (u16, Value) {
    if let Some(group) = query.get("groupBy")
        && !matches!(group.as_str(), "day" | "week" | "month")
    {
        return (422, json!({"message": "groupBy must be day, week, or month"}));
    }
    guarded(authorized, || (200, json!({"success": true, "data": []})))
}

fn analysis(query: &BTreeMap<String, String>) -> (u16, Value) {
    match (query.get("startDate"), query.get("endDate")) {
        (Some(start), Some(end)) if is_iso_date(start) && is_iso_date(end) => {
            (200, json!({"analysis": {"roas": 3.2, "roi": 1.4}}))
        }
        _ => (400, json!({"error": "startDate and endDate are required"})),
    }
}

fn whatsapp(body: &Value) -> (u16, Value) {
    let filled = |field| text(body, field).is_some_and(|value| !value.is_empty());
    if filled("to") && filled("message") {
        (200, json!({"success": true, "messageId": "wamid.1"}))
    } else {
        (400, json!({"error": "to and message are required"}))
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

fn bearer(request: &Request) -> Option<String> {
    request
        .headers()
        .iter()
        .find(|header| header.field.equiv("Authorization"))
        .and_then(|header| header.value.as_str().strip_prefix("Bearer ").map(ToString::to_string))
}

fn text<'a>(body: &'a Value, field: &str) -> Option<&'a str> {
    body.get(field).and_then(Value::as_str)
}

fn is_http_url(raw: &str) -> bool {
    Url::parse(raw).is_ok_and(|url| matches!(url.scheme(), "http" | "https"))
}

fn is_iso_date(raw: &str) -> bool {
    let bytes = raw.as_bytes();
    bytes.len() == 10
        && bytes.iter().enumerate().all(|(index, byte)| match index {
            4 | 7 => *byte == b'-',
            _ => byte.is_ascii_digit(),
        })
}
