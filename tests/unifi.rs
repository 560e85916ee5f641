//! Network controller session: login → fetch → logout, against a classic
//! controller and a UniFi OS console.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use homer_proxy::config::{AuthKind, ConfigEntry};
use homer_proxy::GatewayConfig;
use serde_json::{json, Value};

mod common;

const SESSION_COOKIE: &str = "unifises=abc123";

#[derive(Clone, Default)]
struct Controller {
    logins: Arc<AtomicUsize>,
    stats: Arc<AtomicUsize>,
    logouts: Arc<AtomicUsize>,
    fail_stats: bool,
}

async fn login(State(controller): State<Controller>, Json(credentials): Json<Value>) -> Response {
    controller.logins.fetch_add(1, Ordering::SeqCst);
    if credentials["username"] == "admin" && credentials["password"] == "ubnt" {
        (
            [(header::SET_COOKIE, format!("{}; Path=/", SESSION_COOKIE))],
            Json(json!({ "meta": { "rc": "ok" }, "data": [] })),
        )
            .into_response()
    } else {
        (
            StatusCode::BAD_REQUEST,
            Json(json!({ "meta": { "rc": "error", "msg": "api.err.Invalid" }, "data": [] })),
        )
            .into_response()
    }
}

async fn site_stats(State(controller): State<Controller>, headers: HeaderMap) -> Response {
    controller.stats.fetch_add(1, Ordering::SeqCst);
    let has_cookie = headers
        .get(header::COOKIE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.contains(SESSION_COOKIE));
    if !has_cookie {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "meta": { "rc": "error", "msg": "api.err.LoginRequired" } })),
        )
            .into_response();
    }
    if controller.fail_stats {
        return (StatusCode::INTERNAL_SERVER_ERROR, "boom").into_response();
    }
    Json(json!({
        "meta": { "rc": "ok" },
        "data": [
            { "name": "default", "desc": "Home" },
            { "name": "x7k2p9", "desc": "Cabin", "num_new_alarms": 2 },
            { "name": "q1w2e3", "desc": "Office" }
        ]
    }))
    .into_response()
}

async fn logout(State(controller): State<Controller>) -> Json<Value> {
    controller.logouts.fetch_add(1, Ordering::SeqCst);
    Json(json!({ "meta": { "rc": "ok" }, "data": [] }))
}

async fn start_controller(controller: Controller) -> ConfigEntry {
    let app = Router::new()
        .route("/api/login", post(login))
        .route("/api/stat/sites", get(site_stats))
        .route("/api/logout", post(logout))
        .with_state(controller);
    let addr = common::serve(app).await;
    ConfigEntry {
        host: "http://127.0.0.1".into(),
        port: Some(addr.port().to_string()),
        auth: AuthKind::Credentials,
        username: Some("admin".into()),
        password: Some("ubnt".into()),
        apikey: None,
    }
}

fn config(entry: ConfigEntry) -> GatewayConfig {
    GatewayConfig {
        unifi: Some(entry),
        ..Default::default()
    }
}

#[tokio::test]
async fn test_site_by_index() {
    let controller = Controller::default();
    let entry = start_controller(controller.clone()).await;

    let (status, headers, body) = common::send(config(entry), "GET", "/proxy/unifi/sites/1", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(headers["content-type"], "application/json");
    let site: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(site, json!({ "name": "x7k2p9", "desc": "Cabin", "num_new_alarms": 2 }));
    assert_eq!(controller.logins.load(Ordering::SeqCst), 1);
    assert_eq!(controller.stats.load(Ordering::SeqCst), 1);
    assert_eq!(controller.logouts.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_login_rejected_skips_fetch() {
    let controller = Controller::default();
    let mut entry = start_controller(controller.clone()).await;
    entry.password = Some("wrong".into());

    let (status, _, body) = common::send(config(entry), "GET", "/proxy/unifi/sites/0", None).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, "UniFi login failed");
    assert_eq!(controller.logins.load(Ordering::SeqCst), 1);
    assert_eq!(controller.stats.load(Ordering::SeqCst), 0);
    assert_eq!(controller.logouts.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_index_out_of_range() {
    let controller = Controller::default();
    let entry = start_controller(controller.clone()).await;

    let (status, _, body) = common::send(config(entry), "GET", "/proxy/unifi/sites/3", None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, "UniFi site 3 not found");
    assert_eq!(controller.logouts.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_fetch_failure_still_logs_out() {
    let controller = Controller {
        fail_stats: true,
        ..Default::default()
    };
    let entry = start_controller(controller.clone()).await;

    let (status, _, body) = common::send(config(entry), "GET", "/proxy/unifi/sites/0", None).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, "Internal Server Error");
    assert_eq!(controller.stats.load(Ordering::SeqCst), 1);
    assert_eq!(controller.logouts.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_missing_password_is_404() {
    let controller = Controller::default();
    let mut entry = start_controller(controller.clone()).await;
    entry.password = None;

    let (status, _, body) = common::send(config(entry), "GET", "/proxy/unifi/sites/0", None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, "UNIFI configuration not found");
    assert_eq!(controller.logins.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_non_numeric_index_is_rejected() {
    let controller = Controller::default();
    let entry = start_controller(controller.clone()).await;

    let (status, _, body) = common::send(config(entry), "GET", "/proxy/unifi/sites/first", None).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, "Invalid UniFi site index 'first'");
    assert_eq!(controller.logins.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_non_numeric_index_without_controller_is_404() {
    let (status, _, body) =
        common::send(GatewayConfig::default(), "GET", "/proxy/unifi/sites/first", None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, "UNIFI configuration not found");
}

// UniFi OS console: detected by the CSRF header on `/`, login under
// `/api/auth`, network API under `/proxy/network`, token rotated at login.

const INITIAL_CSRF: &str = "csrf-initial";
const LOGIN_CSRF: &str = "csrf-after-login";
const CONSOLE_COOKIE: &str = "TOKEN=jwt.payload.sig";

fn has_csrf(headers: &HeaderMap, expected: &str) -> bool {
    headers.get("x-csrf-token").is_some_and(|v| v == expected)
}

async fn console_root() -> Response {
    ([("x-csrf-token", INITIAL_CSRF)], "<html></html>").into_response()
}

async fn console_login(
    State(controller): State<Controller>,
    Json(credentials): Json<Value>,
) -> Response {
    controller.logins.fetch_add(1, Ordering::SeqCst);
    if credentials["username"] != "admin" || credentials["password"] != "ubnt" {
        return (StatusCode::UNAUTHORIZED, Json(json!({ "errors": ["invalid credentials"] })))
            .into_response();
    }
    (
        [
            (header::SET_COOKIE.as_str(), format!("{}; Path=/", CONSOLE_COOKIE)),
            ("x-updated-csrf-token", LOGIN_CSRF.to_string()),
        ],
        Json(json!({ "username": "admin", "isOwner": true })),
    )
        .into_response()
}

async fn console_site_stats(State(controller): State<Controller>, headers: HeaderMap) -> Response {
    controller.stats.fetch_add(1, Ordering::SeqCst);
    let has_cookie = headers
        .get(header::COOKIE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.contains(CONSOLE_COOKIE));
    if !has_cookie || !has_csrf(&headers, LOGIN_CSRF) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    Json(json!({
        "meta": { "rc": "ok" },
        "data": [{ "name": "default", "desc": "Default" }]
    }))
    .into_response()
}

async fn console_logout(State(controller): State<Controller>, headers: HeaderMap) -> StatusCode {
    if !has_csrf(&headers, LOGIN_CSRF) {
        return StatusCode::FORBIDDEN;
    }
    controller.logouts.fetch_add(1, Ordering::SeqCst);
    StatusCode::OK
}

async fn start_console(controller: Controller) -> ConfigEntry {
    let app = Router::new()
        .route("/", get(console_root))
        .route("/api/auth/login", post(console_login))
        .route("/proxy/network/api/stat/sites", get(console_site_stats))
        .route("/api/auth/logout", post(console_logout))
        .with_state(controller);
    let addr = common::serve(app).await;
    ConfigEntry {
        host: "http://127.0.0.1".into(),
        port: Some(addr.port().to_string()),
        auth: AuthKind::Credentials,
        username: Some("admin".into()),
        password: Some("ubnt".into()),
        apikey: None,
    }
}

#[tokio::test]
async fn test_unifi_os_console() {
    let controller = Controller::default();
    let entry = start_console(controller.clone()).await;

    let (status, _, body) = common::send(config(entry), "GET", "/proxy/unifi/sites/0", None).await;

    assert_eq!(status, StatusCode::OK);
    let site: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(site, json!({ "name": "default", "desc": "Default" }));
    assert_eq!(controller.logins.load(Ordering::SeqCst), 1);
    assert_eq!(controller.stats.load(Ordering::SeqCst), 1);
    assert_eq!(controller.logouts.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_unifi_os_login_rejected() {
    let controller = Controller::default();
    let mut entry = start_console(controller.clone()).await;
    entry.password = Some("wrong".into());

    let (status, _, body) = common::send(config(entry), "GET", "/proxy/unifi/sites/0", None).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, "UniFi login failed");
    assert_eq!(controller.stats.load(Ordering::SeqCst), 0);
}
