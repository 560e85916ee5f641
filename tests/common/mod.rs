//! Shared utilities for integration testing.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::{
    body::{Body, Bytes},
    extract::{Request, State},
    http::{HeaderMap, Method, StatusCode},
    response::{IntoResponse, Response},
    Router,
};
use homer_proxy::config::{AuthKind, ConfigEntry, NamedConfigEntry};
use homer_proxy::{GatewayConfig, GatewayServer};
use tokio::net::TcpListener;
use tower::ServiceExt;

/// One request as seen by a mock backend.
#[derive(Debug, Clone)]
#[allow(dead_code)]
pub struct Recorded {
    pub method: Method,
    pub path: String,
    pub query: Option<String>,
    pub headers: HeaderMap,
    pub body: Bytes,
}

/// A running mock backend with a log of everything it received.
#[derive(Clone)]
pub struct MockBackend {
    pub addr: SocketAddr,
    requests: Arc<Mutex<Vec<Recorded>>>,
}

#[allow(dead_code)]
impl MockBackend {
    pub fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn last(&self) -> Recorded {
        self.requests.lock().unwrap().last().cloned().expect("no request recorded")
    }

    /// A credentials entry pointing at this backend.
    pub fn credentials_entry(&self, username: &str, password: Option<&str>) -> ConfigEntry {
        ConfigEntry {
            host: "http://127.0.0.1".into(),
            port: Some(self.addr.port().to_string()),
            auth: AuthKind::Credentials,
            username: Some(username.into()),
            password: password.map(String::from),
            apikey: None,
        }
    }

    /// An API-key entry pointing at this backend.
    pub fn apikey_entry(&self, apikey: Option<&str>) -> ConfigEntry {
        ConfigEntry {
            host: "http://127.0.0.1".into(),
            port: Some(self.addr.port().to_string()),
            auth: AuthKind::Apikey,
            username: None,
            password: None,
            apikey: apikey.map(String::from),
        }
    }

    pub fn named(&self, name: &str, password: &str) -> NamedConfigEntry {
        NamedConfigEntry {
            name: name.into(),
            entry: self.credentials_entry("admin", Some(password)),
        }
    }
}

#[derive(Clone)]
struct MockState {
    requests: Arc<Mutex<Vec<Recorded>>>,
    status: StatusCode,
    content_type: &'static str,
    body: &'static str,
}

async fn record(State(mock): State<MockState>, request: Request) -> Response {
    let (parts, body) = request.into_parts();
    let body = axum::body::to_bytes(body, usize::MAX).await.unwrap_or_default();
    mock.requests.lock().unwrap().push(Recorded {
        method: parts.method,
        path: parts.uri.path().to_string(),
        query: parts.uri.query().map(String::from),
        headers: parts.headers,
        body,
    });
    (
        mock.status,
        [("content-type", mock.content_type)],
        mock.body,
    )
        .into_response()
}

/// Start a mock backend on an ephemeral port that answers every request
/// with a fixed status and JSON body.
pub async fn start_backend(status: StatusCode, body: &'static str) -> MockBackend {
    let requests = Arc::new(Mutex::new(Vec::new()));
    let state = MockState {
        requests: requests.clone(),
        status,
        content_type: "application/json",
        body,
    };
    let app = Router::new().fallback(record).with_state(state);
    let addr = serve(app).await;
    MockBackend { addr, requests }
}

/// Serve `app` on an ephemeral local port.
pub async fn serve(app: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    addr
}

/// Drive the gateway router in-process and collect the response.
#[allow(dead_code)]
pub async fn send(
    config: GatewayConfig,
    method: &str,
    uri: &str,
    body: Option<(&str, &'static str)>,
) -> (StatusCode, HeaderMap, String) {
    let server = GatewayServer::new(config).unwrap();
    let mut builder = axum::http::Request::builder().method(method).uri(uri);
    let body = match body {
        Some((content_type, payload)) => {
            builder = builder.header("content-type", content_type);
            Body::from(payload)
        }
        None => Body::empty(),
    };
    let response = server.router().oneshot(builder.body(body).unwrap()).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, headers, String::from_utf8_lossy(&bytes).into_owned())
}
