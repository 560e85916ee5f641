//! Login / fetch / logout against a classic controller or a UniFi OS console.

use axum::http::{HeaderMap, HeaderValue, Method, StatusCode};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::config::OutboundConfig;
use crate::http::client::client_builder;

/// UniFi OS consoles hand out (and rotate) this token; state-changing calls must echo it.
const CSRF_HEADER: &str = "x-csrf-token";
const UPDATED_CSRF_HEADER: &str = "x-updated-csrf-token";

/// Endpoint set for one controller flavour.
#[derive(Debug)]
struct ApiPaths {
    login: &'static str,
    site_stats: &'static str,
    logout: &'static str,
}

const CLASSIC: ApiPaths = ApiPaths {
    login: "api/login",
    site_stats: "api/stat/sites",
    logout: "api/logout",
};

const UNIFI_OS: ApiPaths = ApiPaths {
    login: "api/auth/login",
    site_stats: "proxy/network/api/stat/sites",
    logout: "api/auth/logout",
};

/// Which API the controller speaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerKind {
    /// Standalone network application.
    Classic,
    /// UniFi OS console (UDM, UDR, Cloud Key Gen2+): network API under `/proxy/network`.
    UnifiOs,
}

impl ControllerKind {
    fn paths(self) -> &'static ApiPaths {
        match self {
            ControllerKind::Classic => &CLASSIC,
            ControllerKind::UnifiOs => &UNIFI_OS,
        }
    }
}

/// Error type for controller sessions.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// Credentials were refused. Not a transport failure.
    #[error("login rejected by controller")]
    LoginRejected,

    #[error("controller request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("controller returned {status} for {endpoint}")]
    Status {
        endpoint: &'static str,
        status: StatusCode,
    },

    /// The controller answered but flagged the call as failed.
    #[error("controller reported an error: {0}")]
    Api(String),
}

/// Standard controller response wrapper: `{"meta": {"rc": "ok"}, "data": [...]}`.
#[derive(Debug, Deserialize)]
struct Envelope {
    meta: Meta,
    #[serde(default)]
    data: Vec<Value>,
}

#[derive(Debug, Deserialize)]
struct Meta {
    rc: String,
    #[serde(default)]
    msg: Option<String>,
}

impl Meta {
    fn is_ok(&self) -> bool {
        self.rc == "ok"
    }
}

/// Client, address and protocol state shared by both session stages.
#[derive(Debug)]
struct Connection {
    client: reqwest::Client,
    base_url: String,
    kind: ControllerKind,
    csrf_token: Option<HeaderValue>,
}

impl Connection {
    fn request(&self, method: Method, path: &str) -> reqwest::RequestBuilder {
        let request = self.client.request(method, endpoint(&self.base_url, path));
        match &self.csrf_token {
            Some(token) => request.header(CSRF_HEADER, token.clone()),
            None => request,
        }
    }

    fn remember_csrf(&mut self, headers: &HeaderMap) {
        if let Some(token) = headers
            .get(UPDATED_CSRF_HEADER)
            .or_else(|| headers.get(CSRF_HEADER))
        {
            self.csrf_token = Some(token.clone());
        }
    }
}

/// An unauthenticated session against one controller.
#[derive(Debug)]
pub struct ControllerSession {
    conn: Connection,
}

/// A session holding a valid login cookie.
#[derive(Debug)]
#[must_use = "a logged-in session should be logged out"]
pub struct LoggedIn {
    conn: Connection,
}

impl ControllerSession {
    /// Prepare a session against `base_url` (`host[:port]`).
    ///
    /// Fetches the root page to tell a UniFi OS console (which answers with a
    /// CSRF token header) from a classic controller.
    pub async fn connect(
        outbound: &OutboundConfig,
        base_url: impl Into<String>,
    ) -> Result<Self, SessionError> {
        let client = client_builder(outbound).cookie_store(true).build()?;
        let mut conn = Connection {
            client,
            base_url: base_url.into(),
            kind: ControllerKind::Classic,
            csrf_token: None,
        };

        let root = conn.request(Method::GET, "").send().await?;
        if root.headers().contains_key(CSRF_HEADER) {
            conn.kind = ControllerKind::UnifiOs;
            conn.remember_csrf(root.headers());
        }
        tracing::debug!(base_url = %conn.base_url, kind = ?conn.kind, "Detected controller");

        Ok(Self { conn })
    }

    /// Submit credentials. A refusal is reported as [`SessionError::LoginRejected`].
    pub async fn login(mut self, username: &str, password: &str) -> Result<LoggedIn, SessionError> {
        let path = self.conn.kind.paths().login;
        tracing::debug!(base_url = %self.conn.base_url, "Logging in to controller");

        let response = self
            .conn
            .request(Method::POST, path)
            .json(&json!({ "username": username, "password": password }))
            .send()
            .await?;

        let status = response.status();
        if matches!(
            status,
            StatusCode::BAD_REQUEST | StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN
        ) {
            return Err(SessionError::LoginRejected);
        }
        if !status.is_success() {
            return Err(SessionError::Status {
                endpoint: path,
                status,
            });
        }
        self.conn.remember_csrf(response.headers());

        // Classic controllers wrap the reply and report refusals in `meta.rc`.
        let body = response.bytes().await?;
        if let Ok(envelope) = serde_json::from_slice::<Envelope>(&body) {
            if !envelope.meta.is_ok() {
                return Err(SessionError::LoginRejected);
            }
        }

        Ok(LoggedIn { conn: self.conn })
    }
}

impl LoggedIn {
    pub fn kind(&self) -> ControllerKind {
        self.conn.kind
    }

    /// Statistics for every site the account can see, in controller order.
    pub async fn site_stats(&self) -> Result<Vec<Value>, SessionError> {
        let path = self.conn.kind.paths().site_stats;
        let response = self.conn.request(Method::GET, path).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SessionError::Status {
                endpoint: path,
                status,
            });
        }

        let envelope: Envelope = response.json().await?;
        if !envelope.meta.is_ok() {
            return Err(SessionError::Api(
                envelope.meta.msg.unwrap_or(envelope.meta.rc),
            ));
        }
        Ok(envelope.data)
    }

    /// End the session on the controller.
    pub async fn logout(self) -> Result<(), SessionError> {
        let path = self.conn.kind.paths().logout;
        let response = self.conn.request(Method::POST, path).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SessionError::Status {
                endpoint: path,
                status,
            });
        }
        tracing::debug!(base_url = %self.conn.base_url, "Logged out of controller");
        Ok(())
    }
}

fn endpoint(base_url: &str, path: &str) -> String {
    format!("{}/{}", base_url.trim_end_matches('/'), path)
}
