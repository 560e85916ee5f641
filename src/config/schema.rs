//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the gateway.
//! All types derive Serde traits for deserialization from the config file.
//! Secrets (`password`, `apikey`) are never read from the file; they are
//! filled in from the environment by [`crate::config::secrets`].

use std::fmt;

use serde::{Deserialize, Deserializer};

/// Root configuration for the gateway.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct GatewayConfig {
    /// Listener settings.
    pub server: ServerConfig,

    /// Outbound client settings shared by every backend.
    pub outbound: OutboundConfig,

    /// Network controller (session based).
    pub unifi: Option<ConfigEntry>,

    /// 3D printer controller.
    pub prusalink: Option<ConfigEntry>,

    /// Home-automation hub.
    pub fibaro: Option<ConfigEntry>,

    /// Ad-blocking DNS service.
    pub pihole: Option<ConfigEntry>,

    /// Container management UI.
    pub portainer: Option<ConfigEntry>,

    /// Container update checker.
    pub wud: Option<ConfigEntry>,

    /// Home-automation media nodes, addressed by name.
    pub osmc: Vec<NamedConfigEntry>,

    /// Smart-plug devices, addressed by name.
    pub tasmota: Vec<NamedConfigEntry>,
}

impl GatewayConfig {
    /// Singleton sections in the order they are reported at startup.
    pub fn singletons(&self) -> [(&'static str, Option<&ConfigEntry>); 6] {
        [
            ("unifi", self.unifi.as_ref()),
            ("prusalink", self.prusalink.as_ref()),
            ("fibaro", self.fibaro.as_ref()),
            ("pihole", self.pihole.as_ref()),
            ("portainer", self.portainer.as_ref()),
            ("wud", self.wud.as_ref()),
        ]
    }

    /// Multi-instance sections.
    pub fn instance_groups(&self) -> [(&'static str, &[NamedConfigEntry]); 2] {
        [("osmc", self.osmc.as_slice()), ("tasmota", self.tasmota.as_slice())]
    }

    /// Look up a smart-plug device by name.
    pub fn tasmota_instance(&self, name: &str) -> Option<&ConfigEntry> {
        find_instance(&self.tasmota, name)
    }

    /// Look up a media node by name.
    pub fn osmc_instance(&self, name: &str) -> Option<&ConfigEntry> {
        find_instance(&self.osmc, name)
    }
}

fn find_instance<'a>(instances: &'a [NamedConfigEntry], name: &str) -> Option<&'a ConfigEntry> {
    instances
        .iter()
        .find(|instance| instance.name == name)
        .map(|instance| &instance.entry)
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Port the gateway listens on.
    pub port: u16,

    /// Enables debug logging and per-request access logs.
    pub debug: bool,

    /// Bind address (without port).
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            debug: false,
            bind: "0.0.0.0".to_string(),
        }
    }
}

impl ServerConfig {
    /// Full socket address string, e.g. `0.0.0.0:3000`.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.bind, self.port)
    }
}

/// Outbound HTTP client configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutboundConfig {
    /// Connection establishment timeout in seconds.
    pub connect_timeout_secs: u64,

    /// Total time allowed for one outbound call in seconds.
    pub request_timeout_secs: u64,

    /// Skip TLS peer verification. Most appliances use self-signed certificates.
    pub accept_invalid_certs: bool,
}

impl Default for OutboundConfig {
    fn default() -> Self {
        Self {
            connect_timeout_secs: 5,
            request_timeout_secs: 30,
            accept_invalid_certs: true,
        }
    }
}

/// How the gateway authenticates against a backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthKind {
    /// HTTP basic credentials; secret is `<NAME>_PASSWORD`.
    Credentials,
    /// API key in a header or query parameter; secret is `<NAME>_API_KEY`.
    Apikey,
}

impl AuthKind {
    /// Suffix of the environment variable holding this kind's secret.
    pub fn secret_suffix(self) -> &'static str {
        match self {
            AuthKind::Credentials => "PASSWORD",
            AuthKind::Apikey => "API_KEY",
        }
    }
}

/// Connection and authentication details for one backend.
#[derive(Clone, Deserialize)]
pub struct ConfigEntry {
    /// Scheme and host, e.g. `https://192.168.1.1`.
    pub host: String,

    #[serde(default, deserialize_with = "deserialize_port")]
    pub port: Option<String>,

    #[serde(rename = "type")]
    pub auth: AuthKind,

    #[serde(default)]
    pub username: Option<String>,

    #[serde(skip)]
    pub password: Option<String>,

    #[serde(skip)]
    pub apikey: Option<String>,
}

impl ConfigEntry {
    /// `host[:port]`, the root every outbound path is joined onto.
    pub fn base_url(&self) -> String {
        match &self.port {
            Some(port) => format!("{}:{}", self.host, port),
            None => self.host.clone(),
        }
    }
}

impl fmt::Debug for ConfigEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let redact = |secret: &Option<String>| secret.as_ref().map(|_| "<redacted>");
        f.debug_struct("ConfigEntry")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("auth", &self.auth)
            .field("username", &self.username)
            .field("password", &redact(&self.password))
            .field("apikey", &redact(&self.apikey))
            .finish()
    }
}

/// A config entry addressed by a name segment in the URL.
#[derive(Debug, Clone, Deserialize)]
pub struct NamedConfigEntry {
    pub name: String,

    #[serde(flatten)]
    pub entry: ConfigEntry,
}

/// Ports are strings in the model but operators naturally write `port = 8443`.
fn deserialize_port<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Port {
        Text(String),
        Number(u64),
    }

    Ok(Option::<Port>::deserialize(deserializer)?.map(|port| match port {
        Port::Text(text) => text,
        Port::Number(number) => number.to_string(),
    }))
}
