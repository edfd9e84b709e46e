//! Connection settings for the target cluster

use std::path::PathBuf;

use derive_builder::Builder;
use serde::{Deserialize, Serialize};

/// Port etcd serves client traffic on when none is given
pub const DEFAULT_CLIENT_PORT: u16 = 2379;

fn default_port() -> u16 {
    DEFAULT_CLIENT_PORT
}

/// TLS material handed over to the cluster client as-is.
///
/// All three are expected together, but that is for the client library to
/// enforce; nothing here rejects a partial set.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TlsFiles {
    #[serde(default)]
    pub ca_cert: Option<PathBuf>,
    #[serde(default)]
    pub client_cert: Option<PathBuf>,
    #[serde(default)]
    pub client_key: Option<PathBuf>,
}

impl TlsFiles {
    pub fn is_empty(&self) -> bool {
        self.ca_cert.is_none() && self.client_cert.is_none() && self.client_key.is_none()
    }
}

/// Where and how to reach the cluster
///
/// # Example
/// ```rust
/// # use etcd_member::config::ConnectOptionsBuilder;
/// let options = ConnectOptionsBuilder::default()
///     .host("192.168.39.66")
///     .port(32379u16)
///     .build()
///     .unwrap();
/// assert_eq!(options.endpoint(), "192.168.39.66:32379");
/// ```
#[derive(Builder, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[builder(setter(into), build_fn(validate = "Self::validate"))]
pub struct ConnectOptions {
    host: String,

    #[builder(default = "DEFAULT_CLIENT_PORT")]
    #[serde(default = "default_port")]
    port: u16,

    #[builder(setter(strip_option), default)]
    #[serde(default)]
    tls: Option<TlsFiles>,
}

impl ConnectOptionsBuilder {
    fn validate(&self) -> Result<(), String> {
        match &self.host {
            Some(host) if host.is_empty() => Err("host is empty".to_string()),
            _ => Ok(()),
        }
    }
}

impl ConnectOptions {
    /// Options for `host` on the default client port, without TLS
    pub fn new(host: impl Into<String>) -> ConnectOptions {
        ConnectOptions {
            host: host.into(),
            port: DEFAULT_CLIENT_PORT,
            tls: None,
        }
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// TLS material, if any was supplied. An all-empty [TlsFiles] counts as none.
    pub fn tls(&self) -> Option<&TlsFiles> {
        self.tls.as_ref().filter(|tls| !tls.is_empty())
    }

    pub fn endpoint(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
