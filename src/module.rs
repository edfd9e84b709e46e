//! Translation layer for automation engines
//!
//! Automation tasks describe a membership change as one flat mapping:
//!
//! ```json
//! {
//!   "state": "present",
//!   "cluster_host": "192.168.39.66",
//!   "cluster_port": "32379",
//!   "name": "hello-world",
//!   "peer_urls": ["http://hello-world.default.svc:2380"]
//! }
//! ```
//!
//! [MemberParams] turns that into a [MembershipRequest] plus [ConnectOptions],
//! and [ModuleResult] is what goes back to the engine.

use std::path::PathBuf;

use log::info;
use serde::{Deserialize, Serialize};

use crate::cluster::{ClusterMember, Connector};
use crate::config::{ConnectOptions, ConnectOptionsBuilder, TlsFiles};
use crate::errors::ModuleError;
use crate::reconciler::{MembershipReconciler, MembershipRequest};

/// `cluster_port` comes as text or as a number depending on the caller
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum PortParam {
    Number(u64),
    Text(String),
}

impl Default for PortParam {
    fn default() -> Self {
        PortParam::Text(String::new())
    }
}

/// `state` parameter
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MemberState {
    /// The member should be part of the cluster
    Present,
    /// The member should be gone from the cluster
    Absent,
}

impl std::str::FromStr for MemberState {
    type Err = ModuleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "present" => Ok(MemberState::Present),
            "absent" => Ok(MemberState::Absent),
            other => Err(ModuleError::UnknownState(other.to_string())),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct MemberParams {
    pub state: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub peer_urls: Vec<String>,
    pub cluster_host: String,
    #[serde(default)]
    pub cluster_port: PortParam,
    #[serde(default)]
    pub ca_cert: Option<PathBuf>,
    #[serde(default)]
    pub cert_cert: Option<PathBuf>,
    #[serde(default)]
    pub cert_key: Option<PathBuf>,
}

impl MemberParams {
    pub fn request(&self) -> Result<MembershipRequest, ModuleError> {
        let request = match self.state.parse::<MemberState>()? {
            MemberState::Present => MembershipRequest::AddPeer {
                name: self.name.clone(),
                peer_urls: self.peer_urls.clone(),
            },
            MemberState::Absent => MembershipRequest::RemoveMember {
                id: self.id.clone(),
            },
        };
        Ok(request)
    }

    pub fn connect_options(&self) -> Result<ConnectOptions, ModuleError> {
        let mut builder = ConnectOptionsBuilder::default();
        builder.host(self.cluster_host.clone());

        match &self.cluster_port {
            PortParam::Text(text) if text.is_empty() => {}
            PortParam::Text(text) => {
                let port = text
                    .parse::<u16>()
                    .map_err(|_| ModuleError::InvalidPort(text.clone()))?;
                builder.port(port);
            }
            PortParam::Number(number) => {
                let port = u16::try_from(*number)
                    .map_err(|_| ModuleError::InvalidPort(number.to_string()))?;
                builder.port(port);
            }
        }

        let tls = TlsFiles {
            ca_cert: self.ca_cert.clone(),
            client_cert: self.cert_cert.clone(),
            client_key: self.cert_key.clone(),
        };
        if !tls.is_empty() {
            builder.tls(tls);
        }
        Ok(builder.build()?)
    }
}

/// Result envelope handed back to the automation engine
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ModuleResult {
    pub changed: bool,
    pub failed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub msg: Option<String>,
    pub members: Vec<ClusterMember>,
}

impl ModuleResult {
    pub fn changed(members: Vec<ClusterMember>) -> ModuleResult {
        ModuleResult {
            changed: true,
            members,
            ..Default::default()
        }
    }

    pub fn failed(err: &ModuleError) -> ModuleResult {
        ModuleResult {
            failed: true,
            msg: Some(err.to_string()),
            ..Default::default()
        }
    }
}

/// Run one module invocation.
///
/// In check mode nothing is validated or contacted and the member list is
/// left empty.
pub async fn run<C: Connector>(
    connector: C,
    params: &MemberParams,
    check_mode: bool,
) -> ModuleResult {
    if check_mode {
        info!("check mode, leaving the cluster untouched");
        return ModuleResult::default();
    }
    match apply(connector, params).await {
        Ok(members) => ModuleResult::changed(members),
        Err(err) => ModuleResult::failed(&err),
    }
}

async fn apply<C: Connector>(
    connector: C,
    params: &MemberParams,
) -> Result<Vec<ClusterMember>, ModuleError> {
    let request = params.request()?;
    let options = params.connect_options()?;
    let reconciler = MembershipReconciler::new(connector, options);
    Ok(reconciler.apply(request).await?)
}
