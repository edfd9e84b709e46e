//! Repository of all error types for this crate using [thiserror]
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Request field that failed validation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Name,
    PeerUrls,
    Id,
}

impl Field {
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Name => "name",
            Field::PeerUrls => "peer_urls",
            Field::Id => "id",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error type for the cluster boundary traits
/// ([crate::cluster::Connector] and [crate::cluster::ClusterConnection])
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClusterError {
    /// Transport, TLS or certificate material failure
    #[error("connection error: {0}")]
    Connect(String),

    /// The cluster refused the operation
    #[error("{0}")]
    Rejected(String),
}

/// Outcome of a failed [crate::reconciler::MembershipReconciler] call
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReconcileError {
    #[error("{}", validation_message(.0))]
    Validation(Field),

    #[error("unable to connect to the cluster: {0}")]
    Connection(String),

    #[error("cluster rejected the operation: {0}")]
    ClusterRejection(String),
}

fn validation_message(field: &Field) -> &'static str {
    match field {
        Field::Name => "name is empty",
        Field::PeerUrls => "peer_urls is empty",
        Field::Id => "id is not set or malformed",
    }
}

impl From<ClusterError> for ReconcileError {
    fn from(err: ClusterError) -> Self {
        match err {
            ClusterError::Connect(msg) => ReconcileError::Connection(msg),
            ClusterError::Rejected(msg) => ReconcileError::ClusterRejection(msg),
        }
    }
}

/// Errors triggered while translating automation parameters in
/// [crate::module]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ModuleError {
    #[error("unknown state {0:?}, expected \"present\" or \"absent\"")]
    UnknownState(String),

    #[error("invalid cluster_port {0:?}")]
    InvalidPort(String),

    #[error("invalid connection settings: {0}")]
    Config(String),

    #[error(transparent)]
    Reconcile(#[from] ReconcileError),
}

impl From<crate::config::ConnectOptionsBuilderError> for ModuleError {
    fn from(err: crate::config::ConnectOptionsBuilderError) -> Self {
        ModuleError::Config(err.to_string())
    }
}

#[cfg(feature = "etcd")]
impl From<etcd_client::Error> for ClusterError {
    fn from(err: etcd_client::Error) -> Self {
        match err {
            etcd_client::Error::GRpcStatus(status) => {
                ClusterError::Rejected(status.message().to_string())
            }
            other => ClusterError::Connect(other.to_string()),
        }
    }
}
