//! Cluster membership data model and the traits the reconciler talks to
//!
//! A [Connector] opens one [ClusterConnection] per call; the connection is
//! dropped once the call is over.

use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::ConnectOptions;
use crate::errors::ClusterError;

#[cfg(feature = "etcd")]
pub mod etcd;
pub mod local;

/// Cluster-assigned member identifier
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MemberId(u64);

impl MemberId {
    pub fn new(id: u64) -> MemberId {
        MemberId(id)
    }

    pub fn get(&self) -> u64 {
        self.0
    }
}

impl From<u64> for MemberId {
    fn from(id: u64) -> Self {
        MemberId(id)
    }
}

impl fmt::Display for MemberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::LowerHex for MemberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::LowerHex::fmt(&self.0, f)
    }
}

/// Text that is not a valid member id
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid member id {0:?}")]
pub struct ParseMemberIdError(String);

/// `0x` prefixed text is base 16, anything else is base 10
impl FromStr for MemberId {
    type Err = ParseMemberIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (digits, radix) = match s.strip_prefix("0x") {
            Some(hex) => (hex, 16),
            None => (s, 10),
        };
        // from_str_radix alone would let a leading '+' through
        if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
            return Err(ParseMemberIdError(s.to_string()));
        }
        u64::from_str_radix(digits, radix)
            .map(MemberId)
            .map_err(|_| ParseMemberIdError(s.to_string()))
    }
}

/// One etcd node as listed by the cluster
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterMember {
    pub id: MemberId,
    pub name: String,
    pub peer_urls: Vec<String>,
    pub client_urls: Vec<String>,
}

impl ClusterMember {
    pub fn new(id: impl Into<MemberId>, name: impl Into<String>) -> ClusterMember {
        ClusterMember {
            id: id.into(),
            name: name.into(),
            peer_urls: vec![],
            client_urls: vec![],
        }
    }

    pub fn with_peer_urls(mut self, urls: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.peer_urls = urls.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_client_urls(mut self, urls: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.client_urls = urls.into_iter().map(Into::into).collect();
        self
    }

    /// A member gets client urls only after it joined and started
    pub fn started(&self) -> bool {
        !self.client_urls.is_empty()
    }
}

pub type ClusterResult<T> = Result<T, ClusterError>;
pub type ClusterUnitResult = Result<(), ClusterError>;

/// Opens connections to a cluster
#[async_trait]
pub trait Connector: Send + Sync {
    type Connection: ClusterConnection;

    /// Open a new connection. Failures here are always [ClusterError::Connect]
    async fn connect(&self, options: &ConnectOptions) -> ClusterResult<Self::Connection>;
}

/// Membership RPCs against an open connection
#[async_trait]
pub trait ClusterConnection: Send {
    /// Ask the cluster to add a member with the given peer urls.
    ///
    /// Returns the entry the cluster created, including the id it allocated.
    async fn add_member(
        &mut self,
        name: &str,
        peer_urls: &[String],
    ) -> ClusterResult<ClusterMember>;

    /// Ask the cluster to remove a member
    async fn remove_member(&mut self, id: MemberId) -> ClusterUnitResult;

    /// Current membership, as the cluster reports it
    async fn list_members(&mut self) -> ClusterResult<Vec<ClusterMember>>;
}
