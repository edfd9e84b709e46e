//! Applies one membership change to a cluster and reports the result
//!
//! Every call validates its request, opens its own connection, issues one
//! RPC, then re-reads the membership. There are no retries and nothing is
//! kept between calls: any retry or dedup policy belongs to the caller.

use log::{debug, info, warn};

use crate::cluster::{ClusterConnection, ClusterMember, Connector, MemberId};
use crate::config::ConnectOptions;
use crate::errors::{Field, ReconcileError};

pub type ReconcileResult<T> = Result<T, ReconcileError>;

/// The desired membership change
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MembershipRequest {
    AddPeer { name: String, peer_urls: Vec<String> },
    /// `id` is decimal or `0x` prefixed hex text
    RemoveMember { id: String },
}

/// A request whose fields were checked, ready to hit the network
#[derive(Clone, Debug, PartialEq, Eq)]
enum Validated {
    AddPeer { name: String, peer_urls: Vec<String> },
    RemoveMember { id: MemberId },
}

impl MembershipRequest {
    pub fn add_peer(
        name: impl Into<String>,
        peer_urls: impl IntoIterator<Item = impl Into<String>>,
    ) -> MembershipRequest {
        MembershipRequest::AddPeer {
            name: name.into(),
            peer_urls: peer_urls.into_iter().map(Into::into).collect(),
        }
    }

    pub fn remove_member(id: impl Into<String>) -> MembershipRequest {
        MembershipRequest::RemoveMember { id: id.into() }
    }

    /// `name` is checked before `peer_urls`
    fn validate(self) -> ReconcileResult<Validated> {
        match self {
            MembershipRequest::AddPeer { name, peer_urls } => {
                if name.is_empty() {
                    return Err(ReconcileError::Validation(Field::Name));
                }
                if peer_urls.is_empty() {
                    return Err(ReconcileError::Validation(Field::PeerUrls));
                }
                Ok(Validated::AddPeer { name, peer_urls })
            }
            MembershipRequest::RemoveMember { id } => {
                let id = id
                    .parse::<MemberId>()
                    .map_err(|_| ReconcileError::Validation(Field::Id))?;
                Ok(Validated::RemoveMember { id })
            }
        }
    }
}

/// Converges one membership change at a time against the cluster reachable
/// through `connector` and `options`
pub struct MembershipReconciler<C: Connector> {
    connector: C,
    options: ConnectOptions,
}

impl<C: Connector> MembershipReconciler<C> {
    pub fn new(connector: C, options: ConnectOptions) -> MembershipReconciler<C> {
        MembershipReconciler { connector, options }
    }

    /// Applies `request` and returns the membership observed right after it.
    ///
    /// If the change went through but the follow-up listing failed, the whole
    /// call fails.
    pub async fn apply(&self, request: MembershipRequest) -> ReconcileResult<Vec<ClusterMember>> {
        let request = request.validate().map_err(|err| {
            warn!("rejecting membership request: {err}");
            err
        })?;

        let mut connection = self.connector.connect(&self.options).await?;
        match request {
            Validated::AddPeer { name, peer_urls } => {
                let added = connection.add_member(&name, &peer_urls).await?;
                info!(
                    "added member {} ({}) with peer urls {:?}",
                    added.id, name, added.peer_urls
                );
            }
            Validated::RemoveMember { id } => {
                connection.remove_member(id).await?;
                info!("removed member {id}");
            }
        }
        let members = connection.list_members().await?;
        debug!("cluster now has {} members", members.len());
        Ok(members)
    }

    /// Current membership, without changing anything
    pub async fn members(&self) -> ReconcileResult<Vec<ClusterMember>> {
        let mut connection = self.connector.connect(&self.options).await?;
        Ok(connection.list_members().await?)
    }
}
