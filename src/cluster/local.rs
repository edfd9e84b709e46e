//! In-Memory implementation of [Connector] and [ClusterConnection]
//!
//! Clones share the same membership, so a test can keep one handle to
//! inspect what a reconciler did through another.
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use log::debug;
use tokio::sync::RwLock;

use super::{
    ClusterConnection, ClusterMember, ClusterResult, ClusterUnitResult, Connector, MemberId,
};
use crate::config::ConnectOptions;
use crate::errors::ClusterError;

/// Every interaction a [LocalCluster] received, in order
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Call {
    Connect(String),
    AddMember(Vec<String>),
    RemoveMember(MemberId),
    ListMembers,
}

type ArcMembers = Arc<RwLock<Vec<ClusterMember>>>;
type ArcCalls = Arc<RwLock<Vec<Call>>>;

#[derive(Clone, Default)]
pub struct LocalCluster {
    members: ArcMembers,
    calls: ArcCalls,
    unreachable: Arc<AtomicBool>,
    quorum_lost: Arc<AtomicBool>,
    listing_fails: Arc<AtomicBool>,
}

impl LocalCluster {
    pub fn new(members: Vec<ClusterMember>) -> LocalCluster {
        LocalCluster {
            members: Arc::new(RwLock::new(members)),
            ..Default::default()
        }
    }

    /// Make every following connect attempt fail
    pub fn set_unreachable(&self, unreachable: bool) {
        self.unreachable.store(unreachable, Ordering::SeqCst);
    }

    /// Make every following RPC be rejected by the cluster
    pub fn set_quorum_lost(&self, lost: bool) {
        self.quorum_lost.store(lost, Ordering::SeqCst);
    }

    /// Make only member listing fail, every other RPC still goes through
    pub fn fail_listing(&self, fail: bool) {
        self.listing_fails.store(fail, Ordering::SeqCst);
    }

    pub async fn members(&self) -> Vec<ClusterMember> {
        self.members.read().await.clone()
    }

    pub async fn calls(&self) -> Vec<Call> {
        self.calls.read().await.clone()
    }

    /// Whether any network-facing call reached this cluster at all
    pub async fn was_contacted(&self) -> bool {
        !self.calls.read().await.is_empty()
    }

    async fn fresh_id(&self) -> MemberId {
        let guard = self.members.read().await;
        loop {
            let candidate: u64 = rand::random();
            if candidate != 0 && guard.iter().all(|m| m.id.get() != candidate) {
                return MemberId::new(candidate);
            }
        }
    }
}

#[async_trait]
impl Connector for LocalCluster {
    type Connection = LocalConnection;

    async fn connect(&self, options: &ConnectOptions) -> ClusterResult<LocalConnection> {
        self.calls
            .write()
            .await
            .push(Call::Connect(options.endpoint()));
        if self.unreachable.load(Ordering::SeqCst) {
            return Err(ClusterError::Connect(format!(
                "failed to connect to {}",
                options.endpoint()
            )));
        }
        Ok(LocalConnection {
            cluster: self.clone(),
        })
    }
}

/// An open connection to a [LocalCluster]
pub struct LocalConnection {
    cluster: LocalCluster,
}

impl LocalConnection {
    async fn record(&self, call: Call) -> ClusterUnitResult {
        self.cluster.calls.write().await.push(call);
        if self.cluster.quorum_lost.load(Ordering::SeqCst) {
            return Err(ClusterError::Rejected("etcdserver: no leader".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl ClusterConnection for LocalConnection {
    async fn add_member(
        &mut self,
        name: &str,
        peer_urls: &[String],
    ) -> ClusterResult<ClusterMember> {
        self.record(Call::AddMember(peer_urls.to_vec())).await?;
        let id = self.cluster.fresh_id().await;
        let member = ClusterMember::new(id, name).with_peer_urls(peer_urls.iter().cloned());
        debug!("local cluster added member {id}");
        self.cluster.members.write().await.push(member.clone());
        Ok(member)
    }

    async fn remove_member(&mut self, id: MemberId) -> ClusterUnitResult {
        self.record(Call::RemoveMember(id)).await?;
        let mut guard = self.cluster.members.write().await;
        let before = guard.len();
        guard.retain(|m| m.id != id);
        if guard.len() == before {
            return Err(ClusterError::Rejected(
                "etcdserver: member not found".to_string(),
            ));
        }
        Ok(())
    }

    async fn list_members(&mut self) -> ClusterResult<Vec<ClusterMember>> {
        self.record(Call::ListMembers).await?;
        if self.cluster.listing_fails.load(Ordering::SeqCst) {
            return Err(ClusterError::Rejected(
                "etcdserver: request timed out".to_string(),
            ));
        }
        Ok(self.cluster.members.read().await.clone())
    }
}
