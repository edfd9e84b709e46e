//! [Connector] implementation for etcd v3 clusters
//!
//! This uses [etcd_client] under the hood

use async_trait::async_trait;
use etcd_client::{Certificate, Client, ConnectOptions as ClientOptions, Identity, TlsOptions};
use log::{debug, info};

use super::{
    ClusterConnection, ClusterMember, ClusterResult, ClusterUnitResult, Connector, MemberId,
};
use crate::config::{ConnectOptions, TlsFiles};
use crate::errors::ClusterError;

fn member_from(member: &etcd_client::Member) -> ClusterMember {
    ClusterMember {
        id: MemberId::new(member.id()),
        name: member.name().to_string(),
        peer_urls: member.peer_urls().to_vec(),
        client_urls: member.client_urls().to_vec(),
    }
}

async fn read_material(path: &std::path::Path) -> ClusterResult<Vec<u8>> {
    tokio::fs::read(path)
        .await
        .map_err(|err| ClusterError::Connect(format!("{}: {}", path.display(), err)))
}

async fn tls_options(files: &TlsFiles) -> ClusterResult<TlsOptions> {
    let mut tls = TlsOptions::new();
    if let Some(ca_cert) = &files.ca_cert {
        let pem = read_material(ca_cert).await?;
        tls = tls.ca_certificate(Certificate::from_pem(pem));
    }
    if let (Some(cert), Some(key)) = (&files.client_cert, &files.client_key) {
        let cert = read_material(cert).await?;
        let key = read_material(key).await?;
        tls = tls.identity(Identity::from_pem(cert, key));
    }
    Ok(tls)
}

/// Connects to an etcd cluster through its client endpoint
#[derive(Clone, Debug, Default)]
pub struct EtcdConnector {}

impl EtcdConnector {
    pub fn new() -> EtcdConnector {
        EtcdConnector {}
    }
}

#[async_trait]
impl Connector for EtcdConnector {
    type Connection = EtcdConnection;

    async fn connect(&self, options: &ConnectOptions) -> ClusterResult<EtcdConnection> {
        let endpoint = options.endpoint();
        let client_options = match options.tls() {
            Some(files) => Some(ClientOptions::new().with_tls(tls_options(files).await?)),
            None => None,
        };
        debug!("connecting to etcd at {endpoint}");
        let mut client = Client::connect([endpoint.as_str()], client_options)
            .await
            .map_err(|err| ClusterError::Connect(err.to_string()))?;
        // The channel is lazy; without a round trip here an unreachable
        // endpoint would only fail on the first membership RPC
        client
            .status()
            .await
            .map_err(|err| ClusterError::Connect(err.to_string()))?;
        info!("connected to etcd at {endpoint}");
        Ok(EtcdConnection { client })
    }
}

/// An open etcd client. Dropping it closes the channel.
pub struct EtcdConnection {
    client: Client,
}

#[async_trait]
impl ClusterConnection for EtcdConnection {
    /// etcd has no name field at add time, the member reports its name once
    /// it starts
    async fn add_member(
        &mut self,
        _name: &str,
        peer_urls: &[String],
    ) -> ClusterResult<ClusterMember> {
        let response = self.client.member_add(peer_urls.to_vec(), None).await?;
        response
            .member()
            .map(member_from)
            .ok_or_else(|| ClusterError::Rejected("add member returned no member".to_string()))
    }

    async fn remove_member(&mut self, id: MemberId) -> ClusterUnitResult {
        self.client.member_remove(id.get()).await?;
        Ok(())
    }

    async fn list_members(&mut self) -> ClusterResult<Vec<ClusterMember>> {
        let response = self.client.member_list().await?;
        Ok(response.members().iter().map(member_from).collect())
    }
}
