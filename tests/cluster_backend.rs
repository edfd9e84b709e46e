use etcd_member::prelude::*;

async fn membership_sanity_check<C: Connector>(connector: C, options: ConnectOptions) {
    env_logger::try_init().ok();
    let mut conn = connector.connect(&options).await.unwrap();
    let before = conn.list_members().await.unwrap();

    let urls = vec!["http://sanity-check.invalid:2380".to_string()];
    let added = conn.add_member("sanity-check", &urls).await.unwrap();
    assert_eq!(added.peer_urls, urls);

    let members = conn.list_members().await.unwrap();
    assert_eq!(members.len(), before.len() + 1);
    assert!(members.iter().any(|m| m.id == added.id));

    conn.remove_member(added.id).await.unwrap();
    let members = conn.list_members().await.unwrap();
    assert_eq!(members.len(), before.len());

    let err = conn.remove_member(added.id).await.unwrap_err();
    assert!(matches!(err, ClusterError::Rejected(_)));
}

mod local {
    use etcd_member::cluster::local::LocalCluster;
    use etcd_member::prelude::*;

    #[tokio::test]
    async fn membership_sanity_check() {
        let cluster = LocalCluster::new(vec![ClusterMember::new(1u64, "a")]);
        super::membership_sanity_check(cluster, ConnectOptions::new("localhost")).await;
    }
}

#[cfg(feature = "etcd")]
mod etcd {
    use etcd_member::prelude::*;

    #[tokio::test]
    async fn unreadable_tls_material_is_a_connection_error() {
        let dir = tempfile::tempdir().unwrap();
        let options = ConnectOptionsBuilder::default()
            .host("localhost")
            .tls(TlsFiles {
                ca_cert: Some(dir.path().join("missing-ca.crt")),
                ..Default::default()
            })
            .build()
            .unwrap();

        let result = EtcdConnector::new().connect(&options).await;
        assert!(matches!(result, Err(ClusterError::Connect(_))));
    }

    #[tokio::test]
    async fn unreachable_endpoint_is_a_connection_error() {
        // nothing listens on port 1
        let options = ConnectOptionsBuilder::default()
            .host("127.0.0.1")
            .port(1u16)
            .build()
            .unwrap();
        let reconciler = MembershipReconciler::new(EtcdConnector::new(), options);

        let err = reconciler
            .apply(MembershipRequest::add_peer("b", ["http://b:2380"]))
            .await
            .unwrap_err();
        assert!(matches!(err, ReconcileError::Connection(_)), "{err:?}");

        let err = reconciler.members().await.unwrap_err();
        assert!(matches!(err, ReconcileError::Connection(_)), "{err:?}");
    }

    // A plain add against a small live cluster trips etcd's strict
    // reconfiguration check, so only the read and reject paths run here
    #[cfg(feature = "etcd-integration")]
    #[tokio::test]
    async fn removing_unknown_member_is_rejected() {
        let mut conn = EtcdConnector::new()
            .connect(&ConnectOptions::new("localhost"))
            .await
            .unwrap();
        let members = conn.list_members().await.unwrap();
        let unknown = (1..)
            .map(MemberId::new)
            .find(|id| members.iter().all(|m| m.id != *id))
            .unwrap();

        let err = conn.remove_member(unknown).await.unwrap_err();
        assert!(matches!(err, ClusterError::Rejected(_)));
    }

    #[cfg(feature = "etcd-integration")]
    #[tokio::test]
    async fn reconciler_lists_live_members() {
        let reconciler =
            MembershipReconciler::new(EtcdConnector::new(), ConnectOptions::new("localhost"));
        let members = reconciler.members().await.unwrap();
        assert!(!members.is_empty());
        assert!(members.iter().all(|m| !m.peer_urls.is_empty()));
    }
}
