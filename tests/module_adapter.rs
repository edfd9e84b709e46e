use etcd_member::cluster::local::LocalCluster;
use etcd_member::module::{self, MemberParams};
use etcd_member::prelude::*;

fn cluster() -> LocalCluster {
    env_logger::try_init().ok();
    LocalCluster::new(vec![
        ClusterMember::new(0xc4cf8bd1a28e6c55u64, "etcd-0")
            .with_peer_urls(["http://etcd-0.etcd:2380"])
            .with_client_urls(["http://etcd-0.etcd:2379"]),
    ])
}

fn params(json: serde_json::Value) -> MemberParams {
    serde_json::from_value(json).unwrap()
}

#[tokio::test]
async fn present_adds_and_reports_members() {
    let cluster = cluster();
    let params = params(serde_json::json!({
        "state": "present",
        "cluster_host": "192.168.39.66",
        "cluster_port": "32379",
        "name": "etcd-1",
        "peer_urls": ["http://etcd-1.etcd:2380"],
    }));

    let result = module::run(cluster.clone(), &params, false).await;
    assert!(result.changed);
    assert!(!result.failed);
    assert_eq!(result.members.len(), 2);
    assert_eq!(result.members, cluster.members().await);
}

#[tokio::test]
async fn absent_accepts_hex_ids() {
    let cluster = cluster();
    let params = params(serde_json::json!({
        "state": "absent",
        "cluster_host": "etcd",
        "id": "0xc4cf8bd1a28e6c55",
    }));

    let result = module::run(cluster.clone(), &params, false).await;
    assert!(result.changed);
    assert!(result.members.is_empty());
}

#[tokio::test]
async fn failures_carry_a_message_and_no_members() {
    let cluster = cluster();
    let cases = [
        (
            serde_json::json!({
                "state": "present",
                "cluster_host": "etcd",
                "peer_urls": ["http://x:2380"],
            }),
            "name is empty",
        ),
        (
            serde_json::json!({"state": "present", "cluster_host": "etcd", "name": "x"}),
            "peer_urls is empty",
        ),
        (
            serde_json::json!({"state": "absent", "cluster_host": "etcd"}),
            "id is not set or malformed",
        ),
        (
            serde_json::json!({"state": "absent", "cluster_host": "etcd", "id": "7"}),
            "cluster rejected the operation: etcdserver: member not found",
        ),
    ];

    for (json, msg) in cases {
        let result = module::run(cluster.clone(), &params(json), false).await;
        assert!(result.failed);
        assert!(!result.changed);
        assert_eq!(result.msg.as_deref(), Some(msg));
        assert!(result.members.is_empty());
    }
    assert_eq!(cluster.members().await.len(), 1);
}

#[tokio::test]
async fn check_mode_leaves_cluster_alone() {
    let cluster = cluster();
    let params = params(serde_json::json!({
        "state": "absent",
        "cluster_host": "etcd",
        "id": "0xc4cf8bd1a28e6c55",
    }));

    let result = module::run(cluster.clone(), &params, true).await;
    assert_eq!(result, ModuleResult::default());
    assert!(!cluster.was_contacted().await);
    assert_eq!(cluster.members().await.len(), 1);
}

#[tokio::test]
async fn envelope_serializes_members_as_mappings() {
    let cluster = cluster();
    let params = params(serde_json::json!({
        "state": "present",
        "cluster_host": "etcd",
        "name": "etcd-1",
        "peer_urls": ["http://etcd-1.etcd:2380"],
    }));

    let result = module::run(cluster, &params, false).await;
    let value = serde_json::to_value(&result).unwrap();
    assert_eq!(value["changed"], serde_json::json!(true));
    assert!(value.get("msg").is_none());
    assert_eq!(
        value["members"][0],
        serde_json::json!({
            "id": 0xc4cf8bd1a28e6c55u64,
            "name": "etcd-0",
            "peer_urls": ["http://etcd-0.etcd:2380"],
            "client_urls": ["http://etcd-0.etcd:2379"],
        })
    );
}
