//! etcd cluster membership reconciliation for operator automation
//!
//! The crate applies one membership change at a time (add a peer, remove a
//! member) to an etcd cluster and hands back the membership the cluster
//! reports right after.
//!
//! # Reconciling
//!
//! ```rust
//! use etcd_member::prelude::*;
//! use etcd_member::cluster::local::LocalCluster;
//!
//! #[tokio::main]
//! async fn main() {
//!     // Any `Connector` works here, e.g. `EtcdConnector` for a real cluster
//!     let cluster = LocalCluster::new(vec![
//!         ClusterMember::new(1u64, "a")
//!             .with_peer_urls(["http://a:2380"])
//!             .with_client_urls(["http://a:2379"]),
//!     ]);
//!     let reconciler = MembershipReconciler::new(cluster, ConnectOptions::new("localhost"));
//!
//!     let members = reconciler
//!         .apply(MembershipRequest::add_peer("b", ["http://b:2380"]))
//!         .await
//!         .unwrap();
//!     assert_eq!(members.len(), 2);
//!
//!     let err = reconciler
//!         .apply(MembershipRequest::remove_member("not-an-id"))
//!         .await
//!         .unwrap_err();
//!     assert_eq!(err, ReconcileError::Validation(Field::Id));
//! }
//! ```
//!
//! # Automation engines
//!
//! The [module] adapter takes the flat parameter mapping automation tasks
//! use and returns a JSON friendly [module::ModuleResult]. The
//! `etcd-member` binary wraps it together with a small CLI.

#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::missing_crate_level_docs)]

pub mod cluster;
pub mod config;
pub mod errors;
pub mod module;
pub mod reconciler;

pub mod prelude {
    #[cfg(feature = "etcd")]
    pub use super::cluster::etcd::EtcdConnector;
    pub use super::cluster::{ClusterConnection, ClusterMember, Connector, MemberId};
    pub use super::config::{ConnectOptions, ConnectOptionsBuilder, TlsFiles};
    pub use super::errors::{ClusterError, Field, ModuleError, ReconcileError};
    pub use super::module::{MemberParams, ModuleResult};
    pub use super::reconciler::{MembershipReconciler, MembershipRequest};
}
