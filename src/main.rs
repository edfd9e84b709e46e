//! `etcd-member` command line
//!
//! `add`, `remove` and `list` talk to the cluster directly. `run` reads a
//! JSON parameter file in the flat automation shape (see
//! [etcd_member::module]) and prints the result envelope.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use log::error;
use serde::Serialize;

use etcd_member::config::DEFAULT_CLIENT_PORT;
use etcd_member::module::{self, MemberParams};
use etcd_member::prelude::*;

#[derive(Parser, Debug)]
#[command(name = "etcd-member", version, about = "Reconcile etcd cluster membership")]
struct Cli {
    /// Host the cluster serves clients on
    #[arg(long, env = "ETCD_HOST", default_value = "localhost", global = true)]
    host: String,

    #[arg(long, env = "ETCD_PORT", default_value_t = DEFAULT_CLIENT_PORT, global = true)]
    port: u16,

    #[arg(long, env = "ETCD_CA_CERT", global = true)]
    ca_cert: Option<PathBuf>,

    #[arg(long, env = "ETCD_CERT_CERT", global = true)]
    cert_cert: Option<PathBuf>,

    #[arg(long, env = "ETCD_CERT_KEY", global = true)]
    cert_key: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Add a peer to the cluster
    Add {
        #[arg(long, default_value = "")]
        name: String,

        /// May be repeated
        #[arg(long = "peer-url")]
        peer_urls: Vec<String>,
    },
    /// Remove a member by id (decimal or 0x prefixed hex)
    Remove {
        #[arg(long, default_value = "")]
        id: String,
    },
    /// List the current members
    List,
    /// Apply a JSON parameter file and print the result envelope
    Run {
        args_file: PathBuf,

        /// Report without touching the cluster
        #[arg(long)]
        check: bool,
    },
}

impl Cli {
    fn connect_options(&self) -> Result<ConnectOptions, ModuleError> {
        let mut builder = ConnectOptionsBuilder::default();
        builder.host(self.host.clone()).port(self.port);
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

fn print_json<T: Serialize>(value: &T) -> Result<(), serde_json::Error> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

async fn execute(cli: Cli) -> Result<bool, Box<dyn std::error::Error>> {
    let options = cli.connect_options()?;
    let reconciler = MembershipReconciler::new(EtcdConnector::new(), options);

    let members = match cli.command {
        Command::Add { name, peer_urls } => {
            reconciler
                .apply(MembershipRequest::AddPeer { name, peer_urls })
                .await?
        }
        Command::Remove { id } => {
            reconciler
                .apply(MembershipRequest::RemoveMember { id })
                .await?
        }
        Command::List => reconciler.members().await?,
        Command::Run { args_file, check } => {
            let raw = tokio::fs::read_to_string(&args_file).await?;
            let params: MemberParams = serde_json::from_str(&raw)?;
            let result = module::run(EtcdConnector::new(), &params, check).await;
            print_json(&result)?;
            return Ok(!result.failed);
        }
    };
    print_json(&members)?;
    Ok(true)
}

#[tokio::main]
async fn main() {
    env_logger::init();
    let cli = Cli::parse();

    match execute(cli).await {
        Ok(true) => {}
        Ok(false) => process::exit(1),
        Err(err) => {
            error!("{err}");
            eprintln!("Error: {err}");
            process::exit(1);
        }
    }
}
