//! Peer Commands

use anyhow::Result;
use clap::Subcommand;
use serde::Serialize;
use wg_admin_common::Peer;

use super::{Context, NetworkArg};
use crate::output::{print_list, TableDisplay};

#[derive(Subcommand)]
pub enum PeerCommands {
    /// List all peers (servers and clients) of a network
    List {
        #[command(flatten)]
        network: NetworkArg,
    },
}

/// Peer display wrapper for serialization
#[derive(Serialize)]
pub struct PeerDisplay {
    pub kind: String,
    pub name: String,
    pub ip: String,
    pub public_key: String,
}

impl From<&Peer> for PeerDisplay {
    fn from(peer: &Peer) -> Self {
        Self {
            kind: peer.kind().to_string(),
            name: peer.name().to_string(),
            ip: peer.ip().to_string(),
            public_key: peer.public_key().to_string(),
        }
    }
}

impl TableDisplay for PeerDisplay {
    fn headers() -> Vec<&'static str> {
        vec!["Kind", "Name", "IP", "Public Key"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.kind.clone(),
            self.name.clone(),
            self.ip.clone(),
            self.public_key.clone(),
        ]
    }
}

pub fn execute(cmd: PeerCommands, ctx: &mut Context) -> Result<()> {
    match cmd {
        PeerCommands::List { network } => {
            let cidr = ctx.network(&network)?;
            let displays: Vec<PeerDisplay> =
                ctx.repo.peers(&cidr)?.iter().map(PeerDisplay::from).collect();
            print_list(&displays, ctx.format, &format!("No peers in network {}.", cidr))?;
        }
    }

    Ok(())
}
