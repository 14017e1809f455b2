//! Network Commands

use anyhow::Result;
use clap::Subcommand;
use serde::Serialize;

use super::Context;
use crate::output::{print_item, print_list, print_success, TableDisplay};

#[derive(Subcommand)]
pub enum NetworkCommands {
    /// List all known networks
    List,

    /// Add a new network
    Add {
        /// CIDR notation (e.g., 10.1.2.0/24)
        cidr: String,
    },
}

/// Network display wrapper for serialization
#[derive(Serialize)]
pub struct NetworkDisplay {
    pub network: String,
    pub peers: usize,
}

impl TableDisplay for NetworkDisplay {
    fn headers() -> Vec<&'static str> {
        vec!["Network", "Peers"]
    }

    fn row(&self) -> Vec<String> {
        vec![self.network.clone(), self.peers.to_string()]
    }
}

pub fn execute(cmd: NetworkCommands, ctx: &mut Context) -> Result<()> {
    match cmd {
        NetworkCommands::List => {
            let mut displays = Vec::new();
            for network in ctx.repo.networks() {
                let cidr = network.to_string();
                let peers = ctx.repo.peers(&cidr)?.len();
                displays.push(NetworkDisplay {
                    network: cidr,
                    peers,
                });
            }
            print_list(&displays, ctx.format, "No networks defined.")?;
        }

        NetworkCommands::Add { cidr } => {
            let network = ctx.repo.add_network(&cidr)?;
            print_success(&format!("Network {} was successfully added", network));
            if ctx.verbose {
                let display = NetworkDisplay {
                    network: network.to_string(),
                    peers: 0,
                };
                print_item(&display, ctx.format)?;
            }
        }
    }

    Ok(())
}
