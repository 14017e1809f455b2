//! Client Commands

use anyhow::Result;
use clap::Subcommand;
use serde::Serialize;
use wg_admin_common::Client;

use super::{Context, NetworkArg};
use crate::output::{print_item, print_list, print_success, TableDisplay};

#[derive(Subcommand)]
pub enum ClientCommands {
    /// Add a new client with the given name
    Add {
        /// Client name
        name: String,

        #[command(flatten)]
        network: NetworkArg,

        /// The IP address of the new client
        #[arg(short, long)]
        ip: Option<String>,
    },

    /// List all clients of a network
    List {
        #[command(flatten)]
        network: NetworkArg,
    },
}

/// Client display wrapper for serialization
#[derive(Serialize)]
pub struct ClientDisplay {
    pub name: String,
    pub ip: String,
    pub public_key: String,
}

impl From<&Client> for ClientDisplay {
    fn from(client: &Client) -> Self {
        Self {
            name: client.name.clone(),
            ip: client.ip.to_string(),
            public_key: client.keys.public_key.clone(),
        }
    }
}

impl TableDisplay for ClientDisplay {
    fn headers() -> Vec<&'static str> {
        vec!["Name", "IP", "Public Key"]
    }

    fn row(&self) -> Vec<String> {
        vec![self.name.clone(), self.ip.clone(), self.public_key.clone()]
    }
}

pub fn execute(cmd: ClientCommands, ctx: &mut Context) -> Result<()> {
    match cmd {
        ClientCommands::Add { name, network, ip } => {
            let cidr = ctx.network(&network)?;
            let ip = ctx.address(&cidr, ip.as_deref())?;

            let client = Client::new(name, ip);
            ctx.repo.add_peer(&cidr, client.clone())?;
            print_success(&format!(
                "Client {} ({}) was successfully added to {}",
                client.name, client.ip, cidr
            ));
            if ctx.verbose {
                print_item(&ClientDisplay::from(&client), ctx.format)?;
            }
        }

        ClientCommands::List { network } => {
            let cidr = ctx.network(&network)?;
            let displays: Vec<ClientDisplay> = ctx
                .repo
                .clients(&cidr)?
                .into_iter()
                .map(ClientDisplay::from)
                .collect();
            print_list(&displays, ctx.format, &format!("No clients in network {}.", cidr))?;
        }
    }

    Ok(())
}
