//! Server Commands

use anyhow::Result;
use clap::Subcommand;
use serde::Serialize;
use wg_admin_common::{Network, Server};

use super::{Context, NetworkArg};
use crate::output::{print_item, print_list, print_success, TableDisplay};

#[derive(Subcommand)]
pub enum ServerCommands {
    /// Add a new server with the given public DNS name
    Add {
        /// Public DNS name clients connect to
        name: String,

        #[command(flatten)]
        network: NetworkArg,

        /// The (private) IP address of the new server within the VPN
        #[arg(short, long)]
        ip: Option<String>,

        /// Port to listen on
        #[arg(short, long)]
        port: Option<u16>,

        /// The range of IP addresses this server routes (defaults to its network)
        #[arg(short, long)]
        allowed_ips: Option<String>,

        /// The network device used for forwarding traffic
        #[arg(short, long)]
        device: Option<String>,
    },

    /// List all servers of a network
    List {
        #[command(flatten)]
        network: NetworkArg,
    },
}

/// Server display wrapper for serialization
#[derive(Serialize)]
pub struct ServerDisplay {
    pub name: String,
    pub ip: String,
    pub port: u16,
    pub allowed_ips: String,
    pub device: Option<String>,
    pub public_key: String,
}

impl From<&Server> for ServerDisplay {
    fn from(server: &Server) -> Self {
        Self {
            name: server.name.clone(),
            ip: server.ip.to_string(),
            port: server.port,
            allowed_ips: server.allowed_ips.to_string(),
            device: server.device.clone(),
            public_key: server.keys.public_key.clone(),
        }
    }
}

impl TableDisplay for ServerDisplay {
    fn headers() -> Vec<&'static str> {
        vec!["Name", "IP", "Port", "Allowed IPs", "Device", "Public Key"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.name.clone(),
            self.ip.clone(),
            self.port.to_string(),
            self.allowed_ips.clone(),
            self.device.clone().unwrap_or_else(|| "-".to_string()),
            self.public_key.clone(),
        ]
    }
}

pub fn execute(cmd: ServerCommands, ctx: &mut Context) -> Result<()> {
    match cmd {
        ServerCommands::Add {
            name,
            network,
            ip,
            port,
            allowed_ips,
            device,
        } => {
            let cidr = ctx.network(&network)?;
            let network = ctx.repo.find_network(&cidr)?;
            let ip = ctx.address(&cidr, ip.as_deref())?;
            let allowed_ips = match allowed_ips {
                Some(range) => Network::parse(&range)?,
                None => network,
            };

            let mut server = Server::new(name, ip, allowed_ips)
                .with_port(port.unwrap_or(ctx.config.default_port));
            if let Some(device) = device.or_else(|| ctx.config.default_device.clone()) {
                server = server.with_device(device);
            }

            ctx.repo.add_peer(&cidr, server.clone())?;
            print_success(&format!(
                "Server {} ({}) was successfully added to {}",
                server.name, server.ip, network
            ));
            if ctx.verbose {
                print_item(&ServerDisplay::from(&server), ctx.format)?;
            }
        }

        ServerCommands::List { network } => {
            let cidr = ctx.network(&network)?;
            let displays: Vec<ServerDisplay> = ctx
                .repo
                .servers(&cidr)?
                .into_iter()
                .map(ServerDisplay::from)
                .collect();
            print_list(&displays, ctx.format, &format!("No servers in network {}.", cidr))?;
        }
    }

    Ok(())
}
