//! Config Command

use anyhow::Result;
use clap::Args;
use wg_admin_common::Peer;

use super::{Context, NetworkArg};
use crate::render::{render_client, render_server};

#[derive(Args)]
pub struct ConfigArgs {
    /// Name of the peer
    pub name: String,

    #[command(flatten)]
    pub network: NetworkArg,
}

/// Rendered WireGuard configuration for a peer
pub fn render(args: &ConfigArgs, ctx: &Context) -> Result<String> {
    let cidr = ctx.network(&args.network)?;
    let network = ctx.repo.find_network(&cidr)?;
    let peer = ctx.repo.find_peer(&cidr, &args.name)?;

    let config = match peer {
        Peer::Server(server) => render_server(server, &network, &ctx.repo.clients(&cidr)?),
        Peer::Client(client) => render_client(
            client,
            &network,
            &ctx.repo.servers(&cidr)?,
            ctx.config.keepalive,
        ),
    };
    Ok(config)
}

pub fn execute(args: ConfigArgs, ctx: &mut Context) -> Result<()> {
    print!("{}", render(&args, ctx)?);
    Ok(())
}
