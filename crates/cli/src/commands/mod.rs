//! CLI Commands

pub mod client;
pub mod config;
pub mod network;
pub mod peer;
pub mod server;

use std::net::IpAddr;

use anyhow::{bail, Result};
use clap::Args;
use tracing::debug;
use wg_admin_common::{parse_address, AdminConfig, Repository, NETWORK_ENV};

use crate::output::OutputFormat;

/// Network selection shared by every per-network command
#[derive(Args, Debug, Clone, Default)]
pub struct NetworkArg {
    /// Network (CIDR) to operate on
    #[arg(short, long, env = "WG_ADMIN_NETWORK")]
    pub network: Option<String>,
}

/// Everything a command needs to run
pub struct Context {
    pub repo: Repository,
    pub config: AdminConfig,
    pub format: OutputFormat,
    pub verbose: bool,
}

impl Context {
    pub fn new(repo: Repository, config: AdminConfig, format: OutputFormat, verbose: bool) -> Self {
        Self {
            repo,
            config,
            format,
            verbose,
        }
    }

    /// Network from the command line, environment, or config file
    pub fn network(&self, arg: &NetworkArg) -> Result<String> {
        match arg.network.as_ref().or(self.config.default_network.as_ref()) {
            Some(network) => Ok(network.clone()),
            None => bail!(
                "No network given; pass --network or set {}",
                NETWORK_ENV
            ),
        }
    }

    /// Explicit address if one was given, otherwise the next free one
    pub fn address(&self, cidr: &str, ip: Option<&str>) -> Result<IpAddr> {
        let ip = match ip {
            Some(ip) => parse_address(ip)?,
            None => {
                let ip = self.repo.next_address(cidr)?;
                debug!("Assigning next free address {} in {}", ip, cidr);
                ip
            }
        };
        Ok(ip)
    }
}
