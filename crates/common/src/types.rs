//! Core types for wg-admin

use crate::crypto::KeyPair;
use crate::{Error, Result};
use ipnetwork::IpNetwork;
use serde::{Deserialize, Serialize};
use std::net::IpAddr;
use std::str::FromStr;

/// Default WireGuard listen port for servers
pub const DEFAULT_LISTEN_PORT: u16 = 51820;

/// Persistent keepalive (seconds) written into client configurations
pub const DEFAULT_KEEPALIVE: u16 = 25;

/// A CIDR block, always held in canonical form (host bits cleared).
///
/// The canonical string (e.g. `10.1.2.0/24`) is the network's identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Network(IpNetwork);

impl Network {
    /// Parse and canonicalize a CIDR. A bare address yields a single-host network.
    pub fn parse(s: &str) -> Result<Self> {
        let raw = IpNetwork::from_str(s.trim())
            .map_err(|e| Error::MalformedNetwork(format!("{}: {}", s, e)))?;
        Self::try_from(raw)
    }

    /// Base (network) address
    pub fn address(&self) -> IpAddr {
        self.0.network()
    }

    /// Prefix length
    pub fn prefix(&self) -> u8 {
        self.0.prefix()
    }

    pub fn is_ipv4(&self) -> bool {
        self.0.is_ipv4()
    }

    /// Whether `ip` is in the same address family as this network
    pub fn same_family(&self, ip: &IpAddr) -> bool {
        self.is_ipv4() == ip.is_ipv4()
    }
}

impl TryFrom<IpNetwork> for Network {
    type Error = Error;

    fn try_from(raw: IpNetwork) -> Result<Self> {
        IpNetwork::new(raw.network(), raw.prefix())
            .map(Network)
            .map_err(|e| Error::MalformedNetwork(format!("{}: {}", raw, e)))
    }
}

impl FromStr for Network {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Network {
    type Error = Error;

    fn try_from(s: String) -> Result<Self> {
        Self::parse(&s)
    }
}

impl From<Network> for String {
    fn from(net: Network) -> Self {
        net.to_string()
    }
}

impl std::fmt::Display for Network {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.0.network(), self.0.prefix())
    }
}

/// Parse a single IP address
pub fn parse_address(s: &str) -> Result<IpAddr> {
    IpAddr::from_str(s.trim()).map_err(|e| Error::MalformedAddress(format!("{}: {}", s, e)))
}

/// Peer kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PeerKind {
    Server,
    Client,
}

impl std::fmt::Display for PeerKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PeerKind::Server => write!(f, "server"),
            PeerKind::Client => write!(f, "client"),
        }
    }
}

/// A routing node. Its name is normally the public DNS name clients dial.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Server {
    pub name: String,
    pub ip: IpAddr,
    pub port: u16,
    /// Range this server routes for its clients
    pub allowed_ips: Network,
    /// Device used for forwarding (masquerade) traffic
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device: Option<String>,
    pub keys: KeyPair,
}

impl Server {
    /// Create a server routing `allowed_ips`, with freshly generated keys
    pub fn new(name: impl Into<String>, ip: IpAddr, allowed_ips: Network) -> Self {
        Self {
            name: name.into(),
            ip,
            port: DEFAULT_LISTEN_PORT,
            allowed_ips,
            device: None,
            keys: KeyPair::generate(),
        }
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn with_device(mut self, device: impl Into<String>) -> Self {
        self.device = Some(device.into());
        self
    }

    pub fn with_allowed_ips(mut self, allowed_ips: Network) -> Self {
        self.allowed_ips = allowed_ips;
        self
    }

    pub fn with_keys(mut self, keys: KeyPair) -> Self {
        self.keys = keys;
        self
    }
}

/// A leaf device
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Client {
    pub name: String,
    pub ip: IpAddr,
    pub keys: KeyPair,
}

impl Client {
    /// Create a client with freshly generated keys
    pub fn new(name: impl Into<String>, ip: IpAddr) -> Self {
        Self {
            name: name.into(),
            ip,
            keys: KeyPair::generate(),
        }
    }

    pub fn with_keys(mut self, keys: KeyPair) -> Self {
        self.keys = keys;
        self
    }
}

/// A WireGuard endpoint belonging to a network
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Peer {
    Server(Server),
    Client(Client),
}

impl Peer {
    pub fn kind(&self) -> PeerKind {
        match self {
            Peer::Server(_) => PeerKind::Server,
            Peer::Client(_) => PeerKind::Client,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Peer::Server(s) => &s.name,
            Peer::Client(c) => &c.name,
        }
    }

    pub fn ip(&self) -> IpAddr {
        match self {
            Peer::Server(s) => s.ip,
            Peer::Client(c) => c.ip,
        }
    }

    pub fn keys(&self) -> &KeyPair {
        match self {
            Peer::Server(s) => &s.keys,
            Peer::Client(c) => &c.keys,
        }
    }

    pub fn public_key(&self) -> &str {
        &self.keys().public_key
    }

    pub fn private_key(&self) -> &str {
        &self.keys().private_key
    }

    pub fn as_server(&self) -> Option<&Server> {
        match self {
            Peer::Server(s) => Some(s),
            Peer::Client(_) => None,
        }
    }

    pub fn as_client(&self) -> Option<&Client> {
        match self {
            Peer::Client(c) => Some(c),
            Peer::Server(_) => None,
        }
    }
}

impl From<Server> for Peer {
    fn from(server: Server) -> Self {
        Peer::Server(server)
    }
}

impl From<Client> for Peer {
    fn from(client: Client) -> Self {
        Peer::Client(client)
    }
}

impl std::fmt::Display for Peer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} ({})", self.kind(), self.name(), self.ip())
    }
}
