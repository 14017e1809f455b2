//! Persistent store of networks and their peers
//!
//! The whole state lives in one JSON file. Every mutation re-reads the file,
//! applies the change to that copy, checks it, and writes the full state back
//! through a temp file + rename before the in-memory copy is replaced. A
//! failed check or write leaves both the file and this process untouched.
//!
//! There is no locking across processes: two invocations racing on the same
//! file can both compute the same `next_address` before either commits.

use crate::allocator;
use crate::types::{Client, Network, Peer, Server};
use crate::{Error, Result};
use serde::de::Error as _;
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::net::IpAddr;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, info};

/// On-disk format version
const STORE_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct StoreState {
    version: u32,
    #[serde(default)]
    networks: Vec<NetworkEntry>,
}

impl Default for StoreState {
    fn default() -> Self {
        Self {
            version: STORE_VERSION,
            networks: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct NetworkEntry {
    network: Network,
    #[serde(default)]
    peers: Vec<Peer>,
}

impl NetworkEntry {
    /// Check that `peer` may join this network as it stands
    fn admit(&self, peer: &Peer) -> Result<()> {
        let network = self.network.to_string();
        let ip = peer.ip();

        if self.peers.iter().any(|p| p.name() == peer.name()) {
            return Err(Error::DuplicatePeerName {
                network,
                name: peer.name().to_string(),
            });
        }
        if self.peers.iter().any(|p| p.ip() == ip) {
            return Err(Error::DuplicatePeerAddress {
                network,
                ip: ip.to_string(),
            });
        }
        if !self.network.same_family(&ip) {
            return Err(Error::AddressFamilyMismatch {
                network,
                ip: ip.to_string(),
            });
        }

        // Servers may bridge external ranges, clients may not
        match peer {
            Peer::Client(_) if !allocator::contains_host(&self.network, ip) => {
                Err(Error::AddressOutsideNetwork {
                    network,
                    ip: ip.to_string(),
                })
            }
            Peer::Client(_) | Peer::Server(_) => Ok(()),
        }
    }
}

impl StoreState {
    fn entry(&self, network: &Network) -> Option<&NetworkEntry> {
        self.networks.iter().find(|e| e.network == *network)
    }

    fn entry_mut(&mut self, network: &Network) -> Option<&mut NetworkEntry> {
        self.networks.iter_mut().find(|e| e.network == *network)
    }

    /// Re-check every invariant on freshly decoded state
    fn validate(&self) -> Result<()> {
        let mut seen: Vec<NetworkEntry> = Vec::with_capacity(self.networks.len());
        for entry in &self.networks {
            if seen.iter().any(|e| e.network == entry.network) {
                return Err(Error::NetworkAlreadyExists(entry.network.to_string()));
            }
            let mut checked = NetworkEntry {
                network: entry.network,
                peers: Vec::with_capacity(entry.peers.len()),
            };
            for peer in &entry.peers {
                checked.admit(peer)?;
                checked.peers.push(peer.clone());
            }
            seen.push(checked);
        }
        Ok(())
    }
}

/// The store of all networks and peers
#[derive(Debug)]
pub struct Repository {
    path: PathBuf,
    state: StoreState,
}

impl Repository {
    /// Open the store at `path`. A missing file is an empty store; it is
    /// only created by the first mutation.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let state = Self::load(&path)?;
        debug!(
            "Opened store at {:?} ({} networks)",
            path,
            state.networks.len()
        );
        Ok(Self { path, state })
    }

    /// Location of the backing store
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All networks, in insertion order
    pub fn networks(&self) -> Vec<Network> {
        self.state.networks.iter().map(|e| e.network).collect()
    }

    /// Add an empty network
    pub fn add_network(&mut self, cidr: &str) -> Result<Network> {
        let network = Network::parse(cidr)?;

        self.commit(|state| {
            if state.entry(&network).is_some() {
                return Err(Error::NetworkAlreadyExists(network.to_string()));
            }
            state.networks.push(NetworkEntry {
                network,
                peers: Vec::new(),
            });
            Ok(())
        })?;

        info!("Added network {}", network);
        Ok(network)
    }

    /// Look up a known network
    pub fn find_network(&self, cidr: &str) -> Result<Network> {
        self.entry(cidr).map(|e| e.network)
    }

    /// Add a peer to a network
    pub fn add_peer(&mut self, cidr: &str, peer: impl Into<Peer>) -> Result<Peer> {
        let peer = peer.into();
        let network = self.find_network(cidr)?;

        self.commit(|state| {
            let entry = state
                .entry_mut(&network)
                .ok_or_else(|| Error::UnknownNetwork(network.to_string()))?;
            entry.admit(&peer)?;
            entry.peers.push(peer.clone());
            Ok(())
        })?;

        info!("Added {} to network {}", peer, network);
        Ok(peer)
    }

    /// Lowest host address of the network not held by any of its peers.
    ///
    /// Nothing is reserved; the address is taken once `add_peer` commits it.
    pub fn next_address(&self, cidr: &str) -> Result<IpAddr> {
        let entry = self.entry(cidr)?;
        let assigned: Vec<IpAddr> = entry.peers.iter().map(Peer::ip).collect();
        allocator::next_free(&entry.network, &assigned)
    }

    /// Look up a peer by name
    pub fn find_peer(&self, cidr: &str, name: &str) -> Result<&Peer> {
        let entry = self.entry(cidr)?;
        entry
            .peers
            .iter()
            .find(|p| p.name() == name)
            .ok_or_else(|| Error::PeerNotFound {
                network: entry.network.to_string(),
                name: name.to_string(),
            })
    }

    /// All peers of a network, in insertion order
    pub fn peers(&self, cidr: &str) -> Result<&[Peer]> {
        Ok(&self.entry(cidr)?.peers)
    }

    /// Servers of a network, in insertion order
    pub fn servers(&self, cidr: &str) -> Result<Vec<&Server>> {
        Ok(self.peers(cidr)?.iter().filter_map(Peer::as_server).collect())
    }

    /// Clients of a network, in insertion order
    pub fn clients(&self, cidr: &str) -> Result<Vec<&Client>> {
        Ok(self.peers(cidr)?.iter().filter_map(Peer::as_client).collect())
    }

    fn entry(&self, cidr: &str) -> Result<&NetworkEntry> {
        let network = Network::parse(cidr)?;
        self.state
            .entry(&network)
            .ok_or_else(|| Error::UnknownNetwork(network.to_string()))
    }

    /// Apply `mutate` to the state on disk and write it back
    fn commit<T, F>(&mut self, mutate: F) -> Result<T>
    where
        F: FnOnce(&mut StoreState) -> Result<T>,
    {
        let mut state = Self::load(&self.path)?;
        let result = mutate(&mut state)?;
        Self::save(&self.path, &state)?;
        self.state = state;
        Ok(result)
    }

    fn load(path: &Path) -> Result<StoreState> {
        if !path.exists() {
            debug!("No store at {:?}, starting empty", path);
            return Ok(StoreState::default());
        }

        let content = std::fs::read_to_string(path)?;
        if content.trim().is_empty() {
            return Ok(StoreState::default());
        }

        let state: StoreState = serde_json::from_str(&content)?;
        if state.version != STORE_VERSION {
            return Err(Error::Serialization(serde_json::Error::custom(format!(
                "unsupported store version {} (expected {})",
                state.version, STORE_VERSION
            ))));
        }
        state.validate()?;
        Ok(state)
    }

    fn save(path: &Path, state: &StoreState) -> Result<()> {
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        std::fs::create_dir_all(&dir)?;
        let created = !path.exists();

        // Write atomically via temp file in the same directory
        let mut tmp = NamedTempFile::new_in(&dir)?;
        serde_json::to_writer_pretty(&mut tmp, state)?;
        tmp.write_all(b"\n")?;
        tmp.as_file().sync_all()?;
        tmp.persist(path)?;

        if created {
            info!("Created store at {:?}", path);
        } else {
            debug!("Wrote store {:?}", path);
        }
        Ok(())
    }
}
