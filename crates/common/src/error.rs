//! Error types for wg-admin

use thiserror::Error;

/// Result type alias using the wg-admin Error
pub type Result<T> = std::result::Result<T, Error>;

/// wg-admin error types
///
/// Repository operations never recover from these internally. Every
/// condition reaches the caller as its own variant so the CLI can decide
/// how to present it.
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    Config(#[from] toml::de::Error),

    #[error("Crypto error: {0}")]
    Crypto(String),

    #[error("Malformed address: {0}")]
    MalformedAddress(String),

    #[error("Malformed network: {0}")]
    MalformedNetwork(String),

    #[error("Network {0} already exists")]
    NetworkAlreadyExists(String),

    #[error("Unknown network {0}")]
    UnknownNetwork(String),

    #[error("Network {network} already has a peer named {name}")]
    DuplicatePeerName { network: String, name: String },

    #[error("Network {network} already has a peer with address {ip}")]
    DuplicatePeerAddress { network: String, ip: String },

    #[error("No peer named {name} in network {network}")]
    PeerNotFound { network: String, name: String },

    #[error("No free address left in network {0}")]
    AddressSpaceExhausted(String),

    #[error("Address {ip} is not a host address of network {network}")]
    AddressOutsideNetwork { network: String, ip: String },

    #[error("Address {ip} does not match the address family of network {network}")]
    AddressFamilyMismatch { network: String, ip: String },
}

impl From<tempfile::PersistError> for Error {
    fn from(e: tempfile::PersistError) -> Self {
        Error::Io(e.error)
    }
}
