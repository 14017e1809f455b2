//! wg-admin Common Library
//!
//! Networks, peers, address allocation and the persistent repository
//! behind the `wg-admin` command line tool.

pub mod allocator;
pub mod config;
pub mod crypto;
pub mod error;
pub mod repository;
pub mod types;

// Re-export commonly used types
pub use config::AdminConfig;
pub use crypto::KeyPair;
pub use error::{Error, Result};
pub use repository::Repository;
pub use types::*;

/// Environment variable naming the default network
pub const NETWORK_ENV: &str = "WG_ADMIN_NETWORK";

/// Default store path
pub fn default_store_path() -> std::path::PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| std::path::PathBuf::from("."))
        .join(".wg-admin.json")
}

/// Default config file path
pub fn default_config_path() -> std::path::PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| std::path::PathBuf::from("."))
        .join(".config")
        .join("wg-admin.toml")
}

/// Home directory helper
mod dirs {
    pub fn home_dir() -> Option<std::path::PathBuf> {
        std::env::var_os("HOME").map(std::path::PathBuf::from)
    }
}
