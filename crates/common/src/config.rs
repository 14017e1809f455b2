//! wg-admin configuration

use crate::types::{DEFAULT_KEEPALIVE, DEFAULT_LISTEN_PORT};
use crate::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Settings read from the optional config file.
///
/// Command line flags and environment variables take precedence over
/// anything set here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdminConfig {
    /// Store file path
    pub store_path: PathBuf,

    /// Network used when none is given on the command line
    pub default_network: Option<String>,

    /// Listen port for new servers
    pub default_port: u16,

    /// Forwarding device for new servers
    pub default_device: Option<String>,

    /// Persistent keepalive written into client configurations
    pub keepalive: u16,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            store_path: crate::default_store_path(),
            default_network: None,
            default_port: DEFAULT_LISTEN_PORT,
            default_device: None,
            keepalive: DEFAULT_KEEPALIVE,
        }
    }
}

impl AdminConfig {
    /// Load configuration from file, falling back to defaults if it does not exist
    pub fn load(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Self = toml::from_str(&content)?;
            debug!("Loaded configuration from {:?}", path);
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let tmp = TempDir::new().unwrap();
        let config = AdminConfig::load(&tmp.path().join("absent.toml")).unwrap();
        assert_eq!(config, AdminConfig::default());
        assert_eq!(config.default_port, 51820);
        assert_eq!(config.keepalive, 25);
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("wg-admin.toml");
        std::fs::write(
            &path,
            "store_path = \"/var/lib/wg-admin.json\"\ndefault_network = \"10.1.2.0/24\"\ndefault_port = 4500\n",
        )
        .unwrap();

        let config = AdminConfig::load(&path).unwrap();
        assert_eq!(config.store_path, PathBuf::from("/var/lib/wg-admin.json"));
        assert_eq!(config.default_network.as_deref(), Some("10.1.2.0/24"));
        assert_eq!(config.default_port, 4500);
        assert_eq!(config.default_device, None);
        assert_eq!(config.keepalive, DEFAULT_KEEPALIVE);
    }

    #[test]
    fn test_invalid_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("wg-admin.toml");
        std::fs::write(&path, "default_port = \"many\"\n").unwrap();
        assert!(matches!(AdminConfig::load(&path), Err(Error::Config(_))));
    }
}
