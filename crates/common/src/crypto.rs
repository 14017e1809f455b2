//! WireGuard key material
//!
//! Keys are Curve25519 (x25519) pairs, stored base64-encoded the same way
//! `wg genkey` / `wg pubkey` print them.

use crate::{Error, Result};
use base64::{engine::general_purpose::STANDARD, Engine};
use rand::rngs::OsRng;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use x25519_dalek::{PublicKey, StaticSecret};

/// WireGuard key pair, generated once per peer
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyPair {
    pub public_key: String,
    pub private_key: String,
}

impl KeyPair {
    /// Generate a new random key pair
    pub fn generate() -> Self {
        let mut private_key_bytes = [0u8; 32];
        OsRng.fill_bytes(&mut private_key_bytes);

        // WireGuard key clamping
        private_key_bytes[0] &= 248;
        private_key_bytes[31] &= 127;
        private_key_bytes[31] |= 64;

        Self::from_private_bytes(private_key_bytes)
    }

    /// Rebuild a key pair from an existing base64 private key
    pub fn from_private_key(private_key: &str) -> Result<Self> {
        let decoded = STANDARD
            .decode(private_key.trim())
            .map_err(|e| Error::Crypto(format!("Invalid private key encoding: {}", e)))?;
        let bytes: [u8; 32] = decoded
            .try_into()
            .map_err(|_| Error::Crypto("Invalid private key length".to_string()))?;
        Ok(Self::from_private_bytes(bytes))
    }

    fn from_private_bytes(bytes: [u8; 32]) -> Self {
        let secret = StaticSecret::from(bytes);
        let public = PublicKey::from(&secret);

        Self {
            private_key: STANDARD.encode(bytes),
            public_key: STANDARD.encode(public.as_bytes()),
        }
    }
}

impl std::fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyPair")
            .field("public_key", &self.public_key)
            .field("private_key", &"<redacted>")
            .finish()
    }
}
