//! wg-admin CLI
//!
//! Command-line interface for administering WireGuard networks,
//! servers and clients.

pub mod commands;
pub mod output;
pub mod render;
