//! WireGuard `.conf` rendering
//!
//! Pure formatting over peers the repository has already validated.

use std::net::IpAddr;

use wg_admin_common::{Client, Network, Server};

/// Prefix that names exactly one host
fn host_prefix(ip: &IpAddr) -> u8 {
    if ip.is_ipv4() {
        32
    } else {
        128
    }
}

/// Configuration for a server and every client of its network
pub fn render_server(server: &Server, network: &Network, clients: &[&Client]) -> String {
    let mut config = format!(
        r#"# WireGuard configuration for {name}
# generated by wg-admin

[Interface]
Address = {ip}/{prefix}
ListenPort = {port}
PrivateKey = {private_key}
"#,
        name = server.name,
        ip = server.ip,
        prefix = network.prefix(),
        port = server.port,
        private_key = server.keys.private_key,
    );

    if let Some(device) = &server.device {
        config.push_str(&format!(
            "# PostUp = iptables -A FORWARD -i %i -j ACCEPT; iptables -A FORWARD -o %i -j ACCEPT; iptables -t nat -A POSTROUTING -o {device} -j MASQUERADE\n\
             # PostDown = iptables -D FORWARD -i %i -j ACCEPT; iptables -D FORWARD -o %i -j ACCEPT; iptables -t nat -D POSTROUTING -o {device} -j MASQUERADE\n",
            device = device
        ));
    }

    for client in clients {
        config.push_str(&format!(
            "\n[Peer]\n# Name = {}\nPublicKey = {}\nAllowedIPs = {}/{}\n",
            client.name,
            client.keys.public_key,
            client.ip,
            host_prefix(&client.ip),
        ));
    }

    config
}

/// Configuration for a client and every server of its network
pub fn render_client(
    client: &Client,
    network: &Network,
    servers: &[&Server],
    keepalive: u16,
) -> String {
    let mut config = format!(
        r#"# WireGuard configuration for {name}
# generated by wg-admin

[Interface]
PrivateKey = {private_key}
Address = {ip}/{prefix}
"#,
        name = client.name,
        private_key = client.keys.private_key,
        ip = client.ip,
        prefix = network.prefix(),
    );

    for server in servers {
        config.push_str(&format!(
            "\n[Peer]\nPublicKey = {}\nEndpoint = {}:{}\nAllowedIPs = {}\nPersistentKeepalive = {}\n",
            server.keys.public_key, server.name, server.port, server.allowed_ips, keepalive,
        ));
    }

    config
}
