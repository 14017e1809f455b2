use clap::Parser;
use tempfile::TempDir;
use wg_admin_cli::commands::client::{self, ClientCommands};
use wg_admin_cli::commands::config::{render, ConfigArgs};
use wg_admin_cli::commands::network::{self, NetworkCommands};
use wg_admin_cli::commands::server::{self, ServerCommands};
use wg_admin_cli::commands::{Context, NetworkArg};
use wg_admin_cli::output::OutputFormat;
use wg_admin_common::{AdminConfig, Error, Peer, Repository, NETWORK_ENV};

const NET: &str = "10.1.2.0/24";

fn context(tmp: &TempDir) -> Context {
    let repo = Repository::open(tmp.path().join("wg-admin.json")).unwrap();
    let config = AdminConfig {
        default_network: Some(NET.to_string()),
        ..AdminConfig::default()
    };
    Context::new(repo, config, OutputFormat::Json, false)
}

/// `server add` options as they would come off the command line
#[derive(Default)]
struct ServerFlags<'a> {
    network: Option<&'a str>,
    ip: Option<&'a str>,
    port: Option<u16>,
    allowed_ips: Option<&'a str>,
    device: Option<&'a str>,
}

impl ServerFlags<'_> {
    fn add(self, name: &str) -> ServerCommands {
        ServerCommands::Add {
            name: name.to_string(),
            network: NetworkArg {
                network: self.network.map(str::to_string),
            },
            ip: self.ip.map(str::to_string),
            port: self.port,
            allowed_ips: self.allowed_ips.map(str::to_string),
            device: self.device.map(str::to_string),
        }
    }
}

fn add_server(ctx: &mut Context, name: &str, ip: Option<&str>, device: Option<&str>) {
    let cmd = ServerFlags {
        ip,
        device,
        ..Default::default()
    }
    .add(name);
    server::execute(cmd, ctx).unwrap();
}

fn add_client(ctx: &mut Context, name: &str) {
    client::execute(
        ClientCommands::Add {
            name: name.to_string(),
            network: NetworkArg::default(),
            ip: None,
        },
        ctx,
    )
    .unwrap();
}

#[test]
fn peers_without_address_get_the_next_free_one() {
    let tmp = TempDir::new().unwrap();
    let mut ctx = context(&tmp);
    network::execute(NetworkCommands::Add { cidr: NET.to_string() }, &mut ctx).unwrap();

    add_server(&mut ctx, "vpn.example.com", None, Some("eth0"));
    add_client(&mut ctx, "alice");
    add_client(&mut ctx, "bob");

    let peers = ctx.repo.peers(NET).unwrap();
    let addresses: Vec<String> = peers.iter().map(|p| p.ip().to_string()).collect();
    assert_eq!(addresses, vec!["10.1.2.1", "10.1.2.2", "10.1.2.3"]);

    let server = ctx.repo.servers(NET).unwrap()[0].clone();
    assert_eq!(server.port, 51820);
    assert_eq!(server.allowed_ips.to_string(), NET);
    assert_eq!(server.device.as_deref(), Some("eth0"));
}

#[test]
fn explicit_address_is_used() {
    let tmp = TempDir::new().unwrap();
    let mut ctx = context(&tmp);
    network::execute(NetworkCommands::Add { cidr: NET.to_string() }, &mut ctx).unwrap();

    add_server(&mut ctx, "vpn.example.com", Some("10.1.2.100"), None);
    add_client(&mut ctx, "alice");

    let found = ctx.repo.find_peer(NET, "vpn.example.com").unwrap();
    assert_eq!(found.ip().to_string(), "10.1.2.100");
    let found = ctx.repo.find_peer(NET, "alice").unwrap();
    assert_eq!(found.ip().to_string(), "10.1.2.1");
}

#[test]
fn missing_network_is_an_error() {
    let tmp = TempDir::new().unwrap();
    let mut ctx = context(&tmp);
    ctx.config.default_network = None;

    let result = client::execute(
        ClientCommands::Add {
            name: "alice".to_string(),
            network: NetworkArg::default(),
            ip: None,
        },
        &mut ctx,
    );
    assert!(result.is_err());
}

#[test]
fn config_dispatches_on_peer_kind() {
    let tmp = TempDir::new().unwrap();
    let mut ctx = context(&tmp);
    network::execute(NetworkCommands::Add { cidr: NET.to_string() }, &mut ctx).unwrap();
    add_server(&mut ctx, "vpn.example.com", None, None);
    add_client(&mut ctx, "alice");

    let alice_key = match ctx.repo.find_peer(NET, "alice").unwrap() {
        Peer::Client(c) => c.keys.public_key.clone(),
        Peer::Server(_) => panic!("alice should be a client"),
    };

    let server_conf = render(
        &ConfigArgs {
            name: "vpn.example.com".to_string(),
            network: NetworkArg::default(),
        },
        &ctx,
    )
    .unwrap();
    assert!(server_conf.contains("ListenPort = 51820"));
    assert!(server_conf.contains(&format!("PublicKey = {}", alice_key)));

    let client_conf = render(
        &ConfigArgs {
            name: "alice".to_string(),
            network: NetworkArg::default(),
        },
        &ctx,
    )
    .unwrap();
    assert!(client_conf.contains("Endpoint = vpn.example.com:51820"));
    assert!(client_conf.contains("Address = 10.1.2.2/24"));

    let missing = render(
        &ConfigArgs {
            name: "carol".to_string(),
            network: NetworkArg::default(),
        },
        &ctx,
    );
    assert!(missing.is_err());
}

/// Only the network selection, parsed the way the binary parses it
#[derive(Parser)]
struct NetworkFlags {
    #[command(flatten)]
    network: NetworkArg,
}

#[test]
fn network_flag_beats_config_file() {
    let tmp = TempDir::new().unwrap();
    let mut ctx = context(&tmp);
    network::execute(NetworkCommands::Add { cidr: "10.1.3.0/24".to_string() }, &mut ctx).unwrap();

    let flag = NetworkArg {
        network: Some("10.1.3.0/24".to_string()),
    };
    assert_eq!(ctx.network(&flag).unwrap(), "10.1.3.0/24");
    assert_eq!(ctx.network(&NetworkArg::default()).unwrap(), NET);

    client::execute(
        ClientCommands::Add {
            name: "alice".to_string(),
            network: flag,
            ip: None,
        },
        &mut ctx,
    )
    .unwrap();
    assert_eq!(ctx.repo.find_peer("10.1.3.0/24", "alice").unwrap().ip().to_string(), "10.1.3.1");
}

#[test]
fn network_env_beats_config_and_flag_beats_env() {
    let tmp = TempDir::new().unwrap();
    let ctx = context(&tmp);

    std::env::set_var(NETWORK_ENV, "10.7.0.0/16");
    let from_env = NetworkFlags::try_parse_from(["wg-admin"]).unwrap();
    let from_flag = NetworkFlags::try_parse_from(["wg-admin", "-n", "10.8.0.0/16"]).unwrap();
    std::env::remove_var(NETWORK_ENV);

    assert_eq!(ctx.network(&from_env.network).unwrap(), "10.7.0.0/16");
    assert_eq!(ctx.network(&from_flag.network).unwrap(), "10.8.0.0/16");
}

#[test]
fn config_file_supplies_server_defaults() {
    let tmp = TempDir::new().unwrap();
    let mut ctx = context(&tmp);
    ctx.config.default_port = 4600;
    ctx.config.default_device = Some("wg-uplink".to_string());
    network::execute(NetworkCommands::Add { cidr: NET.to_string() }, &mut ctx).unwrap();

    server::execute(ServerFlags::default().add("a.example.com"), &mut ctx).unwrap();
    server::execute(
        ServerFlags {
            port: Some(4700),
            device: Some("eth1"),
            ..Default::default()
        }
        .add("b.example.com"),
        &mut ctx,
    )
    .unwrap();

    let servers = ctx.repo.servers(NET).unwrap();
    assert_eq!(servers[0].port, 4600);
    assert_eq!(servers[0].device.as_deref(), Some("wg-uplink"));
    assert_eq!(servers[1].port, 4700);
    assert_eq!(servers[1].device.as_deref(), Some("eth1"));
}

#[test]
fn built_in_defaults_apply_without_config() {
    let tmp = TempDir::new().unwrap();
    let mut ctx = context(&tmp);
    ctx.config.default_network = None;
    assert!(ctx.network(&NetworkArg::default()).is_err());

    network::execute(NetworkCommands::Add { cidr: NET.to_string() }, &mut ctx).unwrap();
    server::execute(
        ServerFlags {
            network: Some(NET),
            ..Default::default()
        }
        .add("vpn.example.com"),
        &mut ctx,
    )
    .unwrap();

    let server = ctx.repo.servers(NET).unwrap()[0].clone();
    assert_eq!(server.port, 51820);
    assert_eq!(server.device, None);
}

#[test]
fn server_port_option() {
    let tmp = TempDir::new().unwrap();
    let mut ctx = context(&tmp);
    network::execute(NetworkCommands::Add { cidr: NET.to_string() }, &mut ctx).unwrap();

    server::execute(
        ServerFlags {
            port: Some(443),
            ..Default::default()
        }
        .add("vpn.example.com"),
        &mut ctx,
    )
    .unwrap();

    assert_eq!(ctx.repo.servers(NET).unwrap()[0].port, 443);
    let conf = render(
        &ConfigArgs {
            name: "vpn.example.com".to_string(),
            network: NetworkArg::default(),
        },
        &ctx,
    )
    .unwrap();
    assert!(conf.contains("ListenPort = 443"));
}

#[test]
fn server_allowed_ips_option() {
    let tmp = TempDir::new().unwrap();
    let mut ctx = context(&tmp);
    network::execute(NetworkCommands::Add { cidr: NET.to_string() }, &mut ctx).unwrap();

    server::execute(
        ServerFlags {
            allowed_ips: Some("10.0.0.0/8"),
            ..Default::default()
        }
        .add("vpn.example.com"),
        &mut ctx,
    )
    .unwrap();
    assert_eq!(ctx.repo.servers(NET).unwrap()[0].allowed_ips.to_string(), "10.0.0.0/8");

    let err = server::execute(
        ServerFlags {
            allowed_ips: Some("10.0.0.0/99"),
            ..Default::default()
        }
        .add("backup.example.com"),
        &mut ctx,
    )
    .unwrap_err();
    assert!(matches!(err.downcast_ref::<Error>(), Some(Error::MalformedNetwork(_))));
    assert_eq!(ctx.repo.servers(NET).unwrap().len(), 1);
}
