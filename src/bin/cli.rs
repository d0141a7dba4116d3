//! mcwire CLI
//!
//! Command-line front end over the protocol dispatch table.

use std::process::ExitCode;

use clap::Parser;
use mcwire::dispatch::{Outcome, PROTOCOLS};
use mcwire::{ClientConfig, Protocol, Report, Target};
use tracing_subscriber::{fmt, EnvFilter};

/// mcwire CLI
#[derive(Parser, Debug)]
#[command(name = "mcwire")]
#[command(about = "Query status from, and run commands on, Minecraft servers")]
#[command(version)]
struct Args {
    /// Print the result as JSON
    #[arg(long)]
    json: bool,

    /// Dial timeout in milliseconds
    #[arg(long, default_value = "5000")]
    dial_timeout_ms: u64,

    /// Read timeout in milliseconds
    #[arg(long, default_value = "5000")]
    read_timeout_ms: u64,

    /// Reject responses echoing a different session/request id
    #[arg(long)]
    strict_ids: bool,

    /// Protocol: ping, ping-legacy, ping-legacy-1.6.4, query-basic, query-full,
    /// rcon, ping-bedrock, stat-bedrock
    protocol: String,

    /// Server hostname
    hostname: String,

    /// Server port
    port: u16,

    /// RCON password
    password: Option<String>,

    /// RCON command
    command: Option<String>,
}

fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .init();

    let args = Args::parse();

    let protocol = match Protocol::from_name(&args.protocol) {
        Ok(protocol) => protocol,
        Err(e) => {
            let names: Vec<&str> = PROTOCOLS.iter().map(|(name, _)| *name).collect();
            eprintln!("Error : {}. Known protocols: {}.", e, names.join(", "));
            return ExitCode::FAILURE;
        }
    };

    let config = ClientConfig::builder()
        .dial_timeout_ms(args.dial_timeout_ms)
        .read_timeout_ms(args.read_timeout_ms)
        .strict_ids(args.strict_ids)
        .build();

    let target = Target {
        hostname: args.hostname,
        port: args.port,
        password: args.password,
        command: args.command,
    };

    let report = match mcwire::execute(protocol, &target, &config) {
        Ok(report) => report,
        Err(e) => {
            eprintln!("Error : {}.", e);
            eprintln!("Usage : mcwire [--json] {} {}", protocol.name(), protocol.usage());
            return ExitCode::FAILURE;
        }
    };

    if args.json {
        match serde_json::to_string_pretty(&report) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Error : {}.", e);
                return ExitCode::FAILURE;
            }
        }
    } else {
        print_report(&report);
    }

    ExitCode::SUCCESS
}

fn print_report(report: &Report) {
    match &report.output {
        Outcome::Status(handshake) => {
            let properties = serde_json::to_string_pretty(&handshake.properties)
                .unwrap_or_else(|_| "{}".to_string());
            println!("Properties : {}", properties);
        }
        Outcome::Legacy(info) => {
            println!("Protocol Version : {}", info.protocol_version);
            println!("Minecraft Version : {}", info.minecraft_version);
            println!("MOTD : {}", info.motd);
            println!("Online Players : {}", info.online_players);
            println!("Max Players : {}", info.max_players);
        }
        Outcome::BasicStat(stat) => {
            println!("MOTD : {}", stat.motd);
            println!("Game Type : {}", stat.game_type);
            println!("Map : {}", stat.map);
            println!("Online Players : {}", stat.num_players);
            println!("Max Players : {}", stat.max_players);
            println!("Host : {}:{}", stat.host_ip, stat.host_port);
        }
        Outcome::FullStat(stat) => {
            println!("Properties :");
            for (key, value) in &stat.properties {
                println!("\t{} : {}", key, value);
            }
            println!("Online Players : {}", stat.online_players.join(", "));
        }
        Outcome::Rcon { response } => {
            println!("{}", response);
            return;
        }
        Outcome::Bedrock(pong) => {
            println!("Edition : {}", pong.edition);
            println!("MOTD : {}", pong.motd);
            println!("Protocol Version : {}", pong.protocol_version);
            println!("Game Version : {}", pong.game_version);
            println!("Online Players : {}", pong.online_players);
            println!("Max Players : {}", pong.max_players);
            println!("Server ID : {}", pong.server_id);
            println!("Level Name : {}", pong.level_name);
            println!("Game Mode : {} ({})", pong.game_mode, pong.game_mode_numeric);
            println!("IPv4 Port : {}", pong.ipv4_port);
            println!("IPv6 Port : {}", pong.ipv6_port);
        }
    }
    println!("Latency : {} ms", report.latency_ms);
}
