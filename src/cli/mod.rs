//! Command-line interface
//!
//! Flags override the layered configuration loaded by [`ConfigLoader`].

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;

use crate::domain::models::{Config, TransportKind};
use crate::infrastructure::config::ConfigLoader;

#[derive(Parser, Debug)]
#[command(name = "graph-bridge")]
#[command(
    about = "Bridge between a function-calling model and a host-owned node graph",
    long_about = "Reads one framed request from stdin, lets the model mutate the host's graph \
                  through `function` envelopes, and answers with exactly one terminal envelope."
)]
#[command(version)]
pub struct Cli {
    /// Configuration file used instead of .graph-bridge/config.yaml
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Use the send-only socket transport instead of stdio
    #[arg(long, value_name = "HOST:PORT", value_parser = parse_socket_address)]
    pub socket: Option<SocketAddress>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// Maximum reasoning steps before the run is cut off
    #[arg(long, value_name = "N")]
    pub max_iterations: Option<u32>,
}

/// Host and port given to `--socket`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SocketAddress {
    pub host: String,
    pub port: u16,
}

fn parse_socket_address(value: &str) -> Result<SocketAddress, String> {
    let (host, port) = value
        .rsplit_once(':')
        .ok_or_else(|| format!("expected HOST:PORT, got '{value}'"))?;
    if host.is_empty() {
        return Err("host must not be empty".to_string());
    }
    let port = port
        .parse::<u16>()
        .map_err(|e| format!("invalid port '{port}': {e}"))?;

    Ok(SocketAddress {
        host: host.to_string(),
        port,
    })
}

impl Cli {
    /// Load the layered configuration, apply flag overrides and validate the result.
    pub fn load_config(&self) -> Result<Config> {
        let mut config = ConfigLoader::load_with(self.config.as_deref())?;
        self.apply_overrides(&mut config);
        ConfigLoader::validate(&config).context("Invalid command-line override")?;
        Ok(config)
    }

    pub fn apply_overrides(&self, config: &mut Config) {
        if let Some(socket) = &self.socket {
            config.transport.kind = TransportKind::Socket;
            config.transport.host = Some(socket.host.clone());
            config.transport.port = Some(socket.port);
        }
        if let Some(level) = &self.log_level {
            config.logging.level.clone_from(level);
        }
        if let Some(max_iterations) = self.max_iterations {
            config.agent.max_iterations = max_iterations;
        }
    }
}
