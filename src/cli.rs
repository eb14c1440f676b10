//! Command-line interface

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;

use crate::config::{ConfigError, ServerConfig};

/// Process exit codes
pub mod exit_codes {
    pub const SUCCESS: i32 = 0;
    pub const UNEXPECTED_FAILURE: i32 = 1;
    pub const CONFIG_ERROR: i32 = 2;
    pub const BIND_FAILURE: i32 = 3;
}

/// cmdexec - run commands over HTTP
#[derive(Debug, Parser)]
#[command(name = "cmdexec", version, about)]
pub struct Cli {
    /// Path to a TOML config file
    #[arg(long, env = "CMDEXEC_CONFIG")]
    pub config: Option<PathBuf>,

    /// Address to listen on, e.g. 0.0.0.0:8000
    #[arg(long, env = "CMDEXEC_BIND")]
    pub bind: Option<SocketAddr>,

    /// Port to listen on, overrides the port of the bind address
    #[arg(long, short = 'p', env = "CMDEXEC_PORT")]
    pub port: Option<u16>,

    /// Enable debug logging
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Emit logs as JSON
    #[arg(long = "json", global = true)]
    pub json_output: bool,
}

impl Cli {
    /// Load the config file and layer flags on top of it
    pub fn resolve_config(&self) -> Result<ServerConfig, ConfigError> {
        let mut config = ServerConfig::load(self.config.as_deref())?;

        if let Some(bind) = self.bind {
            config = config.with_bind(bind);
        }
        if let Some(port) = self.port {
            config = config.with_port(port);
        }
        config.log.verbose |= self.verbose;
        config.log.json |= self.json_output;

        Ok(config)
    }
}
