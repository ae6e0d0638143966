//! Library half of the `corral` binary: argument parsing, configuration and
//! the subcommands.

pub mod commands;
pub mod config;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub use config::{CorralConfig, CredentialConfig, LayeredCredentials};

#[derive(Parser, Debug)]
#[command(name = "corral")]
#[command(about = "Corral ranch sync client")]
#[command(version)]
pub struct Args {
    /// JSON configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Override the backend base URL
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Enable verbose debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// Probe the backend once
    Ping,
    /// Keep probing and report each status
    Watch {
        /// Time between probes
        #[arg(long)]
        interval_ms: Option<u64>,
        /// Stop after this many statuses
        #[arg(long)]
        count: Option<usize>,
    },
    /// List cattle pins as laid out on the map
    Pins,
    /// Manage the stored bearer token
    Token {
        #[command(subcommand)]
        action: TokenAction,
    },
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum TokenAction {
    Set { token: String },
    Clear,
}

impl Args {
    /// Loads the config file and applies flag overrides.
    pub fn resolve_config(&self) -> anyhow::Result<CorralConfig> {
        let mut config =
            CorralConfig::load(self.config.as_deref())?.with_base_url(self.base_url.clone());
        if let Command::Watch {
            interval_ms: Some(interval_ms),
            ..
        } = self.command
        {
            config.health.interval_ms = interval_ms;
        }
        Ok(config)
    }
}
