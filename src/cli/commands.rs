//! CLI commands and argument parsing

use crate::config::ClientConfig;
use crate::types::LogLevel;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Netskope tenant API command line client
#[derive(Parser, Debug)]
#[command(name = "skopecli")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file (YAML or JSON, extension required)
    #[arg(short = 'C', long, global = true)]
    pub config: Option<PathBuf>,

    /// API token (overrides NETSKOPE_TOKEN and the config file)
    #[arg(long, global = true)]
    pub token: Option<String>,

    /// Tenant name (overrides NETSKOPE_TENANT_NAME and the config file)
    #[arg(long, global = true)]
    pub tenant_name: Option<String>,

    /// Log level
    #[arg(short, long, global = true, default_value = "info")]
    pub log_level: LogLevel,

    /// Output format
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Retrieve all client endpoint records
    GetClientData {
        /// Records requested per page
        #[arg(long)]
        page_size: Option<u32>,

        /// Stop with an error after this many full pages
        #[arg(long)]
        max_pages: Option<u32>,

        /// Abort when a page does not report success
        #[arg(long)]
        require_success: bool,
    },

    /// Show the resolved connection settings
    Info,
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output (one record per line)
    Json,
    /// Human-readable output
    Pretty,
}

impl Cli {
    /// Settings given on the command line, as the top config layer
    pub fn overrides(&self) -> ClientConfig {
        let mut config = ClientConfig {
            token: self.token.clone(),
            tenant_name: self.tenant_name.clone(),
            ..Default::default()
        };

        if let Commands::GetClientData {
            page_size,
            max_pages,
            require_success,
        } = &self.command
        {
            config.page_size = *page_size;
            config.max_pages = *max_pages;
            if *require_success {
                config.require_success = Some(true);
            }
        }

        config
    }
}
