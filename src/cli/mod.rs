//! CLI module
//!
//! Command-line interface for the tenant API.
//!
//! # Commands
//!
//! - `get-client-data` - Retrieve every endpoint record
//! - `info` - Show the resolved connection settings

mod commands;
mod runner;

pub use commands::{Cli, Commands, OutputFormat};
pub use runner::{format_pretty, write_records, Runner};
