//! CLI runner - executes commands

use crate::cli::commands::{Cli, Commands, OutputFormat};
use crate::client::SkopeClient;
use crate::config::{load_config, ClientConfig};
use crate::error::Result;
use crate::schema::EndpointRecord;
use chrono::SecondsFormat;
use serde_json::json;
use std::io::{self, Write};
use tracing::{info, warn};

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        let config = self.resolve_config()?;

        match &self.cli.command {
            Commands::GetClientData { .. } => self.get_client_data(&config).await,
            Commands::Info => self.info(&config),
        }
    }

    /// Merge file, environment and flag settings
    fn resolve_config(&self) -> Result<ClientConfig> {
        let config = load_config(self.cli.config.as_deref())?;
        Ok(config.merge(self.cli.overrides()))
    }

    /// Fetch every endpoint and print it
    ///
    /// Records gathered before a failure are printed before the error is
    /// returned.
    async fn get_client_data(&self, config: &ClientConfig) -> Result<()> {
        config.validate()?;
        let client = SkopeClient::from_config(config)?;
        client.info();

        let (records, error) = client.get_client_endpoints(None).await.into_parts();

        let stdout = io::stdout();
        let mut out = stdout.lock();
        write_records(&mut out, &records, self.cli.format)?;
        out.flush()?;

        match error {
            Some(e) => {
                warn!("Printed {} records before the run failed", records.len());
                Err(e)
            }
            None => {
                info!("Retrieved {} client endpoints", records.len());
                Ok(())
            }
        }
    }

    /// Print the resolved settings without the token
    fn info(&self, config: &ClientConfig) -> Result<()> {
        let client = SkopeClient::from_config(config)?;
        client.info();

        let pagination = client.pagination();
        let summary = json!({
            "version": crate::VERSION,
            "tenant_name": client.tenant_name(),
            "base_url": client.base_url(),
            "clients_url": client.service_url(crate::client::CLIENTS_SERVICE)?.as_str(),
            "token_set": config.token.is_some(),
            "validate_server_cert": config.validate_server_cert.unwrap_or(false),
            "page_size": pagination.page_size,
            "max_pages": pagination.max_pages,
            "require_success": config.require_success.unwrap_or(false),
        });

        match self.cli.format {
            OutputFormat::Json => println!("{}", serde_json::to_string(&summary)?),
            OutputFormat::Pretty => println!("{}", serde_json::to_string_pretty(&summary)?),
        }
        Ok(())
    }
}

/// Write records, one per line, in the requested format
pub fn write_records<W: Write>(
    out: &mut W,
    records: &[EndpointRecord],
    format: OutputFormat,
) -> Result<()> {
    for record in records {
        match format {
            OutputFormat::Json => writeln!(out, "{}", record.to_json_string()?)?,
            OutputFormat::Pretty => writeln!(out, "{}", format_pretty(record))?,
        }
    }
    Ok(())
}

/// One human-readable line for an endpoint
pub fn format_pretty(record: &EndpointRecord) -> String {
    let host = record.host_info.as_ref();
    let hostname = host.and_then(|h| h.hostname.as_deref()).unwrap_or("-");
    let os = match (
        host.and_then(|h| h.os_name.as_deref()),
        host.and_then(|h| h.os_version.as_deref()),
    ) {
        (Some(name), Some(version)) => format!("{name} {version}"),
        (Some(name), None) => name.to_string(),
        _ => "-".to_string(),
    };
    let installed = record
        .installed_at()
        .map_or_else(|| "-".to_string(), |t| t.to_rfc3339_opts(SecondsFormat::Secs, true));
    let last_event = record
        .last_event
        .as_ref()
        .and_then(|e| e.name.as_deref())
        .unwrap_or("-");

    format!(
        "{id}  device={device} host={hostname} os={os} client={version} installed={installed} users={users} last_event={last_event}",
        id = record.id.as_deref().unwrap_or("-"),
        device = record.device_id.as_deref().unwrap_or("-"),
        version = record.version.as_deref().unwrap_or("-"),
        users = record.users.len(),
    )
}
