//! Tenant API client
//!
//! Holds connection settings for one tenant and implements
//! [`PageFetcher`] for the clients endpoint.

use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::http::{HttpClient, HttpClientConfig, RequestConfig};
use crate::pagination::{OffsetPaginator, PageFetcher, PaginatedRecords, PaginationConfig};
use crate::schema::EndpointRecord;
use crate::types::Protocol;
use async_trait::async_trait;
use tracing::debug;
use url::Url;

/// Host used before a tenant name is applied
pub const DEFAULT_HOST: &str = "tenant.goskope.com";

/// Path prefix of the REST API
pub const DEFAULT_PATH_PREFIX: &str = "/api/v1/";

/// Service name of the endpoint inventory
pub const CLIENTS_SERVICE: &str = "clients";

/// Client for a single tenant's API
#[derive(Debug)]
pub struct SkopeClient {
    http: HttpClient,
    http_config: HttpClientConfig,
    host: String,
    port: u16,
    protocol: Protocol,
    path_prefix: String,
    token: Option<String>,
    tenant_name: Option<String>,
    pagination: PaginationConfig,
}

impl SkopeClient {
    /// Create a client with default settings
    pub fn new() -> Result<Self> {
        Self::with_http_config(HttpClientConfig::default())
    }

    /// Create a client with a custom transport configuration
    pub fn with_http_config(http_config: HttpClientConfig) -> Result<Self> {
        Ok(Self {
            http: HttpClient::with_config(http_config.clone())?,
            http_config,
            host: DEFAULT_HOST.to_string(),
            port: Protocol::Https.default_port(),
            protocol: Protocol::Https,
            path_prefix: DEFAULT_PATH_PREFIX.to_string(),
            token: None,
            tenant_name: None,
            pagination: PaginationConfig::default(),
        })
    }

    /// Build a client from layered configuration
    ///
    /// Applies connection settings in a fixed order so that an explicit
    /// `host` wins over the tenant-derived one.
    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        let http_config = HttpClientConfig::builder()
            .validate_server_cert(config.validate_server_cert.unwrap_or(false))
            .build();
        let mut client = Self::with_http_config(http_config)?;

        if let Some(protocol) = config.protocol {
            client.protocol = protocol;
            client.port = protocol.default_port();
        }
        if let Some(tenant) = &config.tenant_name {
            client.set_tenant_name(tenant)?;
        }
        if let Some(host) = &config.host {
            client.set_host(host)?;
        }
        if let Some(port) = config.port {
            client.set_port(port)?;
        }
        if let Some(token) = &config.token {
            client.set_token(token)?;
        }
        client.pagination = config.pagination_config();

        Ok(client)
    }

    /// Set the target host for the API calls
    pub fn set_host(&mut self, host: &str) -> Result<()> {
        if host.is_empty() {
            return Err(Error::invalid_value("host", "empty hostname or ip address"));
        }
        self.host = host.to_string();
        Ok(())
    }

    /// Set the port number for the API calls
    pub fn set_port(&mut self, port: u16) -> Result<()> {
        if port == 0 {
            return Err(Error::invalid_value("port", format!("invalid port: {port}")));
        }
        self.port = port;
        Ok(())
    }

    /// Set the API token
    pub fn set_token(&mut self, token: &str) -> Result<()> {
        if token.is_empty() {
            return Err(Error::invalid_value("token", "empty token"));
        }
        self.token = Some(token.to_string());
        Ok(())
    }

    /// Set the tenant name, substituting it into the host
    pub fn set_tenant_name(&mut self, tenant_name: &str) -> Result<()> {
        if tenant_name.is_empty() {
            return Err(Error::invalid_value("tenant_name", "empty tenant name"));
        }
        let host = self.host.replace("tenant", tenant_name);
        self.tenant_name = Some(tenant_name.to_string());
        self.set_host(&host)
    }

    /// Set the protocol for the API calls (`http` or `https`)
    pub fn set_protocol(&mut self, protocol: &str) -> Result<()> {
        self.protocol = protocol.parse()?;
        Ok(())
    }

    /// Enforce validation of the server certificate
    pub fn set_validate_server_certificate(&mut self) -> Result<()> {
        self.http_config.validate_server_cert = true;
        self.http = HttpClient::with_config(self.http_config.clone())?;
        Ok(())
    }

    /// Replace the pagination settings used by [`Self::get_client_endpoints`]
    pub fn set_pagination(&mut self, config: PaginationConfig) {
        self.pagination = config;
    }

    /// Pagination settings
    pub fn pagination(&self) -> &PaginationConfig {
        &self.pagination
    }

    /// Tenant name, when one was set
    pub fn tenant_name(&self) -> Option<&str> {
        self.tenant_name.as_deref()
    }

    /// Scheme, host and port; the port is omitted when it is the scheme default
    pub fn base_url(&self) -> String {
        if self.port == self.protocol.default_port() {
            format!("{}://{}", self.protocol, self.host)
        } else {
            format!("{}://{}:{}", self.protocol, self.host, self.port)
        }
    }

    /// Full URL of an API service
    pub fn service_url(&self, svc: &str) -> Result<Url> {
        Ok(Url::parse(&format!(
            "{}{}{}",
            self.base_url(),
            self.path_prefix,
            svc
        ))?)
    }

    /// Log the client configuration at debug level
    pub fn info(&self) {
        debug!(
            "client configuration: url={} path_prefix={} tenant={:?} validate_server_cert={}",
            self.base_url(),
            self.path_prefix,
            self.tenant_name,
            self.http_config.validate_server_cert
        );
    }

    /// Call an API service with the token and extra query parameters
    pub async fn call_api(&self, svc: &str, request: RequestConfig) -> Result<Vec<u8>> {
        let token = self
            .token
            .as_deref()
            .ok_or_else(|| Error::missing_field("token"))?;
        let url = self.service_url(svc)?;
        self.http
            .get_bytes(url.as_str(), request.query("token", token))
            .await
    }

    /// Retrieve every endpoint record, page by page
    ///
    /// `page_size` overrides the configured page size for this call. The
    /// returned records are partial when the result carries an error.
    pub async fn get_client_endpoints(
        &self,
        page_size: Option<u32>,
    ) -> PaginatedRecords<EndpointRecord> {
        let mut config = self.pagination.clone();
        if let Some(size) = page_size {
            config.page_size = size;
        }
        OffsetPaginator::new(config).fetch_all(self).await
    }
}

#[async_trait]
impl PageFetcher for SkopeClient {
    async fn fetch_page(&self, limit: u32, offset: u64) -> Result<Vec<u8>> {
        let request = RequestConfig::new()
            .query("limit", limit.to_string())
            .query("skip", offset.to_string());
        self.call_api(CLIENTS_SERVICE, request).await
    }
}
