//! Client configuration
//!
//! Settings are layered from three sources. A YAML (or JSON) file is read
//! first, environment variables override it and command line flags
//! override both.

use crate::error::{Error, Result, ResultExt};
use crate::pagination::{PaginationConfig, StatusPolicy, DEFAULT_PAGE_SIZE};
use crate::types::Protocol;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Base name of the configuration file
pub const CONFIG_NAME: &str = "skopecli";

/// Extensions tried when searching the default locations
pub const CONFIG_EXTENSIONS: &[&str] = &["yaml", "yml", "json"];

/// Environment variable holding the API token
pub const ENV_TOKEN: &str = "NETSKOPE_TOKEN";

/// Environment variable holding the tenant name
pub const ENV_TENANT_NAME: &str = "NETSKOPE_TENANT_NAME";

// ============================================================================
// Client Config
// ============================================================================

/// Connection and pagination settings
///
/// Every field is optional so that partial layers can be merged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClientConfig {
    /// API token sent with every request
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,

    /// Tenant name substituted into the default host
    #[serde(default, alias = "tenant-name", skip_serializing_if = "Option::is_none")]
    pub tenant_name: Option<String>,

    /// Explicit host, overrides the tenant-derived one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protocol: Option<Protocol>,

    /// Verify the server certificate (off unless set)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validate_server_cert: Option<bool>,

    /// Records requested per page
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u32>,

    /// Stop after this many full pages
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_pages: Option<u32>,

    /// Abort when a page does not report success
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub require_success: Option<bool>,
}

impl ClientConfig {
    /// Parse a config from YAML text (JSON is accepted as well)
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Read and parse a config file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file '{}'", path.display()))?;
        Self::from_yaml_str(&content)
            .with_context(|| format!("failed to parse config file '{}'", path.display()))
    }

    /// Collect settings from the process environment
    pub fn from_env() -> Self {
        Self::from_env_with(|key| std::env::var(key).ok())
    }

    /// Collect settings through a variable lookup function
    pub fn from_env_with<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.is_empty());
        Self {
            token: non_empty(ENV_TOKEN),
            tenant_name: non_empty(ENV_TENANT_NAME),
            ..Default::default()
        }
    }

    /// Overlay `other` on top of `self`; values set in `other` win
    #[must_use]
    pub fn merge(self, other: ClientConfig) -> Self {
        Self {
            token: other.token.or(self.token),
            tenant_name: other.tenant_name.or(self.tenant_name),
            host: other.host.or(self.host),
            port: other.port.or(self.port),
            protocol: other.protocol.or(self.protocol),
            validate_server_cert: other.validate_server_cert.or(self.validate_server_cert),
            page_size: other.page_size.or(self.page_size),
            max_pages: other.max_pages.or(self.max_pages),
            require_success: other.require_success.or(self.require_success),
        }
    }

    /// Check that the settings needed to call the API are present
    pub fn validate(&self) -> Result<()> {
        if self.token.as_deref().map_or(true, str::is_empty) {
            return Err(Error::missing_field("token"));
        }
        if self.tenant_name.as_deref().map_or(true, str::is_empty) {
            return Err(Error::missing_field("tenant_name"));
        }
        if self.port == Some(0) {
            return Err(Error::invalid_value("port", "must be greater than zero"));
        }
        self.pagination_config().validate()
    }

    /// Pagination settings derived from this config
    pub fn pagination_config(&self) -> PaginationConfig {
        let policy = if self.require_success.unwrap_or(false) {
            StatusPolicy::RequireSuccess
        } else {
            StatusPolicy::Ignore
        };
        let mut config = PaginationConfig::new(self.page_size.unwrap_or(DEFAULT_PAGE_SIZE))
            .with_status_policy(policy);
        config.max_pages = self.max_pages;
        config
    }
}

// ============================================================================
// File Lookup
// ============================================================================

/// Resolve which config file to read
///
/// An explicit path must carry an extension and must exist. Without one,
/// the working directory is searched first, then the user config
/// directory. `Ok(None)` means no file was found in the default places.
pub fn locate_config_file(
    explicit: Option<&Path>,
    cwd: &Path,
    home: Option<&Path>,
) -> Result<Option<PathBuf>> {
    if let Some(path) = explicit {
        if path.extension().is_none() {
            return Err(Error::config(format!(
                "config file '{}' has no extension, use e.g. .yaml or .json",
                path.display()
            )));
        }
        if !path.is_file() {
            return Err(Error::config(format!(
                "config file '{}' not found",
                path.display()
            )));
        }
        return Ok(Some(path.to_path_buf()));
    }

    let mut dirs = vec![cwd.to_path_buf()];
    if let Some(home) = home {
        dirs.push(home.join(".config").join(CONFIG_NAME));
    }

    for dir in dirs {
        for ext in CONFIG_EXTENSIONS {
            let candidate = dir.join(format!("{CONFIG_NAME}.{ext}"));
            if candidate.is_file() {
                return Ok(Some(candidate));
            }
        }
    }

    Ok(None)
}

/// Load the file and environment layers
///
/// Command line overrides are merged on top by the caller.
pub fn load_config(explicit: Option<&Path>) -> Result<ClientConfig> {
    let cwd = std::env::current_dir()?;
    let home = std::env::var_os("HOME").map(PathBuf::from);

    let file_config = match locate_config_file(explicit, &cwd, home.as_deref())? {
        Some(path) => {
            debug!("Using config file: {}", path.display());
            ClientConfig::from_file(&path)?
        }
        None => {
            debug!("No config file found, using environment and flags only");
            ClientConfig::default()
        }
    };

    Ok(file_config.merge(ClientConfig::from_env()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;
    use tempfile::TempDir;

    #[test]
    fn test_parse_full_config() {
        let yaml = r#"
token: abc123
tenant_name: acme
host: api.example.test
port: 8443
protocol: http
validate_server_cert: true
page_size: 200
max_pages: 5
require_success: true
"#;

        let config = ClientConfig::from_yaml_str(yaml).unwrap();
        assert_eq!(config.token.as_deref(), Some("abc123"));
        assert_eq!(config.tenant_name.as_deref(), Some("acme"));
        assert_eq!(config.host.as_deref(), Some("api.example.test"));
        assert_eq!(config.port, Some(8443));
        assert_eq!(config.protocol, Some(Protocol::Http));
        assert_eq!(config.validate_server_cert, Some(true));
        assert_eq!(config.page_size, Some(200));
        assert_eq!(config.max_pages, Some(5));
        assert_eq!(config.require_success, Some(true));
    }

    #[test]
    fn test_parse_json_config() {
        let config =
            ClientConfig::from_yaml_str(r#"{"token": "t", "tenant-name": "acme"}"#).unwrap();
        assert_eq!(config.token.as_deref(), Some("t"));
        assert_eq!(config.tenant_name.as_deref(), Some("acme"));
    }

    #[test]
    fn test_parse_empty_config() {
        assert_eq!(
            ClientConfig::from_yaml_str("  \n").unwrap(),
            ClientConfig::default()
        );
    }

    #[test]
    fn test_parse_rejects_unknown_keys() {
        let err = ClientConfig::from_yaml_str("tokn: abc").unwrap_err();
        assert!(matches!(err, Error::YamlParse(_)));
    }

    #[test]
    fn test_parse_rejects_bad_protocol() {
        assert!(ClientConfig::from_yaml_str("protocol: ftp").is_err());
    }

    #[test]
    fn test_from_env_with() {
        let vars: HashMap<&str, &str> = [(ENV_TOKEN, "env-token"), (ENV_TENANT_NAME, "")]
            .into_iter()
            .collect();

        let config = ClientConfig::from_env_with(|key| vars.get(key).map(|v| v.to_string()));
        assert_eq!(config.token.as_deref(), Some("env-token"));
        assert_eq!(config.tenant_name, None);
    }

    #[test]
    fn test_merge_precedence() {
        let file = ClientConfig {
            token: Some("file-token".to_string()),
            tenant_name: Some("file-tenant".to_string()),
            page_size: Some(10),
            ..Default::default()
        };
        let env = ClientConfig {
            token: Some("env-token".to_string()),
            ..Default::default()
        };
        let flags = ClientConfig {
            page_size: Some(20),
            ..Default::default()
        };

        let merged = file.merge(env).merge(flags);
        assert_eq!(merged.token.as_deref(), Some("env-token"));
        assert_eq!(merged.tenant_name.as_deref(), Some("file-tenant"));
        assert_eq!(merged.page_size, Some(20));
    }

    #[test]
    fn test_validate() {
        let mut config = ClientConfig::default();
        assert!(matches!(
            config.validate(),
            Err(Error::MissingConfigField { ref field }) if field == "token"
        ));

        config.token = Some("t".to_string());
        assert!(matches!(
            config.validate(),
            Err(Error::MissingConfigField { ref field }) if field == "tenant_name"
        ));

        config.tenant_name = Some("acme".to_string());
        assert!(config.validate().is_ok());

        config.page_size = Some(0);
        assert!(matches!(
            config.validate(),
            Err(Error::InvalidConfigValue { ref field, .. }) if field == "page_size"
        ));
    }

    #[test]
    fn test_pagination_config() {
        let config = ClientConfig::default().pagination_config();
        assert_eq!(config.page_size, DEFAULT_PAGE_SIZE);
        assert_eq!(config.max_pages, None);
        assert_eq!(config.status_policy, StatusPolicy::Ignore);

        let config = ClientConfig {
            page_size: Some(7),
            max_pages: Some(2),
            require_success: Some(true),
            ..Default::default()
        }
        .pagination_config();
        assert_eq!(config.page_size, 7);
        assert_eq!(config.max_pages, Some(2));
        assert_eq!(config.status_policy, StatusPolicy::RequireSuccess);
    }

    #[test]
    fn test_locate_explicit_requires_extension() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("skopecli");
        fs::write(&path, "token: t").unwrap();

        let err = locate_config_file(Some(&path), dir.path(), None).unwrap_err();
        assert!(err.to_string().contains("has no extension"));
    }

    #[test]
    fn test_locate_explicit_missing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing.yaml");

        let err = locate_config_file(Some(&path), dir.path(), None).unwrap_err();
        assert!(err.to_string().contains("not found"));
    }

    #[test]
    fn test_locate_prefers_working_directory() {
        let cwd = TempDir::new().unwrap();
        let home = TempDir::new().unwrap();
        let home_dir = home.path().join(".config").join(CONFIG_NAME);
        fs::create_dir_all(&home_dir).unwrap();
        fs::write(home_dir.join("skopecli.yaml"), "token: home").unwrap();

        let found = locate_config_file(None, cwd.path(), Some(home.path())).unwrap();
        assert_eq!(found, Some(home_dir.join("skopecli.yaml")));

        fs::write(cwd.path().join("skopecli.json"), r#"{"token": "cwd"}"#).unwrap();
        let found = locate_config_file(None, cwd.path(), Some(home.path())).unwrap();
        assert_eq!(found, Some(cwd.path().join("skopecli.json")));
    }

    #[test]
    fn test_locate_nothing_found() {
        let cwd = TempDir::new().unwrap();
        assert_eq!(locate_config_file(None, cwd.path(), None).unwrap(), None);
    }

    #[test]
    fn test_from_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("skopecli.yaml");
        fs::write(&path, "token: abc\ntenant_name: acme\n").unwrap();

        let config = ClientConfig::from_file(&path).unwrap();
        assert_eq!(config.token.as_deref(), Some("abc"));

        fs::write(&path, "token: [unclosed").unwrap();
        let err = ClientConfig::from_file(&path).unwrap_err();
        assert!(err.to_string().contains("failed to parse config file"));
    }
}
