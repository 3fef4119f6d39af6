//! Configuration loading and management

use crate::core::error::ConfigError;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::OnceLock;
use validator::{Validate, ValidationError};

/// Environment variable holding the Postgres connection string when
/// `store.url` is not set
pub const DATABASE_URL_ENV: &str = "DATABASE_URL";

/// Complete service configuration
///
/// Every section has defaults, so an empty document is a valid configuration
/// that serves from an empty in-memory store.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct AppConfig {
    #[validate(nested)]
    pub server: ServerConfig,

    #[validate(nested)]
    pub pagination: PaginationConfig,

    #[validate(nested)]
    pub store: StoreConfig,

    #[validate(nested)]
    pub tables: TableNames,
}

/// HTTP listener settings
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct ServerConfig {
    /// Socket address to bind, e.g. `127.0.0.1:3000`
    #[validate(custom(function = "validate_socket_addr"))]
    pub bind: String,

    /// Allowed CORS origins; empty allows any origin
    pub cors_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:3000".to_string(),
            cors_origins: Vec::new(),
        }
    }
}

/// Page size bounds
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
#[validate(schema(function = "validate_pagination"))]
pub struct PaginationConfig {
    /// Page size when the client sends no usable `limit`
    pub default_limit: u64,

    /// Largest page size a client may request
    #[validate(range(min = 1, max = 1000))]
    pub max_limit: u64,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_limit: 12,
            max_limit: 100,
        }
    }
}

/// Which store backend serves the listings
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    /// Rows held in process, optionally seeded from JSON files
    #[default]
    Memory,
    /// Hosted database REST API
    Postgrest,
    /// Direct PostgreSQL connection (requires the `postgres` feature)
    Postgres,
}

/// Store connection settings
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct StoreConfig {
    pub backend: StoreBackend,

    /// Project URL for `postgrest`, connection string for `postgres`
    #[validate(url)]
    pub url: Option<String>,

    /// Name of the environment variable holding the API key
    pub api_key_env: Option<String>,

    /// Database schema exposed by the REST API
    pub schema: Option<String>,

    /// Per-request timeout in seconds
    #[validate(range(min = 1, max = 300))]
    pub timeout_secs: u64,

    /// Directory with `<plural>.json` seed files for the memory backend
    pub seed_dir: Option<PathBuf>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::Memory,
            url: None,
            api_key_env: None,
            schema: None,
            timeout_secs: 10,
            seed_dir: None,
        }
    }
}

impl StoreConfig {
    /// Resolve the API key from the configured environment variable
    ///
    /// Returns `None` (anonymous access) when no variable is configured or
    /// it is unset.
    pub fn api_key(&self) -> Option<String> {
        self.api_key_env
            .as_deref()
            .and_then(|name| std::env::var(name).ok())
            .filter(|key| !key.is_empty())
    }

    /// Connection string for the `postgres` backend
    pub fn database_url(&self) -> Option<String> {
        self.url
            .clone()
            .or_else(|| std::env::var(DATABASE_URL_ENV).ok())
    }
}

/// Table names in the external store
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct TableNames {
    #[validate(custom(function = "validate_identifier"))]
    pub organizations: String,

    #[validate(custom(function = "validate_identifier"))]
    pub speakers: String,

    #[validate(custom(function = "validate_identifier"))]
    pub opportunities: String,
}

impl Default for TableNames {
    fn default() -> Self {
        Self {
            organizations: "organizations".to_string(),
            speakers: "speakers".to_string(),
            opportunities: "opportunities".to_string(),
        }
    }
}

fn validate_socket_addr(value: &str) -> Result<(), ValidationError> {
    value
        .parse::<SocketAddr>()
        .map(|_| ())
        .map_err(|_| ValidationError::new("socket_addr"))
}

fn validate_identifier(value: &str) -> Result<(), ValidationError> {
    static IDENT: OnceLock<Regex> = OnceLock::new();
    let regex =
        IDENT.get_or_init(|| Regex::new(r"^[a-z_][a-z0-9_]{0,62}$").expect("identifier regex"));
    if regex.is_match(value) {
        Ok(())
    } else {
        Err(ValidationError::new("identifier"))
    }
}

fn validate_pagination(config: &PaginationConfig) -> Result<(), ValidationError> {
    if config.default_limit > config.max_limit {
        return Err(ValidationError::new("default_limit_exceeds_max_limit"));
    }
    Ok(())
}

impl AppConfig {
    /// Load and validate configuration from a YAML file
    pub fn from_yaml_file(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        let content = std::fs::read_to_string(&path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_yaml_str(&content)
    }

    /// Load and validate configuration from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(yaml).map_err(|e| ConfigError::Parse {
            what: "configuration".to_string(),
            message: e.to_string(),
        })?;
        config.check()?;
        Ok(config)
    }

    /// Run field validation plus the backend-specific requirements
    pub fn check(&self) -> Result<(), ConfigError> {
        self.validate()
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;

        match self.store.backend {
            StoreBackend::Postgrest if self.store.url.is_none() => Err(ConfigError::Invalid(
                "store.url is required for the postgrest backend".to_string(),
            )),
            StoreBackend::Postgres if self.store.database_url().is_none() => {
                Err(ConfigError::Invalid(format!(
                    "store.url or {} is required for the postgres backend",
                    DATABASE_URL_ENV
                )))
            }
            _ => Ok(()),
        }
    }

    /// Override the bind address, e.g. from the command line
    pub fn with_bind(mut self, bind: impl Into<String>) -> Result<Self, ConfigError> {
        self.server.bind = bind.into();
        self.check()?;
        Ok(self)
    }
}
