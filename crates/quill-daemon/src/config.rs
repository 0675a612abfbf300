//! Configuration for quill-daemon

use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::time::Duration;

/// Main daemon configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DaemonConfig {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Remote collaborators
    #[serde(default)]
    pub services: ServicesConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Listen address
    #[serde(default = "default_listen_addr")]
    pub listen_addr: SocketAddr,

    /// Enable CORS
    #[serde(default = "default_true")]
    pub enable_cors: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: default_listen_addr(),
            enable_cors: true,
        }
    }
}

/// Endpoint and timeout of one remote service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteServiceConfig {
    /// Base URL, without a trailing path
    pub base_url: String,

    /// Per-request timeout in seconds
    #[serde(default = "default_remote_timeout")]
    pub timeout_secs: u64,
}

impl RemoteServiceConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout_secs: default_remote_timeout(),
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Remote collaborators used by the service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServicesConfig {
    /// Metadata generation (summary, category, score, media)
    #[serde(default = "default_metadata_service")]
    pub metadata: RemoteServiceConfig,

    /// Catalog registration of published works
    #[serde(default = "default_catalog_service")]
    pub catalog: RemoteServiceConfig,

    /// Author directory resolving credentials to approved authors
    #[serde(default = "default_author_service")]
    pub authors: RemoteServiceConfig,
}

impl Default for ServicesConfig {
    fn default() -> Self {
        Self {
            metadata: default_metadata_service(),
            catalog: default_catalog_service(),
            authors: default_author_service(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub level: String,

    /// JSON format
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

// Default value helpers
fn default_true() -> bool {
    true
}

fn default_listen_addr() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 8082))
}

// Metadata generation can take a while.
fn default_remote_timeout() -> u64 {
    120
}

fn default_metadata_service() -> RemoteServiceConfig {
    RemoteServiceConfig::new("http://localhost:8083")
}

fn default_catalog_service() -> RemoteServiceConfig {
    RemoteServiceConfig::new("http://localhost:8084")
}

fn default_author_service() -> RemoteServiceConfig {
    RemoteServiceConfig {
        base_url: "http://localhost:8081".to_string(),
        timeout_secs: 10,
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

impl DaemonConfig {
    /// Load configuration from defaults, an optional file, then `QUILL_*` variables.
    ///
    /// Nested keys use a double underscore: `QUILL_SERVICES__CATALOG__BASE_URL`.
    pub fn load(path: Option<&str>) -> Result<Self, config::ConfigError> {
        let mut builder = config::Config::builder();

        // Add default configuration
        builder = builder.add_source(config::Config::try_from(&DaemonConfig::default())?);

        // Add file configuration if provided
        if let Some(path) = path {
            builder = builder.add_source(config::File::with_name(path).required(false));
        }

        // Add environment variables with QUILL_ prefix
        builder = builder.add_source(
            config::Environment::with_prefix("QUILL")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config: DaemonConfig = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings that would make every remote call fail
    pub fn validate(&self) -> Result<(), config::ConfigError> {
        let services = [
            ("metadata", &self.services.metadata),
            ("catalog", &self.services.catalog),
            ("authors", &self.services.authors),
        ];
        for (name, service) in services {
            if service.timeout_secs == 0 {
                return Err(config::ConfigError::Message(format!(
                    "services.{}.timeout_secs must be greater than zero",
                    name
                )));
            }
        }
        Ok(())
    }
}
