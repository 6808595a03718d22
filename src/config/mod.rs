//! Service configuration: YAML file plus environment overrides
//!
//! ```yaml
//! server:
//!   host: 0.0.0.0
//!   port: 4000
//!   cors_origins: ["http://localhost:3000"]
//! storage:
//!   backend: mongodb
//!   uri: mongodb://localhost:27017
//!   database: paytrack
//! logging:
//!   filter: paytrack=debug,tower_http=info
//!   json: false
//! ```

use crate::core::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::net::{SocketAddr, ToSocketAddrs};
use std::path::Path;

/// File read when `PAYTRACK_CONFIG` is unset
pub const DEFAULT_CONFIG_FILE: &str = "paytrack.yaml";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// IP address or resolvable hostname
    pub host: String,
    pub port: u16,
    /// Allowed browser origins; empty allows any
    pub cors_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".into(),
            port: 4000,
            cors_origins: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    Memory,
    Mongodb,
}

impl std::str::FromStr for StorageBackend {
    type Err = ConfigError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "memory" | "in-memory" => Ok(StorageBackend::Memory),
            "mongodb" | "mongo" => Ok(StorageBackend::Mongodb),
            other => Err(ConfigError::InvalidValue {
                field: "storage.backend".into(),
                value: other.into(),
                message: "expected 'memory' or 'mongodb'".into(),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    /// Connection string, required for `mongodb`
    pub uri: Option<String>,
    pub database: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::Memory,
            uri: None,
            database: "paytrack".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `EnvFilter` directives; `RUST_LOG` wins when set
    pub filter: String,
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "paytrack=info,tower_http=info".into(),
            json: false,
        }
    }
}

impl AppConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => ConfigError::FileNotFound {
                path: path.display().to_string(),
            },
            _ => ConfigError::IoError {
                message: format!("{}: {}", path.display(), e),
            },
        })?;

        serde_yaml::from_str(&content).map_err(|e| ConfigError::ParseError {
            file: Some(path.display().to_string()),
            message: e.to_string(),
        })
    }

    /// Load configuration from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        serde_yaml::from_str(yaml).map_err(|e| ConfigError::ParseError {
            file: None,
            message: e.to_string(),
        })
    }

    /// Resolve the full configuration from the process environment
    ///
    /// Reads `PAYTRACK_CONFIG` (or `paytrack.yaml` when present), applies
    /// environment overrides and validates the result.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = match std::env::var("PAYTRACK_CONFIG") {
            Ok(path) => Self::from_yaml_file(path)?,
            Err(_) if Path::new(DEFAULT_CONFIG_FILE).exists() => {
                Self::from_yaml_file(DEFAULT_CONFIG_FILE)?
            }
            Err(_) => Self::default(),
        };
        config.apply_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Overlay values from `lookup`, normally `std::env::var`
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("PAYTRACK_HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("PAYTRACK_PORT") {
            self.server.port = port.trim().parse().map_err(|_| ConfigError::InvalidValue {
                field: "server.port".into(),
                value: port.clone(),
                message: "expected a port number".into(),
            })?;
        }
        if let Some(backend) = lookup("PAYTRACK_STORAGE") {
            self.storage.backend = backend.parse()?;
        }
        if let Some(uri) = lookup("MONGODB_URI") {
            self.storage.uri = Some(uri);
            // A URI on its own is enough to opt into MongoDB
            if lookup("PAYTRACK_STORAGE").is_none() {
                self.storage.backend = StorageBackend::Mongodb;
            }
        }
        if let Some(database) = lookup("MONGODB_DATABASE") {
            self.storage.database = database;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::InvalidValue {
                field: "server.port".into(),
                value: "0".into(),
                message: "must be between 1 and 65535".into(),
            });
        }
        if self.storage.backend == StorageBackend::Mongodb
            && self.storage.uri.as_deref().is_none_or(|uri| uri.trim().is_empty())
        {
            return Err(ConfigError::InvalidValue {
                field: "storage.uri".into(),
                value: String::new(),
                message: "required when storage.backend is mongodb".into(),
            });
        }
        if self.storage.database.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "storage.database".into(),
                value: self.storage.database.clone(),
                message: "must not be empty".into(),
            });
        }
        Ok(())
    }

    /// Socket address to listen on
    ///
    /// `server.host` is an IP address or a hostname such as `localhost`.
    /// Hostnames resolve once, here, and the first address wins.
    pub fn bind_addr(&self) -> Result<SocketAddr, ConfigError> {
        let host = self.server.host.trim();
        let invalid = |message: String| ConfigError::InvalidValue {
            field: "server.host".into(),
            value: self.server.host.clone(),
            message,
        };
        if host.is_empty() || host.contains(char::is_whitespace) {
            return Err(invalid("expected an IP address or hostname".into()));
        }

        (host, self.server.port)
            .to_socket_addrs()
            .map_err(|e| invalid(format!("cannot resolve: {}", e)))?
            .next()
            .ok_or_else(|| invalid("resolves to no address".into()))
    }
}
