use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Operator-facing deployment configuration, persisted as showcase.toml.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub auth: AuthConfig,
}

impl AppConfig {
    /// Returns the config file path within the given directory.
    pub fn path(dir: &Path) -> PathBuf {
        dir.join("showcase.toml")
    }

    /// Loads config from a TOML file. Returns default config if file doesn't exist.
    pub fn load(path: &Path) -> Result<Self, AppConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Saves config to a TOML file.
    pub fn save(&self, path: &Path) -> Result<(), AppConfigError> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Validates config values and returns list of validation errors.
    /// Returns empty vec if config is valid.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.server.bind.parse::<SocketAddr>().is_err() {
            errors.push(format!("bind `{}` is not a socket address", self.server.bind));
        }

        if self.server.max_upload_bytes == 0 {
            errors.push("max_upload_bytes must be at least 1".to_string());
        }

        if self.auth.username.trim().is_empty() {
            errors.push("username must not be empty".to_string());
        }

        if self.auth.password.is_empty() {
            errors.push("password must not be empty".to_string());
        }

        if self.auth.token_ttl_hours == 0 {
            errors.push("token_ttl_hours must be at least 1".to_string());
        }

        errors
    }

    /// Returns a validated config, replacing invalid values with defaults.
    pub fn with_defaults_for_invalid(&self) -> Self {
        let defaults = Self::default();
        Self {
            server: ServerConfig {
                bind: if self.server.bind.parse::<SocketAddr>().is_err() {
                    defaults.server.bind
                } else {
                    self.server.bind.clone()
                },
                max_upload_bytes: if self.server.max_upload_bytes == 0 {
                    defaults.server.max_upload_bytes
                } else {
                    self.server.max_upload_bytes
                },
            },
            storage: self.storage.clone(),
            auth: AuthConfig {
                username: if self.auth.username.trim().is_empty() {
                    defaults.auth.username
                } else {
                    self.auth.username.clone()
                },
                password: if self.auth.password.is_empty() {
                    defaults.auth.password
                } else {
                    self.auth.password.clone()
                },
                token_ttl_hours: if self.auth.token_ttl_hours == 0 {
                    defaults.auth.token_ttl_hours
                } else {
                    self.auth.token_ttl_hours
                },
            },
        }
    }
}

/// HTTP listener settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            max_upload_bytes: default_max_upload_bytes(),
        }
    }
}

fn default_bind() -> String {
    "127.0.0.1:3000".to_string()
}

fn default_max_upload_bytes() -> u64 {
    10 * 1024 * 1024
}

/// On-disk locations.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    #[serde(default = "default_public_dir")]
    pub public_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            public_dir: default_public_dir(),
        }
    }
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

fn default_public_dir() -> PathBuf {
    PathBuf::from("public")
}

/// Operator login settings.
#[derive(Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    #[serde(default = "default_username")]
    pub username: String,
    #[serde(default = "default_password")]
    pub password: String,
    #[serde(default = "default_token_ttl_hours")]
    pub token_ttl_hours: u32,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            username: default_username(),
            password: default_password(),
            token_ttl_hours: default_token_ttl_hours(),
        }
    }
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("username", &self.username)
            .field("token_ttl_hours", &self.token_ttl_hours)
            .finish()
    }
}

fn default_username() -> String {
    "admin".to_string()
}

fn default_password() -> String {
    "RealTrust@2025".to_string()
}

fn default_token_ttl_hours() -> u32 {
    24
}

/// Errors that can occur when loading or saving config.
#[derive(Debug, Error)]
pub enum AppConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("parse error: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
}
