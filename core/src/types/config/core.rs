use super::AppConfig;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

/// Core configuration for ShowcaseCore initialization.
#[derive(Clone, Debug)]
pub struct Config {
    /// Directory holding the record database.
    pub base_path: PathBuf,
    /// Directory served to visitors; uploads land under `uploads/`.
    pub public_path: PathBuf,
    pub operator: OperatorCredentials,
    pub token_ttl: Duration,
}

impl Config {
    pub const DEFAULT_TOKEN_TTL: Duration = Duration::from_secs(24 * 60 * 60);

    pub fn db_path(&self) -> PathBuf {
        self.base_path.join("showcase.redb")
    }

    pub fn uploads_path(&self) -> PathBuf {
        self.public_path.join("uploads")
    }
}

impl From<&AppConfig> for Config {
    fn from(config: &AppConfig) -> Self {
        Self {
            base_path: config.storage.data_dir.clone(),
            public_path: config.storage.public_dir.clone(),
            operator: OperatorCredentials {
                identity: config.auth.username.clone(),
                secret: config.auth.password.clone(),
            },
            token_ttl: Duration::from_secs(u64::from(config.auth.token_ttl_hours) * 60 * 60),
        }
    }
}

/// The single operator identity/secret pair accepted at login.
#[derive(Clone, PartialEq, Eq)]
pub struct OperatorCredentials {
    pub identity: String,
    pub secret: String,
}

impl fmt::Debug for OperatorCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OperatorCredentials")
            .field("identity", &self.identity)
            .field("secret", &"<redacted>")
            .finish()
    }
}
