mod app;
mod core;

pub use app::{AppConfig, AppConfigError, AuthConfig, ServerConfig, StorageConfig};
pub use self::core::{Config, OperatorCredentials};
