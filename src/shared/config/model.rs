use std::env;
use std::time::Duration;

use serde::Deserialize;

use crate::frontend::protocol::DEFAULT_MAX_FRAME_BYTES;
use crate::frontend::transport::{Credentials, Endpoint};

pub const CONFIG_ENV: &str = "TSDB_SESSION_CONFIG";
pub const ENV_PREFIX: &str = "TSDB_SESSION";

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub connection: ConnectionConfig,
    pub logging: LoggingConfig,
    pub protocol: ProtocolConfig,
}

#[derive(Clone, Deserialize)]
pub struct ConnectionConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    /// Applies to connect and to each request round trip.
    pub timeout_ms: u64,
}

impl ConnectionConfig {
    pub fn endpoint(&self) -> Endpoint {
        Endpoint::new(self.host.clone(), self.port)
    }

    pub fn credentials(&self) -> Credentials {
        Credentials::new(self.username.clone(), self.password.clone())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 6888,
            username: "root".to_string(),
            password: "root".to_string(),
            timeout_ms: 10_000,
        }
    }
}

impl std::fmt::Debug for ConnectionConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &"***")
            .field("timeout_ms", &self.timeout_ms)
            .finish()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub log_dir: String,
    pub stdout_level: String,
    pub file_level: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProtocolConfig {
    pub max_frame_bytes: usize,
}

/// Loads settings from the file named by `TSDB_SESSION_CONFIG` (default
/// `config`, any extension the `config` crate knows). The file is optional;
/// missing keys fall back to defaults and `TSDB_SESSION__SECTION__KEY`
/// variables override both.
pub fn load_settings() -> Result<Settings, config::ConfigError> {
    let config_path = env::var(CONFIG_ENV).unwrap_or_else(|_| "config".to_string());
    build(&config_path, false)
}

/// Loads settings from an explicit file, which must exist.
pub fn load_settings_from(path: &str) -> Result<Settings, config::ConfigError> {
    build(path, true)
}

fn build(path: &str, required: bool) -> Result<Settings, config::ConfigError> {
    let defaults = ConnectionConfig::default();

    let settings: Settings = config::Config::builder()
        .set_default("connection.host", defaults.host)?
        .set_default("connection.port", defaults.port as i64)?
        .set_default("connection.username", defaults.username)?
        .set_default("connection.password", defaults.password)?
        .set_default("connection.timeout_ms", defaults.timeout_ms as i64)?
        .set_default("logging.log_dir", "logs")?
        .set_default("logging.stdout_level", "info")?
        .set_default("logging.file_level", "debug")?
        .set_default("protocol.max_frame_bytes", DEFAULT_MAX_FRAME_BYTES as i64)?
        .add_source(config::File::with_name(path).required(required))
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__"),
        )
        .build()?
        .try_deserialize()?;

    if settings.protocol.max_frame_bytes == 0 {
        return Err(config::ConfigError::Message(
            "protocol.max_frame_bytes must be positive".to_string(),
        ));
    }

    Ok(settings)
}
