//! Runtime configuration for the schedule store and server.
//!
//! Values come from the process environment, optionally seeded from a
//! `.env` file in the working directory:
//!
//! | Variable | Default |
//! |----------|---------|
//! | `SCHEDULE_FILE` | `data/schedule.json` |
//! | `HOST` | `127.0.0.1` |
//! | `PORT` | `9876` |

use crate::error::{Error, Result};
use std::path::PathBuf;

pub const DEFAULT_STORE_PATH: &str = "data/schedule.json";
pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 9876;

/// Schedule store and server settings.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScheduleConfig {
    /// Path of the JSON document holding all appointments.
    pub store_path: PathBuf,
    /// Interface the HTTP server binds to.
    pub host: String,
    /// Port the HTTP server binds to.
    pub port: u16,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        ScheduleConfig {
            store_path: PathBuf::from(DEFAULT_STORE_PATH),
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
        }
    }
}

impl ScheduleConfig {
    /// Load from the environment, reading `.env` first if one exists.
    ///
    /// # Errors
    ///
    /// Returns `Error::ConfigError` if `PORT` is not a valid port number.
    pub fn from_env() -> Result<Self> {
        match dotenv::dotenv() {
            Ok(path) => info!("Loaded environment from {}", path.display()),
            Err(_) => debug!("No .env file found, using process environment"),
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup. Blank values fall back to defaults.
    ///
    /// # Errors
    ///
    /// Returns `Error::ConfigError` if `PORT` is not a valid port number.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut config = ScheduleConfig::default();

        if let Some(path) = get("SCHEDULE_FILE") {
            config.store_path = PathBuf::from(path);
        }
        if let Some(host) = get("HOST") {
            config.host = host;
        }
        if let Some(port) = get("PORT") {
            config.port = port
                .trim()
                .parse()
                .map_err(|e| Error::ConfigError(format!("invalid PORT {:?}: {}", port, e)))?;
        }

        Ok(config)
    }

    pub fn with_store_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.store_path = path.into();
        self
    }

    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// `host:port` for binding a listener.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
