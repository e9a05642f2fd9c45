//! Runtime configuration.
//!
//! All fields can be overridden through environment variables:
//!
//! | Variable | Default | Meaning |
//! |----------|---------|---------|
//! | WORK_DIR | ./work_dir | Database and log files |
//! | LOG_LEVEL | info | tracing filter when RUST_LOG is unset |
//! | ENVIRONMENT | development | development \| staging \| production |
//! | NOTIFY_CHANNEL_CAPACITY | 1024 | broadcast channel backlog |

use crate::notify::NOTIFY_CHANNEL_CAPACITY;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct Config {
    /// Working directory for the order database and logs.
    pub work_dir: String,
    /// Default log level when RUST_LOG is not set.
    pub log_level: String,
    /// Runtime environment: development | staging | production.
    pub environment: String,
    /// Backlog of the notification broadcast channel.
    pub notify_channel_capacity: usize,
}

impl Config {
    /// Load configuration from the environment, falling back to defaults.
    ///
    /// A `.env` file in the working directory is honored.
    pub fn from_env() -> Self {
        dotenv::dotenv().ok();

        Self {
            work_dir: std::env::var("WORK_DIR").unwrap_or_else(|_| "./work_dir".into()),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
            notify_channel_capacity: std::env::var("NOTIFY_CHANNEL_CAPACITY")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(NOTIFY_CHANNEL_CAPACITY),
        }
    }

    /// Path of the order database file inside the working directory.
    pub fn db_path(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("orders.redb")
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
