//! Configuration module for the demo preview service.
//!
//! All configuration is loaded from environment variables with sensible defaults.

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::data::ExitPolicy;
use crate::errors::AppError;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Path to the SQLite file holding demo state
    pub db_path: PathBuf,
    /// Address to bind the server to
    pub bind_addr: SocketAddr,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    /// Emit logs as JSON lines
    pub log_json: bool,
    /// How long the "demo data was reset" notice stays up unacknowledged
    pub reset_notice_ttl: Duration,
    /// Raise the reset notice for repaired business collections too
    pub flag_collection_resets: bool,
    /// What demo exit does to demo data
    pub exit_policy: ExitPolicy,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();

        let db_path = env::var("DEMO_DB_PATH")
            .unwrap_or_else(|_| "./data/demo.sqlite".to_string())
            .into();

        let bind_addr = parse_var("DEMO_BIND_ADDR", "127.0.0.1:8080")?;

        let log_level = env::var("DEMO_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
        let log_json = parse_var("DEMO_LOG_JSON", "false")?;

        let reset_notice_ttl = Duration::from_secs(parse_var("DEMO_RESET_NOTICE_SECS", "30")?);
        let flag_collection_resets = parse_var("DEMO_FLAG_COLLECTION_RESETS", "false")?;

        let exit_policy = if parse_var("DEMO_WIPE_DATA_ON_EXIT", "false")? {
            ExitPolicy::WipeData
        } else {
            ExitPolicy::KeepData
        };

        Ok(Self {
            db_path,
            bind_addr,
            log_level,
            log_json,
            reset_notice_ttl,
            flag_collection_resets,
            exit_policy,
        })
    }
}

fn parse_var<T: FromStr>(name: &str, default: &str) -> Result<T, AppError> {
    let raw = env::var(name).unwrap_or_else(|_| default.to_string());
    raw.trim()
        .parse()
        .map_err(|_| AppError::Validation(format!("Invalid {} value: {}", name, raw)))
}
