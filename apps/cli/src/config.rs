use std::path::PathBuf;

use anyhow::{bail, Context};
use passdown_core::config::PassdownConfig;

/// Runtime settings for the CLI, read from the environment and arguments.
pub struct Config {
    pub passdown: PassdownConfig,
    pub script_path: PathBuf,
    pub log_format: String,
}

impl Config {
    /// Reads `.env`, then `PASSDOWN_CONFIG`, `PASSDOWN_SCRIPT` and
    /// `PASSDOWN_LOG_FORMAT`. A script path given as the first argument wins
    /// over `PASSDOWN_SCRIPT`.
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let passdown = match std::env::var("PASSDOWN_CONFIG") {
            Ok(path) => PassdownConfig::from_path(&path)
                .with_context(|| format!("failed to load configuration from {}", path))?,
            Err(_) => PassdownConfig::default(),
        };

        let script_path = match std::env::args()
            .nth(1)
            .or_else(|| std::env::var("PASSDOWN_SCRIPT").ok())
        {
            Some(path) => PathBuf::from(path),
            None => bail!("usage: passdown <will-script.json> (or set PASSDOWN_SCRIPT)"),
        };

        let log_format =
            std::env::var("PASSDOWN_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

        Ok(Self {
            passdown,
            script_path,
            log_format,
        })
    }
}
