use ::config::builder::{ConfigBuilder, DefaultState};
use serde::Deserialize;
use std::path::PathBuf;

use crate::storage::{DEFAULT_BUDGETS_FILE, DEFAULT_LEDGER_FILE};

/// Config file read when no `--config` is given. It is optional.
pub const DEFAULT_CONFIG_PATH: &str = "outlay.toml";

/// Prefix of environment variable overrides, e.g. `OUTLAY_LEDGER_FILE`.
pub const ENV_PREFIX: &str = "OUTLAY";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub ledger_file: PathBuf,
    pub budgets_file: PathBuf,
    /// Default tracing filter when `RUST_LOG` is not set
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            ledger_file: PathBuf::from(DEFAULT_LEDGER_FILE),
            budgets_file: PathBuf::from(DEFAULT_BUDGETS_FILE),
            log_level: "warn".to_string(),
        }
    }
}

impl AppConfig {
    /// Layer the optional TOML file, then `OUTLAY_*` environment variables, over the defaults.
    pub fn load(config_path: Option<&str>) -> Result<Self, ::config::ConfigError> {
        Self::file_layer(config_path.unwrap_or(DEFAULT_CONFIG_PATH))
            .add_source(::config::Environment::with_prefix(ENV_PREFIX))
            .build()?
            .try_deserialize()
    }

    /// Builder holding only the optional TOML file.
    fn file_layer(config_path: &str) -> ConfigBuilder<DefaultState> {
        ::config::Config::builder()
            .add_source(::config::File::with_name(config_path).required(false))
    }
}
