use serde::Deserialize;
use std::path::{Path, PathBuf};
use truck_statement::CurrencyFormat;

/// Prefix of the environment variables that override file settings.
pub const ENV_PREFIX: &str = "STATEMENT";
/// Configuration file picked up from the working directory when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "config/default.toml";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    #[serde(default)]
    pub assets: AssetsConfig,
    #[serde(default)]
    pub currency: CurrencyFormat,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub max_request_size_mb: usize,
}

/// Optional overrides for the files the renderer loads at startup.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AssetsConfig {
    pub logo_path: Option<PathBuf>,
    pub fonts_dir: Option<PathBuf>,
}

impl ServerConfig {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn max_request_bytes(&self) -> usize {
        self.max_request_size_mb.saturating_mul(1024 * 1024)
    }
}

impl Config {
    /// Loads built-in defaults, then the TOML file, then `STATEMENT__*` environment variables.
    ///
    /// An explicit `path` must exist; without one, [`DEFAULT_CONFIG_FILE`] is used when present.
    pub fn load(path: Option<&Path>) -> Result<Self, config::ConfigError> {
        let mut builder = defaults()?;

        match path {
            Some(path) => {
                builder = builder.add_source(config::File::from(path).required(true));
            }
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
                builder = builder.add_source(config::File::with_name(DEFAULT_CONFIG_FILE));
            }
            None => {}
        }

        builder = builder.add_source(config::Environment::with_prefix(ENV_PREFIX).separator("__"));

        builder.build()?.try_deserialize()
    }

    /// Configuration made only of the built-in defaults.
    pub fn defaults() -> Result<Self, config::ConfigError> {
        defaults()?.build()?.try_deserialize()
    }
}

fn defaults() -> Result<config::ConfigBuilder<config::builder::DefaultState>, config::ConfigError> {
    config::Config::builder()
        .set_default("server.host", "0.0.0.0")?
        .set_default("server.port", 8080)?
        .set_default("server.max_request_size_mb", 2)?
        .set_default("currency.symbol", "$")?
        .set_default("currency.grouping", true)?
        .set_default("currency.fallback_on_unavailable", true)
}
