//! Service configuration.
//!
//! Layers, lowest priority first: embedded defaults, the TOML config file
//! (`--config` or `<config dir>/gazetteer/config.toml`), then environment
//! variables such as `GAZETTEER__SERVER__PORT=8080`. CLI flags are applied on
//! top by the binary.

use crate::search::CoordinatePolicy;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

const DEFAULT_CONFIG: &str = r#"
[server]
host = "127.0.0.1"
port = 3000

[data]
dir       = "data"
extension = "csv"

[search]
coordinate_policy = "permissive"
"#;

const ENV_PREFIX: &str = "GAZETTEER";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub data: DataConfig,
    #[serde(default)]
    pub search: SearchConfig,
}

/// `[server]`
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// `[data]`
#[derive(Debug, Clone, Deserialize)]
pub struct DataConfig {
    #[serde(default = "default_data_dir")]
    pub dir: PathBuf,
    #[serde(default = "default_extension")]
    pub extension: String,
    /// Per-body preamble lines, e.g. `[data.skip_lines] titan = 2`.
    #[serde(default)]
    pub skip_lines: HashMap<String, usize>,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

fn default_extension() -> String {
    "csv".to_string()
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            dir: default_data_dir(),
            extension: default_extension(),
            skip_lines: HashMap::new(),
        }
    }
}

/// `[search]`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchConfig {
    #[serde(default)]
    pub coordinate_policy: CoordinatePolicy,
}

impl Config {
    /// Load configuration. An explicit `path` must exist; the default path
    /// is optional.
    pub fn load(path: Option<&Path>) -> Result<Self, config::ConfigError> {
        let file = match path {
            Some(p) => config::File::from(p).required(true),
            None => config::File::from(default_path().as_path()).required(false),
        };

        let mut cfg = config::Config::builder()
            .add_source(config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Toml))
            .add_source(file)
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize::<Config>()?;

        cfg.normalize();
        Ok(cfg)
    }

    /// Parse a TOML string on top of the defaults, without touching the
    /// filesystem or environment.
    pub fn from_toml(toml: &str) -> Result<Self, config::ConfigError> {
        let mut cfg = config::Config::builder()
            .add_source(config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Toml))
            .add_source(config::File::from_str(toml, config::FileFormat::Toml))
            .build()?
            .try_deserialize::<Config>()?;
        cfg.normalize();
        Ok(cfg)
    }

    /// Body ids are matched lowercase everywhere else.
    fn normalize(&mut self) {
        self.data.skip_lines = std::mem::take(&mut self.data.skip_lines)
            .into_iter()
            .map(|(body, n)| (body.to_lowercase(), n))
            .collect();
        self.data.extension = self.data.extension.trim_start_matches('.').to_string();
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

fn default_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("gazetteer")
        .join("config.toml")
}
