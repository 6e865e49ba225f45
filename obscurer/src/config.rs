//! Configuration loaded from `obscurer.toml`.
//!
//! Every setting has a default, so running without a configuration file is fine.
//! The configuration is read-only once loaded. The store and the obscurer are never
//! global; they are passed explicitly to the handlers that use them.
use once_cell::sync::OnceCell;
use std::fs::read_to_string;
use std::io::IsTerminal;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::obscure::Mapping;

static CONFIG: OnceCell<Config> = OnceCell::new();

/// Default configuration file name, looked up in the working directory.
pub const CONFIG_FILE: &str = "obscurer.toml";

#[derive(Error, Debug)]
pub enum Error {
    #[error("config: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("config: {0}")]
    Io(#[from] std::io::Error),

    #[error("store must have at least one shard")]
    Shards,

    #[error("header_max_size must be greater than zero")]
    HeaderMaxSize,
}

/// Configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(skip)]
    path: Option<PathBuf>,
    #[serde(default)]
    pub general: General,
    #[serde(default)]
    pub store: StoreConfig,
    /// Mappings pre-loaded into the store on startup.
    #[serde(default)]
    pub mappings: Vec<Mapping>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct General {
    #[serde(default = "General::default_host")]
    pub host: String,
    #[serde(default = "General::default_port")]
    pub port: u16,
    /// Maximum size of the request line and headers together, in bytes.
    #[serde(default = "General::default_header_max_size")]
    pub header_max_size: usize,
    /// Maximum accepted `Content-Length`, in bytes.
    #[serde(default = "General::default_body_max_size")]
    pub body_max_size: usize,
    #[serde(skip, default = "General::default_tty")]
    pub tty: bool,
}

impl General {
    fn default_host() -> String {
        "0.0.0.0".into()
    }

    fn default_port() -> u16 {
        8000
    }

    fn default_header_max_size() -> usize {
        16 * 1024 // 16KB
    }

    fn default_body_max_size() -> usize {
        1024 * 1024 // 1MB
    }

    fn default_tty() -> bool {
        std::io::stderr().is_terminal()
    }
}

impl Default for General {
    fn default() -> Self {
        Self {
            host: Self::default_host(),
            port: Self::default_port(),
            header_max_size: Self::default_header_max_size(),
            body_max_size: Self::default_body_max_size(),
            tty: Self::default_tty(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Number of independently locked shards in the memory store.
    #[serde(default = "StoreConfig::default_shards")]
    pub shards: usize,
}

impl StoreConfig {
    fn default_shards() -> usize {
        16
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            shards: Self::default_shards(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            path: None,
            general: General::default(),
            store: StoreConfig::default(),
            mappings: vec![],
        }
    }
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Config, Error> {
        let file = read_to_string(path.as_ref())?;
        let mut config = Self::parse(&file)?;
        config.path = Some(path.as_ref().to_owned());

        Ok(config)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(toml: &str) -> Result<Config, Error> {
        let config: Config = toml::from_str(toml)?;

        if config.store.shards == 0 {
            return Err(Error::Shards);
        }

        if config.general.header_max_size == 0 {
            return Err(Error::HeaderMaxSize);
        }

        Ok(config)
    }

    /// Path of the file this configuration was loaded from, if any.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Address the server should listen on.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.general.host, self.general.port)
    }

    pub fn get() -> &'static Config {
        get_config()
    }

    /// Print configuration to the log.
    pub fn log_info(&self) {
        match self.path() {
            Some(path) => tracing::info!("Configuration loaded from \"{}\"", path.display()),
            None => tracing::info!("No configuration file found, using defaults"),
        }
    }
}

/// Get the process configuration, loading it from [`CONFIG_FILE`] on first use.
pub fn get_config() -> &'static Config {
    CONFIG.get_or_init(|| {
        if Path::new(CONFIG_FILE).exists() {
            match Config::load(CONFIG_FILE) {
                Ok(config) => config,
                Err(err) => {
                    tracing::warn!("{}: {}, using defaults", CONFIG_FILE, err);
                    Config::default()
                }
            }
        } else {
            Config::default()
        }
    })
}
