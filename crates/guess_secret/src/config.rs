//! # Game Configuration
//!
//! Loaded once at startup from TOML, then overridden by the environment.
//!
//! ```toml
//! network = "development"
//! deployments_dir = "./deployments"
//! caller = "0x…"            # optional, forwarded to read queries
//!
//! [tx]
//! gas_limit = 500000
//! ```
//!
//! `CHAIN` overrides `network`, `DIR` overrides `deployments_dir`.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use guess_chain::TxOptions;
use guess_shared::{AccountId, NetworkId, DEFAULT_CHAIN, DEFAULT_DEPLOYMENTS_DIR};
use serde::Deserialize;
use thiserror::Error;

/// Errors while loading the configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("cannot read config {path}: {source}")]
    Io {
        /// Config file.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: io::Error,
    },

    /// The file is not valid TOML for [`GameConfig`].
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    /// `caller` is not a 32-byte hex account.
    #[error("invalid caller account {0:?}")]
    InvalidCaller(String),
}

/// On-disk shape; validated into [`GameConfig`].
#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct RawConfig {
    network: String,
    deployments_dir: PathBuf,
    caller: Option<String>,
    tx: TxOptions,
}

impl Default for RawConfig {
    fn default() -> Self {
        Self {
            network: DEFAULT_CHAIN.to_string(),
            deployments_dir: PathBuf::from(DEFAULT_DEPLOYMENTS_DIR),
            caller: None,
            tx: TxOptions::default(),
        }
    }
}

/// Runtime configuration of a game session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GameConfig {
    /// Network the wallet is expected on.
    pub network: NetworkId,
    /// Where deployment records are read from.
    pub deployments_dir: PathBuf,
    /// Account passed as caller to read queries.
    pub caller: Option<AccountId>,
    /// Options for every transaction.
    pub tx: TxOptions,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            network: NetworkId::from(DEFAULT_CHAIN),
            deployments_dir: PathBuf::from(DEFAULT_DEPLOYMENTS_DIR),
            caller: None,
            tx: TxOptions::default(),
        }
    }
}

impl GameConfig {
    /// Parses a TOML document. Missing keys take their defaults.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let raw: RawConfig = toml::from_str(text)?;
        let caller = raw
            .caller
            .map(|c| c.parse::<AccountId>().map_err(|_| ConfigError::InvalidCaller(c)))
            .transpose()?;

        Ok(Self {
            network: NetworkId::new(raw.network),
            deployments_dir: raw.deployments_dir,
            caller,
            tx: raw.tx,
        })
    }

    /// Reads and parses a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&text)?;
        tracing::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Applies `CHAIN` and `DIR` from the process environment.
    #[must_use]
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(std::env::var("CHAIN").ok(), std::env::var("DIR").ok())
    }

    /// Applies explicit overrides; empty values count as unset.
    #[must_use]
    pub fn with_overrides(mut self, chain: Option<String>, dir: Option<String>) -> Self {
        if let Some(chain) = chain.filter(|c| !c.is_empty()) {
            self.network = NetworkId::new(chain);
        }
        if let Some(dir) = dir.filter(|d| !d.is_empty()) {
            self.deployments_dir = PathBuf::from(dir);
        }
        self
    }
}
