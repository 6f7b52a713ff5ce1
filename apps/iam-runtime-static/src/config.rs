//! Layered process configuration.
//!
//! 1) built-in defaults -> 2) YAML file (`--config`) -> 3) environment
//! (`IAM_RUNTIME__SECTION__KEY`) -> 4) CLI overrides.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Yaml};
use serde::{Deserialize, Serialize};

/// Environment variable prefix; nested keys are separated by `__`.
pub const ENV_PREFIX: &str = "IAM_RUNTIME__";

const DEFAULT_LISTEN_ADDR: &str = "127.0.0.1:50051";
const DEFAULT_POLICY_PATH: &str = "policy.yaml";
const DEFAULT_LOG_LEVEL: &str = "info";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub policy: PolicyConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    /// `host:port` or `uds:///path/to/socket`.
    pub listen_addr: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: DEFAULT_LISTEN_ADDR.to_owned(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PolicyConfig {
    /// Policy document location. Credential values are never read from here.
    pub path: PathBuf,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_POLICY_PATH),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    /// `EnvFilter` directive; `RUST_LOG` takes precedence when set.
    pub level: String,
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: DEFAULT_LOG_LEVEL.to_owned(),
            format: LogFormat::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Values taken from the command line, applied last.
#[derive(Debug, Default)]
pub struct CliOverrides {
    pub policy: Option<PathBuf>,
    pub listen: Option<String>,
    pub verbose: u8,
}

impl AppConfig {
    /// Load defaults, then the optional YAML file, then the environment.
    ///
    /// # Errors
    /// Returns an error if `path` is not a file or the merged configuration
    /// does not deserialize (unknown keys included).
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(path) = path {
            if !path.is_file() {
                anyhow::bail!("config file does not exist: {}", path.display());
            }
            figment = figment.merge(Yaml::file(path));
        }

        figment
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .context("invalid configuration")
    }

    pub fn apply_cli_overrides(&mut self, overrides: &CliOverrides) {
        if let Some(policy) = &overrides.policy {
            self.policy.path.clone_from(policy);
        }
        if let Some(listen) = &overrides.listen {
            self.server.listen_addr.clone_from(listen);
        }
        if let Some(level) = verbosity_level(overrides.verbose) {
            self.logging.level = level.to_owned();
        }
    }
}

fn verbosity_level(verbose: u8) -> Option<&'static str> {
    match verbose {
        0 => None,
        1 => Some("info"),
        2 => Some("debug"),
        _ => Some("trace"),
    }
}
