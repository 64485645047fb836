//! Configuration loading for PariVaani.
//!
//! ## Design
//! - TOML file at `~/.parivaani/config.toml`, every section optional
//! - `--config <path>` replaces the default location
//! - `PARIVAANI_*` environment variables override file values
//! - `~` in path-valued settings is expanded at the point of use

pub mod schema;

pub use schema::{
    BaasConfig, Config, DashboardConfig, DownloadConfig, GatewayConfig, GenerationConfig,
    StoreBackend, StoreConfig,
};

use anyhow::Context;
use directories::UserDirs;
use std::path::{Path, PathBuf};

/// Directory holding the config file and the local record store.
pub fn default_config_dir() -> anyhow::Result<PathBuf> {
    let home = UserDirs::new()
        .map(|u| u.home_dir().to_path_buf())
        .ok_or_else(|| anyhow::anyhow!("Could not find home directory"))?;
    Ok(home.join(".parivaani"))
}

/// Default location of `config.toml`.
pub fn default_config_path() -> anyhow::Result<PathBuf> {
    Ok(default_config_dir()?.join("config.toml"))
}

/// Expand `~` and `$VAR` in a configured path.
pub fn expand_path(raw: &str) -> anyhow::Result<PathBuf> {
    let expanded = shellexpand::full(raw).with_context(|| format!("Failed to expand path {raw}"))?;
    Ok(PathBuf::from(expanded.as_ref()))
}

impl Config {
    /// Load the config from `path` (or the default location) and apply env overrides.
    ///
    /// A missing file yields the defaults; a malformed file is an error.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let config_path = match path {
            Some(p) => expand_path(&p.to_string_lossy())?,
            None => default_config_path()?,
        };

        let mut config = if config_path.exists() {
            let contents = std::fs::read_to_string(&config_path)
                .with_context(|| format!("Failed to read config {}", config_path.display()))?;
            Self::from_toml(&contents)
                .with_context(|| format!("Failed to parse config {}", config_path.display()))?
        } else {
            tracing::debug!(path = %config_path.display(), "No config file, using defaults");
            Self::default()
        };

        config.config_path = config_path;
        config.apply_env_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    pub fn from_toml(contents: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Apply `PARIVAANI_*` overrides using `lookup` to read variables.
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(url) = get("PARIVAANI_BAAS_URL") {
            self.baas.url = url;
        }
        if let Some(key) = get("PARIVAANI_BAAS_KEY") {
            self.baas.anon_key = key;
        }
        if let Some(host) = get("PARIVAANI_GATEWAY_HOST") {
            self.gateway.host = host;
        }
        if let Some(port) = get("PARIVAANI_GATEWAY_PORT") {
            match port.trim().parse() {
                Ok(p) => self.gateway.port = p,
                Err(_) => tracing::warn!(value = %port, "Ignoring invalid PARIVAANI_GATEWAY_PORT"),
            }
        }
        if let Some(store) = get("PARIVAANI_STORE") {
            match StoreBackend::from_str_name(&store) {
                Some(backend) => self.store.backend = backend,
                None => tracing::warn!(value = %store, "Ignoring unknown PARIVAANI_STORE"),
            }
        }
    }

    /// Copy of the config safe to print: the anon key is masked.
    pub fn redacted(&self) -> Self {
        let mut copy = self.clone();
        if !copy.baas.anon_key.is_empty() {
            copy.baas.anon_key = "***".into();
        }
        copy
    }

    /// Render as TOML (used by `config show`).
    pub fn to_toml(&self) -> anyhow::Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// JSON schema of the config file (used by `config schema`).
    pub fn json_schema() -> anyhow::Result<String> {
        let schema = schemars::schema_for!(Config);
        Ok(serde_json::to_string_pretty(&schema)?)
    }

    /// Fail early when the BaaS connection is not configured.
    pub fn require_baas(&self) -> anyhow::Result<()> {
        if self.baas.url.trim().is_empty() {
            anyhow::bail!(
                "BaaS URL is not configured (set [baas].url in {} or PARIVAANI_BAAS_URL)",
                self.config_path.display()
            );
        }
        if self.baas.anon_key.trim().is_empty() {
            anyhow::bail!("BaaS anon key is not configured (set [baas].anon_key or PARIVAANI_BAAS_KEY)");
        }
        Ok(())
    }
}
