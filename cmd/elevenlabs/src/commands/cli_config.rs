//! Context configuration for the CLI.
//!
//! Configuration is stored in ~/.giztoy/elevenlabs/config.yaml and holds any
//! number of named contexts, one of which may be current.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context as _;
use serde::{Deserialize, Serialize};

/// Default base configuration directory name.
pub const DEFAULT_BASE_DIR: &str = ".giztoy";
/// Default configuration filename.
pub const DEFAULT_CONFIG_FILE: &str = "config.yaml";

/// CLI configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Name of the currently active context.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub current_context: String,

    /// Contexts by name.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub contexts: BTreeMap<String, Context>,

    #[serde(skip)]
    config_path: PathBuf,
}

/// A single API context.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Context {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,

    pub api_key: String,

    /// API base URL; the client default is used when empty.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub base_url: String,

    /// Request timeout in seconds; the client default is used when zero.
    #[serde(default, skip_serializing_if = "is_zero")]
    pub timeout: u64,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub default_voice: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub default_model: String,
}

fn is_zero(n: &u64) -> bool {
    *n == 0
}

impl Config {
    /// Gets the default config file path for an app.
    pub fn default_path(app_name: &str) -> Option<PathBuf> {
        dirs::home_dir().map(|home| {
            home.join(DEFAULT_BASE_DIR)
                .join(app_name)
                .join(DEFAULT_CONFIG_FILE)
        })
    }

    /// Returns the config file path.
    pub fn path(&self) -> &Path {
        &self.config_path
    }

    /// Saves the configuration to disk.
    pub fn save(&self) -> anyhow::Result<()> {
        let content = serde_yaml::to_string(self)?;
        std::fs::write(&self.config_path, content)
            .with_context(|| format!("failed to write {}", self.config_path.display()))?;
        Ok(())
    }

    /// Adds or replaces a context and saves.
    pub fn add_context(&mut self, name: &str, mut ctx: Context) -> anyhow::Result<()> {
        if name.is_empty() {
            anyhow::bail!("context name must not be empty");
        }
        if ctx.api_key.is_empty() {
            anyhow::bail!("context '{}' needs an API key", name);
        }
        ctx.name = name.to_string();
        self.contexts.insert(name.to_string(), ctx);
        self.save()
    }

    /// Deletes a context and saves. Clears the current context if it was the one removed.
    pub fn delete_context(&mut self, name: &str) -> anyhow::Result<()> {
        if self.contexts.remove(name).is_none() {
            anyhow::bail!("context '{}' not found", name);
        }
        if self.current_context == name {
            self.current_context.clear();
        }
        self.save()
    }

    /// Sets the current context and saves.
    pub fn use_context(&mut self, name: &str) -> anyhow::Result<()> {
        if !self.contexts.contains_key(name) {
            anyhow::bail!("context '{}' not found", name);
        }
        self.current_context = name.to_string();
        self.save()
    }

    /// Gets the current context.
    pub fn current(&self) -> Option<&Context> {
        if self.current_context.is_empty() {
            return None;
        }
        self.contexts.get(&self.current_context)
    }

    /// Resolves the context by name, or the current context if no name is given.
    pub fn resolve_context(&self, name: Option<&str>) -> Option<&Context> {
        match name {
            Some(n) if !n.is_empty() => self.contexts.get(n),
            _ => self.current(),
        }
    }
}

impl Context {
    /// Returns the configured timeout, if any.
    pub fn timeout(&self) -> Option<Duration> {
        (self.timeout > 0).then(|| Duration::from_secs(self.timeout))
    }
}

/// Loads configuration for an app, creating an empty file on first use.
pub fn load_config(app_name: &str, custom_path: Option<&str>) -> anyhow::Result<Config> {
    let config_path = match custom_path {
        Some(p) => PathBuf::from(p),
        None => Config::default_path(app_name)
            .ok_or_else(|| anyhow::anyhow!("cannot determine config path"))?,
    };

    if let Some(parent) = config_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let exists = config_path.exists();
    let mut cfg: Config = if exists {
        let content = std::fs::read_to_string(&config_path)?;
        serde_yaml::from_str(&content)
            .with_context(|| format!("invalid config file {}", config_path.display()))?
    } else {
        Config::default()
    };

    cfg.config_path = config_path;
    if !exists {
        cfg.save()?;
    }

    Ok(cfg)
}

/// Masks an API key for display.
pub fn mask_api_key(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() <= 8 {
        return "*".repeat(chars.len());
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}{}{}", head, "*".repeat(chars.len() - 8), tail)
}
