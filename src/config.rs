//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/orgtree/orgtree.toml`
//! 3. Local config: `<dir>/.orgtree.toml`
//! 4. Environment variables: `ORGTREE_*` prefix

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::application::ApplicationError;
use crate::domain::RenderOptions;

/// Raw settings for intermediate parsing (`None` means "not specified").
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub label_field: Option<String>,
    pub expand_depth: Option<usize>,
    pub strict: Option<bool>,
    pub pretty: Option<bool>,
}

/// Unified configuration for orgtree.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Record field shown as node label (default: "name")
    pub label_field: String,
    /// Deepest level shown expanded in tree output (default: unlimited)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expand_depth: Option<usize>,
    /// Fail on duplicate ids, unresolved or malformed manager references
    pub strict: bool,
    /// Pretty-print JSON output
    pub pretty: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            label_field: "name".into(),
            expand_depth: None,
            strict: false,
            pretty: true,
        }
    }
}

/// Get the XDG config directory for orgtree.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "orgtree").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("orgtree.toml"))
}

/// Get the path to the local config file in a directory.
pub fn local_config_path(dir: &Path) -> PathBuf {
    dir.join(".orgtree.toml")
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

impl Settings {
    /// Overlay wins where it specifies a value, otherwise keep self.
    pub fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            label_field: overlay
                .label_field
                .clone()
                .unwrap_or_else(|| self.label_field.clone()),
            expand_depth: overlay.expand_depth.or(self.expand_depth),
            strict: overlay.strict.unwrap_or(self.strict),
            pretty: overlay.pretty.unwrap_or(self.pretty),
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `local_dir` - Optional directory holding a `.orgtree.toml`
    pub fn load(local_dir: Option<&Path>) -> Result<Self, ApplicationError> {
        let global = global_config_path().filter(|p| p.exists());
        let local = local_dir.map(local_config_path).filter(|p| p.exists());
        Self::load_from(global.as_deref(), local.as_deref())
    }

    /// Load settings from explicit config files (missing layers are skipped).
    pub fn load_from(global: Option<&Path>, local: Option<&Path>) -> Result<Self, ApplicationError> {
        // 1. Start with defaults
        let mut current = Self::default();

        // 2. Global config
        if let Some(path) = global {
            current = current.merge_with(&load_raw_settings(path)?);
        }

        // 3. Local config
        if let Some(path) = local {
            current = current.merge_with(&load_raw_settings(path)?);
        }

        // 4. Environment variables (explicit override)
        Self::apply_env_overrides(current)
    }

    /// Apply ORGTREE_* environment variables as explicit overrides.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        // Use config crate just for env var parsing
        let config = Config::builder()
            .add_source(
                Environment::with_prefix("ORGTREE")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()
            .map_err(config_err)?;

        if let Some(val) = env_value(config.get_string("label_field"))? {
            settings.label_field = val;
        }
        if let Some(val) = env_value(config.get_int("expand_depth"))? {
            let depth = usize::try_from(val).map_err(|_| ApplicationError::Config {
                message: format!("ORGTREE_EXPAND_DEPTH must not be negative, got {val}"),
            })?;
            settings.expand_depth = Some(depth);
        }
        if let Some(val) = env_value(config.get_bool("strict"))? {
            settings.strict = val;
        }
        if let Some(val) = env_value(config.get_bool("pretty"))? {
            settings.pretty = val;
        }

        Ok(settings)
    }

    /// Options for text rendering.
    pub fn render_options(&self) -> RenderOptions {
        RenderOptions {
            label_field: self.label_field.clone(),
            expand_depth: self.expand_depth,
        }
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# orgtree configuration
#
# Locations (by precedence, lowest to highest):
#   Global: ~/.config/orgtree/orgtree.toml
#   Local:  <dir>/.orgtree.toml
#   Env:    ORGTREE_* environment variables

# Record field used as node label in tree output
# label_field = "name"

# Deepest level shown expanded in tree output (omit for the full tree)
# expand_depth = 2

# Fail on duplicate ids and unresolved/malformed manager references
# strict = false

# Pretty-print JSON output
# pretty = true
"#
        .to_string()
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}

/// Unset variables are skipped, unparsable ones are errors.
fn env_value<T>(result: Result<T, ConfigError>) -> Result<Option<T>, ApplicationError> {
    match result {
        Ok(val) => Ok(Some(val)),
        Err(ConfigError::NotFound(_)) => Ok(None),
        Err(e) => Err(config_err(e)),
    }
}
