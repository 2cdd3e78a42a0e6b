//! Configuration for the lsp-wire command line
//!
//! Layers, lowest precedence first:
//! 1. `$XDG_CONFIG_HOME/lsp-wire/config.toml` (or `~/.config/...`)
//! 2. `.lsp-wire.toml` in the project directory
//! 3. `LSP_WIRE_PRETTY` / `LSP_WIRE_STRICT` environment variables

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

pub const PROJECT_CONFIG_FILE: &str = ".lsp-wire.toml";
pub const ENV_PRETTY: &str = "LSP_WIRE_PRETTY";
pub const ENV_STRICT: &str = "LSP_WIRE_STRICT";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct WireConfig {
    #[serde(default)]
    pub output: OutputConfig,

    #[serde(default)]
    pub check: CheckConfig,
}

/// Output configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Indent JSON output
    #[serde(default = "defaults::pretty")]
    pub pretty: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            pretty: defaults::pretty(),
        }
    }
}

/// `check` command configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct CheckConfig {
    /// Fail when decoding drops fields the model does not know
    #[serde(default)]
    pub strict_unknown_fields: bool,
}

mod defaults {
    pub fn pretty() -> bool {
        true
    }
}

/// Effective configuration and the files it was read from.
#[derive(Debug, Clone, Serialize)]
pub struct LoadedConfig {
    pub config: WireConfig,
    pub sources: Vec<PathBuf>,
}

pub struct ConfigLoader {
    global_path: PathBuf,
    project_path: PathBuf,
}

impl ConfigLoader {
    pub fn new(project_root: &Path) -> Self {
        Self {
            global_path: Self::global_config_path(),
            project_path: project_root.join(PROJECT_CONFIG_FILE),
        }
    }

    pub fn with_global_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.global_path = path.into();
        self
    }

    pub fn global_config_path() -> PathBuf {
        // XDG standard: ~/.config/lsp-wire/config.toml
        std::env::var("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .ok()
            .or_else(|| dirs::home_dir().map(|h| h.join(".config")))
            .unwrap_or_else(|| PathBuf::from("."))
            .join("lsp-wire")
            .join("config.toml")
    }

    pub fn project_config_path(&self) -> &Path {
        &self.project_path
    }

    /// Merge both files, then apply environment overrides.
    pub fn load(&self) -> Result<LoadedConfig, ConfigError> {
        self.load_with_env(|key| std::env::var(key).ok())
    }

    pub fn load_with_env<F>(&self, env: F) -> Result<LoadedConfig, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut merged = toml::Table::new();
        let mut sources = Vec::new();

        for path in [&self.global_path, &self.project_path] {
            if let Some(table) = Self::read_table(path)? {
                tracing::debug!("Loaded config from {}", path.display());
                merge_tables(&mut merged, table);
                sources.push(path.clone());
            }
        }

        let config: WireConfig = toml::Value::Table(merged)
            .try_into()
            .map_err(|e: toml::de::Error| ConfigError::Parse(e.to_string()))?;
        let config = apply_env_overrides(config, env)?;

        Ok(LoadedConfig { config, sources })
    }

    fn read_table(path: &Path) -> Result<Option<toml::Table>, ConfigError> {
        if !path.exists() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(path)?;
        content
            .parse::<toml::Table>()
            .map(Some)
            .map_err(|e| ConfigError::Parse(format!("{}: {}", path.display(), e)))
    }
}

/// Overlay keys replace base keys; nested tables merge key by key.
fn merge_tables(base: &mut toml::Table, overlay: toml::Table) {
    for (key, value) in overlay {
        match (base.get_mut(&key), value) {
            (Some(toml::Value::Table(existing)), toml::Value::Table(incoming)) => {
                merge_tables(existing, incoming);
            }
            (_, value) => {
                base.insert(key, value);
            }
        }
    }
}

fn apply_env_overrides<F>(mut config: WireConfig, env: F) -> Result<WireConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(val) = env(ENV_PRETTY) {
        config.output.pretty = parse_bool(ENV_PRETTY, &val)?;
    }
    if let Some(val) = env(ENV_STRICT) {
        config.check.strict_unknown_fields = parse_bool(ENV_STRICT, &val)?;
    }
    Ok(config)
}

fn parse_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            key: key.to_string(),
            message: format!("expected a boolean, got '{}'", value),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    fn loader(dir: &TempDir) -> ConfigLoader {
        ConfigLoader::new(dir.path()).with_global_path(dir.path().join("global.toml"))
    }

    #[test]
    fn test_default_config() {
        let config = WireConfig::default();
        assert!(config.output.pretty);
        assert!(!config.check.strict_unknown_fields);
    }

    #[test]
    fn test_missing_files_use_defaults() {
        let dir = TempDir::new().unwrap();
        let loaded = loader(&dir).load_with_env(no_env).unwrap();
        assert_eq!(loaded.config, WireConfig::default());
        assert!(loaded.sources.is_empty());
    }

    #[test]
    fn test_project_overrides_global() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("global.toml"),
            "[output]\npretty = false\n\n[check]\nstrict_unknown_fields = true\n",
        )
        .unwrap();
        std::fs::write(
            dir.path().join(PROJECT_CONFIG_FILE),
            "[check]\nstrict_unknown_fields = false\n",
        )
        .unwrap();

        let loaded = loader(&dir).load_with_env(no_env).unwrap();
        assert!(!loaded.config.output.pretty);
        assert!(!loaded.config.check.strict_unknown_fields);
        assert_eq!(loaded.sources.len(), 2);
    }

    #[test]
    fn test_env_overrides_files() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join(PROJECT_CONFIG_FILE), "[output]\npretty = true\n").unwrap();

        let loaded = loader(&dir)
            .load_with_env(|key| match key {
                ENV_PRETTY => Some("0".to_string()),
                ENV_STRICT => Some("yes".to_string()),
                _ => None,
            })
            .unwrap();
        assert!(!loaded.config.output.pretty);
        assert!(loaded.config.check.strict_unknown_fields);
    }

    #[test]
    fn test_invalid_env_value() {
        let dir = TempDir::new().unwrap();
        let err = loader(&dir)
            .load_with_env(|key| (key == ENV_STRICT).then(|| "maybe".to_string()))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref key, .. } if key == ENV_STRICT));
    }

    #[test]
    fn test_malformed_file() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join(PROJECT_CONFIG_FILE), "[output\npretty = ").unwrap();
        let err = loader(&dir).load_with_env(no_env).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_wrong_type_is_parse_error() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join(PROJECT_CONFIG_FILE), "[output]\npretty = \"very\"\n")
            .unwrap();
        assert!(matches!(
            loader(&dir).load_with_env(no_env),
            Err(ConfigError::Parse(_))
        ));
    }
}
